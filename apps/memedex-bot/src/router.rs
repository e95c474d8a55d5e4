use memedex_domain::ClassifiedEvent;

use crate::{BoxFuture, Result};

pub const SHOW_MORE_LABEL: &str = "Show more results";

/// Outbound side of the chat transport. Production is [`crate::telegram::TelegramClient`];
/// dispatch tests substitute a recording fake.
pub trait Transport
where
	Self: Send + Sync,
{
	/// Returns the sent message's id, so a later edit can target it.
	fn send_text<'a>(&'a self, chat_id: i64, text: &'a str) -> BoxFuture<'a, Result<i64>>;

	fn send_photo<'a>(
		&'a self,
		chat_id: i64,
		file_id: &'a str,
		caption: &'a str,
		more: Option<&'a str>,
	) -> BoxFuture<'a, Result<()>>;

	fn edit_message_text<'a>(
		&'a self,
		chat_id: i64,
		message_id: i64,
		text: &'a str,
	) -> BoxFuture<'a, Result<()>>;

	fn answer_callback<'a>(&'a self, callback_id: &'a str) -> BoxFuture<'a, Result<()>>;
}

pub trait Handler
where
	Self: Send + Sync,
{
	fn accepts(&self, event: &ClassifiedEvent) -> bool;

	fn handle<'a>(&'a self, event: &'a ClassifiedEvent) -> BoxFuture<'a, Result<()>>;
}

struct Route {
	name: &'static str,
	priority: u8,
	handler: Box<dyn Handler>,
}

/// Priority-ordered routing table. The first route that accepts an event
/// handles it; lower priority numbers run first, registration order breaks
/// ties.
#[derive(Default)]
pub struct Router {
	routes: Vec<Route>,
}
impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(
		mut self,
		name: &'static str,
		priority: u8,
		handler: Box<dyn Handler>,
	) -> Self {
		self.routes.push(Route { name, priority, handler });
		// Stable, so equal priorities keep registration order.
		self.routes.sort_by_key(|route| route.priority);

		self
	}

	pub async fn dispatch(&self, event: &ClassifiedEvent) -> Result<()> {
		for route in &self.routes {
			if route.handler.accepts(event) {
				tracing::debug!(handler = route.name, "Dispatching event.");

				return route.handler.handle(event).await;
			}
		}

		Ok(())
	}
}
