use crate::{
	events::{RawEvent, ReplyTarget},
	matcher::IdentityMatcher,
};

/// Telegram relays channel posts into the discussion group through this
/// reserved account; its messages are forward artifacts, never descriptions.
pub const SERVICE_FORWARD_USER_ID: i64 = 777_000;

/// Prefix of a "show more results" callback payload; the remainder is the
/// original raw query.
pub const PAGINATION_MARKER: &str = "more:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
	Start,
	Help,
}

#[derive(Debug, Clone)]
pub enum ClassifiedEvent {
	PhotoPosted { source_id: i64, message_id: i64, file_id: String },
	DescriptionCandidate { reply: ReplyTarget, text: String },
	SearchQuery { text: String, requester: i64 },
	PaginationRequest { raw_query: String, requester: i64, interaction_id: String },
	Command { command: Command, requester: i64 },
	Ignored,
}

/// Maps raw inbound events to semantic event kinds. Total: unmatched or
/// malformed input classifies as [`ClassifiedEvent::Ignored`].
#[derive(Debug, Clone)]
pub struct Classifier {
	channel: IdentityMatcher,
	group: IdentityMatcher,
	describer: IdentityMatcher,
	failure_sentinel: String,
}
impl Classifier {
	pub fn new(routing: &memedex_config::Routing) -> Self {
		Self {
			channel: IdentityMatcher::new(&routing.channel, &routing.fallback_token),
			group: IdentityMatcher::new(&routing.group, &routing.fallback_token),
			describer: IdentityMatcher::new(&routing.description_bot, &routing.fallback_token),
			failure_sentinel: routing.failure_sentinel.clone(),
		}
	}

	pub fn classify(&self, event: RawEvent) -> ClassifiedEvent {
		match event {
			RawEvent::ChannelPost { chat, message_id, file_id: Some(file_id) }
				if self.channel.matches_chat(&chat) =>
				ClassifiedEvent::PhotoPosted { source_id: chat.id, message_id, file_id },
			RawEvent::ChannelPost { .. } => ClassifiedEvent::Ignored,
			RawEvent::Photo { chat, message_id, file_id, .. }
				if self.group.matches_chat(&chat) || self.channel.matches_chat(&chat) =>
				ClassifiedEvent::PhotoPosted { source_id: chat.id, message_id, file_id },
			RawEvent::Photo { .. } => ClassifiedEvent::Ignored,
			RawEvent::Text { chat, text, sender, reply_to, .. } => {
				if sender.as_ref().is_some_and(|sender| sender.id == SERVICE_FORWARD_USER_ID) {
					return ClassifiedEvent::Ignored;
				}
				if chat.is_private {
					return self.classify_private_text(chat.id, text);
				}

				let Some(reply) = reply_to else {
					return ClassifiedEvent::Ignored;
				};
				let from_describer =
					sender.as_ref().is_some_and(|sender| self.describer.matches_user(sender));

				if !from_describer || text == self.failure_sentinel {
					return ClassifiedEvent::Ignored;
				}

				ClassifiedEvent::DescriptionCandidate { reply, text }
			},
			RawEvent::Callback { id, data, requester, message } => {
				let Some(raw_query) = data.strip_prefix(PAGINATION_MARKER) else {
					return ClassifiedEvent::Ignored;
				};

				ClassifiedEvent::PaginationRequest {
					raw_query: raw_query.to_string(),
					requester: message.map(|message| message.chat_id).unwrap_or(requester),
					interaction_id: id,
				}
			},
		}
	}

	fn classify_private_text(&self, requester: i64, text: String) -> ClassifiedEvent {
		match text.split_whitespace().next() {
			Some("/start") => ClassifiedEvent::Command { command: Command::Start, requester },
			Some("/help") => ClassifiedEvent::Command { command: Command::Help, requester },
			Some(word) if word.starts_with('/') => ClassifiedEvent::Ignored,
			Some(_) => ClassifiedEvent::SearchQuery { text, requester },
			None => ClassifiedEvent::Ignored,
		}
	}
}
