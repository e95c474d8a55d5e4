//! Bot API wire types, update mapping, and the long-polling HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use memedex_domain::{ChatInfo, ForwardOrigin, MessageRef, RawEvent, ReplyTarget, UserInfo};

use crate::{
	BoxFuture, Error, Result,
	router::{SHOW_MORE_LABEL, Transport},
};

#[derive(Debug, Deserialize)]
pub struct Update {
	pub update_id: i64,
	pub message: Option<Message>,
	pub channel_post: Option<Message>,
	pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
	pub message_id: i64,
	pub chat: Chat,
	pub from: Option<User>,
	pub text: Option<String>,
	pub photo: Option<Vec<PhotoSize>>,
	pub reply_to_message: Option<Box<Message>>,
	pub forward_origin: Option<ForwardOriginPayload>,
}
impl Message {
	// Sizes arrive smallest-first; the largest rendition identifies the photo.
	fn photo_file_id(&self) -> Option<String> {
		self.photo.as_ref().and_then(|sizes| sizes.last()).map(|size| size.file_id.clone())
	}
}

#[derive(Debug, Deserialize)]
pub struct Chat {
	pub id: i64,
	#[serde(rename = "type")]
	pub kind: String,
	pub username: Option<String>,
	pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct User {
	pub id: i64,
	pub username: Option<String>,
	pub first_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSize {
	pub file_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ForwardOriginPayload {
	#[serde(rename = "type")]
	pub kind: String,
	pub chat: Option<Chat>,
	pub message_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
	pub id: String,
	pub from: User,
	pub data: Option<String>,
	pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
	ok: bool,
	description: Option<String>,
	result: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
	message_id: i64,
}

/// Maps one raw update to an inbound event, or `None` for update kinds this
/// system never acts on.
pub fn map_update(update: Update) -> Option<RawEvent> {
	if let Some(post) = update.channel_post {
		return Some(RawEvent::ChannelPost {
			file_id: post.photo_file_id(),
			chat: chat_info(&post.chat),
			message_id: post.message_id,
		});
	}
	if let Some(message) = update.message {
		let chat = chat_info(&message.chat);
		let sender = message.from.as_ref().map(user_info);

		if let Some(file_id) = message.photo_file_id() {
			return Some(RawEvent::Photo {
				chat,
				message_id: message.message_id,
				file_id,
				sender,
			});
		}

		let text = message.text?;

		return Some(RawEvent::Text {
			chat,
			message_id: message.message_id,
			text,
			sender,
			reply_to: message.reply_to_message.map(|target| reply_target(*target)),
		});
	}
	if let Some(callback) = update.callback_query {
		return Some(RawEvent::Callback {
			id: callback.id,
			data: callback.data?,
			requester: callback.from.id,
			message: callback.message.map(|message| MessageRef {
				chat_id: message.chat.id,
				message_id: message.message_id,
			}),
		});
	}

	None
}

fn chat_info(chat: &Chat) -> ChatInfo {
	ChatInfo {
		id: chat.id,
		username: chat.username.clone(),
		title: chat.title.clone(),
		is_private: chat.kind == "private",
	}
}

fn user_info(user: &User) -> UserInfo {
	UserInfo {
		id: user.id,
		username: user.username.clone(),
		display_name: user.first_name.clone(),
	}
}

fn reply_target(target: Message) -> ReplyTarget {
	let forward_origin = target.forward_origin.as_ref().and_then(|origin| {
		if origin.kind != "channel" {
			return None;
		}

		Some(ForwardOrigin {
			message_id: origin.message_id?,
			channel_id: origin.chat.as_ref()?.id,
		})
	});

	ReplyTarget {
		message_id: target.message_id,
		source_id: target.chat.id,
		file_id: target.photo_file_id(),
		forward_origin,
	}
}

pub struct TelegramClient {
	client: Client,
	api_base: String,
	token: String,
	poll_timeout_secs: u64,
}
impl TelegramClient {
	pub fn new(cfg: &memedex_config::Telegram) -> Result<Self> {
		// Long polls hold the connection open for `poll_timeout_secs`; pad the
		// client timeout so it fires only on a genuinely dead connection.
		let client =
			Client::builder().timeout(Duration::from_secs(cfg.poll_timeout_secs + 10)).build()?;

		Ok(Self {
			client,
			api_base: cfg.api_base.trim_end_matches('/').to_string(),
			token: cfg.bot_token.clone(),
			poll_timeout_secs: cfg.poll_timeout_secs,
		})
	}

	pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
		let result = self
			.call("getUpdates", json!({
				"offset": offset,
				"timeout": self.poll_timeout_secs,
				"allowed_updates": ["message", "channel_post", "callback_query"],
			}))
			.await?;

		Ok(serde_json::from_value(result)?)
	}

	async fn call(&self, method: &str, body: Value) -> Result<Value> {
		let url = format!("{}/bot{}/{method}", self.api_base, self.token);
		let response: ApiResponse =
			self.client.post(url).json(&body).send().await?.json().await?;

		if !response.ok {
			return Err(Error::Api {
				method: method.to_string(),
				description: response
					.description
					.unwrap_or_else(|| "no description".to_string()),
			});
		}

		Ok(response.result.unwrap_or(Value::Null))
	}
}
impl Transport for TelegramClient {
	fn send_text<'a>(&'a self, chat_id: i64, text: &'a str) -> BoxFuture<'a, Result<i64>> {
		Box::pin(async move {
			let result =
				self.call("sendMessage", json!({ "chat_id": chat_id, "text": text })).await?;
			let sent: SentMessage = serde_json::from_value(result)?;

			Ok(sent.message_id)
		})
	}

	fn send_photo<'a>(
		&'a self,
		chat_id: i64,
		file_id: &'a str,
		caption: &'a str,
		more: Option<&'a str>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut body = json!({ "chat_id": chat_id, "photo": file_id, "caption": caption });

			if let Some(payload) = more {
				body["reply_markup"] = json!({
					"inline_keyboard": [[{ "text": SHOW_MORE_LABEL, "callback_data": payload }]],
				});
			}

			self.call("sendPhoto", body).await?;

			Ok(())
		})
	}

	fn edit_message_text<'a>(
		&'a self,
		chat_id: i64,
		message_id: i64,
		text: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.call(
				"editMessageText",
				json!({ "chat_id": chat_id, "message_id": message_id, "text": text }),
			)
			.await?;

			Ok(())
		})
	}

	fn answer_callback<'a>(&'a self, callback_id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.call("answerCallbackQuery", json!({ "callback_query_id": callback_id })).await?;

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn update(payload: Value) -> Update {
		serde_json::from_value(payload).expect("Failed to parse update.")
	}

	#[test]
	fn maps_the_largest_photo_rendition() {
		let event = map_update(update(json!({
			"update_id": 1,
			"message": {
				"message_id": 7,
				"chat": { "id": -200, "type": "supergroup", "title": "memes group" },
				"photo": [{ "file_id": "small" }, { "file_id": "large" }],
			},
		})))
		.expect("Expected an event.");

		let RawEvent::Photo { file_id, message_id, .. } = event else {
			panic!("Expected a photo event.");
		};

		assert_eq!(file_id, "large");
		assert_eq!(message_id, 7);
	}

	#[test]
	fn maps_a_reply_with_a_channel_forward_origin() {
		let event = map_update(update(json!({
			"update_id": 1,
			"message": {
				"message_id": 8,
				"chat": { "id": -200, "type": "supergroup", "title": "memes group" },
				"from": { "id": 5, "username": "describer_bot" },
				"text": "a description",
				"reply_to_message": {
					"message_id": 42,
					"chat": { "id": -200, "type": "supergroup" },
					"photo": [{ "file_id": "F" }],
					"forward_origin": {
						"type": "channel",
						"chat": { "id": -100, "type": "channel", "username": "memes_channel" },
						"message_id": 7,
					},
				},
			},
		})))
		.expect("Expected an event.");

		let RawEvent::Text { reply_to: Some(reply), .. } = event else {
			panic!("Expected a text event with a reply target.");
		};

		assert_eq!(reply.file_id.as_deref(), Some("F"));
		assert_eq!(reply.forward_origin, Some(ForwardOrigin { message_id: 7, channel_id: -100 }));
	}

	#[test]
	fn non_channel_forward_origins_are_not_treated_as_channel_posts() {
		let event = map_update(update(json!({
			"update_id": 1,
			"message": {
				"message_id": 8,
				"chat": { "id": -200, "type": "supergroup", "title": "memes group" },
				"text": "a description",
				"reply_to_message": {
					"message_id": 42,
					"chat": { "id": -200, "type": "supergroup" },
					"forward_origin": { "type": "user" },
				},
			},
		})))
		.expect("Expected an event.");

		let RawEvent::Text { reply_to: Some(reply), .. } = event else {
			panic!("Expected a text event with a reply target.");
		};

		assert_eq!(reply.forward_origin, None);
	}

	#[test]
	fn ignores_updates_with_no_actionable_payload() {
		assert!(
			map_update(update(json!({
				"update_id": 1,
				"message": {
					"message_id": 9,
					"chat": { "id": -200, "type": "supergroup" },
				},
			})))
			.is_none()
		);
	}
}
