/// The chat a message arrived in. `username` and `title` are both optional on
/// the wire; identity matching falls back across them (see [`crate::matcher`]).
#[derive(Debug, Clone, Default)]
pub struct ChatInfo {
	pub id: i64,
	pub username: Option<String>,
	pub title: Option<String>,
	pub is_private: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UserInfo {
	pub id: i64,
	pub username: Option<String>,
	pub display_name: Option<String>,
}

/// Original `(message_id, channel_id)` of a message that was forwarded into
/// another chat, distinct from the forwarded copy's own ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardOrigin {
	pub message_id: i64,
	pub channel_id: i64,
}

/// The message a text event replies to. `file_id` is present only when the
/// target itself carries a photo.
#[derive(Debug, Clone)]
pub struct ReplyTarget {
	pub message_id: i64,
	pub source_id: i64,
	pub file_id: Option<String>,
	pub forward_origin: Option<ForwardOrigin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
	pub chat_id: i64,
	pub message_id: i64,
}

/// Raw inbound transport event, before classification.
#[derive(Debug, Clone)]
pub enum RawEvent {
	Photo {
		chat: ChatInfo,
		message_id: i64,
		file_id: String,
		sender: Option<UserInfo>,
	},
	Text {
		chat: ChatInfo,
		message_id: i64,
		text: String,
		sender: Option<UserInfo>,
		reply_to: Option<ReplyTarget>,
	},
	ChannelPost {
		chat: ChatInfo,
		message_id: i64,
		file_id: Option<String>,
	},
	Callback {
		id: String,
		data: String,
		requester: i64,
		message: Option<MessageRef>,
	},
}
