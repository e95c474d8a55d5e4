use crate::events::{ChatInfo, UserInfo};

/// Case-insensitive substring matcher over the identities a source or sender
/// may present. One matcher serves both the channel-post and group-message
/// paths, so the two cannot drift apart.
#[derive(Debug, Clone)]
pub struct IdentityMatcher {
	needles: Vec<String>,
}
impl IdentityMatcher {
	/// `fallback_token` is the deployment's loose secondary match; empty
	/// needles are dropped, and a matcher with no needles matches nothing.
	pub fn new(identity: &str, fallback_token: &str) -> Self {
		let needles = [identity, fallback_token]
			.into_iter()
			.map(str::trim)
			.filter(|needle| !needle.is_empty())
			.map(str::to_lowercase)
			.collect();

		Self { needles }
	}

	pub fn matches_chat(&self, chat: &ChatInfo) -> bool {
		let id = chat.id.to_string();

		self.matches_any([chat.username.as_deref(), chat.title.as_deref(), Some(id.as_str())])
	}

	pub fn matches_user(&self, user: &UserInfo) -> bool {
		self.matches_any([user.username.as_deref(), user.display_name.as_deref()])
	}

	fn matches_any<'a>(&self, haystacks: impl IntoIterator<Item = Option<&'a str>>) -> bool {
		haystacks.into_iter().flatten().any(|haystack| {
			let haystack = haystack.to_lowercase();

			self.needles.iter().any(|needle| haystack.contains(needle))
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chat(username: Option<&str>, title: Option<&str>) -> ChatInfo {
		ChatInfo {
			id: -1_001,
			username: username.map(str::to_string),
			title: title.map(str::to_string),
			is_private: false,
		}
	}

	#[test]
	fn matches_username_case_insensitively() {
		let matcher = IdentityMatcher::new("dank_channel", "");

		assert!(matcher.matches_chat(&chat(Some("Dank_Channel"), None)));
	}

	#[test]
	fn falls_back_to_title_when_username_is_missing() {
		let matcher = IdentityMatcher::new("dank", "");

		assert!(matcher.matches_chat(&chat(None, Some("Dank memes daily"))));
	}

	#[test]
	fn fallback_token_widens_the_match() {
		let matcher = IdentityMatcher::new("dank_channel", "meme");

		assert!(matcher.matches_chat(&chat(Some("renamed_memes"), None)));
	}

	#[test]
	fn no_username_and_no_title_does_not_match() {
		let matcher = IdentityMatcher::new("dank_channel", "meme");

		assert!(!matcher.matches_chat(&chat(None, None)));
	}

	#[test]
	fn stringified_id_matches() {
		let matcher = IdentityMatcher::new("-1001", "");

		assert!(matcher.matches_chat(&chat(None, None)));
	}

	#[test]
	fn empty_needles_match_nothing() {
		let matcher = IdentityMatcher::new("  ", "");

		assert!(!matcher.matches_chat(&chat(Some("anything"), Some("anything"))));
	}
}
