pub mod classify;
pub mod events;
pub mod matcher;
pub mod pending;
pub mod query;

pub use classify::{
	ClassifiedEvent, Classifier, Command, PAGINATION_MARKER, SERVICE_FORWARD_USER_ID,
};
pub use events::{ChatInfo, ForwardOrigin, MessageRef, RawEvent, ReplyTarget, UserInfo};
pub use matcher::IdentityMatcher;
pub use pending::{PendingPhoto, PendingStore};
