//! Sample resource types.
//!
//! Two small domains share the converter:
//! - a social feed: [`Status`] posted by a [`User`], with the user's statuses
//!   pointing back at the same status (a cycle),
//! - the classic blog example: [`Article`] with an [`Author`] and
//!   [`Comment`]s, exchanged with kebab-case attribute names.

mod article;
mod author;
mod comment;
mod status;
mod user;

pub use article::Article;
pub use author::Author;
pub use comment::Comment;
pub use status::Status;
pub use user::User;
