//! Wire documents bundled with the sample.

pub const STATUS: &[u8] = include_bytes!("../fixtures/status.json");
/// A status whose `user` relationship only carries a `related` link.
pub const STATUS_COMPACT: &[u8] = include_bytes!("../fixtures/status-compact.json");
pub const USER_LIZ: &[u8] = include_bytes!("../fixtures/user-liz.json");
pub const USER_JOHN: &[u8] = include_bytes!("../fixtures/user-john.json");
pub const USERS: &[u8] = include_bytes!("../fixtures/users.json");
pub const USER_WITH_STATUSES: &[u8] = include_bytes!("../fixtures/user-with-statuses.json");
/// Compound document with kebab-case attributes.
pub const ARTICLES: &[u8] = include_bytes!("../fixtures/articles.json");

/// `related` URL of the `user` relationship in [`STATUS`] and [`STATUS_COMPACT`].
pub const STATUS_USER_URL: &str = "https://api.example.com/statuses/1/user";
