//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{CONTENT_MIN_LEN, Post, PostChange, TITLE_MAX_LEN, TITLE_MIN_LEN};
pub use post::{validate_content, validate_title};
pub use user::{MIN_PASSWORD_LEN, User, validate_registration};
