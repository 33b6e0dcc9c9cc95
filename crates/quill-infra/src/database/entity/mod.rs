//! SeaORM entities mirroring the migration schema.

pub mod post;
pub mod user;
