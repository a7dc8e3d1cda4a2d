//! Database layer
//!
//! SQLite persistence for posts, tags, comments, users, and the likes and
//! tags junction tables. The repositories under [`repositories`] form the
//! query composition layer; everything the page assemblers read goes
//! through them.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DbPool};
