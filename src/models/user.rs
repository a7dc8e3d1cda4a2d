//! User model
//!
//! Users are an external identity mirrored into the local store; the blog
//! only reads usernames and the staff flag. Account management lives in the
//! external identity service.

use serde::{Deserialize, Serialize};

/// User entity (external identity mirror)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Unique username
    pub username: String,
    /// Whether the user may author posts
    pub is_staff: bool,
}
