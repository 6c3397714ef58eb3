//! User model and the read-only seed collection.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl User {
    /// Create a user.
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Validated input for a new user.
///
/// Values are kept as submitted: any truthy JSON value is accepted and
/// echoed back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: Value,
    pub email: Value,
}

impl NewUser {
    /// Assign an id derived from the current wall clock, in Unix milliseconds.
    ///
    /// The result is never stored; [`seed_users`] is unaffected.
    pub fn into_user(self) -> CreatedUser {
        CreatedUser {
            id: chrono::Utc::now().timestamp_millis(),
            name: self.name,
            email: self.email,
        }
    }
}

/// A user synthesized from request input. Lives only in its response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedUser {
    pub id: i64,
    pub name: Value,
    pub email: Value,
}

static SEED_USERS: Lazy<Vec<User>> = Lazy::new(|| {
    vec![
        User::new(1, "John Doe", "john@example.com"),
        User::new(2, "Jane Smith", "jane@example.com"),
        User::new(3, "Bob Johnson", "bob@example.com"),
    ]
});

/// The fixed user collection, in insertion order.
pub fn seed_users() -> &'static [User] {
    &SEED_USERS
}

/// Look up a seed user by id.
pub fn find_user(id: i64) -> Option<&'static User> {
    SEED_USERS.iter().find(|user| user.id == id)
}

/// Parse a path segment into a user id.
///
/// Lenient like a browser `parseInt`: leading whitespace and a sign are
/// skipped, digits are read up to the first non-digit, and a `0x` prefix
/// switches to hexadecimal. Returns `None` when no digits are found or the
/// value overflows.
pub fn parse_user_id(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, s) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let digits_len = s
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(s.len(), |(i, _)| i);
    if digits_len == 0 {
        return None;
    }

    let magnitude = i64::from_str_radix(&s[..digits_len], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
