use serde::{Deserialize, Serialize};

/// JWT payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userID")]
    pub user_id: String, // account id, stringified
    pub exp: i64,        // expires at (unix timestamp)
    #[serde(default)]
    pub iat: i64,        // issued at (unix timestamp)
}

/// A validated session: whose it is and when it stops being valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub account_id: i64,
    pub expires_at: i64,
}
