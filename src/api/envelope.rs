use crate::Error;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Application-level status codes carried inside the response body.
///
/// These are distinct from the HTTP status, which is 200 for all of them.
pub mod status {
    pub const SUCCESS: i64 = 200;
    pub const FORBIDDEN: i64 = 403;
    pub const SERVER_ERROR: i64 = 500;
    pub const SESSION_EXPIRED: i64 = 700;
    pub const NOT_LOGGED_IN: i64 = 900;
    pub const NEEDS_AUTHORIZATION: i64 = 901;
}

/// The response format shared by every backend endpoint.
///
/// ```json
/// {
///     "code": 200,
///     "message": "OK",
///     "description": "...",
///     "data": { "tokenValue": "..." }
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ResponseEnvelope {
    pub fn from_json(contents: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Deserializes `data` into a concrete type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(T::deserialize(&self.data)?)
    }

    /// Reads a string field out of `data`, if present.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.code == status::SUCCESS
    }
}
