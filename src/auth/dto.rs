use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::User;

/// Query string Google appends to the redirect URI, kept as raw pairs so a
/// repeated key resolves to its first value.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct CallbackQuery(Vec<(String, String)>);

impl CallbackQuery {
    /// First `code` parameter, or `""` when absent.
    pub fn code(&self) -> &str {
        self.0
            .iter()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }
}

/// Response returned after a successful Google callback.
#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub code: String,
    pub access_token: String,
    pub data: User,
}

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
