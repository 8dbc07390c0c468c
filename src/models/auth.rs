use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Response shape of POST /accounts/login/.
///
/// The backend returns tokens as an array; only the first entry is used.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub tokens: Vec<TokenPair>,
    /// Worker profile attached to the account, stored as-is: its nested shape
    /// differs from the flat listing record and the client never edits it.
    #[serde(default)]
    pub worker: Option<serde_json::Value>,
}

impl LoginResponse {
    pub fn access_tokens(&self) -> Option<&TokenPair> {
        self.tokens.first()
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
