use serde::{Deserialize, Serialize};

/// Bearer credential used when requesting realtime tickets.
#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
