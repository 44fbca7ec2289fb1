use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a Juju secret, as printed by `juju add-secret`
/// (for example `secret:cv4u3q6sffn3ptbd4g8g`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretUri(String);

impl SecretUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The unique part after the `secret:` scheme, if present.
    pub fn unique_id(&self) -> &str {
        self.0.rsplit('/').next().map_or(&self.0, |tail| {
            tail.strip_prefix("secret:").unwrap_or(tail)
        })
    }
}

impl From<String> for SecretUri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl fmt::Display for SecretUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_id_strips_scheme_and_model() {
        let plain = SecretUri::from("secret:abc123".to_owned());
        assert_eq!(plain.unique_id(), "abc123");
        let qualified = SecretUri::from("secret://6b1c/abc123".to_owned());
        assert_eq!(qualified.unique_id(), "abc123");
    }
}
