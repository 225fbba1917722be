//! Sign-in identity configuration
//!
//! There is no authentication protocol; the identity used on sign-in is
//! taken from configuration.

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::UserId;
use crate::domain::profile::Identity;

/// Identity configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Stable user id
    #[serde(default = "default_id")]
    pub id: String,

    /// Display name
    #[serde(default = "default_name")]
    pub name: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Avatar URL; derived from the name when absent
    pub avatar_url: Option<String>,
}

impl IdentityConfig {
    /// Builds the domain identity.
    pub fn identity(&self) -> Result<Identity, ValidationError> {
        let id = UserId::new(self.id.clone())
            .map_err(|e| ValidationError::InvalidIdentity(e.to_string()))?;
        if id.is_guest() {
            return Err(ValidationError::InvalidIdentity(format!(
                "'{}' is reserved for guests",
                self.id
            )));
        }
        let identity = Identity::new(id, self.name.clone(), self.email.clone())
            .map_err(|e| ValidationError::InvalidIdentity(e.to_string()))?;
        Ok(match &self.avatar_url {
            Some(url) if !url.is_empty() => identity.with_avatar_url(url.clone()),
            _ => identity,
        })
    }

    /// Validate identity configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.identity().map(|_| ())
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            id: default_id(),
            name: default_name(),
            email: String::new(),
            avatar_url: None,
        }
    }
}

fn default_id() -> String {
    "1".to_string()
}

fn default_name() -> String {
    "Eco Warrior".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_identity_is_valid() {
        let identity = IdentityConfig::default().identity().unwrap();
        assert_eq!(identity.name, "Eco Warrior");
    }

    #[test]
    fn test_empty_id_is_invalid() {
        let config = IdentityConfig {
            id: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_guest_prefix_is_reserved() {
        let config = IdentityConfig {
            id: "guest-123".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_avatar_override() {
        let config = IdentityConfig {
            avatar_url: Some("https://example.com/me.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.identity().unwrap().avatar_url,
            "https://example.com/me.png"
        );
    }
}
