use serde::{Deserialize, Serialize};

use super::role::RoleTag;

pub const DEFAULT_DISPLAY_NAME: &str = "Utilisateur";
pub const DEFAULT_INSTITUTION: &str = "Institution non spécifiée";
pub const DEFAULT_DOMAIN: &str = "Domaine non spécifié";

/// Profile shown by the portal views. Every field is always populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(rename = "name", default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_institution")]
    pub institution: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default)]
    pub email: String,
}

fn default_display_name() -> String { DEFAULT_DISPLAY_NAME.to_string() }
fn default_institution() -> String { DEFAULT_INSTITUTION.to_string() }
fn default_domain() -> String { DEFAULT_DOMAIN.to_string() }

impl Default for Profile {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            institution: default_institution(),
            domain: default_domain(),
            email: String::new(),
        }
    }
}

/// Normalized result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub token: String,
    pub role: RoleTag,
    pub profile: Profile,
}
