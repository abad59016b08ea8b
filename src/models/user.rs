//! Account domain models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Closed set of roles. There is no default: signup must name one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Ngo,
    Volunteer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Ngo => "NGO",
            Role::Volunteer => "VOLUNTEER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "NGO" => Ok(Role::Ngo),
            "VOLUNTEER" => Ok(Role::Volunteer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Stored account. Never serialized: the hash must not leave the server.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Account about to be inserted
#[derive(Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NgoProfile {
    pub organization_name: String,
    pub registration_number: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerProfile {
    pub full_name: String,
    pub phone: Option<String>,
    pub interests: Option<String>,
    pub profile_pic_url: Option<String>,
}

/// Role-specific details stored next to the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum Profile {
    Ngo(NgoProfile),
    Volunteer(VolunteerProfile),
}

/// Signup request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    pub password: String,
    pub role: Role,

    // NGO details
    #[validate(length(max = 255))]
    pub organization_name: Option<String>,
    #[validate(length(max = 100))]
    pub registration_number: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,

    // Volunteer details
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 1000))]
    pub interests: Option<String>,
}

impl SignupRequest {
    /// Profile record for the requested role. The display name falls back
    /// to the username when the client leaves it out.
    pub fn profile(&self) -> Option<Profile> {
        let display_name = |name: &Option<String>| {
            name.as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(&self.username)
                .to_string()
        };

        match self.role {
            Role::Admin => None,
            Role::Ngo => Some(Profile::Ngo(NgoProfile {
                organization_name: display_name(&self.organization_name),
                registration_number: self.registration_number.clone(),
                address: self.address.clone(),
                description: self.description.clone(),
                logo_url: Some(String::new()),
            })),
            Role::Volunteer => Some(Profile::Volunteer(VolunteerProfile {
                full_name: display_name(&self.full_name),
                phone: self.phone.clone(),
                interests: self.interests.clone(),
                profile_pic_url: Some(String::new()),
            })),
        }
    }
}

/// Current user view, without credentials
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}
