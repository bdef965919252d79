//! Account model and the fixed demo directory.
//!
//! There is no identity backend: the five demo accounts below are the only
//! principals the session store will accept.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Account role, also used as the requested login type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn demo(
    id: &str,
    email: &str,
    name: &str,
    role: Role,
    company: Option<&str>,
    avatar: &str,
) -> (String, User) {
    (
        email.to_string(),
        User {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            company: company.map(String::from),
            avatar: Some(avatar.to_string()),
        },
    )
}

static DEMO_USERS: Lazy<BTreeMap<String, User>> = Lazy::new(|| {
    BTreeMap::from([
        demo(
            "1",
            "user@demo.com",
            "John Doe",
            Role::User,
            None,
            "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face",
        ),
        demo(
            "2",
            "technician@demo.com",
            "Sarah Wilson",
            Role::User,
            None,
            "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=150&h=150&fit=crop&crop=face",
        ),
        demo(
            "3",
            "admin@telkom.com",
            "Admin Telkom",
            Role::Admin,
            Some("PT Telkom Indonesia"),
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
        ),
        demo(
            "4",
            "admin@xl.com",
            "Admin XL",
            Role::Admin,
            Some("PT XL Axiata"),
            "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=150&h=150&fit=crop&crop=face",
        ),
        demo(
            "5",
            "admin@indosat.com",
            "Admin Indosat",
            Role::Admin,
            Some("PT Indosat Ooredoo"),
            "https://images.unsplash.com/photo-1519085360753-af0119f7cbe7?w=150&h=150&fit=crop&crop=face",
        ),
    ])
});

/// Demo accounts keyed by email
pub fn demo_users() -> &'static BTreeMap<String, User> {
    &DEMO_USERS
}
