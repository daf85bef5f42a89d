//! User entity - an account that posts, votes, comments, and follows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{Capabilities, Snowflake};

/// Account role; drives [`Capabilities`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Unknown strings degrade to the least privileged role
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::User => Capabilities::empty(),
            Self::Admin => Capabilities::ALL,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub premium_access: bool,
    pub follower_count: i64,
    pub following_count: i64,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            role: Role::User,
            is_verified: false,
            premium_access: false,
            follower_count: 0,
            following_count: 0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Deleted accounts are invisible to every interaction
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
