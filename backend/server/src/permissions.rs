//! # Permissions
//!
//! Per-operation authorization. A permission is a `resource.action` pair such as
//! `b2b.read`, the set is closed so a typo fails to parse instead of silently
//! denying.
//!
//! | Role  | Grants                                      |
//! |-------|---------------------------------------------|
//! | admin | everything                                  |
//! | user  | `b2c.read`, `stores.read`, `orders.create`  |
//!
//! Handlers call [`authorize`] (or `CurrentSession::require`) first and bubble the
//! error with `?`, so nothing protected runs on a denial.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::AppError, session::Session};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn grants(&self, permission: Permission) -> bool {
        match self {
            Role::Admin => true,
            Role::User => USER_GRANTS.contains(&permission),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    B2c,
    B2b,
    Stores,
    Users,
    Orders,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Write,
    Create,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
}

const USER_GRANTS: [Permission; 3] = [
    Permission::B2C_READ,
    Permission::STORES_READ,
    Permission::ORDERS_CREATE,
];

impl Permission {
    pub const B2C_READ: Self = Self::new(Resource::B2c, Action::Read);
    pub const B2C_WRITE: Self = Self::new(Resource::B2c, Action::Write);
    pub const B2B_READ: Self = Self::new(Resource::B2b, Action::Read);
    pub const B2B_WRITE: Self = Self::new(Resource::B2b, Action::Write);
    pub const STORES_READ: Self = Self::new(Resource::Stores, Action::Read);
    pub const STORES_WRITE: Self = Self::new(Resource::Stores, Action::Write);
    pub const USERS_READ: Self = Self::new(Resource::Users, Action::Read);
    pub const USERS_WRITE: Self = Self::new(Resource::Users, Action::Write);
    pub const ORDERS_CREATE: Self = Self::new(Resource::Orders, Action::Create);

    pub const ALL: [Self; 9] = [
        Self::B2C_READ,
        Self::B2C_WRITE,
        Self::B2B_READ,
        Self::B2B_WRITE,
        Self::STORES_READ,
        Self::STORES_WRITE,
        Self::USERS_READ,
        Self::USERS_WRITE,
        Self::ORDERS_CREATE,
    ];

    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resource = match self.resource {
            Resource::B2c => "b2c",
            Resource::B2b => "b2b",
            Resource::Stores => "stores",
            Resource::Users => "users",
            Resource::Orders => "orders",
        };
        let action = match self.action {
            Action::Read => "read",
            Action::Write => "write",
            Action::Create => "create",
        };

        write!(f, "{resource}.{action}")
    }
}

impl FromStr for Permission {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.to_string() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown name: {0}")]
pub struct UnknownName(pub String);

/// Aborts with [`AppError::Forbidden`] unless the session's role grants `permission`.
/// No session is treated the same as a role without the grant.
pub fn authorize(session: Option<&Session>, permission: Permission) -> Result<&Session, AppError> {
    match session {
        Some(session) if session.role.grants(permission) => Ok(session),
        _ => Err(AppError::Forbidden),
    }
}
