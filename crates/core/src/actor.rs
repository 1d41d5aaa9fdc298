//! Actor classification and capability checks
//!
//! Every transaction actor is either a beneficiary (spending relief funds)
//! or a vendor (receiving payouts). Privileged case-manager and review-queue
//! operations require the verifier or admin capability, checked through the
//! injected [`RoleProvider`] boundary.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strum_macros::{Display, EnumString};

/// Kind of entity a transaction actor or fraud report targets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityType {
    /// Relief fund beneficiary
    Beneficiary,
    /// Vendor receiving payouts
    Vendor,
}

/// Privileged roles recognized by the engine
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// May review flagged transactions and investigate reports
    Verifier,
    /// Full administrative capability
    Admin,
}

/// Capability check boundary.
///
/// The engine never stores user/role data itself; callers inject an
/// implementation backed by their identity system.
pub trait RoleProvider: Send + Sync {
    /// Does `user_id` hold `role`?
    fn has_role(&self, user_id: &str, role: Role) -> bool;

    /// Convenience: verifier or admin capability
    fn can_review(&self, user_id: &str) -> bool {
        self.has_role(user_id, Role::Verifier) || self.has_role(user_id, Role::Admin)
    }
}

/// In-memory role table for tests and single-node deployments
#[derive(Debug, Default)]
pub struct StaticRoles {
    grants: HashMap<String, HashSet<Role>>,
}

impl StaticRoles {
    /// Create an empty role table
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a role to a user (builder style)
    pub fn grant(mut self, user_id: impl Into<String>, role: Role) -> Self {
        self.grants.entry(user_id.into()).or_default().insert(role);
        self
    }
}

impl RoleProvider for StaticRoles {
    fn has_role(&self, user_id: &str, role: Role) -> bool {
        self.grants
            .get(user_id)
            .map(|roles| roles.contains(&role))
            .unwrap_or(false)
    }
}
