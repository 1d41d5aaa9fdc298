//! ReliefGuard Core - Domain types
//!
//! This crate contains the fundamental types used across ReliefGuard:
//! - `Amount`: Non-negative decimal wrapper for financial amounts
//! - `Transaction`: Immutable candidate/historical transaction
//! - `EntityType`, `Role`, `RoleProvider`: actor classification and capabilities

pub mod actor;
pub mod amount;
pub mod transaction;

pub use actor::{EntityType, Role, RoleProvider, StaticRoles};
pub use amount::{Amount, AmountError};
pub use transaction::{Transaction, TransactionError};
