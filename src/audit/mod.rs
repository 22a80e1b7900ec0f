//! Audit logging for auditable savings accounts
//!
//! # Architecture
//!
//! - `AuditEntry`: one recorded action (timestamp, action, amount, resulting
//!   balance, outcome).
//! - `AuditLogger`: appends entries to the side log as JSON lines.
//! - `AuditTrail`: the per-account decorator state; holds the in-memory
//!   entries and the logger they are mirrored to.

mod entry;
mod logger;
mod trail;

pub use entry::{AuditAction, AuditEntry};
pub use logger::AuditLogger;
pub use trail::AuditTrail;
