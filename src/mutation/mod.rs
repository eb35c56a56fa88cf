//! Mutation coordination.
//!
//! Creates and deletes go through [`MutationCoordinator`], which builds the
//! request via the gateway, remembers what is outstanding, and reports each
//! outcome as a [`MutationEvent`]. It never touches the cache. On success the
//! caller invalidates the reported resource; on failure nothing changes.

pub mod coordinator;

pub use coordinator::{MutationCoordinator, MutationEvent, MutationOp};
