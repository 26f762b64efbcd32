//! Generic transactional write operations against the domain schema.
//!
//! An operation names a collection, an action, a payload, and (for
//! update/delete) a filter. Batches of operations execute inside a single
//! database transaction with all-or-nothing semantics; the same dispatch is
//! reused for single operations arriving over the write queue.

mod executor;
mod operation;
mod registry;

pub use executor::{apply_operation, execute_operations, execute_transaction};
pub use operation::{Action, OperationRequest};
pub use registry::Collection;
