//! Talent storage for the Talent Ledger.
//!
//! The talent store is the sole persistent state of the registry: a mapping
//! from [`CallerId`](tal_types::CallerId) to [`Record`](tal_types::Record).
//! Every write replaces the whole record for a key; there is no partial-field
//! update and no removal.
//!
//! # Modules
//!
//! - [`error`] — Error types for store operations
//! - [`traits`] — The [`TalentStore`] trait defining the storage interface
//! - [`memory`] — In-memory [`InMemoryTalentStore`] for tests and embedding
//! - [`file`] — [`FileTalentStore`] backed by an atomically replaced JSON snapshot,
//!   safe to share between processes

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::FileTalentStore;
pub use memory::InMemoryTalentStore;
pub use traits::{Presence, TalentStore};
