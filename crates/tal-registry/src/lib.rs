//! Core registry logic for the Talent Ledger.
//!
//! Each caller identity may register exactly one talent profile and later
//! replace it; anyone may read any profile through a fixed set of views.
//!
//! - [`validator`] — completeness check run before every write
//! - [`context`] — [`CallerContext`], the authenticated caller of a write
//! - [`registry`] — [`TalentRegistry`], the create/modify state machine and read views
//! - [`error`] — [`RegistryError`] and its numeric codes
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tal_registry::{CallerContext, TalentRegistry};
//! use tal_store::InMemoryTalentStore;
//! use tal_types::{CallerId, ProfileSubmission};
//!
//! let registry = TalentRegistry::new(Arc::new(InMemoryTalentStore::new()));
//! let caller = CallerContext::authenticated(CallerId::principal("ada"));
//! let profile = ProfileSubmission::from_parts("Ada", "London", ["math"], 10).unwrap();
//!
//! registry.create(&caller, profile).unwrap();
//! assert_eq!(registry.count_expertise(caller.caller()).unwrap(), 1);
//! ```

pub mod context;
pub mod error;
pub mod registry;
pub mod validator;

pub use context::CallerContext;
pub use error::{RegistryError, RegistryResult};
pub use registry::{Confirmation, TalentRegistry};
pub use validator::validate;
