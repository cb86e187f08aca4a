//! Dirmux Proxy
//!
//! Multiplexes user-directory operations across several independently
//! configured directory backends.
//!
//! Features:
//! - Ordered backend registry, one backend per configuration prefix
//! - Affinity cache remembering which backend owns which user
//! - Broadcast dispatch (first backend with a result wins)
//! - Affinity-first dispatch with stale-route reconciliation
//! - Aggregate listing and counting across all backends

pub mod backend;
pub mod cache;
pub mod local;
pub mod op;
pub mod proxy;
pub mod registry;

pub use backend::{BackendEntry, DirectoryAccess, DirectoryBackend, OperationSet};
pub use cache::{AffinityStore, MemoryAffinityStore};
pub use local::{LocalUserStore, NullUserStore};
pub use op::{Operation, UserOp};
pub use proxy::UserProxy;
pub use registry::{BackendFactory, BackendRegistry};
