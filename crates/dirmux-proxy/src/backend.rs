//! Backend traits, capability sets, and per-entry operation routing
//!
//! A configured server is represented by a backend plus a lower-level
//! "access" companion. Which of the two implements a given operation
//! is declared at construction; the registry entry turns those
//! declarations into a static route table, so dispatch never probes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use dirmux_core::types::OpValue;

use crate::op::{Operation, UserOp};

/// Set of operations a backend or access companion supports.
#[derive(Debug, Clone, Default)]
pub struct OperationSet(HashSet<Operation>);

impl OperationSet {
    pub fn new(ops: impl IntoIterator<Item = Operation>) -> Self {
        Self(ops.into_iter().collect())
    }

    /// Every known operation.
    pub fn all() -> Self {
        Self::new(Operation::ALL)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, op: Operation) -> bool {
        self.0.contains(&op)
    }
}

/// One configured external directory connection.
///
/// The wire protocol lives entirely behind this trait; the proxy only
/// routes. Soft failures (unknown user, refused operation) are
/// `OpValue::Absent`, never errors.
#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    /// Operations implemented directly on the backend.
    fn capabilities(&self) -> &OperationSet;

    /// Execute one named per-user operation.
    async fn execute(&self, op: &UserOp) -> OpValue;

    /// Backend name for management surfaces.
    fn name(&self) -> &str {
        "Directory"
    }

    fn has_user_listings(&self) -> bool {
        true
    }

    /// All uids matching `search`; limit and offset are hints for this
    /// backend alone.
    async fn get_users(&self, search: &str, limit: Option<usize>, offset: usize) -> Vec<String>;

    /// uid to display name, for all users matching `search`.
    async fn get_display_names(
        &self,
        search: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> HashMap<String, String>;

    /// Number of users on this backend, `None` when it cannot count.
    /// `limit` is a scan ceiling hint, 0 meaning unbounded.
    async fn count_users(&self, limit: usize) -> Option<usize>;

    /// Number of directory users with a local mapping.
    async fn count_mapped_users(&self) -> usize;
}

/// Lower-level companion to a backend.
///
/// Operations a backend does not implement are routed here when the
/// companion declares them; callers never see the difference.
#[async_trait]
pub trait DirectoryAccess: Send + Sync {
    fn capabilities(&self) -> &OperationSet;

    async fn execute(&self, op: &UserOp) -> OpValue;
}

/// Which side of a backend pair an operation resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Backend,
    Access,
}

/// A registered backend, its companion, and the route table built once
/// from their declared capability sets. The backend wins when both
/// declare an operation.
pub struct BackendEntry {
    prefix: String,
    backend: Arc<dyn DirectoryBackend>,
    access: Arc<dyn DirectoryAccess>,
    routes: HashMap<Operation, Target>,
}

impl BackendEntry {
    pub fn new(
        prefix: impl Into<String>,
        backend: Arc<dyn DirectoryBackend>,
        access: Arc<dyn DirectoryAccess>,
    ) -> Self {
        let mut routes = HashMap::new();
        for op in Operation::ALL {
            if backend.capabilities().contains(op) {
                routes.insert(op, Target::Backend);
            } else if access.capabilities().contains(op) {
                routes.insert(op, Target::Access);
            }
        }

        Self {
            prefix: prefix.into(),
            backend,
            access,
            routes,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn backend(&self) -> &Arc<dyn DirectoryBackend> {
        &self.backend
    }

    pub fn supports(&self, op: Operation) -> bool {
        self.routes.contains_key(&op)
    }

    /// Execute against whichever side owns the operation; `None` when
    /// neither side declares it.
    pub async fn dispatch(&self, op: &UserOp) -> Option<OpValue> {
        match self.routes.get(&op.kind()) {
            Some(Target::Backend) => Some(self.backend.execute(op).await),
            Some(Target::Access) => Some(self.access.execute(op).await),
            None => None,
        }
    }
}
