//! Local user-record store
//!
//! Consumed for two things only: best-effort marking of records whose
//! directory entry vanished, and listing those remnants for management
//! surfaces. Never on the hot dispatch path.

use async_trait::async_trait;
use dirmux_core::types::OfflineUser;
use dirmux_core::Result;

#[async_trait]
pub trait LocalUserStore: Send + Sync {
    /// Mark the local record for `uid` as belonging to a directory
    /// entry that no longer exists.
    async fn mark_offline(&self, uid: &str) -> Result<()>;

    /// All records currently marked offline.
    async fn offline_users(&self) -> Result<Vec<OfflineUser>>;
}

/// Store for deployments without a local account database.
pub struct NullUserStore;

#[async_trait]
impl LocalUserStore for NullUserStore {
    async fn mark_offline(&self, _uid: &str) -> Result<()> {
        Ok(())
    }

    async fn offline_users(&self) -> Result<Vec<OfflineUser>> {
        Ok(Vec::new())
    }
}
