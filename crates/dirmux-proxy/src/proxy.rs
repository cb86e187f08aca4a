//! Multi-backend user proxy
//!
//! Routes per-user operations either by broadcast (first backend with
//! a result wins) or via the affinity cache (ask the backend that
//! owned the user last time). A stale route is cleared only once the
//! cached backend confirms the user is gone from the live directory.

use std::collections::HashMap;
use std::sync::Arc;

use dirmux_core::config::ProxyConfig;
use dirmux_core::types::{OpValue, UserKey};
use tracing::{debug, warn};

use crate::backend::BackendEntry;
use crate::cache::{AffinityStore, MemoryAffinityStore};
use crate::local::{LocalUserStore, NullUserStore};
use crate::op::UserOp;
use crate::registry::{BackendFactory, BackendRegistry};

pub struct UserProxy {
    registry: BackendRegistry,
    cache: Arc<dyn AffinityStore>,
    local: Arc<dyn LocalUserStore>,
    mark_remnants_as_disabled: bool,
}

impl UserProxy {
    pub fn new(
        config: &ProxyConfig,
        factory: Box<dyn BackendFactory>,
        cache: Arc<dyn AffinityStore>,
        local: Arc<dyn LocalUserStore>,
    ) -> Self {
        Self {
            registry: BackendRegistry::new(config, factory),
            cache,
            local,
            mark_remnants_as_disabled: config.mark_remnants_as_disabled,
        }
    }

    /// Proxy with an in-memory affinity store and no local account
    /// database.
    pub fn from_config(config: &ProxyConfig, factory: Box<dyn BackendFactory>) -> Self {
        Self::new(
            config,
            factory,
            Arc::new(MemoryAffinityStore::from_config(&config.cache)),
            Arc::new(NullUserStore),
        )
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Tries the backends one after the other; the first truthy result
    /// wins and, on multi-backend setups, records that backend as the
    /// owner of the request's user key.
    async fn walk_backends(&self, op: &UserOp) -> OpValue {
        let cache_key = op.user_key().cache_key();
        for entry in self.registry.setup() {
            let Some(result) = entry.dispatch(op).await else {
                continue;
            };
            if result.is_truthy() {
                if !self.registry.is_single_backend() {
                    debug!(key = %cache_key, prefix = entry.prefix(), "recording owning backend");
                    self.cache.set(&cache_key, entry.prefix()).await;
                }
                return result;
            }
        }
        OpValue::Absent
    }

    /// Asks only the backend that supposedly owns the user.
    ///
    /// A cache miss, or a cached prefix that is no longer configured,
    /// returns `Absent` without touching any backend; falling back to
    /// broadcast is `handle_request`'s call, not this function's. A
    /// result equal to `pass_on` triggers the existence check on the
    /// cached backend, and the route is erased only when the user is
    /// confirmed gone.
    async fn call_on_last_seen(&self, op: &UserOp, pass_on: &OpValue) -> OpValue {
        let key = op.user_key();
        let cache_key = key.cache_key();

        let Some(prefix) = self.cache.get(&cache_key).await else {
            return OpValue::Absent;
        };
        let Some(entry) = self.registry.entry(&prefix) else {
            // route points at a prefix that was removed from the config
            return OpValue::Absent;
        };

        let result = entry.dispatch(op).await.unwrap_or(OpValue::Absent);
        if result == *pass_on {
            // A sentinel result can mean "wrong backend" just as well
            // as "right backend, operation failed". Only a confirmed
            // vanished user clears the route.
            let probe = UserOp::UserExistsOnDirectory {
                uid: key.value().to_string(),
                ignore_cache: false,
            };
            let exists = entry.dispatch(&probe).await.unwrap_or(OpValue::Absent);
            if !exists.is_truthy() {
                debug!(key = %cache_key, prefix = %prefix, "clearing stale affinity route");
                self.cache.remove(&cache_key).await;
            }
        }
        result
    }

    async fn handle_request(&self, op: UserOp) -> OpValue {
        self.handle_request_with(op, OpValue::Absent).await
    }

    /// Affinity-first when more than one backend is configured, then
    /// broadcast when no affinity attempt was made or its result
    /// equals the pass-on sentinel.
    async fn handle_request_with(&self, op: UserOp, pass_on: OpValue) -> OpValue {
        let mut affinity = None;
        if !self.registry.is_single_backend() {
            affinity = Some(self.call_on_last_seen(&op, &pass_on).await);
        }
        match affinity {
            Some(result) if result != pass_on => result,
            _ => self.walk_backends(&op).await,
        }
    }

    // =========================================================================
    // Per-user operations
    // =========================================================================

    /// Whether `uid` exists in any locally mapped sense.
    ///
    /// When the mapping says yes but the live directory says no, the
    /// local record is flagged as a remnant; that step is best-effort
    /// and never changes the returned answer.
    pub async fn user_exists(&self, uid: &str) -> bool {
        let exists_locally = self
            .handle_request(UserOp::UserExists {
                uid: uid.to_string(),
            })
            .await
            .is_truthy();
        if !exists_locally {
            return false;
        }

        let exists_on_directory = self.user_exists_on_directory(uid, false).await;
        if !exists_on_directory {
            if let Err(e) = self.local.mark_offline(uid).await {
                warn!(uid, error = %e, "could not mark vanished user offline");
            }
        }

        exists_locally
    }

    /// Whether `uid` still exists on the live directory.
    pub async fn user_exists_on_directory(&self, uid: &str, ignore_cache: bool) -> bool {
        self.handle_request(UserOp::UserExistsOnDirectory {
            uid: uid.to_string(),
            ignore_cache,
        })
        .await
        .is_truthy()
    }

    /// Verifies the password and returns the matched uid.
    pub async fn check_password(&self, uid: &str, password: &str) -> Option<String> {
        self.handle_request(UserOp::CheckPassword {
            uid: uid.to_string(),
            password: password.to_string(),
        })
        .await
        .into_text()
    }

    pub async fn login_name_to_user_name(&self, login_name: &str) -> Option<String> {
        self.handle_request(UserOp::LoginNameToUserName {
            login_name: login_name.to_string(),
        })
        .await
        .into_text()
    }

    pub async fn dn_to_user_name(&self, dn: &str) -> Option<String> {
        self.handle_request(UserOp::DnToUserName { dn: dn.to_string() })
            .await
            .into_text()
    }

    pub async fn get_home(&self, uid: &str) -> Option<String> {
        self.handle_request(UserOp::GetHome {
            uid: uid.to_string(),
        })
        .await
        .into_text()
    }

    pub async fn get_display_name(&self, uid: &str) -> Option<String> {
        self.handle_request(UserOp::GetDisplayName {
            uid: uid.to_string(),
        })
        .await
        .into_text()
    }

    /// Returns the new display name on success.
    pub async fn set_display_name(&self, uid: &str, display_name: &str) -> Option<String> {
        self.handle_request(UserOp::SetDisplayName {
            uid: uid.to_string(),
            display_name: display_name.to_string(),
        })
        .await
        .into_text()
    }

    /// Avatar changes are allowed unless the owning backend manages
    /// the avatar itself; a positive answer from the routed backend is
    /// passed on so every backend gets a say.
    pub async fn can_change_avatar(&self, uid: &str) -> bool {
        self.handle_request_with(
            UserOp::CanChangeAvatar {
                uid: uid.to_string(),
            },
            OpValue::True,
        )
        .await
        .is_truthy()
    }

    pub async fn create_user(&self, uid: &str, password: &str) -> bool {
        self.handle_request(UserOp::CreateUser {
            uid: uid.to_string(),
            password: password.to_string(),
        })
        .await
        .is_truthy()
    }

    pub async fn delete_user(&self, uid: &str) -> bool {
        self.handle_request(UserOp::DeleteUser {
            uid: uid.to_string(),
        })
        .await
        .is_truthy()
    }

    pub async fn set_password(&self, uid: &str, password: &str) -> bool {
        self.handle_request(UserOp::SetPassword {
            uid: uid.to_string(),
            password: password.to_string(),
        })
        .await
        .is_truthy()
    }

    pub async fn is_user_enabled(&self, uid: &str) -> bool {
        self.handle_request(UserOp::IsUserEnabled {
            uid: uid.to_string(),
        })
        .await
        .is_truthy()
    }

    pub async fn set_user_enabled(&self, uid: &str, enabled: bool) -> bool {
        self.handle_request(UserOp::SetUserEnabled {
            uid: uid.to_string(),
            enabled,
        })
        .await
        .is_truthy()
    }

    /// Backend entry that owns `uid`, warming the affinity route on
    /// the way when needed.
    pub async fn owning_backend(&self, uid: &str) -> Option<&BackendEntry> {
        let exists = self
            .handle_request(UserOp::UserExists {
                uid: uid.to_string(),
            })
            .await;
        if !exists.is_truthy() {
            return None;
        }
        if self.registry.is_single_backend() {
            return self.registry.reference();
        }
        let cache_key = UserKey::Uid(uid.to_string()).cache_key();
        let prefix = self.cache.get(&cache_key).await?;
        self.registry.entry(&prefix)
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// The name is uniform across backends; the first one answers.
    pub fn backend_name(&self) -> String {
        self.registry
            .reference()
            .map(|e| e.backend().name().to_string())
            .unwrap_or_else(|| "Directory".to_string())
    }

    pub fn has_user_listings(&self) -> bool {
        self.registry
            .reference()
            .is_some_and(|e| e.backend().has_user_listings())
    }

    // =========================================================================
    // Aggregate operations
    // =========================================================================

    /// Union of all backends' users. Limit and offset are handed to
    /// every backend as hints; no global pagination is enforced.
    pub async fn get_users(
        &self,
        search: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> Vec<String> {
        let mut users = Vec::new();
        for entry in self.registry.setup() {
            users.extend(entry.backend().get_users(search, limit, offset).await);
        }
        users
    }

    /// Union of all backends' display names, keyed by uid. On a key
    /// collision the earlier backend's entry stands.
    pub async fn get_display_names(
        &self,
        search: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> HashMap<String, String> {
        let mut users = HashMap::new();
        for entry in self.registry.setup() {
            for (uid, display_name) in
                entry.backend().get_display_names(search, limit, offset).await
            {
                users.entry(uid).or_insert(display_name);
            }
        }
        users
    }

    /// Sum of the backends' user counts, `None` when no backend can
    /// count. With a nonzero `limit`, the scan stops once the running
    /// total reaches it; between backends the remaining budget is
    /// reduced by the running total, not by the last backend's share,
    /// so the stop comes earlier than a strict reading of `limit`
    /// suggests.
    pub async fn count_users(&self, mut limit: usize) -> Option<usize> {
        let mut users: Option<usize> = None;
        for entry in self.registry.setup() {
            let Some(count) = entry.backend().count_users(limit).await else {
                continue;
            };
            let running = users.unwrap_or(0) + count;
            users = Some(running);
            if limit > 0 {
                if running >= limit {
                    break;
                }
                limit -= running;
            }
        }
        users
    }

    pub async fn count_mapped_users(&self) -> usize {
        let mut users = 0;
        for entry in self.registry.setup() {
            users += entry.backend().count_mapped_users().await;
        }
        users
    }

    /// Local names of users kept as disabled remnants, filtered by a
    /// case-insensitive `search` and sliced by offset/limit. Empty
    /// unless remnant-keeping is enabled; store errors degrade to an
    /// empty list.
    pub async fn disabled_user_list(
        &self,
        limit: Option<usize>,
        offset: usize,
        search: &str,
    ) -> Vec<String> {
        if !self.mark_remnants_as_disabled {
            return Vec::new();
        }

        let users = match self.local.offline_users().await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "could not list offline users");
                return Vec::new();
            }
        };

        users
            .into_iter()
            .filter(|u| search.is_empty() || u.matches(search))
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .map(|u| u.local_name)
            .collect()
    }
}
