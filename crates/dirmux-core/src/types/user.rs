//! User identity types

use serde::{Deserialize, Serialize};

/// Logical identity a per-user request is about.
///
/// Lookups arrive keyed by uid, by login name, or by the directory
/// entry's distinguished name. The tag is part of the derived cache
/// key, so the variants never collide in the affinity store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserKey {
    Uid(String),
    LoginName(String),
    Dn(String),
}

impl UserKey {
    /// Raw identity value, without the variant tag.
    pub fn value(&self) -> &str {
        match self {
            UserKey::Uid(v) | UserKey::LoginName(v) | UserKey::Dn(v) => v,
        }
    }

    /// Key under which the owning backend prefix is stored.
    pub fn cache_key(&self) -> String {
        match self {
            UserKey::Uid(uid) => format!("user-{uid}-lastSeenOn"),
            UserKey::LoginName(name) => format!("user-LOGINNAME,{name}-lastSeenOn"),
            UserKey::Dn(dn) => format!("user-DN,{dn}-lastSeenOn"),
        }
    }
}

/// Local record of a user whose directory entry is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineUser {
    /// Name of the local account the directory entry was mapped to
    pub local_name: String,

    /// Directory uid
    pub uid: String,

    pub display_name: Option<String>,

    pub email: Option<String>,
}

impl OfflineUser {
    /// Case-insensitive substring match over all identifying fields.
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        self.local_name.to_lowercase().contains(&needle)
            || self.uid.to_lowercase().contains(&needle)
            || self
                .display_name
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || self
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_formats() {
        assert_eq!(
            UserKey::Uid("alice".to_string()).cache_key(),
            "user-alice-lastSeenOn"
        );
        assert_eq!(
            UserKey::LoginName("alice@corp".to_string()).cache_key(),
            "user-LOGINNAME,alice@corp-lastSeenOn"
        );
        assert_eq!(
            UserKey::Dn("uid=alice,dc=example".to_string()).cache_key(),
            "user-DN,uid=alice,dc=example-lastSeenOn"
        );
    }

    #[test]
    fn test_tagged_keys_do_not_collide() {
        let uid = UserKey::Uid("alice".to_string());
        let login = UserKey::LoginName("alice".to_string());
        assert_ne!(uid.cache_key(), login.cache_key());
        assert_eq!(uid.value(), login.value());
    }

    #[test]
    fn test_offline_user_search() {
        let user = OfflineUser {
            local_name: "alice_local".to_string(),
            uid: "alice".to_string(),
            display_name: Some("Alice Cooper".to_string()),
            email: Some("alice@example.com".to_string()),
        };

        assert!(user.matches("COOPER"));
        assert!(user.matches("alice"));
        assert!(user.matches("@example"));
        assert!(!user.matches("bob"));
    }
}
