//! Named per-user operations and their argument payloads

use dirmux_core::types::UserKey;

/// Operation kinds a backend or its access companion can declare
/// support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UserExists,
    UserExistsOnDirectory,
    CheckPassword,
    LoginNameToUserName,
    DnToUserName,
    GetHome,
    GetDisplayName,
    SetDisplayName,
    CanChangeAvatar,
    CreateUser,
    DeleteUser,
    SetPassword,
    IsUserEnabled,
    SetUserEnabled,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::UserExists,
        Operation::UserExistsOnDirectory,
        Operation::CheckPassword,
        Operation::LoginNameToUserName,
        Operation::DnToUserName,
        Operation::GetHome,
        Operation::GetDisplayName,
        Operation::SetDisplayName,
        Operation::CanChangeAvatar,
        Operation::CreateUser,
        Operation::DeleteUser,
        Operation::SetPassword,
        Operation::IsUserEnabled,
        Operation::SetUserEnabled,
    ];
}

/// A concrete operation request: kind plus typed arguments.
#[derive(Debug, Clone)]
pub enum UserOp {
    UserExists { uid: String },
    UserExistsOnDirectory { uid: String, ignore_cache: bool },
    CheckPassword { uid: String, password: String },
    LoginNameToUserName { login_name: String },
    DnToUserName { dn: String },
    GetHome { uid: String },
    GetDisplayName { uid: String },
    SetDisplayName { uid: String, display_name: String },
    CanChangeAvatar { uid: String },
    CreateUser { uid: String, password: String },
    DeleteUser { uid: String },
    SetPassword { uid: String, password: String },
    IsUserEnabled { uid: String },
    SetUserEnabled { uid: String, enabled: bool },
}

impl UserOp {
    pub fn kind(&self) -> Operation {
        match self {
            UserOp::UserExists { .. } => Operation::UserExists,
            UserOp::UserExistsOnDirectory { .. } => Operation::UserExistsOnDirectory,
            UserOp::CheckPassword { .. } => Operation::CheckPassword,
            UserOp::LoginNameToUserName { .. } => Operation::LoginNameToUserName,
            UserOp::DnToUserName { .. } => Operation::DnToUserName,
            UserOp::GetHome { .. } => Operation::GetHome,
            UserOp::GetDisplayName { .. } => Operation::GetDisplayName,
            UserOp::SetDisplayName { .. } => Operation::SetDisplayName,
            UserOp::CanChangeAvatar { .. } => Operation::CanChangeAvatar,
            UserOp::CreateUser { .. } => Operation::CreateUser,
            UserOp::DeleteUser { .. } => Operation::DeleteUser,
            UserOp::SetPassword { .. } => Operation::SetPassword,
            UserOp::IsUserEnabled { .. } => Operation::IsUserEnabled,
            UserOp::SetUserEnabled { .. } => Operation::SetUserEnabled,
        }
    }

    /// Identity this request is about; the affinity key is derived
    /// from it.
    pub fn user_key(&self) -> UserKey {
        match self {
            UserOp::LoginNameToUserName { login_name } => {
                UserKey::LoginName(login_name.clone())
            }
            UserOp::DnToUserName { dn } => UserKey::Dn(dn.clone()),
            UserOp::UserExists { uid }
            | UserOp::UserExistsOnDirectory { uid, .. }
            | UserOp::CheckPassword { uid, .. }
            | UserOp::GetHome { uid }
            | UserOp::GetDisplayName { uid }
            | UserOp::SetDisplayName { uid, .. }
            | UserOp::CanChangeAvatar { uid }
            | UserOp::CreateUser { uid, .. }
            | UserOp::DeleteUser { uid }
            | UserOp::SetPassword { uid, .. }
            | UserOp::IsUserEnabled { uid }
            | UserOp::SetUserEnabled { uid, .. } => UserKey::Uid(uid.clone()),
        }
    }
}
