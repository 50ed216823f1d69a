//! Dropping root privileges after the listener is bound.
//!
//! Only unix platforms can switch users. Elsewhere the request is logged as
//! a warning and startup continues.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The process now runs as the given ids.
    Dropped { uid: u32, gid: u32 },
    /// The platform cannot switch users. Nothing was changed.
    Unsupported,
}

#[derive(Debug, Error)]
pub enum PrivilegeError {
    #[error("unknown user '{0}'")]
    UnknownUser(String),
    #[error("failed to look up user '{user}': {reason}")]
    Lookup { user: String, reason: String },
    #[error("failed to set group: {0}")]
    SetGid(String),
    #[error("failed to set user: {0}")]
    SetUid(String),
}

pub trait PrivilegeDrop {
    fn drop_to(&self, user: &str) -> Result<DropOutcome, PrivilegeError>;
}

/// The implementation for the platform this binary was built for.
pub fn platform() -> impl PrivilegeDrop {
    PlatformImpl
}

#[cfg(unix)]
use self::unix::PlatformImpl;

#[cfg(not(unix))]
use self::noop::PlatformImpl;

#[cfg(unix)]
mod unix {
    use nix::unistd::{setgid, setuid, User};
    use tracing::info;

    use super::{DropOutcome, PrivilegeDrop, PrivilegeError};

    #[derive(Debug, Default)]
    pub struct PlatformImpl;

    impl PrivilegeDrop for PlatformImpl {
        fn drop_to(&self, user: &str) -> Result<DropOutcome, PrivilegeError> {
            let entry = User::from_name(user)
                .map_err(|err| PrivilegeError::Lookup {
                    user: user.to_string(),
                    reason: err.to_string(),
                })?
                .ok_or_else(|| PrivilegeError::UnknownUser(user.to_string()))?;

            // setgid has to run while we are still root.
            setgid(entry.gid).map_err(|err| PrivilegeError::SetGid(err.to_string()))?;
            setuid(entry.uid).map_err(|err| PrivilegeError::SetUid(err.to_string()))?;

            info!("dropped privileges to user {} ({}:{})", user, entry.uid, entry.gid);
            Ok(DropOutcome::Dropped {
                uid: entry.uid.as_raw(),
                gid: entry.gid.as_raw(),
            })
        }
    }
}

#[cfg(not(unix))]
mod noop {
    use tracing::warn;

    use super::{DropOutcome, PrivilegeDrop, PrivilegeError};

    #[derive(Debug, Default)]
    pub struct PlatformImpl;

    impl PrivilegeDrop for PlatformImpl {
        fn drop_to(&self, _user: &str) -> Result<DropOutcome, PrivilegeError> {
            warn!("Dropping privileges only works on unix systems, ignoring the requested user");
            Ok(DropOutcome::Unsupported)
        }
    }
}
