//! Host shell selection.

use std::path::PathBuf;

/// The two host families a shell is chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Posix,
    Windows,
}

impl HostPlatform {
    /// Platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            HostPlatform::Windows
        } else {
            HostPlatform::Posix
        }
    }
}

/// Shell executable for a platform. No other selection logic applies.
pub const fn shell_for(platform: HostPlatform) -> &'static str {
    match platform {
        HostPlatform::Posix => "/bin/sh",
        HostPlatform::Windows => "powershell.exe",
    }
}

/// Working directory for new shells: the home directory of the server
/// process, if it has one.
pub fn default_working_dir() -> Option<PathBuf> {
    dirs::home_dir()
}
