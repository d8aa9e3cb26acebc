use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::AppConfig;

/// Environment variable `sshpass -e` reads the password from.
const PASSWORD_ENV: &str = "SSHPASS";

/// Host plus the password typed for it.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub host: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            password: password.into(),
        }
    }
}

// Keeps passwords out of logs and panic messages.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("host", &self.host)
            .field("password", &"********")
            .finish()
    }
}

/// The external programs a session needs.
pub trait SessionRunner: Send + Sync {
    /// Try to log in and run a no-op command. Blocks until the program exits.
    /// Only a zero exit status counts as success.
    fn probe(&self, request: &LoginRequest) -> bool;

    /// Hand the real terminal to an interactive login shell on the host.
    fn launch(&self, request: &LoginRequest) -> Result<ExitStatus>;
}

/// Drives `ssh` through `sshpass`.
#[derive(Debug, Clone)]
pub struct SshpassRunner {
    feeder: String,
    ssh: String,
    remote_term: String,
}

impl SshpassRunner {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            feeder: config.password_feeder.clone(),
            ssh: config.ssh_program.clone(),
            remote_term: config.remote_term.clone(),
        }
    }

    fn command(&self, request: &LoginRequest) -> Command {
        let mut cmd = Command::new(&self.feeder);
        cmd.arg("-e")
            .env(PASSWORD_ENV, &request.password)
            .arg(&self.ssh);
        cmd
    }

    fn probe_command(&self, request: &LoginRequest) -> Command {
        let mut cmd = self.command(request);
        cmd.arg("-o")
            .arg("StrictHostKeyChecking=no")
            .arg("-o")
            .arg("BatchMode=no")
            .arg(&request.host)
            .arg("exit")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    fn launch_command(&self, request: &LoginRequest) -> Command {
        let mut cmd = self.command(request);
        cmd.arg("-t")
            .arg(&request.host)
            .arg(format!("env TERM={} bash --login", self.remote_term))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl SessionRunner for SshpassRunner {
    fn probe(&self, request: &LoginRequest) -> bool {
        tracing::info!("Probing login to {}", request.host);
        match self.probe_command(request).status() {
            Ok(status) if status.success() => {
                tracing::info!("Login probe to {} succeeded", request.host);
                true
            }
            Ok(status) => {
                tracing::warn!("Login probe to {} failed: {}", request.host, status);
                false
            }
            Err(e) => {
                tracing::error!("Failed to spawn {} for {}: {}", self.feeder, request.host, e);
                false
            }
        }
    }

    fn launch(&self, request: &LoginRequest) -> Result<ExitStatus> {
        tracing::info!("Launching interactive session on {}", request.host);
        let status = self
            .launch_command(request)
            .status()
            .with_context(|| format!("Failed to execute SSH command for {}", request.host))?;
        tracing::info!("Session on {} ended with {}", request.host, status);
        Ok(status)
    }
}

/// Resolve `program` against the directories in `path_var`.
///
/// Absolute or relative paths with a separator are checked as-is. Only
/// executable files count.
pub fn find_in_path(program: &str, path_var: &OsStr) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    std::env::split_paths(path_var)
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

pub fn find_executable(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    find_in_path(program, &path_var)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// What to print when the password feeder is missing.
pub fn install_guidance(program: &str) -> String {
    let mut text = format!(
        "Error: {program} is not installed.\n\n\
         This app requires {program} to provide passwords to ssh non-interactively.\n\n"
    );
    if cfg!(target_os = "macos") {
        text.push_str("Install it with:\n  brew install hudochenkov/sshpass/sshpass");
    } else if cfg!(target_os = "linux") {
        text.push_str("Install it with:\n  sudo apt install sshpass");
    } else {
        text.push_str("Please install sshpass for your platform.");
    }
    text
}
