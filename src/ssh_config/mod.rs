//! The SSH client config as a disposable projection of its text.
//!
//! Every query re-reads the source; nothing parsed is kept between calls.
//! The file is handled as bytes and decoded lossily, so stray non-UTF-8 bytes
//! never stop hosts from being listed and are written back unchanged.

mod block;
mod delete;
mod graph;
mod parser;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use delete::delete_host;
use parser::parse;

use graph::HostInfo;
pub use parser::HostEntry;

/// Mode the config file is written back with.
#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o644;

/// Where the config text lives.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    /// In-memory contents, rewritten in place on deletion.
    #[cfg(test)]
    Memory(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct SshConfig {
    source: ConfigSource,
}

impl SshConfig {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ConfigSource::File(path.into()),
        }
    }

    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: ConfigSource::Memory(text.into().into_bytes()),
        }
    }

    /// Human readable location, for messages.
    pub fn describe(&self) -> String {
        match &self.source {
            ConfigSource::File(path) => path.display().to_string(),
            #[cfg(test)]
            ConfigSource::Memory(_) => "<memory>".to_string(),
        }
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        match &self.source {
            ConfigSource::File(path) => fs::read(path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            }),
            #[cfg(test)]
            ConfigSource::Memory(contents) => Ok(contents.clone()),
        }
    }

    pub fn read_text(&self) -> Result<String, ConfigError> {
        Ok(String::from_utf8_lossy(&self.read_bytes()?).into_owned())
    }

    pub fn lines(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.read_text()?.split('\n').map(String::from).collect())
    }

    pub fn hosts(&self) -> Result<Vec<HostEntry>, ConfigError> {
        Ok(parse(&self.read_text()?))
    }

    pub fn host_info(&self, name: &str) -> Result<HostInfo, ConfigError> {
        Ok(HostInfo::collect(&self.lines()?, name))
    }

    /// Remove the block containing `name`, persist, and return the re-parsed
    /// entries. Unknown names leave the source untouched.
    pub fn delete_host(&mut self, name: &str) -> Result<Vec<HostEntry>, ConfigError> {
        let contents = self.read_bytes()?;
        let rewritten = delete_host(&contents, name);

        if rewritten == contents {
            tracing::info!("No block for {} in {}, nothing to delete", name, self.describe());
            return Ok(parse(&String::from_utf8_lossy(&contents)));
        }

        match &mut self.source {
            ConfigSource::File(path) => write_atomic(path, &rewritten)?,
            #[cfg(test)]
            ConfigSource::Memory(current) => current.clone_from(&rewritten),
        }
        tracing::info!("Deleted host block for {} from {}", name, self.describe());

        self.hosts()
    }
}

/// The file a write to `path` should land in: the link target when `path` is
/// a symlink, so dotfile-managed configs stay linked.
fn write_target(path: &Path) -> io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path),
        _ => Ok(path.to_path_buf()),
    }
}

/// Write `contents` to a temp file next to the real target, then rename it
/// over the target.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    let target = write_target(path).map_err(write_err)?;
    if target != path {
        tracing::debug!("{} is a link to {}", path.display(), target.display());
    }

    let parent = target.parent().unwrap_or(Path::new("."));
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".into());
    let temp_path = parent.join(format!(".{}.sshpick.{}", file_name, std::process::id()));

    let result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(CONFIG_FILE_MODE))?;
        }
        fs::rename(&temp_path, &target)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const CONFIG: &str = "Host jump\n  Hostname 10.0.0.1\n\nHost app\n  User deploy\n  Hostname 10.0.0.2\n  ProxyJump jump\n";

    fn config_file(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_hosts_from_file() {
        let dir = TempDir::new().unwrap();
        let config = SshConfig::from_path(config_file(&dir, CONFIG));
        assert_eq!(
            config.hosts().unwrap(),
            vec![
                HostEntry::new("jump", "10.0.0.1"),
                HostEntry::new("app", "deploy@10.0.0.2"),
            ]
        );
    }

    #[test]
    fn test_empty_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let config = SshConfig::from_path(config_file(&dir, ""));
        assert!(config.hosts().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let config = SshConfig::from_path(dir.path().join("nope"));
        assert!(matches!(config.hosts(), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_delete_persists_and_reparses() {
        let dir = TempDir::new().unwrap();
        let path = config_file(&dir, CONFIG);
        let mut config = SshConfig::from_path(&path);

        let hosts = config.delete_host("app").unwrap();
        assert_eq!(hosts, vec![HostEntry::new("jump", "10.0.0.1")]);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Host jump\n  Hostname 10.0.0.1\n"
        );

        // No stray temp files left next to the config.
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("config")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_writes_fixed_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = config_file(&dir, CONFIG);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        SshConfig::from_path(&path).delete_host("jump").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_delete_unknown_host_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = config_file(&dir, CONFIG);
        let mut config = SshConfig::from_path(&path);

        let hosts = config.delete_host("ghost").unwrap();
        assert_eq!(hosts.len(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG);
    }

    #[test]
    fn test_delete_on_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = SshConfig::from_path(dir.path().join("gone"));
        assert!(config.delete_host("app").is_err());
    }

    #[test]
    fn test_in_memory_source() {
        let mut config = SshConfig::from_text(CONFIG);
        let info = config.host_info("jump").unwrap();
        assert_eq!(info.dependents.len(), 1);
        assert_eq!(info.dependents[0].name(), "app");

        config.delete_host("app").unwrap();
        let info = config.host_info("jump").unwrap();
        assert!(info.dependents.is_empty());
        assert_eq!(config.describe(), "<memory>");
    }

    #[test]
    fn test_non_utf8_bytes_do_not_block_listing_or_deletion() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        fs::write(
            &path,
            b"# caf\xe9 servers\nHost a\n  Hostname 1.2.3.4\nHost b\n  User r\xf4le\n",
        )
        .unwrap();
        let mut config = SshConfig::from_path(&path);

        let hosts = config.hosts().unwrap();
        assert_eq!(hosts[0], HostEntry::new("a", "1.2.3.4"));
        assert_eq!(hosts[1].name, "b");
        assert!(config.host_info("a").unwrap().to_string().contains("Hostname 1.2.3.4"));

        let hosts = config.delete_host("a").unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(
            fs::read(&path).unwrap(),
            b"# caf\xe9 servers\nHost b\n  User r\xf4le\n".to_vec()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_writes_through_symlink() {
        let dir = TempDir::new().unwrap();
        let dotfiles = dir.path().join("dotfiles");
        fs::create_dir(&dotfiles).unwrap();
        let real = dotfiles.join("ssh_config");
        fs::write(&real, "Host a\n  User x\nHost b\n  User y\n").unwrap();
        let link = dir.path().join("config");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        SshConfig::from_path(&link).delete_host("a").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "Host b\n  User y\n");
        assert_eq!(fs::read_to_string(&link).unwrap(), "Host b\n  User y\n");
        // The temp file went next to the target and is gone.
        assert_eq!(fs::read_dir(&dotfiles).unwrap().count(), 1);
    }
}
