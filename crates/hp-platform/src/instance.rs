//! Single-instance guard
//! 单实例锁：数据目录下的 pid 文件
//!
//! A lock file left behind by a crashed process is reclaimed once its pid is
//! no longer running.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::{debug, info, warn};

const LOCK_FILE_NAME: &str = "hotpaste.lock";

/// Held for the lifetime of the daemon; the file is removed on drop.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Take the lock in `dir`, failing if another live process holds it.
    pub fn acquire(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("create data dir failed: {}", dir.display()))?;
        let path = dir.join(LOCK_FILE_NAME);

        // second pass only after a stale file was removed
        for _ in 0..2 {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    write!(file, "{}", std::process::id())
                        .with_context(|| format!("write lock file failed: {}", path.display()))?;
                    info!(path = %path.display(), "instance lock acquired");
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => match read_owner(&path) {
                    Owner::Starting => bail!("another hotpaste instance is starting"),
                    Owner::Pid(pid) if is_running(pid) => {
                        bail!("hotpaste is already running (pid {pid})")
                    }
                    owner => {
                        warn!(path = %path.display(), ?owner, "removing stale instance lock");
                        match fs::remove_file(&path) {
                            Ok(()) => {}
                            Err(e) if e.kind() == ErrorKind::NotFound => {}
                            Err(e) => {
                                return Err(e).with_context(|| {
                                    format!("remove stale lock failed: {}", path.display())
                                })
                            }
                        }
                    }
                },
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("create lock file failed: {}", path.display()))
                }
            }
        }

        bail!("instance lock is contended: {}", path.display())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "instance lock released"),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "release instance lock failed")
            }
        }
    }
}

#[derive(Debug)]
enum Owner {
    /// File exists but the pid is not written yet.
    Starting,
    Pid(u32),
    Unreadable,
}

fn read_owner(path: &Path) -> Owner {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Owner::Starting,
        Ok(contents) => contents
            .trim()
            .parse()
            .map(Owner::Pid)
            .unwrap_or(Owner::Unreadable),
        // includes a file removed between create and read; the retry settles it
        Err(_) => Owner::Unreadable,
    }
}

fn is_running(pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing(),
    );
    system.process(pid).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // pids never reach this value on Linux, macOS or Windows
    const DEAD_PID: &str = "4294967294";

    #[test]
    fn second_acquire_fails_while_held() {
        let dir = tempfile::tempdir().unwrap();

        let first = InstanceLock::acquire(dir.path()).unwrap();
        let err = InstanceLock::acquire(dir.path()).unwrap_err();

        assert!(err.to_string().contains("already running"), "{err:#}");
        assert_eq!(
            fs::read_to_string(first.path()).unwrap(),
            std::process::id().to_string()
        );
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        let lock = InstanceLock::acquire(dir.path()).unwrap();
        let path = lock.path().to_path_buf();
        drop(lock);

        assert!(!path.exists());
        assert!(InstanceLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn stale_lock_from_dead_process_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOCK_FILE_NAME), DEAD_PID).unwrap();

        let lock = InstanceLock::acquire(dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(lock.path()).unwrap(),
            std::process::id().to_string()
        );
    }

    #[test]
    fn garbage_lock_file_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOCK_FILE_NAME), "not a pid").unwrap();

        assert!(InstanceLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn empty_lock_file_counts_as_starting_instance() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOCK_FILE_NAME), "").unwrap();

        let err = InstanceLock::acquire(dir.path()).unwrap_err();
        assert!(err.to_string().contains("starting"), "{err:#}");
    }

    #[test]
    fn missing_data_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let lock = InstanceLock::acquire(&nested).unwrap();
        assert!(lock.path().starts_with(&nested));
    }
}
