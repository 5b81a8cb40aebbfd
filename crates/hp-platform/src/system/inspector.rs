use std::sync::Mutex;

use anyhow::{anyhow, Result};
use hp_core::ports::SystemInspectorPort;
use hp_core::target::{HostFamily, ProcessInfo, SystemSnapshot};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};
use tracing::{debug, trace};

use super::foreground;

/// Lists running processes via sysinfo and asks the OS for the foreground
/// window. Only office processes are kept in the snapshot.
pub struct SysinfoInspector {
    system: Mutex<System>,
}

impl Default for SysinfoInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoInspector {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing()),
        );
        Self {
            system: Mutex::new(system),
        }
    }
}

impl SystemInspectorPort for SysinfoInspector {
    fn snapshot(&self) -> Result<SystemSnapshot> {
        let mut system = self
            .system
            .lock()
            .map_err(|_| anyhow!("system inspector lock poisoned"))?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );

        let mut processes: Vec<ProcessInfo> = system
            .processes()
            .values()
            .filter_map(|process| {
                let name = process.name().to_string_lossy().into_owned();
                HostFamily::from_process_name(&name).map(|_| ProcessInfo {
                    pid: process.pid().as_u32(),
                    name,
                })
            })
            .collect();
        processes.sort_by_key(|p| p.pid);
        drop(system);

        let foreground = foreground::foreground_window();
        trace!(?foreground, "foreground window");
        debug!(office_processes = processes.len(), "system inspected");

        Ok(SystemSnapshot {
            processes,
            foreground,
        })
    }
}
