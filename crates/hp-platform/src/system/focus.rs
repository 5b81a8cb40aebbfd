use anyhow::Result;
use hp_core::ports::WindowFocusPort;
use hp_core::target::AppHandle;
use tracing::debug;

/// Brings the target host's window to the front.
#[derive(Default)]
pub struct NativeWindowFocus;

impl NativeWindowFocus {
    pub fn new() -> Self {
        Self
    }
}

impl WindowFocusPort for NativeWindowFocus {
    fn bring_to_front(&self, handle: &AppHandle) -> Result<()> {
        debug!(pid = handle.pid, family = ?handle.family, "focusing target window");
        platform::bring_to_front(handle)
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use anyhow::{bail, Result};
    use hp_core::target::AppHandle;
    use winapi::shared::minwindef::{BOOL, DWORD, FALSE, LPARAM, TRUE};
    use winapi::shared::windef::HWND;
    use winapi::um::winuser::{
        EnumWindows, GetWindow, GetWindowThreadProcessId, IsIconic, IsWindowVisible,
        SetForegroundWindow, ShowWindow, GW_OWNER, SW_RESTORE,
    };

    struct Search {
        pid: DWORD,
        found: HWND,
    }

    unsafe extern "system" fn find_main_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let search = &mut *(lparam as *mut Search);
        let mut pid: DWORD = 0;
        GetWindowThreadProcessId(hwnd, &mut pid);
        if pid == search.pid
            && IsWindowVisible(hwnd) != 0
            && GetWindow(hwnd, GW_OWNER).is_null()
        {
            search.found = hwnd;
            return FALSE;
        }
        TRUE
    }

    pub(super) fn bring_to_front(handle: &AppHandle) -> Result<()> {
        let hwnd = match handle.window_id {
            Some(id) => id as usize as HWND,
            None => {
                let mut search = Search {
                    pid: handle.pid,
                    found: std::ptr::null_mut(),
                };
                unsafe {
                    EnumWindows(Some(find_main_window), &mut search as *mut Search as LPARAM);
                }
                search.found
            }
        };
        if hwnd.is_null() {
            bail!("no visible window for pid {}", handle.pid);
        }

        unsafe {
            if IsIconic(hwnd) != 0 {
                ShowWindow(hwnd, SW_RESTORE);
            }
            if SetForegroundWindow(hwnd) == 0 {
                bail!("SetForegroundWindow refused for pid {}", handle.pid);
            }
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use anyhow::{bail, Context, Result};
    use hp_core::target::AppHandle;

    pub(super) fn bring_to_front(handle: &AppHandle) -> Result<()> {
        let script = format!(
            "tell application \"System Events\" to set frontmost of first process whose unix id is {} to true",
            handle.pid
        );
        let output = std::process::Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output()
            .context("run osascript failed")?;
        if !output.status.success() {
            bail!("{}", String::from_utf8_lossy(&output.stderr).trim());
        }
        Ok(())
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
mod platform {
    use anyhow::{bail, Context, Result};
    use hp_core::target::AppHandle;
    use tracing::warn;

    pub(super) fn bring_to_front(handle: &AppHandle) -> Result<()> {
        let pid = handle.pid.to_string();
        let output = match std::process::Command::new("xdotool")
            .args(["search", "--onlyvisible", "--pid", &pid, "windowactivate"])
            .output()
        {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("xdotool not installed, cannot focus target window");
                return Ok(());
            }
            Err(e) => return Err(e).context("run xdotool failed"),
        };
        if !output.status.success() {
            bail!("{}", String::from_utf8_lossy(&output.stderr).trim());
        }
        Ok(())
    }
}
