use hp_core::target::ForegroundWindow;

#[cfg(target_os = "windows")]
pub(super) fn foreground_window() -> Option<ForegroundWindow> {
    use winapi::shared::minwindef::DWORD;
    use winapi::um::winuser::{GetForegroundWindow, GetWindowTextW, GetWindowThreadProcessId};

    unsafe {
        let hwnd = GetForegroundWindow();
        if hwnd.is_null() {
            return None;
        }
        let mut pid: DWORD = 0;
        GetWindowThreadProcessId(hwnd, &mut pid);
        if pid == 0 {
            return None;
        }

        let mut buf = [0u16; 512];
        let len = GetWindowTextW(hwnd, buf.as_mut_ptr(), buf.len() as i32);
        let title = (len > 0).then(|| String::from_utf16_lossy(&buf[..len as usize]));

        Some(ForegroundWindow {
            pid,
            window_id: Some(hwnd as usize as u64),
            title,
        })
    }
}

#[cfg(target_os = "macos")]
pub(super) fn foreground_window() -> Option<ForegroundWindow> {
    const SCRIPT: &str = "tell application \"System Events\" to get unix id of first application process whose frontmost is true";

    let output = std::process::Command::new("osascript")
        .arg("-e")
        .arg(SCRIPT)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_pid(&String::from_utf8_lossy(&output.stdout)).map(|pid| ForegroundWindow {
        pid,
        window_id: None,
        title: None,
    })
}

#[cfg(all(unix, not(target_os = "macos")))]
pub(super) fn foreground_window() -> Option<ForegroundWindow> {
    // X11 only; Wayland compositors do not expose the active window.
    let output = std::process::Command::new("xdotool")
        .args(["getactivewindow", "getwindowpid"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_pid(&String::from_utf8_lossy(&output.stdout)).map(|pid| ForegroundWindow {
        pid,
        window_id: None,
        title: None,
    })
}

#[cfg_attr(target_os = "windows", allow(dead_code))]
fn parse_pid(raw: &str) -> Option<u32> {
    raw.trim().parse().ok().filter(|pid| *pid != 0)
}
