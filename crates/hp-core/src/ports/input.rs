use anyhow::Result;

pub trait KeystrokePort: Send + Sync {
    /// Simulate the platform paste chord (Ctrl+V, Cmd+V on macOS).
    fn send_paste(&self) -> Result<()>;
}
