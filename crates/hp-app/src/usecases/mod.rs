pub mod build_payload;
pub mod convert_markdown;
pub mod inject_payload;
pub mod reload_settings;
pub mod run_pipeline;

pub use build_payload::BuildPayload;
pub use convert_markdown::ConvertMarkdown;
pub use inject_payload::{InjectPayload, InjectionReport, RestoreOutcome};
pub use reload_settings::ReloadSettings;

/// Run a blocking port call off the runtime, flattening both error layers
/// into a message.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, String>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(join) => Err(format!("blocking task failed: {join}")),
    }
}
