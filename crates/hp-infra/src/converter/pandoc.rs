//! Markdown to `.docx` through the pandoc executable.
//!
//! Markdown goes in on stdin; the document is written with `-o`. The child
//! is killed when the timeout elapses.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use hp_core::error::ConversionError;
use hp_core::ports::{ConversionRequest, DocumentConverterPort};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info_span, warn, Instrument};

const INPUT_FORMAT: &str = "markdown+tex_math_dollars+raw_tex";
const HIGHLIGHT_STYLE: &str = "tango";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

#[derive(Debug, Default, Clone, Copy)]
pub struct PandocConverter;

impl PandocConverter {
    pub fn new() -> Self {
        Self
    }

    fn command(request: &ConversionRequest) -> Command {
        let mut cmd = Command::new(&request.program);
        cmd.args(["--from", INPUT_FORMAT, "--to", "docx", "-o"])
            .arg(&request.output)
            .args(["--highlight-style", HIGHLIGHT_STYLE]);
        if let Some(template) = &request.reference_template {
            cmd.arg("--reference-doc").arg(template);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);
        cmd
    }
}

fn failure_message(stderr: &[u8], stdout: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    "conversion failed".to_string()
}

#[async_trait]
impl DocumentConverterPort for PandocConverter {
    async fn convert(&self, request: ConversionRequest) -> Result<PathBuf, ConversionError> {
        let span = info_span!(
            "infra.pandoc.convert",
            program = %request.program,
            output = %request.output.display()
        );

        async {
            let mut child = Self::command(&request).spawn().map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConversionError::MissingExecutable {
                        program: request.program.clone(),
                    }
                } else {
                    ConversionError::Io(format!("spawn {}: {e}", request.program))
                }
            })?;

            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| ConversionError::Io("converter stdin unavailable".into()))?;
            let input = request.markdown.clone().into_bytes();

            let feed = async move {
                stdin.write_all(&input).await?;
                stdin.shutdown().await
            };
            let run = async move { tokio::join!(feed, child.wait_with_output()) };

            let (fed, output) = match tokio::time::timeout(request.timeout, run).await {
                Ok(done) => done,
                Err(_) => {
                    let millis = request.timeout.as_millis() as u64;
                    warn!(timeout_ms = millis, "converter timed out, killed");
                    return Err(ConversionError::Timeout { millis });
                }
            };

            if let Err(err) = fed {
                debug!(error = %err, "converter closed stdin early");
            }
            let output = output.map_err(|e| ConversionError::Io(e.to_string()))?;

            if !output.status.success() {
                return Err(ConversionError::Failed {
                    stderr: failure_message(&output.stderr, &output.stdout),
                });
            }
            if !request.output.exists() {
                return Err(ConversionError::Failed {
                    stderr: "converter exited without writing output".into(),
                });
            }

            debug!("conversion finished");
            Ok(request.output.clone())
        }
        .instrument(span)
        .await
    }
}
