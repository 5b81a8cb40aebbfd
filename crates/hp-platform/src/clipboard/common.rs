use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContent, ClipboardContext, ContentFormat, RustImageData};
use hp_core::{ClipboardContents, ClipboardPayload};

pub(super) struct CommonClipboardImpl;

fn map_clipboard_err<T>(
    result: std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>,
) -> Result<T> {
    result.map_err(|e| anyhow!(e))
}

impl CommonClipboardImpl {
    pub fn read_text(ctx: &ClipboardContext) -> Result<Option<String>> {
        if !ctx.has(ContentFormat::Text) {
            return Ok(None);
        }
        map_clipboard_err(ctx.get_text()).map(Some)
    }

    /// Best effort: a format that fails to read is skipped, not fatal.
    pub fn save_contents(ctx: &ClipboardContext) -> Result<ClipboardContents> {
        let mut contents = ClipboardContents::default();

        if ctx.has(ContentFormat::Text) {
            contents.text = ctx.get_text().ok();
        }
        if ctx.has(ContentFormat::Html) {
            contents.html = ctx.get_html().ok();
        }
        if ctx.has(ContentFormat::Rtf) {
            contents.rtf = ctx.get_rich_text().ok();
        }
        if ctx.has(ContentFormat::Files) {
            if let Ok(files) = ctx.get_files() {
                contents.files = files.into_iter().map(PathBuf::from).collect();
            }
        }
        if ctx.has(ContentFormat::Image) {
            if let Ok(png) = ctx.get_image().and_then(|img| img.to_png()) {
                contents.png = Some(png.get_bytes().to_vec());
            }
        }

        Ok(contents)
    }

    pub fn write_payload(ctx: &ClipboardContext, payload: &ClipboardPayload) -> Result<()> {
        map_clipboard_err(ctx.set(payload_formats(payload)))
    }

    pub fn restore(ctx: &ClipboardContext, contents: &ClipboardContents) -> Result<()> {
        if contents.is_empty() {
            return map_clipboard_err(ctx.clear());
        }
        map_clipboard_err(ctx.set(saved_formats(contents)?))
    }
}

/// Plain text always goes first so hosts that only read text still get it.
pub(super) fn payload_formats(payload: &ClipboardPayload) -> Vec<ClipboardContent> {
    let mut formats = vec![ClipboardContent::Text(payload.plain.clone())];
    if let Some(html) = &payload.html {
        formats.push(ClipboardContent::Html(html.clone()));
    }
    formats
}

pub(super) fn saved_formats(contents: &ClipboardContents) -> Result<Vec<ClipboardContent>> {
    let mut formats = Vec::new();
    if let Some(text) = &contents.text {
        formats.push(ClipboardContent::Text(text.clone()));
    }
    if let Some(html) = &contents.html {
        formats.push(ClipboardContent::Html(html.clone()));
    }
    if let Some(rtf) = &contents.rtf {
        formats.push(ClipboardContent::Rtf(rtf.clone()));
    }
    if !contents.files.is_empty() {
        formats.push(ClipboardContent::Files(
            contents
                .files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        ));
    }
    if let Some(png) = &contents.png {
        let img = RustImageData::from_bytes(png).map_err(|e| anyhow!(e))?;
        formats.push(ClipboardContent::Image(img));
    }
    Ok(formats)
}
