use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur writing to a clipboard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("Clipboard is disabled")]
    Disabled,

    #[error("No clipboard tool available")]
    Unavailable,

    #[error("Clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Destination for copied text
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Host clipboard through the first available command line tool
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if std::env::var("WAYLAND_DISPLAY").is_ok() && pipe_to("wl-copy", &[], text) {
            return Ok(());
        }
        if pipe_to("xclip", &["-selection", "clipboard"], text) {
            return Ok(());
        }
        if pipe_to("xsel", &["--clipboard", "--input"], text) {
            return Ok(());
        }
        if pipe_to("pbcopy", &[], text) {
            return Ok(());
        }
        Err(ClipboardError::Unavailable)
    }
}

fn pipe_to(cmd: &str, args: &[&str], text: &str) -> bool {
    let Ok(mut child) = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    else {
        return false;
    };

    let written = child
        .stdin
        .take()
        .map(|mut stdin| stdin.write_all(text.as_bytes()).is_ok())
        .unwrap_or(false);

    match child.wait() {
        Ok(status) => written && status.success(),
        Err(e) => {
            tracing::debug!("{} did not exit cleanly: {}", cmd, e);
            false
        }
    }
}

/// Always refuses; the copy response still carries the text
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledClipboard;

impl Clipboard for DisabledClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Disabled)
    }
}

/// Keeps the last written text in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}
