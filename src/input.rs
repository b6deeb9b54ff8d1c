//! Reading prompt text from files and stdin.
//!
//! The dissection engine assumes it is handed plain text. Size and type
//! checks happen here, before anything reaches the segmenter.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{DissectError, Result};

/// Default input cap (5 MB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 5_000_000;

/// File extensions accepted as prompt text. Extension-less files are also accepted.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];

/// Read a prompt file after checking its extension and size.
pub fn read_prompt_file(path: impl AsRef<Path>, max_bytes: u64) -> Result<String> {
    let path = path.as_ref();
    let reject = |reason: String| DissectError::InputRejected {
        path: path.to_path_buf(),
        reason,
    };

    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(reject(format!(
                "unsupported extension .{ext} (expected {})",
                ACCEPTED_EXTENSIONS.join(", ")
            )));
        }
    }

    let metadata = std::fs::metadata(path)
        .map_err(|err| reject(format!("cannot read metadata: {err}")))?;
    if !metadata.is_file() {
        return Err(reject("not a regular file".to_string()));
    }
    if metadata.len() > max_bytes {
        return Err(reject(format!(
            "file is {} bytes, limit is {max_bytes}",
            metadata.len()
        )));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|err| reject(format!("not readable as UTF-8 text: {err}")))?;
    debug!(target: "dissect", path = %path.display(), bytes = text.len(), "prompt file read");
    Ok(text)
}

/// Read a prompt from stdin, refusing more than `max_bytes`.
pub fn read_prompt_stdin(max_bytes: u64) -> Result<String> {
    read_prompt_from(std::io::stdin().lock(), max_bytes)
}

fn read_prompt_from(reader: impl Read, max_bytes: u64) -> Result<String> {
    let reject = |reason: String| DissectError::InputRejected {
        path: "-".into(),
        reason,
    };

    let mut buf = Vec::new();
    reader
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut buf)?;
    if buf.len() as u64 > max_bytes {
        return Err(reject(format!("input exceeds limit of {max_bytes} bytes")));
    }
    let text =
        String::from_utf8(buf).map_err(|err| reject(format!("not valid UTF-8: {err}")))?;
    debug!(target: "dissect", bytes = text.len(), "prompt read from stdin");
    Ok(text)
}
