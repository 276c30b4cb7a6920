//! Source buffers, comment formatting and file output.

use std::fs;
use std::io::{self, Write as IoWrite};
use std::path::Path;

use tracing::debug;

use crate::error::GenerateError;

/// Width, in characters of words, after which doc comments wrap.
pub const COMMENT_WIDTH: usize = 50;

/// Line-oriented buffer for one generated file.
#[derive(Debug, Default)]
pub struct SourceFile {
    /// The content written so far.
    pub buf: String,
}

impl SourceFile {
    /// Starts an empty file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line.
    pub fn line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    /// Appends an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Appends `text` word-wrapped, each line starting with `prefix`
    /// (indentation plus comment marker, e.g. `"    /// "`).
    pub fn comment(&mut self, prefix: &str, text: &str) {
        for line in wrap_words(text, COMMENT_WIDTH) {
            self.buf.push_str(prefix);
            self.buf.push_str(&line);
            self.buf.push('\n');
        }
    }

    /// Returns the content with exactly one trailing newline.
    #[must_use]
    pub fn finish(self) -> String {
        let mut out = self.buf.trim_end().to_string();
        out.push('\n');
        out
    }
}

/// Collapses runs of whitespace (including newlines) into single spaces.
#[must_use]
pub fn normalize_comment(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits `text` into lines, starting a new line once the words already on
/// the current line reach `width` characters. Words are never broken.
#[must_use]
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for word in text.split_whitespace() {
        if count >= width {
            lines.push(std::mem::take(&mut current));
            count = 0;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        count += word.chars().count();
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Result of [`write_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or replaced.
    Written,
    /// The file already had exactly this content and was left untouched.
    Unchanged,
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory, renamed into place once fully written. Parent directories are
/// created as needed.
///
/// # Errors
///
/// Returns [`GenerateError::Output`] if a directory cannot be created or the
/// file cannot be written or renamed.
pub fn write_file(path: &Path, contents: &str) -> Result<WriteOutcome, GenerateError> {
    let output_err = |source: io::Error| GenerateError::Output {
        path: path.to_path_buf(),
        source,
    };

    if fs::read(path).is_ok_and(|existing| existing == contents.as_bytes()) {
        debug!(path = %path.display(), "unchanged");
        return Ok(WriteOutcome::Unchanged);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(output_err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".resgen-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(output_err)?;
    tmp.write_all(contents.as_bytes()).map_err(output_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(output_err)?;
    }
    tmp.persist(path).map_err(|e| output_err(e.error))?;
    Ok(WriteOutcome::Written)
}
