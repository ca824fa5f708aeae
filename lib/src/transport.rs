use crate::error::{ProfileError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Characters stripped from user-supplied file names
pub const FORBIDDEN_FILE_NAME_CHARS: &[char] =
    &['<', '>', ':', '{', '}', '\'', '"', '/', '\\', '|', '?', '*'];

pub const MAX_FILE_NAME_LEN: usize = 150;

pub const MIME_TYPE: &str = "text/plain";

pub fn strip_forbidden_chars(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN_FILE_NAME_CHARS.contains(c))
        .collect()
}

/// Strip forbidden characters and cap the length at `MAX_FILE_NAME_LEN` characters
pub fn sanitize_file_name(name: &str) -> String {
    strip_forbidden_chars(name)
        .chars()
        .take(MAX_FILE_NAME_LEN)
        .collect()
}

/// A text file ready to be handed to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl Artifact {
    pub fn new(file_name_hint: &str, extension: &str, content: String) -> Self {
        let extension = extension.trim_start_matches('.');
        Self {
            file_name: format!("{}.{}", sanitize_file_name(file_name_hint), extension),
            mime_type: MIME_TYPE,
            content,
        }
    }

    /// Write into `dir`, returning the full path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content)?;
        log::info!("Wrote {} ({} bytes)", path.display(), self.content.len());
        Ok(path)
    }
}

/// Read a user-selected artifact fully as UTF-8 text
pub fn read_artifact(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => {
            log::debug!("Read {} ({} bytes)", path.display(), text.len());
            Ok(text)
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(ProfileError::UnsupportedFormat),
        Err(e) => Err(e.into()),
    }
}
