//! File artifacts handed to the writer.

use std::fmt;

use sha2::{Digest, Sha256};

/// Mode for extracted certificates and keys.
pub const SECRET_FILE_MODE: u32 = 0o600;

/// Mode for the runtime configuration fragment.
pub const FRAGMENT_FILE_MODE: u32 = 0o644;

/// How the writer applies an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOp {
    /// Write the full content at the path.
    Create,
    /// Add the content to the end of the file, creating it if absent.
    Append,
}

impl FileOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileOp::Create => "create",
            FileOp::Append => "append",
        }
    }
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file the writer should materialize.
#[derive(Clone, PartialEq, Eq)]
pub struct FileArtifact {
    /// Absolute destination path.
    pub path: String,

    /// Raw content.
    pub content: Vec<u8>,

    /// Unix permission bits.
    pub permissions: u32,

    /// Write operation.
    pub op: FileOp,
}

impl FileArtifact {
    /// Extracted secret material: `create` with mode 0600.
    pub fn secret(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            permissions: SECRET_FILE_MODE,
            op: FileOp::Create,
        }
    }

    /// Configuration fragment: `append` with mode 0644.
    pub fn fragment(path: impl Into<String>, text: String) -> Self {
        Self {
            path: path.into(),
            content: text.into_bytes(),
            permissions: FRAGMENT_FILE_MODE,
            op: FileOp::Append,
        }
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Content as UTF-8, if it is valid text.
    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// SHA-256 of the content, `sha256:<hex>`.
    pub fn content_digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.content);
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }
}

// Content is usually key material; keep it out of debug output.
impl fmt::Debug for FileArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileArtifact")
            .field("path", &self.path)
            .field("permissions", &format_args!("{:#o}", self.permissions))
            .field("op", &self.op)
            .field("len", &self.content.len())
            .finish()
    }
}
