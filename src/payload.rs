use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MemeError, Result};

/// Data for one QR code, as given on the command line.
///
/// An argument naming an existing file is read from disk; anything else is
/// encoded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrPayload {
    Literal(String),
    File(PathBuf),
}

impl QrPayload {
    pub fn from_arg(arg: &str) -> Self {
        if Path::new(arg).is_file() {
            Self::File(PathBuf::from(arg))
        } else {
            Self::Literal(arg.to_string())
        }
    }

    /// Produce the string to encode. File contents are trimmed.
    pub fn resolve(&self) -> Result<String> {
        match self {
            Self::Literal(text) => Ok(text.clone()),
            Self::File(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| MemeError::io(path, e))?;
                debug!("Loaded {} bytes of QR data from {}", content.len(), path.display());
                Ok(content.trim().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_file_is_read_and_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.txt");
        std::fs::write(&path, "hello\n").unwrap();

        let payload = QrPayload::from_arg(path.to_str().unwrap());
        assert_eq!(payload, QrPayload::File(path.clone()));
        assert_eq!(payload.resolve().unwrap(), "hello");
    }

    #[test]
    fn missing_path_is_a_literal() {
        let payload = QrPayload::from_arg("hello");
        assert_eq!(payload, QrPayload::Literal("hello".to_string()));
        assert_eq!(payload.resolve().unwrap(), "hello");
    }

    #[test]
    fn literals_are_not_trimmed_or_escaped() {
        let payload = QrPayload::from_arg("  http://x/?a=1&b=\\n  ");
        assert_eq!(payload.resolve().unwrap(), "  http://x/?a=1&b=\\n  ");
    }

    #[test]
    fn directories_are_literals() {
        let dir = tempfile::tempdir().unwrap();
        let arg = dir.path().to_str().unwrap();
        assert_eq!(QrPayload::from_arg(arg), QrPayload::Literal(arg.to_string()));
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.dat");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let err = QrPayload::from_arg(path.to_str().unwrap())
            .resolve()
            .unwrap_err();
        assert!(matches!(err, MemeError::Io { .. }));
    }
}
