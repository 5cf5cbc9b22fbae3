use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrimError {
    #[error("unknown bill type `{name}` (expected one of: {known})")]
    UnknownBillType { name: String, known: String },

    #[error("environment variable {var} is not set (password for `{bill_type}` bills)")]
    MissingPassword {
        var: &'static str,
        bill_type: &'static str,
    },

    #[error("input path has no file name: {}", .path.display())]
    InvalidInputPath { path: PathBuf },

    #[error("password rejected for {}: {reason}", .path.display())]
    Authentication { path: PathBuf, reason: String },

    #[error("failed to parse PDF {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode trimmed PDF for {}: {reason}", .path.display())]
    Serialize { path: PathBuf, reason: String },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TrimError {
    /// Errors raised from the profile table or the arguments, before any file is touched.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TrimError::UnknownBillType { .. }
                | TrimError::MissingPassword { .. }
                | TrimError::InvalidInputPath { .. }
        )
    }
}
