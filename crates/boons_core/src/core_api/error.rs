use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::reader::ReadFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    EnvelopeFormat,
    Decompression,
    ValueDecode,
    ValueEncode,
    Projection,
    Classification,
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationFault {
    MalformedDuoIcon,
}

impl ClassificationFault {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::MalformedDuoIcon => "malformed-duo-icon",
        }
    }
}

impl fmt::Display for ClassificationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way a decode can fail. None of these carry a partial result.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("envelope format error ({reason}) at offset {offset}")]
    EnvelopeFormat { reason: ReadFault, offset: usize },

    #[error("payload decompression failed: {0}")]
    Decompression(#[from] lz4_flex::block::DecompressError),

    #[error("value decode error ({reason}) at offset {offset}")]
    ValueDecode { reason: String, offset: usize },

    #[error("value encode error: {reason}")]
    ValueEncode { reason: String },

    #[error("run state is missing {missing}")]
    Projection { missing: &'static str },

    #[error("cannot classify trait {trait_name} ({reason}): icon {icon:?}")]
    Classification {
        reason: ClassificationFault,
        trait_name: String,
        icon: Option<String>,
    },

    #[error("name catalog: {message}")]
    Catalog { message: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CoreError {
    pub fn code(&self) -> CoreErrorCode {
        match self {
            Self::EnvelopeFormat { .. } => CoreErrorCode::EnvelopeFormat,
            Self::Decompression(_) => CoreErrorCode::Decompression,
            Self::ValueDecode { .. } => CoreErrorCode::ValueDecode,
            Self::ValueEncode { .. } => CoreErrorCode::ValueEncode,
            Self::Projection { .. } => CoreErrorCode::Projection,
            Self::Classification { .. } => CoreErrorCode::Classification,
            Self::Catalog { .. } => CoreErrorCode::Catalog,
            Self::Io { .. } => CoreErrorCode::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }
}
