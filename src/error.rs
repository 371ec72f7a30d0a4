use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Position of a sequence record within the input
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub(crate) record: u64,
    pub(crate) byte: u64,
}

impl Position {
    pub fn new(record: u64, byte: u64) -> Position {
        Position { record, byte }
    }

    /// Index of the record (starting with 0)
    pub fn record(&self) -> u64 {
        self.record
    }

    /// Byte offset of the record start marker (`>` or `@`) within the input
    pub fn byte(&self) -> u64 {
        self.byte
    }
}

/// Position of a parsing error within the input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    record_pos: Position,
    id: Option<String>,
}

impl ErrorPosition {
    pub fn new(record_pos: Position, id: Option<String>) -> Self {
        ErrorPosition { record_pos, id }
    }

    /// Returns the position of the record, in which the error occurred.
    #[inline]
    pub fn record_position(&self) -> &Position {
        &self.record_pos
    }

    /// Returns the ID of the record where the error occurred.
    /// Invalid UTF-8 bytes are replaced (see `String::from_utf8_lossy`).
    #[inline]
    pub fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl fmt::Display for ErrorPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(id) = self.id.as_ref() {
            write!(f, "record '{}', ", id)?;
        }
        write!(
            f,
            "record no. {} at byte {}",
            self.record_pos.record + 1,
            self.record_pos.byte
        )
    }
}

/// Error returned by [`Stream`](crate::Stream) and [`Reader`](crate::Reader)
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The byte source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The byte source failed in an earlier call. The stream stays in this
    /// state until it is rewound.
    #[error("stream error: byte source failed in a previous read")]
    Poisoned,
    /// A `+` line was found, but the input ended before any quality
    /// data followed.
    #[error("FASTQ parse error: truncated quality string ({pos})")]
    TruncatedQuality { pos: ErrorPosition },
    /// Sequence and quality lengths found to be different.
    #[error("FASTQ parse error: sequence length is {seq}, but quality length is {qual} ({pos})")]
    UnequalLengths {
        pos: ErrorPosition,
        /// Length of sequence
        seq: usize,
        /// Length of quality information
        qual: usize,
    },
    /// A field buffer would have grown beyond the limit set by the
    /// [`BufPolicy`](crate::policy::BufPolicy). This does not happen with
    /// the default `StdPolicy`.
    #[error("parse error: buffer limit reached")]
    BufferLimit,
}

impl Error {
    /// Returns the position of the error, if it concerns a specific record.
    pub fn position(&self) -> Option<&ErrorPosition> {
        match self {
            Error::TruncatedQuality { pos } | Error::UnequalLengths { pos, .. } => Some(pos),
            _ => None,
        }
    }

    /// True if the error originates from the byte source rather than
    /// from malformed input. Reading cannot continue after such an error.
    pub fn is_stream_error(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Poisoned)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}
