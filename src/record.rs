use std::str::{self, Utf8Error};

use serde_derive::{Deserialize, Serialize};

use crate::ByteBuf;

/// Format of a sequence record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeqFormat {
    /// Sequence only
    Fasta,
    /// Sequence followed by a `+` line and a quality string
    Fastq,
}

/// Trait implemented by both `SeqRecord` and `OwnedRecord`
pub trait Record {
    /// Returns the record name (header up to the first whitespace)
    fn name(&self) -> &[u8];

    /// Returns the rest of the header line after the name.
    /// Empty if there is none.
    fn comment(&self) -> &[u8];

    /// Returns the sequence with all line breaks removed
    fn seq(&self) -> &[u8];

    /// Returns the quality string, or `None` if the record has
    /// no quality section.
    fn opt_qual(&self) -> Option<&[u8]>;

    /// Returns the quality string. For records without a quality
    /// section, the slice is empty.
    #[inline]
    fn qual(&self) -> &[u8] {
        self.opt_qual().unwrap_or(b"")
    }

    #[inline]
    fn has_quality(&self) -> bool {
        self.opt_qual().is_some()
    }

    #[inline]
    fn format(&self) -> SeqFormat {
        if self.has_quality() {
            SeqFormat::Fastq
        } else {
            SeqFormat::Fasta
        }
    }

    /// Return the name of the record as string slice
    #[inline]
    fn id(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(self.name())
    }

    /// Return the comment of the record as string slice, if present.
    /// Otherwise, `None` is returned.
    #[inline]
    fn desc(&self) -> Option<Result<&str, Utf8Error>> {
        let comment = self.comment();
        if comment.is_empty() {
            return None;
        }
        Some(str::from_utf8(comment))
    }

    /// Creates an owned copy of the record.
    fn to_owned_record(&self) -> OwnedRecord {
        OwnedRecord {
            name: self.name().to_vec(),
            comment: self.comment().to_vec(),
            seq: self.seq().to_vec(),
            qual: self.opt_qual().map(|q| q.to_vec()),
        }
    }
}

/// The record filled by [`Reader`](crate::Reader).
///
/// All four fields keep their allocations when the next record is read
/// into them. The content is only meaningful after a successful read.
#[derive(Debug, Clone, Default)]
pub struct SeqRecord {
    pub(crate) name: ByteBuf,
    pub(crate) comment: ByteBuf,
    pub(crate) seq: ByteBuf,
    pub(crate) qual: ByteBuf,
    pub(crate) has_qual: bool,
    pub(crate) marker: u8,
}

impl SeqRecord {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties comment, sequence and quality. The name is overwritten
    /// by the next read anyway.
    #[inline]
    pub(crate) fn reset(&mut self) {
        self.comment.clear();
        self.seq.clear();
        self.qual.clear();
        self.has_qual = false;
    }

    /// Returns the byte that started the record (`>` or `@`), or `0` if
    /// nothing was read yet.
    #[inline]
    pub fn marker(&self) -> u8 {
        self.marker
    }

    /// Returns the buffer holding the sequence, e.g. for access to the
    /// zero-terminated form.
    #[inline]
    pub fn seq_buf(&self) -> &ByteBuf {
        &self.seq
    }

    #[inline]
    pub fn qual_buf(&self) -> &ByteBuf {
        &self.qual
    }
}

impl Record for SeqRecord {
    #[inline]
    fn name(&self) -> &[u8] {
        &self.name
    }

    #[inline]
    fn comment(&self) -> &[u8] {
        &self.comment
    }

    #[inline]
    fn seq(&self) -> &[u8] {
        &self.seq
    }

    #[inline]
    fn opt_qual(&self) -> Option<&[u8]> {
        if self.has_qual {
            Some(self.qual.as_bytes())
        } else {
            None
        }
    }
}

/// A record that owns its data
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnedRecord {
    pub name: Vec<u8>,
    pub comment: Vec<u8>,
    pub seq: Vec<u8>,
    pub qual: Option<Vec<u8>>,
}

impl Record for OwnedRecord {
    #[inline]
    fn name(&self) -> &[u8] {
        &self.name
    }

    #[inline]
    fn comment(&self) -> &[u8] {
        &self.comment
    }

    #[inline]
    fn seq(&self) -> &[u8] {
        &self.seq
    }

    #[inline]
    fn opt_qual(&self) -> Option<&[u8]> {
        self.qual.as_deref()
    }
}
