//! Record reader for FASTA and FASTQ
//!
//! # Example
//!
//! ```
//! use seq_stream::{Reader, Record};
//!
//! let input = b">id1 desc
//! ACGT
//! ACGT
//! @id2
//! TGCA
//! +
//! IIII
//! ";
//!
//! let mut reader = Reader::new(&input[..]);
//!
//! let record = reader.next().unwrap().unwrap();
//! assert_eq!(record.id(), Ok("id1"));
//! assert_eq!(record.desc(), Some(Ok("desc")));
//! assert_eq!(record.seq(), b"ACGTACGT");
//! assert!(!record.has_quality());
//!
//! let record = reader.next().unwrap().unwrap();
//! assert_eq!(record.id(), Ok("id2"));
//! assert_eq!(record.qual(), b"IIII");
//!
//! assert!(reader.next().is_none());
//! ```
//!
//! # Details on parsing behaviour
//!
//! * FASTA and FASTQ records may be mixed freely, the format is decided for
//!   each record by the presence of a `+` line. A record may start with `>`
//!   or `@` in both cases.
//! * Anything before the first `>` or `@` is skipped.
//! * The name ends at the first whitespace character, the rest of the header
//!   line is the comment.
//! * Sequence lines may be wrapped. Empty lines within the sequence are
//!   skipped. The sequence ends at the next line starting with `>`, `@`
//!   or `+`.
//! * The quality string may also be wrapped. Quality lines are read until at
//!   least as many quality bytes as sequence bytes were collected, so
//!   quality lines may start with `@` or `>`.
//! * The parser handles UNIX (LF) and Windows (CRLF) line endings, but not old
//!   Mac-style (CR) endings.
//! * Empty input results in `Ok(None)` being returned immediately by
//!   `Reader::read()`, and in every call thereafter.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::policy::{BufPolicy, StdPolicy};
use crate::source::ByteSource;
use crate::stream::{Delimiter, Stream, BUFSIZE};
use crate::{Error, ErrorPosition, OwnedRecord, Position, Record, Result, SeqRecord};

/// Initial capacity of the sequence buffer
pub const SEQ_CAPACITY: usize = 256;

/// Record start byte already consumed from the stream, which belongs
/// to the next record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookahead {
    /// The next call has to search for a record start.
    None,
    Marker { byte: u8, offset: u64 },
}

/// Parser for FASTA and FASTQ records.
///
/// Reads one record per call into a reused [`SeqRecord`].
pub struct Reader<S, P = StdPolicy>
where
    S: ByteSource,
    P: BufPolicy,
{
    stream: Stream<S, P>,
    record: SeqRecord,
    lookahead: Lookahead,
    position: Option<Position>,
    record_idx: u64,
    seq_capacity: usize,
}

impl<S> Reader<S, StdPolicy>
where
    S: ByteSource,
{
    /// Creates a new reader with the default buffer size of 16 KiB
    ///
    /// # Example:
    ///
    /// ```
    /// use seq_stream::{Reader, Record};
    /// let fasta = b">id\nSEQUENCE";
    ///
    /// let mut reader = Reader::new(&fasta[..]);
    /// let record = reader.next().unwrap().unwrap();
    /// assert_eq!(record.id(), Ok("id"))
    /// ```
    #[inline]
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, BUFSIZE)
    }

    /// Creates a new reader with a given buffer capacity. The minimum allowed
    /// capacity is 1.
    #[inline]
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self::from_stream(Stream::with_capacity(source, capacity))
    }
}

impl Reader<File, StdPolicy> {
    /// Creates a reader from a file path.
    ///
    /// # Example:
    ///
    /// ```no_run
    /// use seq_stream::Reader;
    ///
    /// let mut reader = Reader::from_path("seqs.fastq").unwrap();
    ///
    /// // (... do something with the reader)
    /// ```
    #[inline]
    pub fn from_path<F: AsRef<Path>>(path: F) -> io::Result<Reader<File>> {
        File::open(path).map(Reader::new)
    }
}

impl<S, P> Reader<S, P>
where
    S: ByteSource,
    P: BufPolicy,
{
    /// Creates a reader from an existing stream, which may already
    /// have been read from.
    #[inline]
    pub fn from_stream(stream: Stream<S, P>) -> Self {
        Reader {
            stream,
            record: SeqRecord::new(),
            lookahead: Lookahead::None,
            position: None,
            record_idx: 0,
            seq_capacity: SEQ_CAPACITY,
        }
    }

    /// Returns a reader with the given buffer policy applied
    #[inline]
    pub fn set_policy<T: BufPolicy>(self, policy: T) -> Reader<S, T> {
        Reader {
            stream: self.stream.set_policy(policy),
            record: self.record,
            lookahead: self.lookahead,
            position: self.position,
            record_idx: self.record_idx,
            seq_capacity: self.seq_capacity,
        }
    }

    /// Returns the `BufPolicy` of the reader
    #[inline]
    pub fn policy(&self) -> &P {
        self.stream.policy()
    }

    #[inline]
    pub(crate) fn set_seq_capacity(&mut self, capacity: usize) {
        self.seq_capacity = capacity;
    }

    /// Returns the most recently read record. Its content is only
    /// meaningful if the last call to `read()` succeeded.
    #[inline]
    pub fn record(&self) -> &SeqRecord {
        &self.record
    }

    /// Returns the position of the most recently started record.
    /// If no record was found yet, `None` is returned.
    #[inline]
    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    #[inline]
    pub fn stream(&self) -> &Stream<S, P> {
        &self.stream
    }

    #[inline]
    pub fn into_stream(self) -> Stream<S, P> {
        self.stream
    }

    /// Reads the next record into the internal [`SeqRecord`] and returns the
    /// length of its sequence, or `None` if there are no more records.
    ///
    /// After `TruncatedQuality` or `UnequalLengths`, reading can continue
    /// with the next record. After `BufferLimit`, the stream is left inside
    /// the record, and the next call resyncs on the next `>` or `@` byte,
    /// which may be part of a quality line.
    ///
    /// # Example
    ///
    /// ```
    /// use seq_stream::{Reader, Record};
    ///
    /// let mut reader = Reader::new(&b"@r1\nACGT\n+\n!!!!\n"[..]);
    ///
    /// assert_eq!(reader.read().unwrap(), Some(4));
    /// assert_eq!(reader.record().qual(), b"!!!!");
    /// assert_eq!(reader.read().unwrap(), None);
    /// ```
    pub fn read(&mut self) -> Result<Option<usize>> {
        let (marker, start) = match self.lookahead {
            Lookahead::Marker { byte, offset } => (byte, offset),
            Lookahead::None => match self.find_start()? {
                Some(found) => found,
                None => return Ok(None),
            },
        };
        self.lookahead = Lookahead::None;
        self.record.reset();
        self.record.marker = marker;

        // header
        let name = match self
            .stream
            .read_until(Delimiter::Whitespace, &mut self.record.name, false)?
        {
            Some(t) => t,
            None => return Ok(None),
        };
        self.position = Some(Position::new(self.record_idx, start));
        self.record_idx += 1;
        if matches!(name.delimiter, Some(d) if d != b'\n') {
            self.stream
                .read_until(Delimiter::Line, &mut self.record.comment, false)?;
        }

        // sequence lines
        if self.record.seq.capacity() == 0 {
            // capacity includes the terminator
            self.record.seq.try_reserve_with(
                self.seq_capacity.saturating_sub(1),
                self.stream.policy_mut(),
            )?;
        }
        let stop = loop {
            match self.stream.next_byte()? {
                None => break None,
                Some(b @ b'>') | Some(b @ b'@') | Some(b @ b'+') => break Some(b),
                Some(b'\n') => {}
                Some(b) => {
                    self.record.seq.try_push(b, self.stream.policy_mut())?;
                    let rest = self
                        .stream
                        .read_until(Delimiter::Line, &mut self.record.seq, true)?;
                    // a lone '\r' before EOF is not stripped by the line read
                    if rest.is_none() && b == b'\r' {
                        self.record.seq.truncate(self.record.seq.len() - 1);
                    }
                }
            }
        };
        let seq_len = self.record.seq.len();
        match stop {
            Some(b'+') => {}
            Some(byte) => {
                self.lookahead = Lookahead::Marker {
                    byte,
                    offset: self.stream.offset() - 1,
                };
                return Ok(Some(seq_len));
            }
            None => return Ok(Some(seq_len)),
        }

        // quality
        self.record.has_qual = true;
        self.record
            .qual
            .try_reserve_with(seq_len, self.stream.policy_mut())?;
        // a repeated name on the '+' line is ignored
        loop {
            match self.stream.next_byte()? {
                Some(b'\n') => break,
                Some(_) => {}
                None => {
                    debug!("no quality line after '+' in record {}", self.record_idx);
                    return Err(Error::TruncatedQuality {
                        pos: self.error_pos(start),
                    });
                }
            }
        }
        while self
            .stream
            .read_until(Delimiter::Line, &mut self.record.qual, true)?
            .is_some()
            && self.record.qual.len() < seq_len
        {}

        let qual_len = self.record.qual.len();
        if qual_len == seq_len {
            return Ok(Some(seq_len));
        }
        debug!(
            "record {}: sequence length {} != quality length {}",
            self.record_idx, seq_len, qual_len
        );
        let pos = self.error_pos(start);
        if qual_len == 0 && self.stream.is_eof() {
            return Err(Error::TruncatedQuality { pos });
        }
        Err(Error::UnequalLengths {
            pos,
            seq: seq_len,
            qual: qual_len,
        })
    }

    /// Reads the next record and returns a reference to it, or `None`
    /// if there are no more records.
    ///
    /// # Example:
    ///
    /// ```no_run
    /// use seq_stream::{Reader, Record};
    ///
    /// let mut reader = Reader::from_path("seqs.fasta").unwrap();
    ///
    /// while let Some(record) = reader.next() {
    ///     let record = record.unwrap();
    ///     println!("{}", record.id().unwrap());
    /// }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Result<&SeqRecord>> {
        match self.read() {
            Ok(Some(_)) => Some(Ok(&self.record)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }

    /// Resets the reader to its initial state. As with
    /// [`Stream::rewind`], the source is not repositioned.
    #[inline]
    pub fn rewind(&mut self) {
        self.stream.rewind();
        self.lookahead = Lookahead::None;
        self.position = None;
        self.record_idx = 0;
    }

    /// Returns a borrowed iterator over all records. The records
    /// are owned (`OwnedRecord`), this is therefore slower than using
    /// `Reader::next()`. The iterator ends after a stream error or
    /// `Error::BufferLimit`.
    ///
    /// # Example
    ///
    /// ```
    /// use seq_stream::{OwnedRecord, Reader};
    ///
    /// let fasta = b">id1\nACGT\n>id2\nTGCA";
    ///
    /// let mut reader = Reader::new(&fasta[..]);
    ///
    /// let records: Result<Vec<_>, _> = reader.records().collect();
    ///
    /// assert_eq!(records.unwrap(),
    ///     vec![
    ///         OwnedRecord {name: b"id1".to_vec(), comment: vec![], seq: b"ACGT".to_vec(), qual: None},
    ///         OwnedRecord {name: b"id2".to_vec(), comment: vec![], seq: b"TGCA".to_vec(), qual: None},
    ///     ]
    /// );
    /// ```
    #[inline]
    pub fn records(&mut self) -> RecordsIter<S, P> {
        RecordsIter {
            rdr: self,
            finished: false,
        }
    }

    /// Returns an iterator over all records like `Reader::records()`,
    /// but with the difference that it owns the underlying reader.
    #[inline]
    pub fn into_records(self) -> RecordsIntoIter<S, P> {
        RecordsIntoIter {
            rdr: self,
            finished: false,
        }
    }

    // Skips everything up to the next '>' or '@' and returns it together
    // with its offset
    fn find_start(&mut self) -> Result<Option<(u8, u64)>> {
        while let Some(b) = self.stream.next_byte()? {
            if b == b'>' || b == b'@' {
                return Ok(Some((b, self.stream.offset() - 1)));
            }
        }
        Ok(None)
    }

    fn error_pos(&self, start: u64) -> ErrorPosition {
        let id = String::from_utf8_lossy(&self.record.name).into_owned();
        ErrorPosition::new(Position::new(self.record_idx - 1, start), Some(id))
    }
}

impl<S, P> Reader<S, P>
where
    S: ByteSource + Seek,
    P: BufPolicy,
{
    /// Seeks the source back to its start and rewinds the reader, so
    /// that the same records are returned again.
    ///
    /// # Example
    ///
    /// ```
    /// use seq_stream::{Reader, Record};
    /// use std::io::Cursor;
    ///
    /// let mut reader = Reader::new(Cursor::new(b">id1\nACGT\n>id2\nTGCA\n"));
    /// let first = reader.next().unwrap().unwrap().to_owned_record();
    /// reader.next().unwrap().unwrap();
    ///
    /// reader.seek_start().unwrap();
    /// assert_eq!(reader.next().unwrap().unwrap().to_owned_record(), first);
    /// ```
    pub fn seek_start(&mut self) -> Result<()> {
        self.stream.get_mut().seek(SeekFrom::Start(0))?;
        self.rewind();
        Ok(())
    }
}

/// Borrowed iterator of `OwnedRecord`
pub struct RecordsIter<'a, S, P = StdPolicy>
where
    S: ByteSource,
    P: BufPolicy,
{
    rdr: &'a mut Reader<S, P>,
    finished: bool,
}

impl<'a, S, P> Iterator for RecordsIter<'a, S, P>
where
    S: ByteSource,
    P: BufPolicy,
{
    type Item = Result<OwnedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        next_owned(self.rdr, &mut self.finished)
    }
}

/// Iterator of `OwnedRecord` that owns the underlying reader
pub struct RecordsIntoIter<S, P = StdPolicy>
where
    S: ByteSource,
    P: BufPolicy,
{
    rdr: Reader<S, P>,
    finished: bool,
}

impl<S, P> Iterator for RecordsIntoIter<S, P>
where
    S: ByteSource,
    P: BufPolicy,
{
    type Item = Result<OwnedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        next_owned(&mut self.rdr, &mut self.finished)
    }
}

fn next_owned<S, P>(rdr: &mut Reader<S, P>, finished: &mut bool) -> Option<Result<OwnedRecord>>
where
    S: ByteSource,
    P: BufPolicy,
{
    if *finished {
        return None;
    }
    match rdr.next() {
        Some(Ok(rec)) => Some(Ok(rec.to_owned_record())),
        Some(Err(e)) => {
            *finished = e.is_stream_error() || matches!(e, Error::BufferLimit);
            Some(Err(e))
        }
        None => {
            *finished = true;
            None
        }
    }
}

/// Configures and creates a [`Reader`]
///
/// # Example
///
/// ```
/// use seq_stream::policy::Limited;
/// use seq_stream::ReaderBuilder;
///
/// let mut reader = ReaderBuilder::new()
///     .capacity(1 << 20)
///     .seq_capacity(1024)
///     .policy(Limited::new(1 << 30))
///     .from_source(&b">id\nACGT\n"[..]);
///
/// assert_eq!(reader.read().unwrap(), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct ReaderBuilder<P: BufPolicy = StdPolicy> {
    capacity: usize,
    seq_capacity: usize,
    policy: P,
}

impl ReaderBuilder {
    #[inline]
    pub fn new() -> Self {
        ReaderBuilder {
            capacity: BUFSIZE,
            seq_capacity: SEQ_CAPACITY,
            policy: StdPolicy,
        }
    }
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: BufPolicy> ReaderBuilder<P> {
    /// Sets the size of the stream buffer (default: 16 KiB)
    #[inline]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the initial capacity of the sequence buffer (default: 256)
    #[inline]
    pub fn seq_capacity(mut self, capacity: usize) -> Self {
        self.seq_capacity = capacity;
        self
    }

    /// Sets the growth policy of the record fields
    #[inline]
    pub fn policy<T: BufPolicy>(self, policy: T) -> ReaderBuilder<T> {
        ReaderBuilder {
            capacity: self.capacity,
            seq_capacity: self.seq_capacity,
            policy,
        }
    }

    /// Creates a reader with the current configuration
    #[inline]
    pub fn from_source<S: ByteSource>(self, source: S) -> Reader<S, P> {
        let mut rdr = Reader::with_capacity(source, self.capacity).set_policy(self.policy);
        rdr.set_seq_capacity(self.seq_capacity);
        rdr
    }

    /// Creates a reader from a file path with the current configuration
    #[inline]
    pub fn from_path<F: AsRef<Path>>(self, path: F) -> io::Result<Reader<File, P>> {
        File::open(path).map(|f| self.from_source(f))
    }
}
