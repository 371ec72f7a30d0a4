//! Buffered byte stream with single-byte and token reads.

use log::{debug, trace};
use memchr::memchr;

use crate::policy::{BufPolicy, StdPolicy};
use crate::source::ByteSource;
use crate::{ByteBuf, Error, Result};

/// The default buffer size of a [`Stream`].
pub const BUFSIZE: usize = 16 * 1024;

/// Set of bytes terminating a token read by [`Stream::read_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Any of space, `\t`, `\n`, `\v`, `\f` and `\r`.
    Whitespace,
    /// Like `Whitespace`, but without the space character.
    NonSpaceWhitespace,
    /// `\n`. A single `\r` at the end of the token is removed.
    Line,
    /// Exactly the given byte.
    Byte(u8),
}

impl Delimiter {
    /// Returns the index of the first delimiter in `text`.
    #[inline]
    fn find(self, text: &[u8]) -> Option<usize> {
        match self {
            Delimiter::Line => memchr(b'\n', text),
            Delimiter::Byte(b) => memchr(b, text),
            Delimiter::Whitespace => text.iter().position(|&b| is_space(b)),
            Delimiter::NonSpaceWhitespace => text.iter().position(|&b| b != b' ' && is_space(b)),
        }
    }
}

// same set as C `isspace()`
#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t'..=b'\r')
}

/// Result of a successful [`Stream::read_until`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Length of the target buffer after reading, including previous
    /// content if appending.
    pub len: usize,
    /// The delimiter byte that ended the token, or `None` if the input
    /// ended first.
    pub delimiter: Option<u8>,
}

/// Reads from a [`ByteSource`] through a buffer of fixed size.
///
/// The source is only asked for more data after all buffered bytes have been
/// consumed. End of input is sticky: once the source returned `0`, it is not
/// called again until the stream is [rewound](Stream::rewind). After the
/// source failed, every call returns `Error::Poisoned`.
///
/// # Example
///
/// ```
/// use seq_stream::{ByteBuf, Delimiter, Stream};
///
/// let mut stream = Stream::new(&b"id desc\nACGT"[..]);
/// let mut token = ByteBuf::new();
///
/// let t = stream.read_until(Delimiter::Whitespace, &mut token, false).unwrap().unwrap();
/// assert_eq!(&*token, b"id");
/// assert_eq!(t.delimiter, Some(b' '));
///
/// stream.read_until(Delimiter::Line, &mut token, false).unwrap();
/// assert_eq!(&*token, b"desc");
/// assert_eq!(stream.next_byte().unwrap(), Some(b'A'));
/// ```
pub struct Stream<S, P = StdPolicy>
where
    S: ByteSource,
    P: BufPolicy,
{
    source: S,
    buf: Box<[u8]>,
    begin: usize,
    end: usize,
    is_eof: bool,
    poisoned: bool,
    // number of bytes in all buffers that were replaced by a refill
    consumed: u64,
    policy: P,
}

impl<S> Stream<S, StdPolicy>
where
    S: ByteSource,
{
    /// Creates a new stream with a buffer of 16 KiB
    #[inline]
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, BUFSIZE)
    }

    /// Creates a new stream with a given buffer capacity. The minimum
    /// allowed capacity is 1.
    #[inline]
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        assert!(capacity >= 1, "stream capacity must be at least 1");
        Stream {
            source,
            buf: vec![0; capacity].into_boxed_slice(),
            begin: 0,
            end: 0,
            is_eof: false,
            poisoned: false,
            consumed: 0,
            policy: StdPolicy,
        }
    }
}

impl<S, P> Stream<S, P>
where
    S: ByteSource,
    P: BufPolicy,
{
    /// Returns a stream with the given growth policy applied to the
    /// buffers filled by `read_until`.
    #[inline]
    pub fn set_policy<T: BufPolicy>(self, policy: T) -> Stream<S, T> {
        Stream {
            source: self.source,
            buf: self.buf,
            begin: self.begin,
            end: self.end,
            is_eof: self.is_eof,
            poisoned: self.poisoned,
            consumed: self.consumed,
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[inline]
    pub(crate) fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// True if the source reported its end (or failed) and all buffered
    /// bytes were consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.is_eof && self.begin >= self.end
    }

    /// True if the source failed. Reset by `rewind()`.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Number of bytes consumed from the source so far.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.consumed + self.begin as u64
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Returns a mutable reference to the source. Reading from it directly
    /// skips over the bytes that are still buffered.
    #[inline]
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Resets cursors and end-of-input / error state, keeping the buffer.
    /// The source itself is left untouched, so to really start over it has to
    /// be repositioned by the caller.
    #[inline]
    pub fn rewind(&mut self) {
        self.begin = 0;
        self.end = 0;
        self.is_eof = false;
        self.poisoned = false;
        self.consumed = 0;
    }

    /// Returns the next byte, or `None` if the input ended.
    #[inline]
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        if self.begin >= self.end && (self.is_eof || self.refill()? == 0) {
            return Ok(None);
        }
        let b = self.buf[self.begin];
        self.begin += 1;
        Ok(Some(b))
    }

    /// Reads bytes into `out` until `delim` is found or the input ends.
    ///
    /// If `append` is false, `out` is cleared first. The delimiter is
    /// consumed, but not added to `out`; it is returned in
    /// [`Token::delimiter`](Token). `None` is returned if the input ended
    /// before any byte could be looked at.
    pub fn read_until(
        &mut self,
        delim: Delimiter,
        out: &mut ByteBuf,
        append: bool,
    ) -> Result<Option<Token>> {
        if !append {
            out.clear();
        }
        let mut got_any = false;
        let mut found = None;
        loop {
            if self.poisoned {
                return Err(Error::Poisoned);
            }
            if self.begin >= self.end && (self.is_eof || self.refill()? == 0) {
                break;
            }
            let avail = &self.buf[self.begin..self.end];
            let pos = delim.find(avail);
            let n = pos.unwrap_or(avail.len());
            out.try_extend(&avail[..n], &mut self.policy)?;
            got_any = true;
            if let Some(i) = pos {
                found = Some(avail[i]);
                self.begin += i + 1;
                break;
            }
            self.begin = self.end;
        }
        if !got_any && self.is_eof() {
            return Ok(None);
        }
        if delim == Delimiter::Line && out.last() == Some(b'\r') {
            out.truncate(out.len() - 1);
        }
        Ok(Some(Token {
            len: out.len(),
            delimiter: found,
        }))
    }

    // Replaces the (fully consumed) buffer content with new data
    // from the source and returns the number of bytes read.
    fn refill(&mut self) -> Result<usize> {
        self.consumed += self.end as u64;
        self.begin = 0;
        self.end = 0;
        match self.source.fill(&mut self.buf) {
            Ok(0) => {
                trace!("end of input after {} bytes", self.consumed);
                self.is_eof = true;
                Ok(0)
            }
            Ok(n) => {
                debug_assert!(n <= self.buf.len());
                trace!("refilled {} bytes at offset {}", n, self.consumed);
                self.end = n;
                Ok(n)
            }
            Err(e) => {
                debug!("byte source failed at offset {}: {}", self.consumed, e);
                self.is_eof = true;
                self.poisoned = true;
                Err(Error::Io(e))
            }
        }
    }
}
