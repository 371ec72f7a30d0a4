//! The byte source a [`Stream`](crate::Stream) pulls its data from.
//!
//! Any type implementing [`std::io::Read`] is a `ByteSource`, so files,
//! byte slices, `stdin()` or a decompressor set up by the caller can be used
//! directly. Sources that are more naturally written as a function can be
//! wrapped with [`from_fn`].

use std::fmt;
use std::io;

/// Fills a caller-supplied buffer on demand.
///
/// `fill` writes up to `buf.len()` bytes and returns how many were written.
/// `Ok(0)` signals that no more bytes will ever arrive, an `Err` is treated
/// as an unrecoverable read failure.
pub trait ByteSource {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<R> ByteSource for R
where
    R: io::Read + ?Sized,
{
    #[inline]
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.read(buf) {
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                res => return res,
            }
        }
    }
}

/// Byte source calling a closure for every refill.
///
/// Created by [`from_fn`].
pub struct FnSource<F> {
    fill_fn: F,
}

/// Creates a [`ByteSource`] from a closure with the same contract as
/// [`ByteSource::fill`].
///
/// # Example
///
/// ```
/// use seq_stream::{source, Reader, Record};
///
/// let mut data = &b">id\nACGT\n"[..];
/// let src = source::from_fn(move |buf: &mut [u8]| {
///     let n = buf.len().min(data.len());
///     buf[..n].copy_from_slice(&data[..n]);
///     data = &data[n..];
///     Ok(n)
/// });
///
/// let mut reader = Reader::new(src);
/// let record = reader.next().unwrap().unwrap();
/// assert_eq!(record.seq(), b"ACGT");
/// ```
#[inline]
pub fn from_fn<F>(fill_fn: F) -> FnSource<F>
where
    F: FnMut(&mut [u8]) -> io::Result<usize>,
{
    FnSource { fill_fn }
}

impl<F> ByteSource for FnSource<F>
where
    F: FnMut(&mut [u8]) -> io::Result<usize>,
{
    #[inline]
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (self.fill_fn)(buf)
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}
