//! Growable byte buffer holding one record field.

use std::fmt;
use std::ops::Deref;
use std::str::{self, Utf8Error};

use crate::policy::{BufPolicy, StdPolicy};
use crate::{Error, Result};

/// A growable byte string that always keeps a zero byte after its content.
///
/// The allocated size only ever grows, and always to a power of two, so
/// refilling the same buffer record after record does not reallocate in the
/// common case. Once anything has been allocated, `len() < capacity()` holds
/// and the byte at index `len()` is `0`
/// (see [`as_bytes_with_nul`](ByteBuf::as_bytes_with_nul)).
#[derive(Clone, Default)]
pub struct ByteBuf {
    // data.len() is the capacity, everything up to `len` is content
    data: Vec<u8>,
    len: usize,
}

impl ByteBuf {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer able to hold at least `capacity` bytes of
    /// content without reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Self::new();
        if capacity > 0 {
            buf.reserve(capacity);
        }
        buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated bytes, including the space for the terminator.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Returns the content followed by the terminating zero byte.
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.data.is_empty() {
            return b"\0";
        }
        &self.data[..=self.len]
    }

    #[inline]
    pub fn to_str(&self) -> std::result::Result<&str, Utf8Error> {
        str::from_utf8(self.as_bytes())
    }

    #[inline]
    pub fn last(&self) -> Option<u8> {
        self.as_bytes().last().copied()
    }

    /// Sets the length to zero, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    #[inline]
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
            self.data[len] = 0;
        }
    }

    /// Makes sure that `additional` more bytes fit, growing the
    /// capacity to the next power of two if necessary.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.try_reserve_with(additional, &mut StdPolicy)
            .expect("capacity overflow");
    }

    /// Like `reserve`, but the new capacity is determined by `policy`.
    /// Returns `Error::BufferLimit` if the policy refuses to grow.
    pub fn try_reserve_with<P: BufPolicy>(&mut self, additional: usize, policy: &mut P) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .and_then(|n| n.checked_add(1))
            .ok_or(Error::BufferLimit)?;
        if required <= self.data.len() {
            return Ok(());
        }
        let new_cap = policy.grow_to(required).ok_or(Error::BufferLimit)?;
        if new_cap < required {
            return Err(Error::BufferLimit);
        }
        self.data.resize(new_cap, 0);
        Ok(())
    }

    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.reserve(1);
        self.push_reserved(byte);
    }

    #[inline]
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.extend_reserved(bytes);
    }

    #[inline]
    pub(crate) fn try_push<P: BufPolicy>(&mut self, byte: u8, policy: &mut P) -> Result<()> {
        self.try_reserve_with(1, policy)?;
        self.push_reserved(byte);
        Ok(())
    }

    #[inline]
    pub(crate) fn try_extend<P: BufPolicy>(&mut self, bytes: &[u8], policy: &mut P) -> Result<()> {
        self.try_reserve_with(bytes.len(), policy)?;
        self.extend_reserved(bytes);
        Ok(())
    }

    #[inline]
    fn push_reserved(&mut self, byte: u8) {
        self.data[self.len] = byte;
        self.len += 1;
        self.data[self.len] = 0;
    }

    #[inline]
    fn extend_reserved(&mut self, bytes: &[u8]) {
        let end = self.len + bytes.len();
        self.data[self.len..end].copy_from_slice(bytes);
        self.len = end;
        self.data[end] = 0;
    }
}

impl Deref for ByteBuf {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for ByteBuf {
    #[inline]
    fn eq(&self, other: &ByteBuf) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ByteBuf {}

impl AsRef<[u8]> for ByteBuf {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<&[u8]> for ByteBuf {
    fn from(bytes: &[u8]) -> Self {
        let mut buf = ByteBuf::new();
        buf.extend_from_slice(bytes);
        buf
    }
}

impl fmt::Debug for ByteBuf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ByteBuf({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}
