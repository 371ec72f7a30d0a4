//! Policy that decides how record field buffers grow
//!
//! Every field buffer ([`ByteBuf`](crate::ByteBuf)) grows to the next power
//! of two above the size it needs. A policy takes that required size
//! (including the terminating byte) and returns the new capacity. Returning
//! `None` indicates that the field has grown too big, in which case the
//! reader returns [`Error::BufferLimit`](crate::Error::BufferLimit).
//!
//! # Example
//!
//! ```
//! use seq_stream::policy::BufPolicy;
//! use seq_stream::{Error, ReaderBuilder};
//!
//! struct Max1K;
//!
//! impl BufPolicy for Max1K {
//!     fn grow_to(&mut self, required: usize) -> Option<usize> {
//!         if required > 1024 {
//!             return None;
//!         }
//!         required.checked_next_power_of_two()
//!     }
//! }
//!
//! let seq = vec![b'A'; 2000];
//! let mut fasta = b">id\n".to_vec();
//! fasta.extend(&seq);
//!
//! let mut reader = ReaderBuilder::new().policy(Max1K).from_source(&fasta[..]);
//! let res = reader.read();
//! assert!(matches!(res, Err(Error::BufferLimit)));
//! ```

pub trait BufPolicy {
    fn grow_to(&mut self, required: usize) -> Option<usize>;
}

/// Standard policy: capacity is rounded up to the next power of two.
/// Field size is not limited (except by overflow of `usize`).
#[derive(Debug, Clone, Copy, Default)]
pub struct StdPolicy;

impl BufPolicy for StdPolicy {
    #[inline]
    fn grow_to(&mut self, required: usize) -> Option<usize> {
        required.checked_next_power_of_two()
    }
}

/// Like `StdPolicy`, but the capacity of a single field buffer may
/// not exceed `limit` bytes.
#[derive(Debug, Clone, Copy)]
pub struct Limited {
    limit: usize,
}

impl Limited {
    pub fn new(limit: usize) -> Self {
        Limited { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl BufPolicy for Limited {
    #[inline]
    fn grow_to(&mut self, required: usize) -> Option<usize> {
        required
            .checked_next_power_of_two()
            .filter(|&size| size <= self.limit)
    }
}
