//! This library provides a streaming reader for FASTA and FASTQ records
//! that works on top of any byte source able to fill a buffer on demand.
//!
//! The reader is built in two layers:
//!
//! * [`Stream`](Stream) wraps a [`ByteSource`](source::ByteSource) with a
//!   buffer of fixed size and offers single-byte reads
//!   ([`next_byte`](Stream::next_byte)) and token reads up to a
//!   [`Delimiter`](Delimiter) ([`read_until`](Stream::read_until)).
//! * [`Reader`](Reader) drives a `Stream` and reconstructs one record per
//!   call into a reused [`SeqRecord`](SeqRecord). Both formats are handled
//!   transparently, a record is FASTQ if its sequence is followed by a `+`
//!   line.
//!
//! Every type implementing `std::io::Read` is a `ByteSource`. Decompression,
//! if needed, is therefore done by wrapping the input before handing it to
//! the reader.
//!
//! # Example
//!
//! This code prints the ID string and sequence length of each record.
//!
//! ```no_run
//! use seq_stream::{Reader, Record};
//!
//! let mut reader = Reader::from_path("seqs.fastq").unwrap();
//!
//! while let Some(record) = reader.next() {
//!     let record = record.expect("Error reading record");
//!     println!("{} {}", record.id().unwrap(), record.seq().len());
//! }
//! ```
//!
//! # Lower-level API
//!
//! [`Reader::read`](Reader::read) returns the sequence length instead of a
//! reference, which can be handy in loops that only need to look at the
//! record sometimes:
//!
//! ```
//! use seq_stream::{Reader, Record};
//!
//! let mut reader = Reader::new(&b">seq1\nACGT\nACGT\n>seq2\nTTTT\n"[..]);
//!
//! let mut total = 0;
//! while let Some(len) = reader.read().unwrap() {
//!     total += len;
//! }
//! assert_eq!(total, 12);
//! ```
//!
//! # Field sizes
//!
//! Field buffers grow to the next power of two whenever they are too small,
//! and keep their allocation from record to record. An upper limit can be
//! set with a growth policy, see the [`policy`](policy) module.
//!
//! # Owned records
//! The reader also provides iterators similar to *Rust-Bio*, which return
//! owned data. This is slower, but makes sense, e.g. if the records are
//! collected into a vector:
//!
//! ```no_run
//! use seq_stream::Reader;
//!
//! let mut reader = Reader::from_path("input.fasta").unwrap();
//!
//! let records: Result<Vec<_>, _> = reader.records().collect();
//! ```

mod buffer;
mod error;
pub mod policy;
pub mod prelude;
pub mod reader;
mod record;
pub mod source;
mod stream;

pub use crate::buffer::ByteBuf;
pub use crate::error::{Error, ErrorPosition, Position, Result};
pub use crate::reader::{Reader, ReaderBuilder, RecordsIntoIter, RecordsIter};
pub use crate::record::{OwnedRecord, Record, SeqFormat, SeqRecord};
pub use crate::stream::{Delimiter, Stream, Token, BUFSIZE};
