#![allow(dead_code)]

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seq_stream::source::{self, ByteSource};
use seq_stream::OwnedRecord;
use std::io;

/// Concatenates lines with the given terminator
pub fn concat_lines(lines: &[&[u8]], terminator: &[u8]) -> Vec<u8> {
    lines
        .iter()
        .flat_map(|s| s.iter().chain(terminator))
        .cloned()
        .collect()
}

/// Source that hands out the data in chunks of the given size and fails
/// once the data is exhausted.
pub fn failing_source(data: Vec<u8>, chunk: usize) -> impl ByteSource {
    let mut pos = 0;
    source::from_fn(move |buf: &mut [u8]| {
        if pos >= data.len() {
            return Err(io::Error::new(io::ErrorKind::Other, "connection reset"));
        }
        let n = chunk.min(buf.len()).min(data.len() - pos);
        buf[..n].copy_from_slice(&data[pos..pos + n]);
        pos += n;
        Ok(n)
    })
}

/// Generates random records, which are FASTQ if `qual` is true. Sequences
/// and quality strings are wrapped at random widths.
pub fn random_records(seed: u64, n: usize, qual: bool) -> (Vec<u8>, Vec<OwnedRecord>) {
    let mut rng = StdRng::seed_from_u64(seed);
    // an empty FASTQ sequence would make the next header a quality line
    let seq_len = Uniform::new_inclusive(if qual { 1 } else { 0 }, 300);
    let nuc = b"ACGTN";
    let mut data = vec![];
    let mut records = vec![];
    for i in 0..n {
        let name = format!("read_{}", i).into_bytes();
        let comment = if rng.gen_bool(0.5) {
            format!("len={} sample A", i * 7).into_bytes()
        } else {
            vec![]
        };
        let len = seq_len.sample(&mut rng);
        let seq: Vec<u8> = (0..len).map(|_| nuc[rng.gen_range(0..nuc.len())]).collect();
        // quality may contain any printable character, including '@' and '>'
        let q: Vec<u8> = (0..len).map(|_| rng.gen_range(b'!'..=b'~')).collect();
        let newline: &[u8] = if rng.gen_bool(0.2) { b"\r\n" } else { b"\n" };

        data.push(if qual { b'@' } else { b'>' });
        data.extend(&name);
        if !comment.is_empty() {
            data.push(b' ');
            data.extend(&comment);
        }
        data.extend(newline);
        let width = rng.gen_range(1..=80);
        for line in seq.chunks(width) {
            data.extend(line);
            data.extend(newline);
        }
        if qual {
            data.push(b'+');
            data.extend(newline);
            for line in q.chunks(width) {
                data.extend(line);
                data.extend(newline);
            }
        }
        records.push(OwnedRecord {
            name,
            comment,
            seq,
            qual: if qual { Some(q) } else { None },
        });
    }
    (data, records)
}
