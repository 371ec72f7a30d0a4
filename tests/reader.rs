#[macro_use]
extern crate matches;
#[macro_use]
extern crate lazy_static;

mod common;

use common::*;
use seq_stream::policy::Limited;
use seq_stream::prelude::*;
use seq_stream::{Error, OwnedRecord, Position, Reader, ReaderBuilder, SeqFormat};
use std::io::Cursor;

const FASTA_LINES: &[&[u8]] = &[
    b">id desc",
    b"ACCGTAGGCT",
    b"CCGTAGGCTG",
    b"",
    b"CGTAGGCTGA",
    b"CCCC",
    b">id2",
    b"ATTGTTGTTT",
    b"GGGG",
    b">id3 ",
    b">id4\tx y",
];

const FASTA_EXPECTED: &[(&str, Option<&str>, &[u8])] = &[
    ("id", Some("desc"), b"ACCGTAGGCTCCGTAGGCTGCGTAGGCTGACCCC"),
    ("id2", None, b"ATTGTTGTTTGGGG"),
    ("id3", None, b""),
    ("id4", Some("x y"), b""),
];

lazy_static! {
    static ref RANDOM_FASTQ: (Vec<u8>, Vec<OwnedRecord>) = random_records(2, 200, true);
}

const FASTQ: &[u8] = b"@id desc
ATGC
+
~~~~
@id2
AT
GC
+id2
@@
>>
";

// try different buffer capacities to test refills at every position
macro_rules! test_reader {
    ($input:expr, $reader:ident, $block:block) => {
        for cap in 1..80 {
            if let Err(_) = std::panic::catch_unwind(|| {
                #[allow(unused_mut)]
                let mut $reader = Reader::with_capacity(&$input[..], cap);
                $block
            }) {
                panic!("Reader failed at capacity {}", cap);
            }
        }
    };
}

#[test]
fn fasta_reader() {
    for term in [&b"\n"[..], &b"\r\n"[..]] {
        let fasta = concat_lines(FASTA_LINES, term);
        test_reader!(fasta, reader, {
            for &(id, desc, seq) in FASTA_EXPECTED.iter() {
                let len = reader.read().unwrap();
                assert_eq!(len, Some(seq.len()));
                let record = reader.record();
                assert_eq!(record.id(), Ok(id));
                assert_eq!(record.desc(), desc.map(Ok));
                assert_eq!(record.seq(), seq);
                assert_eq!(record.opt_qual(), None);
                assert_eq!(record.format(), SeqFormat::Fasta);
                assert_eq!(record.marker(), b'>');
            }
            assert_eq!(reader.read().unwrap(), None);
            assert_eq!(reader.read().unwrap(), None);
        });
    }
}

#[test]
fn fastq_reader() {
    let expected = [
        (Ok("id"), Some(Ok("desc")), &b"ATGC"[..], &b"~~~~"[..]),
        (Ok("id2"), None, &b"ATGC"[..], &b"@@>>"[..]),
    ];
    test_reader!(FASTQ, reader, {
        for (id, desc, seq, qual) in expected.iter() {
            let record = reader.next().unwrap().unwrap();
            assert_eq!(record.id(), *id);
            assert_eq!(record.desc(), *desc);
            assert_eq!(record.seq(), *seq);
            assert_eq!(record.opt_qual(), Some(*qual));
            assert_eq!(record.marker(), b'@');

            let owned = record.to_owned_record();
            assert_eq!(owned.id(), *id);
            assert_eq!(owned.qual(), *qual);
            assert_eq!(owned.format(), SeqFormat::Fastq);
        }
        assert!(reader.next().is_none());
    });
}

#[test]
fn two_fasta_records() {
    let mut reader = Reader::new(&b">seq1\nACGT\nACGT\n>seq2\nTTTT\n"[..]);
    assert_eq!(reader.read().unwrap(), Some(8));
    assert_eq!(reader.record().name(), b"seq1");
    assert_eq!(reader.record().seq(), b"ACGTACGT");
    assert_eq!(reader.read().unwrap(), Some(4));
    assert_eq!(reader.record().name(), b"seq2");
    assert_eq!(reader.record().seq(), b"TTTT");
    assert_eq!(reader.read().unwrap(), None);
}

#[test]
fn single_fastq_record() {
    let mut reader = Reader::new(&b"@r1\nACGT\n+\n!!!!\n"[..]);
    assert_eq!(reader.read().unwrap(), Some(4));
    let rec = reader.record();
    assert_eq!(rec.name(), b"r1");
    assert_eq!(rec.seq(), b"ACGT");
    assert_eq!(rec.qual(), b"!!!!");
    assert_eq!(rec.qual_buf().as_bytes_with_nul(), b"!!!!\0");
}

#[test]
fn comment() {
    let mut reader = Reader::new(&b">id extra info\nACGT\n"[..]);
    assert_eq!(reader.read().unwrap(), Some(4));
    let rec = reader.record();
    assert_eq!(rec.name(), b"id");
    assert_eq!(rec.comment(), b"extra info");
    assert_eq!(rec.seq(), b"ACGT");
}

#[test]
fn mixed_formats() {
    let input = b">fa1\nAC\n@fq1\nGG\n+\nII\n>fa2\nTT";
    test_reader!(input, reader, {
        let formats: Vec<_> = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                let format = r.format();
                (r.name, format)
            })
            .collect();
        assert_eq!(
            formats,
            vec![
                (b"fa1".to_vec(), SeqFormat::Fasta),
                (b"fq1".to_vec(), SeqFormat::Fastq),
                (b"fa2".to_vec(), SeqFormat::Fasta),
            ]
        );
    });
}

#[test]
fn leading_garbage() {
    let input = b"\n\n;comment\n>id\nACGT\n";
    test_reader!(input, reader, {
        assert_eq!(reader.read().unwrap(), Some(4));
        assert_eq!(reader.record().name(), b"id");
        assert_eq!(reader.position(), Some(&Position::new(0, 11)));
    });
}

#[test]
fn empty() {
    test_reader!(b"", reader, {
        for _ in 0..3 {
            assert_eq!(reader.read().unwrap(), None);
        }
        assert!(reader.position().is_none());
    });
}

#[test]
fn only_marker() {
    test_reader!(b">", reader, {
        assert_eq!(reader.read().unwrap(), None);
        assert_eq!(reader.read().unwrap(), None);
    });
}

#[test]
fn header_without_newline() {
    test_reader!(b">id desc", reader, {
        assert_eq!(reader.read().unwrap(), Some(0));
        assert_eq!(reader.record().name(), b"id");
        assert_eq!(reader.record().comment(), b"desc");
        assert_eq!(reader.read().unwrap(), None);
    });
}

#[test]
fn lone_cr_before_eof() {
    test_reader!(b">id\nACGT\n\r", reader, {
        assert_eq!(reader.read().unwrap(), Some(4));
        assert_eq!(reader.record().seq(), b"ACGT");
        assert_eq!(reader.record().seq_buf().as_bytes_with_nul(), b"ACGT\0");
        assert_eq!(reader.read().unwrap(), None);
    });
    test_reader!(b">id\r\nAC\r\n\r\nGT\r\n\r", reader, {
        assert_eq!(reader.read().unwrap(), Some(4));
        assert_eq!(reader.record().seq(), b"ACGT");
    });
}

#[test]
fn unequal_lengths() {
    test_reader!(b"@r1\nACGT\n+\n!!!\n", reader, {
        let err = reader.read().unwrap_err();
        assert_matches!(err, Error::UnequalLengths { seq: 4, qual: 3, .. });
        let pos = err.position().unwrap();
        assert_eq!(pos.record_id(), Some("r1"));
        assert_eq!(pos.record_position(), &Position::new(0, 0));
        assert_eq!(reader.read().unwrap(), None);
    });
}

#[test]
fn overlong_quality() {
    test_reader!(b"@r1\nACGT\n+\n!!!!!\n@r2\nA\n+\n#\n", reader, {
        assert_matches!(
            reader.read(),
            Err(Error::UnequalLengths { seq: 4, qual: 5, .. })
        );
        // reading continues with the next record
        assert_eq!(reader.read().unwrap(), Some(1));
        assert_eq!(reader.record().name(), b"r2");
        assert_eq!(reader.position(), Some(&Position::new(1, 17)));
    });
}

#[test]
fn truncated_quality() {
    for input in [
        &b"@r1\nACGT\n+"[..],
        &b"@r1\nACGT\n+r1"[..],
        &b"@r1\nACGT\n+\n"[..],
    ] {
        test_reader!(input, reader, {
            let err = reader.read().unwrap_err();
            assert_matches!(err, Error::TruncatedQuality { .. });
            assert!(!err.is_stream_error());
            assert_eq!(err.position().unwrap().record_id(), Some("r1"));
            assert_eq!(reader.read().unwrap(), None);
        });
    }
}

#[test]
fn multiline_quality() {
    let input = b"@r1\nACGT\nAC\n+\n@@@@\n>>\n@r2\nA\n+\n\n#\n";
    test_reader!(input, reader, {
        let rec = reader.next().unwrap().unwrap();
        assert_eq!(rec.seq(), b"ACGTAC");
        assert_eq!(rec.qual(), b"@@@@>>");
        // an empty quality line is skipped
        let rec = reader.next().unwrap().unwrap();
        assert_eq!(rec.qual(), b"#");
        assert!(reader.next().is_none());
    });
}

#[test]
fn random_fasta() {
    let (data, expected) = random_records(1, 200, false);
    for &cap in &[1, 7, 64, 1000, 16384] {
        let mut reader = Reader::with_capacity(&data[..], cap);
        let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records, expected, "cap. {}", cap);
    }
}

#[test]
fn random_fastq() {
    let (data, expected) = &*RANDOM_FASTQ;
    for &cap in &[1, 5, 100, 4096, 16384] {
        let mut reader = Reader::with_capacity(&data[..], cap);
        let mut n = 0;
        while let Some(rec) = reader.next() {
            let rec = rec.unwrap();
            assert_eq!(rec.seq().len(), rec.qual().len());
            assert_eq!(rec.to_owned_record(), expected[n], "cap. {}", cap);
            n += 1;
        }
        assert_eq!(n, expected.len());
    }
}

#[test]
fn refill_boundary() {
    // sequence and quality span exactly one buffer
    let cap = 32;
    let seq = vec![b'A'; cap];
    let qual = vec![b'I'; cap];
    let mut input = b"@r\n".to_vec();
    input.extend(&seq);
    input.extend(b"\n+\n");
    input.extend(&qual);
    input.extend(b"\n@r2\n");
    input.extend(&seq[..cap - 3]);
    input.extend(b"\n+\n");
    input.extend(&qual[..cap - 3]);
    for c in cap - 3..cap + 4 {
        let mut reader = Reader::with_capacity(&input[..], c);
        assert_eq!(reader.read().unwrap(), Some(cap));
        assert_eq!(reader.record().seq(), &seq[..]);
        assert_eq!(reader.record().qual(), &qual[..]);
        assert_eq!(reader.read().unwrap(), Some(cap - 3));
        assert_eq!(reader.read().unwrap(), None);
    }
}

#[test]
fn rewind() {
    let (data, expected) = &*RANDOM_FASTQ;
    let mut reader = Reader::with_capacity(Cursor::new(data), 100);
    let first: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
    reader.seek_start().unwrap();
    assert!(reader.position().is_none());
    let second: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(&first, expected);
    assert_eq!(first, second);
}

#[test]
fn rewind_keeps_source_position() {
    let src = Cursor::new(&b">a\nAC\n>b\nGT\n"[..]);
    let mut reader = Reader::with_capacity(src, 4);
    assert_eq!(reader.read().unwrap(), Some(2));
    assert_eq!(reader.read().unwrap(), Some(2));
    assert_eq!(reader.read().unwrap(), None);
    // the source is still at its end
    reader.rewind();
    assert_eq!(reader.read().unwrap(), None);
    reader.seek_start().unwrap();
    assert_eq!(reader.read().unwrap(), Some(2));
    assert_eq!(reader.record().name(), b"a");
}

#[test]
fn stream_error() {
    let input = b"@r1\nACGT\n+\n!!!!\n@r2\nACGTACGT\n".to_vec();
    for chunk in 1..input.len() {
        let mut reader = Reader::new(failing_source(input.clone(), chunk));
        assert_eq!(reader.read().unwrap(), Some(4), "chunk {}", chunk);
        let err = reader.read().unwrap_err();
        assert_matches!(err, Error::Io(_));
        assert!(err.is_stream_error());
        assert_matches!(reader.read(), Err(Error::Poisoned));
    }
}

#[test]
fn records_iter_ends_after_stream_error() {
    let input = b">r1\nAC\n>r2\nGG".to_vec();
    let mut reader = Reader::new(failing_source(input, 3));
    let results: Vec<_> = reader.records().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert_matches!(results[1], Err(Error::Io(_)));
}

#[test]
fn into_records_continues_after_format_error() {
    let input = &b"@r1\nAC\n+\nIII\n@r2\nGG\n+\nII\n"[..];
    let results: Vec<_> = Reader::new(input).into_records().collect();
    assert_eq!(results.len(), 2);
    assert_matches!(results[0], Err(Error::UnequalLengths { .. }));
    assert_eq!(
        results[1].as_ref().unwrap(),
        &OwnedRecord {
            name: b"r2".to_vec(),
            comment: vec![],
            seq: b"GG".to_vec(),
            qual: Some(b"II".to_vec()),
        }
    );
}

#[test]
fn buffer_limit() {
    let mut input = b">id\n".to_vec();
    input.extend(vec![b'A'; 100]);
    let mut reader = ReaderBuilder::new()
        .seq_capacity(16)
        .policy(Limited::new(64))
        .from_source(&input[..]);
    assert_eq!(reader.policy().limit(), 64);
    assert_matches!(reader.read(), Err(Error::BufferLimit));

    let mut reader = ReaderBuilder::new()
        .capacity(8)
        .seq_capacity(16)
        .policy(Limited::new(128))
        .from_source(&input[..]);
    assert_eq!(reader.read().unwrap(), Some(100));
    assert_eq!(reader.record().seq_buf().capacity(), 128);
}

#[test]
fn records_end_after_buffer_limit() {
    // the second quality line starts with '@'
    let mut input = b"@r1\n".to_vec();
    input.extend(vec![b'A'; 100]);
    input.extend(b"\n+\n");
    input.extend(vec![b'I'; 98]);
    input.extend(b"\n@q\n@r2\nAC\n+\nII\n");

    let builder = ReaderBuilder::new()
        .seq_capacity(16)
        .policy(Limited::new(64));
    let results: Vec<_> = builder.clone().from_source(&input[..]).into_records().collect();
    assert_eq!(results.len(), 1);
    assert_matches!(results[0], Err(Error::BufferLimit));

    let mut reader = builder.from_source(&input[..]);
    let results: Vec<_> = reader.records().collect();
    assert_eq!(results.len(), 1);
    assert_matches!(results[0], Err(Error::BufferLimit));

    // without the limit, the same input is read correctly
    let names: Vec<_> = Reader::new(&input[..])
        .into_records()
        .map(|r| r.unwrap().name)
        .collect();
    assert_eq!(names, vec![b"r1".to_vec(), b"r2".to_vec()]);
}

#[test]
fn stream_access() {
    let mut reader = Reader::with_capacity(&b">a\nAC\n>b\nGT\n"[..], 4);
    assert_eq!(reader.read().unwrap(), Some(2));
    // the '>' of the next record was already consumed
    assert_eq!(reader.stream().offset(), 7);
    assert!(!reader.stream().is_eof());
    let stream = reader.into_stream();
    assert_eq!(stream.capacity(), 4);
    // two refills of 4 bytes each
    assert_eq!(stream.into_inner(), &b"\nGT\n"[..]);
}

#[test]
fn seq_capacity() {
    let mut reader = ReaderBuilder::new()
        .seq_capacity(1024)
        .from_source(&b">id\nACGT\n"[..]);
    reader.read().unwrap();
    assert_eq!(reader.record().seq_buf().capacity(), 1024);

    let mut reader = Reader::new(&b">id\nACGT\n"[..]);
    reader.read().unwrap();
    assert_eq!(reader.record().seq_buf().capacity(), 256);
}
