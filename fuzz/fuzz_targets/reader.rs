#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
#[macro_use]
extern crate matches;

use seq_stream::{Error, Reader, Record};

/// Reads all records with different buffer sizes. The results must not
/// depend on where the buffer is refilled.
fn evaluate(data: &[u8]) {
    let mut expected: Option<Vec<Result<_, String>>> = None;
    for cap in [1, 3, 16, 16384] {
        let mut reader = Reader::with_capacity(data, cap);
        let mut results = vec![];
        loop {
            match reader.read() {
                Ok(Some(len)) => {
                    let rec = reader.record();
                    assert_eq!(len, rec.seq().len());
                    if rec.has_quality() {
                        assert_eq!(rec.seq().len(), rec.qual().len());
                    }
                    results.push(Ok(rec.to_owned_record()));
                }
                Ok(None) => break,
                Err(e) => {
                    assert!(matches!(
                        e,
                        Error::TruncatedQuality { .. } | Error::UnequalLengths { .. }
                    ));
                    results.push(Err(e.to_string()));
                }
            }
        }
        match expected.as_ref() {
            Some(exp) => assert_eq!(exp, &results, "cap. {}", cap),
            None => expected = Some(results),
        }
    }
}

fuzz_target!(|data: &[u8]| {
    evaluate(data);
});
