use fastq_pair_sieve::{FastqError, FastqReader, FastqRecord, FormatError, ReaderOptions, TailPolicy};
use std::io::BufReader;

const SAMPLE: &str = "\
@read1 1:N:0:1
ACGTN
-anything-
!!!!!
@read2
ACGT
+
####";

fn reader(input: &'static str, tail_policy: TailPolicy) -> FastqReader<'static> {
    FastqReader::from_bufread(BufReader::new(input.as_bytes()), ReaderOptions { tail_policy })
}

#[test]
fn parse_two_records() {
    let mut fq = reader(SAMPLE, TailPolicy::Reject);

    let r1 = fq.next().unwrap().unwrap();
    assert_eq!(r1.id, "read1 1:N:0:1");
    assert_eq!(r1.seq, b"ACGTN");
    assert_eq!(r1.qual, b"!!!!!");

    let r2 = fq.next().unwrap().unwrap();
    assert_eq!(r2.id, "read2");
    assert_eq!(r2.seq, b"ACGT");
    assert_eq!(r2.qual, b"####");

    assert!(fq.next().is_none());
}

#[test]
fn trailing_whitespace_is_stripped() {
    let input = "@r1 \t\r\nACGT  \r\n+\r\nIIII \r\n";
    let rec = reader(input, TailPolicy::Reject).next().unwrap().unwrap();
    assert_eq!(rec.id, "r1");
    assert_eq!(rec.seq, b"ACGT");
    assert_eq!(rec.qual, b"IIII");
}

#[test]
fn truncated_tail_rejected_by_default() {
    let input = "@r1\nACGT\n+\nIIII\n@r2\nACGT\n";
    let mut fq = FastqReader::from_bufread(BufReader::new(input.as_bytes()), ReaderOptions::default());
    assert!(fq.next().unwrap().is_ok());
    let err = fq.next().unwrap().unwrap_err();
    assert!(matches!(
        err,
        FastqError::Format {
            source: FormatError::UnexpectedEof,
            ..
        }
    ));
}

#[test]
fn truncated_tail_discarded_in_legacy_mode() {
    let input = "@r1\nACGT\n+\nIIII\n@r2\nACGT\n+\n";
    let ids: Vec<String> = reader(input, TailPolicy::Discard)
        .map(|r| r.unwrap().id)
        .collect();
    assert_eq!(ids, vec!["r1".to_string()]);
}

#[test]
fn missing_header_is_format_error() {
    let err = reader("r1\nACGT\n+\nIIII\n", TailPolicy::Reject)
        .next()
        .unwrap()
        .unwrap_err();
    assert!(matches!(
        err,
        FastqError::Format {
            source: FormatError::MissingHeader,
            ..
        }
    ));
}

#[test]
fn length_mismatch_is_format_error() {
    let err = reader("@r1\nACGT\n+\nIII\n", TailPolicy::Reject)
        .next()
        .unwrap()
        .unwrap_err();
    match err {
        FastqError::Format {
            source: FormatError::LengthMismatch { seq, qual },
            ctx,
        } => {
            assert_eq!((seq, qual), (4, 3));
            assert_eq!(ctx.line_num, 4);
        }
        other => panic!("expected length mismatch, got {other:?}"),
    }
}

#[test]
fn empty_id_is_format_error() {
    let err = reader("@\nACGT\n+\nIIII\n", TailPolicy::Reject)
        .next()
        .unwrap()
        .unwrap_err();
    assert!(err.is_format());
}

#[test]
fn write_normalizes_separator() {
    let input = "@r1 1:N:0:1\nACGT\n+r1 1:N:0:1\nIIII\n";
    let rec = reader(input, TailPolicy::Reject).next().unwrap().unwrap();
    let mut out = Vec::new();
    rec.write_to(&mut out).unwrap();
    assert_eq!(out, b"@r1 1:N:0:1\nACGT\n+\nIIII\n");
}

#[test]
fn trim_end_shortens_both_lines() {
    let rec = FastqRecord {
        id: "r".into(),
        seq: b"ACGTAC".to_vec(),
        qual: b"IIII##".to_vec(),
    };
    let rec = rec.trim_end(2);
    assert_eq!(rec.seq, b"ACGT");
    assert_eq!(rec.qual, b"IIII");
    assert_eq!(rec.trim_end(10).len(), 0);
}

fn byte_reader(input: &'static [u8]) -> FastqReader<'static> {
    FastqReader::from_bufread(BufReader::new(input), ReaderOptions::default())
}

#[test]
fn non_utf8_id_is_format_error() {
    let err = byte_reader(b"@a\xff\nACGT\n+\nIIII\n")
        .next()
        .unwrap()
        .unwrap_err();
    match err {
        FastqError::Format {
            source: FormatError::InvalidUtf8Id,
            ctx,
        } => assert_eq!(ctx.line_num, 1),
        other => panic!("expected invalid id, got {other:?}"),
    }
}

#[test]
fn sequence_and_quality_are_raw_bytes() {
    let rec = byte_reader(b"@a\nAC\n+\n\xfe\xff\n").next().unwrap().unwrap();
    assert_eq!(rec.seq, b"AC");
    assert_eq!(rec.qual, [0xfe_u8, 0xff]);
}

#[test]
fn non_utf8_sequence_reports_format_error_once() {
    let mut fq = byte_reader(b"@a\nAC\xff\n+\nII\n@b\nAC\n+\nII\n");
    let err = fq.next().unwrap().unwrap_err();
    match err {
        FastqError::Format {
            source: FormatError::LengthMismatch { seq, qual },
            ctx,
        } => {
            assert_eq!((seq, qual), (3, 2));
            assert_eq!(ctx.line_num, 4);
        }
        other => panic!("expected length mismatch, got {other:?}"),
    }
    assert!(fq.next().is_none());
    assert!(fq.next().is_none());
}

#[test]
fn reader_stops_after_first_error() {
    let mut fq = reader("@a\nACGT\n+\nIIII\nbad\nACGT\n+\nIIII\n@c\nACGT\n+\nIIII\n", TailPolicy::Reject);
    assert!(fq.next().unwrap().is_ok());
    assert!(fq.next().unwrap().is_err());
    assert!(fq.next().is_none());
}
