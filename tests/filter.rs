use fastq_pair_sieve::filter::{meets_fraction, phred_scores, trailing_trim_count};
use fastq_pair_sieve::{
    FastqError, FastqReader, FastqRecord, FilterParams, NativeEngine, QualityFilter,
    ReaderOptions, TrimEngine, trim_and_filter,
};
use std::io::BufReader;

// offset 33: 'I' = 40, '5' = 20, '4' = 19, '#' = 2
fn params(min_length: usize) -> FilterParams {
    FilterParams {
        quality_offset: 33,
        min_quality: 20,
        min_fraction_percent: 50,
        min_length,
    }
}

fn rec(seq: &str, qual: &str) -> FastqRecord {
    FastqRecord {
        id: "r".into(),
        seq: seq.as_bytes().to_vec(),
        qual: qual.as_bytes().to_vec(),
    }
}

#[test]
fn scores_subtract_offset() {
    let scores: Vec<i32> = phred_scores(b"I5#!", 33).collect();
    assert_eq!(scores, vec![40, 20, 2, 0]);
    let scores: Vec<i32> = phred_scores(b"h@;", 64).collect();
    assert_eq!(scores, vec![40, 0, -5]);
}

#[test]
fn passing_last_base_means_no_trim() {
    let p = params(0);
    assert_eq!(trailing_trim_count(b"###I", &p), 0);
    assert_eq!(trailing_trim_count(b"III5", &p), 0);
    let out = trim_and_filter(rec("ACGT", "I##5"), &p).unwrap();
    assert_eq!(out.seq, b"ACGT");
}

#[test]
fn trims_only_the_failing_tail() {
    let p = params(0);
    assert_eq!(trailing_trim_count(b"II#I4#", &p), 2);
    let out = trim_and_filter(rec("ACGTAC", "II#I4#"), &p).unwrap();
    assert_eq!(out.seq, b"ACGT");
    assert_eq!(out.qual, b"II#I");
}

#[test]
fn all_failing_trims_everything() {
    let p = FilterParams {
        min_fraction_percent: 0,
        ..params(0)
    };
    assert_eq!(trailing_trim_count(b"####", &p), 4);
    let out = trim_and_filter(rec("ACGT", "####"), &p).unwrap();
    assert!(out.is_empty());
}

#[test]
fn fraction_threshold_is_inclusive() {
    let p = params(0);
    // exactly half passes
    assert!(meets_fraction(b"II##", &p));
    assert!(!meets_fraction(b"I###", &p));
    assert!(trim_and_filter(rec("ACGT", "I###"), &p).is_none());
    assert!(!meets_fraction(b"", &p));
    assert!(meets_fraction(
        b"",
        &FilterParams {
            min_fraction_percent: 0,
            ..p
        }
    ));
}

#[test]
fn short_after_trim_is_dropped() {
    let p = params(4);
    assert!(trim_and_filter(rec("ACGTAC", "IIII##"), &p).is_some());
    assert!(trim_and_filter(rec("ACGTAC", "III###"), &params(4)).is_none());
    // already short, nothing to trim
    assert!(trim_and_filter(rec("ACG", "III"), &p).is_none());
}

#[test]
fn stream_keeps_order_and_counts() {
    let input = "\
@a\nACGTAC\n+\nIIII##\n\
@b\nACGTAC\n+\n######\n\
@c\nACGTAC\n+\nIIIIII\n";
    let fq = FastqReader::from_bufread(BufReader::new(input.as_bytes()), ReaderOptions::default());
    let mut filter = QualityFilter::new(fq, params(4));
    let ids: Vec<String> = filter.by_ref().map(|r| r.unwrap().id).collect();
    assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(filter.seen(), 3);
    assert_eq!(filter.kept(), 2);
}

#[test]
fn stream_stops_at_first_error() {
    let input = "@a\nACGT\n+\nIIII\nbad\nACGT\n+\nIIII\n@c\nACGT\n+\nIIII\n";
    let fq = FastqReader::from_bufread(BufReader::new(input.as_bytes()), ReaderOptions::default());
    let engine = NativeEngine::new(params(1)).unwrap();
    let results: Vec<_> = engine.apply(fq).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[test]
fn engine_rejects_fraction_above_100() {
    let err = NativeEngine::new(FilterParams {
        min_fraction_percent: 101,
        ..params(0)
    })
    .unwrap_err();
    assert!(matches!(err, FastqError::InvalidParameter { .. }));
}
