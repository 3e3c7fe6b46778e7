//! Quality trimming and paired-read reconciliation for Illumina FASTQ.
//!
//! - Strict 4-line record decoding, plain and `.gz` (auto-detect).
//! - Header convention detection (Illumina 1.4 vs 1.8+) from a bounded sample.
//! - Quality filter (fraction of passing bases) plus trailing low-quality trim.
//! - Two-pass reconciliation of a paired library into left, right and orphan
//!   outputs, with a read-order check across mates.
//! - Optional `mmap` for plain files; `zlib` feature for system-zlib parity.
//! - Optional async reader behind `async` feature.

pub mod detect;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod platform;
pub mod policy;
pub mod reader;
pub mod reconcile;
pub mod record;
pub mod source;
mod util;

#[cfg(feature = "async")]
pub mod async_reader;

pub use crate::detect::{detect_path, detect_version, infer_read_length, validate_reads};
pub use crate::error::{FastqError, FormatError, IoContext, SortOrderError};
pub use crate::filter::{NativeEngine, QualityFilter, TrimEngine, trim_and_filter};
pub use crate::pipeline::{Outputs, RunSummary, SingleSummary, filter_single, run};
pub use crate::platform::{MetadataDecoder, PlatformVersion, ReadMetadata};
pub use crate::policy::{
    DEFAULT_SAMPLE_SIZE, DetectOptions, FilterParams, PipelineConfig, QualityOffset,
    ReaderOptions, TailPolicy,
};
pub use crate::reader::FastqReader;
pub use crate::reconcile::{PairReconciler, PairedOutputs, ReconcileSummary, verify_order};
pub use crate::record::FastqRecord;
pub use crate::source::{PathSource, RewindableSource, SeekableSource};

#[cfg(feature = "async")]
pub use crate::async_reader::AsyncFastqReader;
