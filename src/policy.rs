use crate::error::FastqError;
use crate::platform::PlatformVersion;

/// Records sampled for encoding detection and read-length inference.
pub const DEFAULT_SAMPLE_SIZE: usize = 10_000;

/// What to do when input ends inside a 4-line record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailPolicy {
    /// Fail with `FormatError::UnexpectedEof` (strict).
    Reject,
    /// Drop the partial record with a warning (legacy behavior).
    Discard,
}

#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub tail_policy: TailPolicy,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            tail_policy: TailPolicy::Reject,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectOptions {
    pub sample_size: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// Parameters of the quality trim/filter step. Held fixed for a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    /// Subtracted from each quality byte to get the Phred score (64 or 33).
    pub quality_offset: u8,
    /// Phred score a base needs to count as passing.
    pub min_quality: i32,
    /// Minimum percentage (0-100) of passing bases to keep a read.
    pub min_fraction_percent: u8,
    /// Minimum read length after trailing trim.
    pub min_length: usize,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            quality_offset: PlatformVersion::V18.quality_offset(),
            min_quality: 20,
            min_fraction_percent: 50,
            min_length: 30,
        }
    }
}

impl FilterParams {
    pub fn validate(&self) -> Result<(), FastqError> {
        if self.min_fraction_percent > 100 {
            return Err(FastqError::InvalidParameter {
                name: "min_fraction_percent",
                reason: format!("{} is above 100", self.min_fraction_percent),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityOffset {
    /// Take the offset of the detected platform version.
    Auto,
    Fixed(u8),
}

impl QualityOffset {
    pub fn resolve(self, version: PlatformVersion) -> u8 {
        match self {
            QualityOffset::Auto => version.quality_offset(),
            QualityOffset::Fixed(offset) => offset,
        }
    }
}

/// Everything a run needs, as plain values.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub reader: ReaderOptions,
    pub detect: DetectOptions,
    pub quality_offset: QualityOffset,
    pub min_quality: i32,
    pub min_fraction_percent: u8,
    pub min_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let filter = FilterParams::default();
        Self {
            reader: ReaderOptions::default(),
            detect: DetectOptions::default(),
            quality_offset: QualityOffset::Auto,
            min_quality: filter.min_quality,
            min_fraction_percent: filter.min_fraction_percent,
            min_length: filter.min_length,
        }
    }
}

impl PipelineConfig {
    pub fn filter_params(&self, version: PlatformVersion) -> FilterParams {
        FilterParams {
            quality_offset: self.quality_offset.resolve(version),
            min_quality: self.min_quality,
            min_fraction_percent: self.min_fraction_percent,
            min_length: self.min_length,
        }
    }
}
