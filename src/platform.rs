//! Illumina header conventions and the metadata they carry.
//!
//! - **1.4** (`V14`): one token, eight `:`-separated fields, e.g.
//!   `HWI-ST1:8:FC1:4:5:6:1:1`. Field 6 is the mate, field 7 is
//!   `1` (keep) or `0` (discard).
//! - **1.8+** (`V18`): two tokens, the second with four fields, e.g.
//!   `M00123:45:AAAA:1:1101:15000:1500 1:N:0:1`. Field 0 of the second
//!   token is the mate, field 1 is `Y` (discard) or `N` (keep).

use crate::error::FormatError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlatformVersion {
    V14,
    V18,
}

impl PlatformVersion {
    /// ASCII offset of Phred scores in the quality line.
    pub const fn quality_offset(self) -> u8 {
        match self {
            PlatformVersion::V14 => 64,
            PlatformVersion::V18 => 33,
        }
    }

    /// Decide which convention a single read id follows.
    pub fn classify(id: &str) -> Result<Self, FormatError> {
        let tokens: Vec<&str> = id.split_whitespace().collect();
        match tokens.as_slice() {
            [only] if only.split(':').count() == 8 => Ok(PlatformVersion::V14),
            [_, meta] if meta.split(':').count() == 4 => Ok(PlatformVersion::V18),
            _ => Err(FormatError::UndetectableEncoding { id: id.to_string() }),
        }
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformVersion::V14 => f.write_str("Illumina 1.4"),
            PlatformVersion::V18 => f.write_str("Illumina 1.8+"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMetadata {
    pub mate_pair: u32,
    /// `true` means the platform marked the read for discarding.
    pub filtered: bool,
    /// Read identity without mate/filter information; the pairing key.
    pub read_tag: String,
}

pub trait MetadataDecoder {
    fn decode(&self, id: &str) -> Result<ReadMetadata, FormatError>;
}

impl MetadataDecoder for PlatformVersion {
    fn decode(&self, id: &str) -> Result<ReadMetadata, FormatError> {
        match self {
            PlatformVersion::V14 => decode_v14(id),
            PlatformVersion::V18 => decode_v18(id),
        }
    }
}

fn parse_mate(field: &str) -> Result<u32, FormatError> {
    field.parse().map_err(|_| FormatError::InvalidMate {
        value: field.to_string(),
    })
}

fn decode_v14(id: &str) -> Result<ReadMetadata, FormatError> {
    let fields: Vec<&str> = id.split(':').collect();
    if fields.len() < 8 {
        return Err(FormatError::InvalidMetadata {
            version: PlatformVersion::V14,
            id: id.to_string(),
            reason: "expected at least 8 ':'-separated fields",
        });
    }

    let mate_pair = parse_mate(fields[6])?;
    // the header says 1 = keep, 0 = discard
    let filtered = match fields[7] {
        "1" => false,
        "0" => true,
        other => {
            return Err(FormatError::InvalidFilterFlag {
                version: PlatformVersion::V14,
                value: other.to_string(),
                expected: "1/0",
            });
        }
    };

    Ok(ReadMetadata {
        mate_pair,
        filtered,
        read_tag: fields[..6].join(":"),
    })
}

fn decode_v18(id: &str) -> Result<ReadMetadata, FormatError> {
    let invalid = |reason| FormatError::InvalidMetadata {
        version: PlatformVersion::V18,
        id: id.to_string(),
        reason,
    };

    let tokens: Vec<&str> = id.split_whitespace().collect();
    let [name, meta] = tokens.as_slice() else {
        return Err(invalid("expected exactly 2 whitespace-separated tokens"));
    };
    let fields: Vec<&str> = meta.split(':').collect();
    if fields.len() != 4 {
        return Err(invalid("expected exactly 4 ':'-separated fields after the space"));
    }

    let mate_pair = parse_mate(fields[0])?;
    let filtered = match fields[1] {
        "Y" => true,
        "N" => false,
        other => {
            return Err(FormatError::InvalidFilterFlag {
                version: PlatformVersion::V18,
                value: other.to_string(),
                expected: "Y/N",
            });
        }
    };

    Ok(ReadMetadata {
        mate_pair,
        filtered,
        read_tag: (*name).to_string(),
    })
}
