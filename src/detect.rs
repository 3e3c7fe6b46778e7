use crate::error::{FastqError, FormatError};
use crate::platform::PlatformVersion;
use crate::policy::{DetectOptions, ReaderOptions};
use crate::reader::FastqReader;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Classify up to `sample_size` leading records; all must agree.
pub fn detect_version(
    reader: FastqReader<'_>,
    sample_size: usize,
) -> Result<PlatformVersion, FastqError> {
    let mut seen = BTreeSet::new();

    for (index, rec) in reader.take(sample_size).enumerate() {
        let rec = rec?;
        let version = PlatformVersion::classify(&rec.id)
            .map_err(|e| FastqError::record_err(e, index as u64))?;
        seen.insert(version);
    }

    let mut found = seen.into_iter();
    match (found.next(), found.next()) {
        (Some(version), None) => Ok(version),
        (None, _) => Err(FastqError::Encoding(FormatError::EmptySample)),
        (Some(first), Some(second)) => {
            let mut all = vec![first, second];
            all.extend(found);
            Err(FastqError::Encoding(FormatError::MixedEncodings { found: all }))
        }
    }
}

pub fn detect_path<P: AsRef<Path>>(
    path: P,
    reader_opts: &ReaderOptions,
    detect_opts: &DetectOptions,
) -> Result<PlatformVersion, FastqError> {
    let path = path.as_ref();
    let reader = FastqReader::from_path(path, reader_opts.clone())?;
    let version = detect_version(reader, detect_opts.sample_size)?;
    log::info!("{}: detected {version}", path.display());
    Ok(version)
}

/// Detect each file independently and require a single shared encoding.
pub fn validate_reads<P: AsRef<Path>>(
    paths: &[P],
    reader_opts: &ReaderOptions,
    detect_opts: &DetectOptions,
) -> Result<PlatformVersion, FastqError> {
    let versions = paths
        .iter()
        .map(|p| detect_path(p, reader_opts, detect_opts))
        .collect::<Result<Vec<_>, _>>()?;

    let distinct: BTreeSet<_> = versions.iter().copied().collect();
    if distinct.len() != 1 {
        return Err(FastqError::Encoding(FormatError::FileEncodingMismatch {
            found: versions,
        }));
    }
    Ok(versions[0])
}

/// Most common sequence length among the first `sample_size` records.
///
/// Ties go to the shorter length. `None` when the input has no records.
pub fn infer_read_length(
    reader: FastqReader<'_>,
    sample_size: usize,
) -> Result<Option<usize>, FastqError> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for rec in reader.take(sample_size) {
        *counts.entry(rec?.len()).or_default() += 1;
    }

    // BTreeMap iterates ascending, so keep the first maximum seen
    let mut best: Option<(usize, usize)> = None;
    for (len, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((len, n));
        }
    }
    Ok(best.map(|(len, _)| len))
}
