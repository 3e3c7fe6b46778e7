//! Quality-based read filtering and trailing trim.
//!
//! A read is dropped when too few of its bases reach `min_quality`, or when
//! it is shorter than `min_length` after its low-quality tail is removed.

use crate::error::FastqError;
use crate::policy::FilterParams;
use crate::reader::FastqReader;
use crate::record::FastqRecord;

/// Kept records, each paired with its zero-based position in the unfiltered input.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<(u64, FastqRecord), FastqError>> + 'a>;

#[inline]
fn score(q: u8, offset: u8) -> i32 {
    i32::from(q) - i32::from(offset)
}

/// Phred scores of a quality line.
pub fn phred_scores(qual: &[u8], offset: u8) -> impl Iterator<Item = i32> + '_ {
    qual.iter().map(move |&q| score(q, offset))
}

/// Whether at least `min_fraction_percent` of the bases pass.
///
/// Compared in integers so both reconciliation passes agree exactly. An empty
/// read only passes a 0% threshold.
pub fn meets_fraction(qual: &[u8], params: &FilterParams) -> bool {
    let total = qual.len();
    let pct = usize::from(params.min_fraction_percent);
    if total == 0 {
        return pct == 0;
    }
    let passing = phred_scores(qual, params.quality_offset)
        .filter(|&s| s >= params.min_quality)
        .count();
    passing * 100 >= pct * total
}

/// Number of consecutive failing bases at the 3' end. Zero when the last base passes.
pub fn trailing_trim_count(qual: &[u8], params: &FilterParams) -> usize {
    qual.iter()
        .rev()
        .take_while(|&&q| score(q, params.quality_offset) < params.min_quality)
        .count()
}

/// Apply the filter to one read; `None` means dropped.
pub fn trim_and_filter(rec: FastqRecord, params: &FilterParams) -> Option<FastqRecord> {
    if !meets_fraction(&rec.qual, params) {
        return None;
    }
    let trim = trailing_trim_count(&rec.qual, params);
    let rec = rec.trim_end(trim);
    (rec.len() >= params.min_length).then_some(rec)
}

/// Streaming adapter applying [`trim_and_filter`] to every record.
pub struct QualityFilter<I> {
    inner: I,
    params: FilterParams,
    seen: u64,
    kept: u64,
    done: bool,
}

impl<I> QualityFilter<I>
where
    I: Iterator<Item = Result<FastqRecord, FastqError>>,
{
    pub fn new(inner: I, params: FilterParams) -> Self {
        Self {
            inner,
            params,
            seen: 0,
            kept: 0,
            done: false,
        }
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn kept(&self) -> u64 {
        self.kept
    }

    /// Input position of the most recently yielded record.
    pub fn last_index(&self) -> Option<u64> {
        self.seen.checked_sub(1)
    }
}

impl<I> Iterator for QualityFilter<I>
where
    I: Iterator<Item = Result<FastqRecord, FastqError>>,
{
    type Item = Result<FastqRecord, FastqError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let rec = match self.inner.next() {
                Some(Ok(rec)) => rec,
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    log::debug!(
                        "quality filter kept {} of {} reads",
                        self.kept,
                        self.seen
                    );
                    return None;
                }
            };
            self.seen += 1;
            if let Some(rec) = trim_and_filter(rec, &self.params) {
                self.kept += 1;
                return Some(Ok(rec));
            }
        }
    }
}

/// A trim/filter implementation. Alternate engines must reproduce
/// [`NativeEngine`] output, input positions included, for the same [`FilterParams`].
pub trait TrimEngine {
    fn params(&self) -> &FilterParams;

    fn apply<'a>(&self, records: FastqReader<'a>) -> RecordIter<'a>;
}

#[derive(Debug, Clone)]
pub struct NativeEngine {
    params: FilterParams,
}

impl NativeEngine {
    pub fn new(params: FilterParams) -> Result<Self, FastqError> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl TrimEngine for NativeEngine {
    fn params(&self) -> &FilterParams {
        &self.params
    }

    fn apply<'a>(&self, records: FastqReader<'a>) -> RecordIter<'a> {
        let mut filter = QualityFilter::new(records, self.params.clone());
        Box::new(std::iter::from_fn(move || {
            let item = filter.next()?;
            let index = filter.last_index().unwrap_or(0);
            Some(item.map(|rec| (index, rec)))
        }))
    }
}
