//! Two-pass reconciliation of a paired library into left, right and orphan outputs.
//!
//! Pass 1 collects the read tags of kept mate-1 and mate-2 reads. Tags present
//! on both sides are pairs; tags on only one side are orphans. Pass 2 re-reads
//! the same filtered input, rewrites each id to its bare tag and routes it.
//! Pairs must come out in the same order on both sides; this is checked, never
//! repaired.

use crate::error::{FastqError, FormatError, SortOrderError};
use crate::filter::TrimEngine;
use crate::platform::{MetadataDecoder, ReadMetadata};
use crate::record::FastqRecord;
use crate::source::RewindableSource;

use std::collections::HashSet;
use std::io::Write;

#[derive(Debug)]
pub struct PairedOutputs<W> {
    pub left: W,
    pub right: W,
    pub orphans: W,
}

impl<W> PairedOutputs<W> {
    pub fn new(left: W, right: W, orphans: W) -> Self {
        Self {
            left,
            right,
            orphans,
        }
    }
}

impl<W: Write> PairedOutputs<W> {
    fn flush(&mut self) -> Result<(), FastqError> {
        self.left.flush().map_err(FastqError::Output)?;
        self.right.flush().map_err(FastqError::Output)?;
        self.orphans.flush().map_err(FastqError::Output)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub left: u64,
    pub right: u64,
    pub orphans: u64,
    /// Reads the platform flagged for discarding.
    pub discarded: u64,
}

#[derive(Debug, Default)]
struct ReconciliationSets {
    paired: HashSet<String>,
    orphans: HashSet<String>,
}

enum Side {
    Left,
    Right,
}

fn side_of(meta: &ReadMetadata, index: u64) -> Result<Side, FastqError> {
    match meta.mate_pair {
        1 => Ok(Side::Left),
        2 => Ok(Side::Right),
        mate => Err(FastqError::record_err(
            FormatError::MateOutOfRange {
                mate,
                tag: meta.read_tag.clone(),
            },
            index,
        )),
    }
}

pub struct PairReconciler<'e, E, D> {
    engine: &'e E,
    decoder: D,
}

impl<'e, E: TrimEngine, D: MetadataDecoder> PairReconciler<'e, E, D> {
    pub fn new(engine: &'e E, decoder: D) -> Self {
        Self { engine, decoder }
    }

    pub fn reconcile<S, W>(
        &self,
        source: &mut S,
        out: &mut PairedOutputs<W>,
    ) -> Result<ReconcileSummary, FastqError>
    where
        S: RewindableSource,
        W: Write,
    {
        let sets = self.classify(source)?;
        log::info!(
            "pass 1: {} paired tags, {} orphan tags",
            sets.paired.len(),
            sets.orphans.len()
        );

        let summary = self.route(source, &sets, out)?;
        log::info!(
            "pass 2: wrote {} left, {} right, {} orphan reads ({} discarded)",
            summary.left,
            summary.right,
            summary.orphans,
            summary.discarded
        );
        Ok(summary)
    }

    /// Decode each filtered record of one pass; `filtered` reads are counted and skipped.
    fn for_each_kept<S, F>(&self, source: &mut S, mut f: F) -> Result<u64, FastqError>
    where
        S: RewindableSource,
        F: FnMut(u64, FastqRecord, ReadMetadata) -> Result<(), FastqError>,
    {
        let mut discarded = 0;
        let records = self.engine.apply(source.open_pass()?);
        for rec in records {
            let (index, rec) = rec?;
            let meta = self
                .decoder
                .decode(&rec.id)
                .map_err(|e| FastqError::record_err(e, index))?;
            if meta.filtered {
                discarded += 1;
                continue;
            }
            f(index, rec, meta)?;
        }
        Ok(discarded)
    }

    fn classify<S: RewindableSource>(&self, source: &mut S) -> Result<ReconciliationSets, FastqError> {
        let mut left = HashSet::new();
        let mut right = HashSet::new();

        self.for_each_kept(source, |index, _rec, meta| {
            match side_of(&meta, index)? {
                Side::Left => left.insert(meta.read_tag),
                Side::Right => right.insert(meta.read_tag),
            };
            Ok(())
        })?;

        let paired = left.intersection(&right).cloned().collect();
        let orphans = left.symmetric_difference(&right).cloned().collect();
        Ok(ReconciliationSets { paired, orphans })
    }

    fn route<S, W>(
        &self,
        source: &mut S,
        sets: &ReconciliationSets,
        out: &mut PairedOutputs<W>,
    ) -> Result<ReconcileSummary, FastqError>
    where
        S: RewindableSource,
        W: Write,
    {
        let mut summary = ReconcileSummary::default();
        let mut left_order = Vec::new();
        let mut right_order = Vec::new();

        let discarded = self.for_each_kept(source, |index, rec, meta| {
            let tag = meta.read_tag.clone();
            let rec = rec.with_id(tag.clone());
            if sets.paired.contains(&tag) {
                match side_of(&meta, index)? {
                    Side::Left => {
                        rec.write_to(&mut out.left).map_err(FastqError::Output)?;
                        left_order.push(tag);
                        summary.left += 1;
                    }
                    Side::Right => {
                        rec.write_to(&mut out.right).map_err(FastqError::Output)?;
                        right_order.push(tag);
                        summary.right += 1;
                    }
                }
            } else if sets.orphans.contains(&tag) {
                rec.write_to(&mut out.orphans).map_err(FastqError::Output)?;
                summary.orphans += 1;
            }
            Ok(())
        })?;
        summary.discarded = discarded;

        out.flush()?;
        verify_order(&left_order, &right_order)?;
        Ok(summary)
    }
}

/// Compare left and right tag sequences position by position.
pub fn verify_order(left: &[String], right: &[String]) -> Result<(), SortOrderError> {
    match left
        .iter()
        .zip(right)
        .enumerate()
        .find(|(_, (l, r))| l != r)
    {
        Some((index, (l, r))) => Err(SortOrderError {
            index,
            left: l.clone(),
            right: r.clone(),
        }),
        None => Ok(()),
    }
}
