use crate::detect::detect_path;
use crate::error::{FastqError, FormatError};
use crate::filter::{NativeEngine, TrimEngine};
use crate::platform::MetadataDecoder;
use crate::policy::PipelineConfig;
use crate::reader::FastqReader;
use crate::reconcile::{PairReconciler, PairedOutputs, ReconcileSummary};
use crate::source::PathSource;

use std::io::Write;
use std::path::Path;

/// Where kept reads go; the variant selects single-end or paired processing.
#[derive(Debug)]
pub enum Outputs<W> {
    Single(W),
    Paired(PairedOutputs<W>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleSummary {
    pub written: u64,
    pub discarded: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSummary {
    Single(SingleSummary),
    Paired(ReconcileSummary),
}

/// Trim/filter a single-end library and write reads the platform kept.
///
/// Every read must be mate 1.
pub fn filter_single<E, D, W>(
    engine: &E,
    decoder: &D,
    reader: FastqReader<'_>,
    out: &mut W,
) -> Result<SingleSummary, FastqError>
where
    E: TrimEngine,
    D: MetadataDecoder,
    W: Write,
{
    let mut summary = SingleSummary::default();
    for rec in engine.apply(reader) {
        let (index, rec) = rec?;
        let meta = decoder
            .decode(&rec.id)
            .map_err(|e| FastqError::record_err(e, index))?;
        if meta.mate_pair != 1 {
            return Err(FastqError::record_err(
                FormatError::MateInSingleEnd {
                    mate: meta.mate_pair,
                    tag: meta.read_tag,
                },
                index,
            ));
        }
        if meta.filtered {
            summary.discarded += 1;
            continue;
        }
        rec.write_to(out).map_err(FastqError::Output)?;
        summary.written += 1;
    }
    out.flush().map_err(FastqError::Output)?;
    Ok(summary)
}

/// Detect the encoding of `input`, then filter it into `outputs`.
pub fn run<P, W>(
    config: &PipelineConfig,
    input: P,
    outputs: &mut Outputs<W>,
) -> Result<RunSummary, FastqError>
where
    P: AsRef<Path>,
    W: Write,
{
    let input = input.as_ref();
    let version = detect_path(input, &config.reader, &config.detect)?;
    let engine = NativeEngine::new(config.filter_params(version))?;
    log::info!(
        "{}: filtering with {:?}",
        input.display(),
        engine.params()
    );

    match outputs {
        Outputs::Single(out) => {
            let reader = FastqReader::from_path(input, config.reader.clone())?;
            filter_single(&engine, &version, reader, out).map(RunSummary::Single)
        }
        Outputs::Paired(out) => {
            let mut source = PathSource::new(input, config.reader.clone());
            PairReconciler::new(&engine, version)
                .reconcile(&mut source, out)
                .map(RunSummary::Paired)
        }
    }
}
