//! Inputs that can be read more than once.
//!
//! Pair reconciliation walks its input twice and relies on both walks seeing
//! the same records in the same order. Only types implementing
//! [`RewindableSource`] are accepted there; a plain [`FastqReader`] is not.

use crate::error::{FastqError, IoContext};
use crate::policy::ReaderOptions;
use crate::reader::FastqReader;

use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

pub trait RewindableSource {
    /// Start a fresh pass from the first record.
    fn open_pass(&mut self) -> Result<FastqReader<'_>, FastqError>;
}

/// Re-opens a file for every pass; handles `.gz` the same way as
/// [`FastqReader::from_path`].
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    opts: ReaderOptions,
}

impl PathSource {
    pub fn new<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            opts,
        }
    }
}

impl RewindableSource for PathSource {
    fn open_pass(&mut self) -> Result<FastqReader<'_>, FastqError> {
        FastqReader::from_path(&self.path, self.opts.clone())
    }
}

/// Seeks an uncompressed stream back to offset 0 for every pass.
#[derive(Debug)]
pub struct SeekableSource<R> {
    inner: R,
    opts: ReaderOptions,
}

impl<R: Read + Seek + Send> SeekableSource<R> {
    pub fn new(inner: R, opts: ReaderOptions) -> Self {
        Self { inner, opts }
    }
}

impl<R: Read + Seek + Send> RewindableSource for SeekableSource<R> {
    fn open_pass(&mut self) -> Result<FastqReader<'_>, FastqError> {
        self.inner.seek(SeekFrom::Start(0)).map_err(|e| {
            FastqError::io_err(
                e,
                IoContext {
                    byte_pos: 0,
                    line_num: 0,
                },
            )
        })?;
        Ok(FastqReader::from_bufread(
            BufReader::new(&mut self.inner),
            self.opts.clone(),
        ))
    }
}
