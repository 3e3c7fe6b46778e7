#![cfg(feature = "async")]

use crate::error::{FastqError, FormatError, IoContext};
use crate::policy::{ReaderOptions, TailPolicy};
use crate::record::FastqRecord;
use crate::util::{has_gz_extension, trim_line_end};

use async_compression::tokio::bufread::GzipDecoder;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};

/// Async FASTQ reader (plain/.gz), single pass.
///
/// Decodes records exactly like [`crate::FastqReader`], including stopping
/// after the first error.
pub struct AsyncFastqReader {
    rdr: BufReader<Box<dyn AsyncBufRead + Unpin + Send>>,
    opts: ReaderOptions,
    line_num: u64,
    byte_pos: u64,
    done: bool,
}

impl AsyncFastqReader {
    /// Open async from path; `.gz` auto-detect by extension or magic bytes.
    pub async fn from_path<P: AsRef<Path>>(
        path: P,
        opts: ReaderOptions,
    ) -> Result<Self, FastqError> {
        let path = path.as_ref();
        let mut f = File::open(path).await.map_err(|e| {
            FastqError::io_err(
                e,
                IoContext {
                    byte_pos: 0,
                    line_num: 0,
                },
            )
        })?;

        let is_gz =
            has_gz_extension(path) || looks_like_gzip_async(&mut f).await.unwrap_or(false);

        let inner: Box<dyn AsyncBufRead + Unpin + Send> = if is_gz {
            let gz = GzipDecoder::new(BufReader::with_capacity(256 * 1024, f));
            Box::new(BufReader::with_capacity(256 * 1024, gz))
        } else {
            Box::new(BufReader::with_capacity(256 * 1024, f))
        };

        Ok(Self::with_reader(inner, opts))
    }

    /// Wrap any async `AsyncBufRead`.
    pub fn from_async_bufread<R>(reader: R, opts: ReaderOptions) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        Self::with_reader(Box::new(reader), opts)
    }

    fn with_reader(inner: Box<dyn AsyncBufRead + Unpin + Send>, opts: ReaderOptions) -> Self {
        Self {
            rdr: BufReader::with_capacity(256 * 1024, inner),
            opts,
            line_num: 0,
            byte_pos: 0,
            done: false,
        }
    }

    /// Fetch next record (async).
    pub async fn next_record(&mut self) -> Option<Result<FastqRecord, FastqError>> {
        if self.done {
            return None;
        }
        let res = self.read_one().await.transpose();
        if !matches!(res, Some(Ok(_))) {
            self.done = true;
        }
        res
    }

    async fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_until(b'\n', buf).await?;
        if n > 0 {
            self.line_num += 1;
            self.byte_pos += n as u64;
            trim_line_end(buf);
        }
        Ok(n)
    }

    async fn read_body_line(&mut self, buf: &mut Vec<u8>) -> Result<Option<()>, FastqError> {
        let n = self
            .read_line(buf)
            .await
            .map_err(|e| FastqError::io_err(e, self.ctx()))?;
        if n > 0 {
            return Ok(Some(()));
        }
        match self.opts.tail_policy {
            TailPolicy::Reject => Err(FastqError::fmt_err(FormatError::UnexpectedEof, self.ctx())),
            TailPolicy::Discard => {
                log::warn!("discarding truncated record at {:?}", self.ctx());
                Ok(None)
            }
        }
    }

    async fn read_one(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        let mut header = Vec::with_capacity(128);
        loop {
            let n = self
                .read_line(&mut header)
                .await
                .map_err(|e| FastqError::io_err(e, self.ctx()))?;
            if n == 0 {
                return Ok(None);
            }
            if !header.is_empty() {
                break;
            }
        }

        let Some(id) = header.strip_prefix(b"@") else {
            return Err(FastqError::fmt_err(FormatError::MissingHeader, self.ctx()));
        };
        if id.is_empty() {
            return Err(FastqError::fmt_err(FormatError::EmptyId, self.ctx()));
        }
        let id = String::from_utf8(id.to_vec())
            .map_err(|_| FastqError::fmt_err(FormatError::InvalidUtf8Id, self.ctx()))?;

        let mut seq = Vec::with_capacity(256);
        if self.read_body_line(&mut seq).await?.is_none() {
            return Ok(None);
        }

        // separator, content ignored
        let mut line = Vec::with_capacity(256);
        if self.read_body_line(&mut line).await?.is_none() {
            return Ok(None);
        }

        if self.read_body_line(&mut line).await?.is_none() {
            return Ok(None);
        }
        let qual = line;

        if qual.len() != seq.len() {
            return Err(FastqError::fmt_err(
                FormatError::LengthMismatch {
                    seq: seq.len(),
                    qual: qual.len(),
                },
                self.ctx(),
            ));
        }

        Ok(Some(FastqRecord { id, seq, qual }))
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

async fn looks_like_gzip_async(f: &mut File) -> io::Result<bool> {
    let pos = f.stream_position().await?;
    let mut magic = [0u8; 2];
    let n = f.read(&mut magic).await?;
    f.seek(SeekFrom::Start(pos)).await?;
    Ok(n >= 2 && magic == [0x1F, 0x8B])
}
