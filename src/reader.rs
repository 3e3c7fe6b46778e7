use crate::error::{FastqError, FormatError, IoContext};
use crate::policy::{ReaderOptions, TailPolicy};
use crate::record::FastqRecord;
use crate::util::{has_gz_extension, looks_like_gzip, open_file, trim_line_end};

#[cfg(feature = "gzip")]
use flate2::read::MultiGzDecoder;
#[cfg(feature = "mmap")]
use std::io::Cursor;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Sync FASTQ reader (plain/.gz), streaming 4-line records.
///
/// Each record is `@id`, sequence, a separator line whose content is ignored,
/// and quality. Trailing whitespace is stripped from every line. The reader
/// stops after the first error it yields.
pub struct FastqReader<'a> {
    rdr: Box<dyn BufRead + Send + 'a>,
    opts: ReaderOptions,
    line_num: u64,
    byte_pos: u64,
    done: bool,
}

impl FastqReader<'static> {
    /// Open from a file path. Auto-detect `.gz` by extension or magic bytes.
    pub fn from_path<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Result<Self, FastqError> {
        let path = path.as_ref();
        let start = IoContext {
            byte_pos: 0,
            line_num: 0,
        };
        let f = open_file(path).map_err(|e| FastqError::io_err(e, start))?;

        let is_gz = has_gz_extension(path) || looks_like_gzip(&f).unwrap_or(false);

        let rdr: Box<dyn BufRead + Send> = if is_gz {
            #[cfg(feature = "gzip")]
            {
                let dec = MultiGzDecoder::new(f);
                Box::new(BufReader::with_capacity(256 * 1024, dec))
            }
            #[cfg(not(feature = "gzip"))]
            {
                return Err(FastqError::fmt_err(FormatError::GzipDisabled, start));
            }
        } else {
            #[cfg(feature = "mmap")]
            {
                use memmap2::Mmap;
                // Own the Mmap inside Cursor to avoid self-ref problems
                let mmap = unsafe { Mmap::map(&f) }.map_err(|e| FastqError::io_err(e, start))?;
                Box::new(BufReader::with_capacity(512 * 1024, Cursor::new(mmap)))
            }
            #[cfg(not(feature = "mmap"))]
            {
                Box::new(BufReader::with_capacity(256 * 1024, f))
            }
        };

        log::debug!("opened {} (gzip: {is_gz})", path.display());

        Ok(Self::with_reader(rdr, opts))
    }
}

impl<'a> FastqReader<'a> {
    /// Wrap an arbitrary `BufRead` (stdin, a borrowed file, etc.).
    pub fn from_bufread<R: BufRead + Send + 'a>(reader: R, opts: ReaderOptions) -> Self {
        Self::with_reader(Box::new(reader), opts)
    }

    fn with_reader(rdr: Box<dyn BufRead + Send + 'a>, opts: ReaderOptions) -> Self {
        Self {
            rdr,
            opts,
            line_num: 0,
            byte_pos: 0,
            done: false,
        }
    }

    /// Iterator-style `next` record.
    pub fn next(&mut self) -> Option<Result<FastqRecord, FastqError>> {
        if self.done {
            return None;
        }
        let res = self.read_one().transpose();
        if !matches!(res, Some(Ok(_))) {
            self.done = true;
        }
        res
    }

    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_until(b'\n', buf)?;
        if n > 0 {
            self.line_num += 1;
            self.byte_pos += n as u64;
            trim_line_end(buf);
        }
        Ok(n)
    }

    /// Reads one body line; `None` means the input ended mid-record.
    fn read_body_line(&mut self, buf: &mut Vec<u8>) -> Result<Option<()>, FastqError> {
        let n = self
            .read_line(buf)
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

    fn read_one(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        // seek first non-empty line
        let mut header = Vec::with_capacity(128);
        loop {
            let n = self
                .read_line(&mut header)
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
        if self.read_body_line(&mut seq)?.is_none() {
            return Ok(None);
        }

        // separator, content ignored
        let mut line = Vec::with_capacity(256);
        if self.read_body_line(&mut line)?.is_none() {
            return Ok(None);
        }

        if self.read_body_line(&mut line)?.is_none() {
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

impl Iterator for FastqReader<'_> {
    type Item = Result<FastqRecord, FastqError>;
    fn next(&mut self) -> Option<Self::Item> {
        FastqReader::next(self)
    }
}
