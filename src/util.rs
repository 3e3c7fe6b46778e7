use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Peek at the first two bytes without moving the stream position.
pub fn looks_like_gzip<R: Read + Seek>(mut r: R) -> io::Result<bool> {
    let mut magic = [0u8; 2];
    let pos = r.stream_position()?;
    let n = r.read(&mut magic)?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(n >= 2 && magic == GZIP_MAGIC)
}

pub fn has_gz_extension(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

pub fn open_file(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Strip trailing ASCII whitespace (including `\r\n`) in place.
pub fn trim_line_end(buf: &mut Vec<u8>) {
    let end = buf.trim_ascii_end().len();
    buf.truncate(end);
}
