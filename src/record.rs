use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    /// Header line without the leading '@'.
    pub id: String,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl FastqRecord {
    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Same read with the last `n` bases (and their qualities) removed.
    pub fn trim_end(mut self, n: usize) -> Self {
        let keep = self.seq.len().saturating_sub(n);
        self.seq.truncate(keep);
        self.qual.truncate(keep);
        self
    }

    /// Same read under a different identifier.
    pub fn with_id(self, id: String) -> Self {
        Self { id, ..self }
    }

    /// Serialize as four lines; the separator is always a bare `+`.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"@")?;
        out.write_all(self.id.as_bytes())?;
        out.write_all(b"\n")?;
        out.write_all(&self.seq)?;
        out.write_all(b"\n+\n")?;
        out.write_all(&self.qual)?;
        out.write_all(b"\n")
    }
}
