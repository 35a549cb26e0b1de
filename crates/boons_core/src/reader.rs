use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFault {
    Truncated,
    InvalidUtf8,
}

impl ReadFault {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Truncated => "truncated",
            Self::InvalidUtf8 => "invalid-utf8",
        }
    }
}

impl fmt::Display for ReadFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed read, with the offset at which the failing field started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadError {
    pub fault: ReadFault,
    pub offset: usize,
}

pub type ReadResult<T> = Result<T, ReadError>;

/// Cursor over an in-memory buffer reading little-endian fields.
///
/// Every read either consumes exactly the bytes it asked for or fails without
/// moving the cursor.
pub struct LittleEndianReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> LittleEndianReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    pub fn read_i32(&mut self) -> ReadResult<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> ReadResult<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> ReadResult<f64> {
        self.read_array().map(f64::from_le_bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn read_bytes(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        self.take(n)
    }

    /// Read a u32 length prefix followed by that many bytes of UTF-8.
    pub fn read_prefixed_string(&mut self) -> ReadResult<String> {
        let start = self.pos;
        let len = self.read_u32()? as usize;
        let bytes = self.take(len).inspect_err(|_| self.pos = start)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => {
                self.pos = start;
                Err(ReadError {
                    fault: ReadFault::InvalidUtf8,
                    offset: start,
                })
            }
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(ReadError {
                fault: ReadFault::Truncated,
                offset: self.pos,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

/// Append-only little-endian writer, the inverse of [`LittleEndianReader`].
#[derive(Debug, Default)]
pub struct LittleEndianWriter {
    out: Vec<u8>,
}

impl LittleEndianWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.out.push(v);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    pub fn write_prefixed_string(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}
