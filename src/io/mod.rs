mod local;
mod memory;

pub use local::LocalFile;
pub use memory::MemoryStorage;

use std::io::{Error, ErrorKind, Result};

/// Trait for random access reading from a data source
///
/// Reads are positioned: no shared cursor is moved, so a single source
/// can serve several readers at once.
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> Result<u64>;

    /// Fill `buf` completely from `offset`, failing with `UnexpectedEof`
    /// if the source ends first.
    fn read_exact_at(&self, mut offset: u64, mut buf: &mut [u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.read_at(offset, buf) {
                Ok(0) => break,
                Ok(n) => {
                    buf = &mut buf[n..];
                    offset += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        if buf.is_empty() {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::UnexpectedEof,
                "failed to fill whole buffer",
            ))
        }
    }
}

/// Byte storage an archive lives in: positioned reads plus appends at the end.
pub trait Storage: ReadAt {
    /// Append the whole buffer at the current end of the storage
    fn append(&mut self, buf: &[u8]) -> Result<()>;

    /// Cut the storage back to `len` bytes
    fn truncate(&mut self, len: u64) -> Result<()>;

    /// Push buffered data to stable media
    fn flush(&mut self) -> Result<()>;
}
