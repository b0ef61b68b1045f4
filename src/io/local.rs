use super::{ReadAt, Storage};
use std::fs::{File, OpenOptions};
use std::io::{Result, Write};
use std::path::Path;

/// Local file storage with random access reads and end-of-file appends
#[derive(Debug)]
pub struct LocalFile {
    file: File,
}

impl LocalFile {
    /// Open `path` for reading and appending, creating it with `mode`
    /// permission bits if it does not exist.
    pub fn open(path: &Path, mode: u32) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).append(true).create(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        Ok(Self {
            file: options.open(path)?,
        })
    }
}

impl ReadAt for LocalFile {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.read_at(buf, offset)
        }

        #[cfg(windows)]
        {
            // seek_read moves the handle's cursor, but every write goes
            // through append mode so the cursor is never relied upon.
            use std::os::windows::fs::FileExt;
            self.file.seek_read(buf, offset)
        }

        #[cfg(not(any(unix, windows)))]
        {
            use std::io::{Read, Seek, SeekFrom};
            let mut file = &self.file;
            file.seek(SeekFrom::Start(offset))?;
            file.read(buf)
        }
    }

    fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

impl Storage for LocalFile {
    fn append(&mut self, buf: &[u8]) -> Result<()> {
        self.file.write_all(buf)
    }

    fn truncate(&mut self, len: u64) -> Result<()> {
        self.file.set_len(len)
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_data()
    }
}
