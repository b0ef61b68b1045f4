//! Tunables for opening and appending to an archive.

/// Default permission bits for a newly created archive file.
pub const DEFAULT_CREATE_MODE: u32 = 0o644;

/// Default size of the buffer used when streaming member content.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 32 * 1024;

/// Options controlling how an [`Archive`](crate::ar::Archive) touches its storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Permission bits used when the archive file has to be created.
    pub create_mode: u32,
    /// Upper bound for a single chunk when streaming content in or out.
    pub read_chunk_size: usize,
    /// Flush storage to stable media before an append is indexed.
    pub sync_on_append: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            create_mode: DEFAULT_CREATE_MODE,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            sync_on_append: true,
        }
    }
}

impl ArchiveConfig {
    /// Config with the given creation mode and defaults for everything else.
    pub fn with_mode(mode: u32) -> Self {
        Self {
            create_mode: mode,
            ..Self::default()
        }
    }

    pub(crate) fn chunk_size(&self) -> usize {
        self.read_chunk_size.max(1)
    }
}
