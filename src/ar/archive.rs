//! Random-access archive engine.
//!
//! An [`Archive`] owns its storage, the ordered member headers and a name
//! index, all behind one `RwLock`. Reads take the shared side and use
//! positioned reads, so any number of them may run at once. Appends take the
//! exclusive side: they measure the end of storage, write the whole record and
//! only then register the member.

use std::fs::{self, File, Metadata};
use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::ArchiveConfig;
use crate::error::{ArError, Result};
use crate::io::{LocalFile, ReadAt, Storage};

use super::header::{HEADER_SIZE, Header, SIGNATURE, padding};
use super::index::{Index, Location};

/// An open `ar` archive
#[derive(Debug)]
pub struct Archive<S = LocalFile> {
    inner: RwLock<Inner<S>>,
    config: ArchiveConfig,
}

#[derive(Debug)]
struct Inner<S> {
    storage: S,
    index: Index,
    /// Length the storage should have had when a rollback failed
    broken_at: Option<u64>,
}

impl Archive<LocalFile> {
    /// Open the archive at `path`, creating it with permission bits `mode`
    /// if it does not exist yet.
    ///
    /// # Errors
    ///
    /// `InvalidFileFormat` if the file exists but is not an archive, a codec
    /// error if any member header is corrupt, `Io` for storage failures.
    pub fn open(path: impl AsRef<Path>, mode: u32) -> Result<Self> {
        Self::open_with(path, ArchiveConfig::with_mode(mode))
    }

    /// Open the archive at `path` with explicit options.
    pub fn open_with(path: impl AsRef<Path>, config: ArchiveConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening archive at {:?}", path);
        let storage = LocalFile::open(path, config.create_mode)?;
        Self::from_storage(storage, config)
    }
}

impl<S: Storage> Archive<S> {
    /// Validate (or write) the signature and index every member in `storage`.
    pub fn from_storage(mut storage: S, config: ArchiveConfig) -> Result<Self> {
        handshake(&mut storage, &config)?;
        let index = scan(&storage)?;
        info!(
            "Loaded archive with {} members ({} headers)",
            index.len(),
            index.headers().len()
        );

        Ok(Self {
            inner: RwLock::new(Inner {
                storage,
                index,
                broken_at: None,
            }),
            config,
        })
    }

    /// Headers of all members in physical order
    pub fn list(&self) -> Vec<Header> {
        self.inner.read().index.headers().to_vec()
    }

    /// Header of the member `name` resolves to
    pub fn header(&self, name: &str) -> Option<Header> {
        self.inner.read().index.header(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().index.contains(name)
    }

    /// Number of distinct member names
    pub fn len(&self) -> usize {
        self.inner.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stream the content of member `name` into `sink`.
    ///
    /// Exactly the member's size is written; the padding byte never is.
    ///
    /// # Errors
    ///
    /// `FileNotFound` for an unknown name, `Io` if the storage or the sink
    /// fails. On error the sink may have received a prefix of the content.
    pub fn read<W: Write + ?Sized>(&self, name: &str, sink: &mut W) -> Result<()> {
        let inner = self.inner.read();
        let location = inner
            .index
            .get(name)
            .ok_or_else(|| ArError::FileNotFound(name.to_owned()))?;
        debug!("Reading {} ({} bytes at {})", name, location.len, location.offset);
        copy_range(&inner.storage, location, sink, self.config.chunk_size())
    }

    /// Read the content of member `name` into memory
    pub fn read_to_vec(&self, name: &str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.read(name, &mut buf)?;
        Ok(buf)
    }

    /// Append a new member holding `content`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// `FileExist` if `name` is already indexed, a codec error if the header
    /// cannot be encoded, `Io` if the append fails. Nothing is indexed and the
    /// storage is cut back to its previous length on failure.
    pub fn write(&self, name: &str, content: &[u8], mode: u32) -> Result<()> {
        let mut inner = self.inner.write();
        inner.ensure_absent(name)?;

        let header = Header::new(name, Utc::now().timestamp(), mode, content.len() as u64);
        let encoded = header.encode()?;
        let pad = padding(header.size());

        let mut record = Vec::with_capacity(HEADER_SIZE + content.len() + pad.len());
        record.extend_from_slice(&encoded);
        record.extend_from_slice(content);
        record.extend_from_slice(pad);

        inner.append_member(header, self.config.sync_on_append, |storage| {
            storage.append(&record).map_err(ArError::from)
        })
    }

    /// Append the file at `source` under its base name, keeping its
    /// modification time and permission bits. Content is streamed.
    pub fn import(&self, source: impl AsRef<Path>) -> Result<()> {
        let source = source.as_ref();
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(ArError::UnsupportedValue {
                field: "name",
                reason: "source has no UTF-8 file name",
            })?;
        self.import_as(source, name)
    }

    /// Like [`import`](Self::import), but store the member as `name`.
    pub fn import_as(&self, source: impl AsRef<Path>, name: &str) -> Result<()> {
        let source = source.as_ref();
        let mut inner = self.inner.write();
        inner.ensure_absent(name)?;

        let mut file = File::open(source)?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a regular file", source.display()),
            )
            .into());
        }

        let mtime = mtime_of(&metadata)?;
        let header = Header::new(name, mtime, mode_of(&metadata), metadata.len());
        let encoded = header.encode()?;
        let size = header.size();
        let chunk = self.config.chunk_size();
        debug!("Importing {:?} as {}", source, name);

        inner.append_member(header, self.config.sync_on_append, |storage| {
            storage.append(&encoded)?;
            stream_exact(&mut file, storage, size, chunk)?;
            storage.append(padding(size))?;
            Ok(())
        })
    }

    /// Write member `name` to `dir/name`, creating `dir` as needed.
    ///
    /// # Errors
    ///
    /// `UnsafeName` if the name would leave `dir`, `FileNotFound` for an
    /// unknown name (no file is created then), `Io` otherwise.
    pub fn export(&self, name: &str, dir: impl AsRef<Path>) -> Result<()> {
        if !is_safe_name(name) {
            return Err(ArError::UnsafeName(name.to_owned()));
        }
        if !self.contains(name) {
            return Err(ArError::FileNotFound(name.to_owned()));
        }

        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        debug!("Exporting {} to {:?}", name, path);

        let mut file = BufWriter::new(File::create(&path)?);
        self.read(name, &mut file)?;
        file.flush()?;
        Ok(())
    }

    /// Flush and release the storage.
    pub fn close(self) -> Result<()> {
        let mut storage = self.into_storage();
        storage.flush()?;
        Ok(())
    }

    /// Release the storage without flushing it
    pub fn into_storage(self) -> S {
        self.inner.into_inner().storage
    }
}

impl<S: Storage> Inner<S> {
    fn ensure_absent(&self, name: &str) -> Result<()> {
        if self.index.contains(name) {
            return Err(ArError::FileExist(name.to_owned()));
        }
        Ok(())
    }

    /// Run `write` at the end of storage and index `header` once every byte
    /// is down. Any failure truncates the storage back to where it was.
    ///
    /// If that truncation fails too, the storage holds a partial record and
    /// every later append is refused.
    fn append_member<F>(&mut self, header: Header, sync: bool, write: F) -> Result<()>
    where
        F: FnOnce(&mut S) -> Result<()>,
    {
        if let Some(end) = self.broken_at {
            return Err(io::Error::other(format!(
                "archive holds a partial member after offset {end}, refusing to append"
            ))
            .into());
        }
        let start = self.storage.size()?;

        let mut result = write(&mut self.storage);
        if result.is_ok() && sync {
            result = self.storage.flush().map_err(ArError::from);
        }

        if let Err(err) = result {
            if let Err(rollback) = self.storage.truncate(start) {
                error!(
                    "Failed to roll back append of {} to offset {}: {}",
                    header.name(),
                    start,
                    rollback
                );
                self.broken_at = Some(start);
            }
            return Err(err);
        }

        let offset = start + HEADER_SIZE as u64;
        debug!(
            "Appended {} ({} bytes) at offset {}",
            header.name(),
            header.size(),
            offset
        );
        self.index.insert(header, offset);
        Ok(())
    }
}

fn handshake<S: Storage>(storage: &mut S, config: &ArchiveConfig) -> Result<()> {
    let size = storage.size()?;
    if size == 0 {
        debug!("Empty storage, writing signature");
        storage.append(SIGNATURE)?;
        if config.sync_on_append {
            storage.flush()?;
        }
        return Ok(());
    }

    if size < SIGNATURE.len() as u64 {
        return Err(ArError::InvalidFileFormat);
    }
    let mut magic = [0u8; SIGNATURE.len()];
    storage.read_exact_at(0, &mut magic)?;
    if &magic != SIGNATURE {
        return Err(ArError::InvalidFileFormat);
    }
    Ok(())
}

fn scan<R: ReadAt + ?Sized>(source: &R) -> Result<Index> {
    let end = source.size()?;
    let mut index = Index::default();
    let mut pos = SIGNATURE.len() as u64;
    let mut buf = [0u8; HEADER_SIZE];

    while pos < end {
        source.read_exact_at(pos, &mut buf)?;
        let header = Header::decode(&buf)?;
        let offset = pos + HEADER_SIZE as u64;

        let content_end = offset
            .checked_add(header.size())
            .filter(|&e| e <= end)
            .ok_or_else(|| {
                io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("content of {} runs past end of archive", header.name()),
                )
            })?;
        // The final member may lack its padding byte.
        pos = (content_end + padding(header.size()).len() as u64).min(end);

        if index.contains(header.name()) {
            warn!(
                "Duplicate member {} at offset {}, later entry takes precedence",
                header.name(),
                offset
            );
        }
        index.insert(header, offset);
    }

    Ok(index)
}

fn copy_range<R, W>(source: &R, location: Location, sink: &mut W, chunk: usize) -> Result<()>
where
    R: ReadAt + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; chunk.min(to_usize(location.len))];
    let mut offset = location.offset;
    let mut remaining = location.len;

    while remaining > 0 {
        let want = buf.len().min(to_usize(remaining));
        let n = match source.read_at(offset, &mut buf[..want]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "archive ended inside member content",
                )
                .into());
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        sink.write_all(&buf[..n])?;
        offset += n as u64;
        remaining -= n as u64;
    }
    Ok(())
}

/// Copy exactly `size` bytes from `source`, failing if it holds a different
/// amount than announced.
fn stream_exact<R, S>(source: &mut R, storage: &mut S, size: u64, chunk: usize) -> Result<()>
where
    R: Read,
    S: Storage + ?Sized,
{
    let mut buf = vec![0u8; chunk.min(to_usize(size)).max(1)];
    let mut remaining = size;

    while remaining > 0 {
        let want = buf.len().min(to_usize(remaining));
        let n = match source.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "source shrank while importing",
                )
                .into());
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        storage.append(&buf[..n])?;
        remaining -= n as u64;
    }

    if source.read(&mut buf[..1])? != 0 {
        return Err(io::Error::new(ErrorKind::InvalidData, "source grew while importing").into());
    }
    Ok(())
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn mtime_of(metadata: &Metadata) -> io::Result<i64> {
    let modified = metadata.modified()?;
    Ok(DateTime::<Utc>::from(modified).timestamp())
}

#[cfg(unix)]
fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_of(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStorage;

    fn config() -> ArchiveConfig {
        ArchiveConfig {
            read_chunk_size: 4,
            ..ArchiveConfig::default()
        }
    }

    fn empty() -> Archive<MemoryStorage> {
        Archive::from_storage(MemoryStorage::new(), config()).unwrap()
    }

    fn reopen(archive: Archive<MemoryStorage>) -> Archive<MemoryStorage> {
        Archive::from_storage(archive.into_storage(), config()).unwrap()
    }

    fn member(name: &str, content: &[u8]) -> Vec<u8> {
        let mut out = Header::new(name, 0, 0o644, content.len() as u64)
            .encode()
            .unwrap()
            .to_vec();
        out.extend_from_slice(content);
        out.extend_from_slice(padding(content.len() as u64));
        out
    }

    fn archive_bytes(members: &[(&str, &str)]) -> Vec<u8> {
        let mut out = SIGNATURE.to_vec();
        for (name, content) in members {
            out.extend(member(name, content.as_bytes()));
        }
        out
    }

    /// Storage whose appends start failing once `limit` bytes were written.
    #[derive(Debug)]
    struct Failing {
        inner: MemoryStorage,
        limit: u64,
        stuck: bool,
    }

    impl Failing {
        fn new(limit: u64) -> Self {
            Self {
                inner: MemoryStorage::new(),
                limit,
                stuck: false,
            }
        }
    }

    impl ReadAt for Failing {
        fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read_at(offset, buf)
        }

        fn size(&self) -> io::Result<u64> {
            self.inner.size()
        }
    }

    impl Storage for Failing {
        fn append(&mut self, buf: &[u8]) -> io::Result<()> {
            let room = self.limit.saturating_sub(self.inner.size()?);
            let n = buf.len().min(to_usize(room));
            self.inner.append(&buf[..n])?;
            if n < buf.len() {
                return Err(io::Error::other("disk full"));
            }
            Ok(())
        }

        fn truncate(&mut self, len: u64) -> io::Result<()> {
            if self.stuck {
                return Err(io::Error::other("truncate refused"));
            }
            self.inner.truncate(len)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Storage that returns at most one byte per read.
    #[derive(Debug)]
    struct Trickle(MemoryStorage);

    impl ReadAt for Trickle {
        fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
            let len = buf.len().min(1);
            self.0.read_at(offset, &mut buf[..len])
        }

        fn size(&self) -> io::Result<u64> {
            self.0.size()
        }
    }

    impl Storage for Trickle {
        fn append(&mut self, buf: &[u8]) -> io::Result<()> {
            self.0.append(buf)
        }

        fn truncate(&mut self, len: u64) -> io::Result<()> {
            self.0.truncate(len)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_bootstrap_writes_signature() {
        let archive = empty();
        assert!(archive.list().is_empty());
        assert!(archive.is_empty());

        let archive = reopen(archive);
        assert!(archive.list().is_empty());
        assert_eq!(archive.into_storage().as_bytes(), SIGNATURE);
    }

    #[test]
    fn test_rejects_foreign_data() {
        let cases: [&[u8]; 3] = [b"PK\x03\x04 not an ar file", b"!<arc", b"!<arch>X"];
        for data in cases {
            let err = Archive::from_storage(MemoryStorage::from_bytes(data.to_vec()), config())
                .unwrap_err();
            assert!(matches!(err, ArError::InvalidFileFormat), "{data:?}");
        }
    }

    #[test]
    fn test_write_read_identity() {
        let archive = empty();
        let cases: [(&str, &[u8]); 4] = [
            ("empty", b""),
            ("one", b"x"),
            ("two", b"ab"),
            ("longer", b"some longer content!"),
        ];
        for (name, content) in cases {
            archive.write(name, content, 0o644).unwrap();
        }
        for (name, content) in cases {
            assert_eq!(archive.read_to_vec(name).unwrap(), content);
        }

        let archive = reopen(archive);
        for (name, content) in cases {
            assert_eq!(archive.read_to_vec(name).unwrap(), content);
        }
        let names: Vec<_> = archive.list().iter().map(|h| h.name().to_owned()).collect();
        assert_eq!(names, ["empty", "one", "two", "longer"]);
    }

    #[test]
    fn test_odd_content_is_padded() {
        let archive = empty();
        archive.write("odd", b"abc", 0o644).unwrap();
        archive.write("next", b"zz", 0o600).unwrap();

        let header = archive.header("next").unwrap();
        assert_eq!(header.mode(), 0o600);
        assert_eq!(archive.read_to_vec("odd").unwrap(), b"abc");

        let bytes = archive.into_storage().into_bytes();
        let content = SIGNATURE.len() + HEADER_SIZE;
        assert_eq!(&bytes[content..content + 3], b"abc");
        assert_eq!(bytes[content + 3], b'\n');
        assert_eq!(&bytes[content + 4..content + 8], b"next");
        assert_eq!(bytes.len(), content + 4 + HEADER_SIZE + 2);
    }

    #[test]
    fn test_duplicate_write_rejected() {
        let archive = empty();
        archive.write("file", b"first", 0o644).unwrap();
        let before = archive.list();

        let err = archive.write("file", b"second!", 0o644).unwrap_err();
        assert!(matches!(err, ArError::FileExist(ref n) if n == "file"));
        assert_eq!(archive.list(), before);
        assert_eq!(archive.read_to_vec("file").unwrap(), b"first");

        let len = archive.into_storage().as_bytes().len();
        assert_eq!(len, SIGNATURE.len() + HEADER_SIZE + 6);
    }

    #[test]
    fn test_unknown_member() {
        let archive = empty();
        let err = archive.read("missing", &mut io::sink()).unwrap_err();
        assert!(matches!(err, ArError::FileNotFound(ref n) if n == "missing"));
        assert!(archive.header("missing").is_none());
    }

    #[test]
    fn test_encode_failure_leaves_archive_untouched() {
        let archive = empty();
        let err = archive
            .write("a-name-longer-than-16", b"data", 0o644)
            .unwrap_err();
        assert!(matches!(err, ArError::TooLongValue { .. }));
        assert!(archive.is_empty());
        assert_eq!(archive.into_storage().as_bytes(), SIGNATURE);
    }

    #[test]
    fn test_failed_append_is_rolled_back() {
        let archive = Archive::from_storage(Failing::new(100), config()).unwrap();

        let err = archive.write("big", &[7u8; 64], 0o644).unwrap_err();
        assert!(matches!(err, ArError::Io(_)));
        assert!(!archive.contains("big"));

        archive.write("small", b"ok", 0o644).unwrap();
        assert_eq!(archive.read_to_vec("small").unwrap(), b"ok");
        assert_eq!(archive.into_storage().inner.as_bytes().len(), 8 + HEADER_SIZE + 2);
    }

    #[test]
    fn test_failed_rollback_refuses_further_appends() {
        let storage = Failing {
            stuck: true,
            ..Failing::new(100)
        };
        let archive = Archive::from_storage(storage, config()).unwrap();

        let err = archive.write("big", &[7u8; 64], 0o644).unwrap_err();
        assert!(matches!(err, ArError::Io(_)));

        let err = archive.write("b", b"hello", 0o644).unwrap_err();
        assert!(matches!(err, ArError::Io(_)));
        assert!(archive.is_empty());

        let left = archive.into_storage().inner.as_bytes().len();
        assert_eq!(left, 100);
    }

    #[test]
    fn test_failed_import_is_rolled_back() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("big.bin");
        fs::write(&source, [3u8; 64]).unwrap();

        let archive = Archive::from_storage(Failing::new(150), config()).unwrap();
        archive.write("a", b"ab", 0o644).unwrap();
        let before = archive.list();

        let err = archive.import_as(&source, "big").unwrap_err();
        assert!(matches!(err, ArError::Io(_)));
        assert!(!archive.contains("big"));
        assert_eq!(archive.list(), before);
        assert_eq!(
            archive.into_storage().inner.as_bytes().len(),
            SIGNATURE.len() + HEADER_SIZE + 2
        );
    }

    #[test]
    fn test_stream_exact_detects_size_changes() {
        let mut storage = MemoryStorage::new();

        let err = stream_exact(&mut &b"abc"[..], &mut storage, 5, 2).unwrap_err();
        assert!(matches!(err, ArError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));

        let mut storage = MemoryStorage::new();
        let err = stream_exact(&mut &b"abcdef"[..], &mut storage, 4, 2).unwrap_err();
        assert!(matches!(err, ArError::Io(ref e) if e.kind() == ErrorKind::InvalidData));

        let mut storage = MemoryStorage::new();
        stream_exact(&mut &b"abcd"[..], &mut storage, 4, 3).unwrap();
        assert_eq!(storage.as_bytes(), b"abcd");
    }

    #[test]
    fn test_short_reads_are_assembled() {
        let data = archive_bytes(&[("a", "0123456789"), ("b", "xyz")]);
        let archive = Archive::from_storage(Trickle(MemoryStorage::from_bytes(data)), config())
            .unwrap();
        assert_eq!(archive.read_to_vec("a").unwrap(), b"0123456789");
        assert_eq!(archive.read_to_vec("b").unwrap(), b"xyz");
    }

    #[test]
    fn test_scan_duplicate_last_wins() {
        let data = archive_bytes(&[("dup", "old"), ("other", "o"), ("dup", "new!")]);
        let archive = Archive::from_storage(MemoryStorage::from_bytes(data), config()).unwrap();

        assert_eq!(archive.list().len(), 3);
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.read_to_vec("dup").unwrap(), b"new!");
        assert!(matches!(
            archive.write("dup", b"again", 0o644),
            Err(ArError::FileExist(_))
        ));
    }

    #[test]
    fn test_scan_tolerates_missing_final_pad() {
        let mut data = archive_bytes(&[("a", "ab"), ("last", "odd")]);
        assert_eq!(data.pop(), Some(b'\n'));
        let archive = Archive::from_storage(MemoryStorage::from_bytes(data), config()).unwrap();
        assert_eq!(archive.read_to_vec("last").unwrap(), b"odd");
    }

    #[test]
    fn test_scan_rejects_truncation() {
        let full = archive_bytes(&[("a", "abcdef")]);

        let cut_header = full[..SIGNATURE.len() + 30].to_vec();
        let err = Archive::from_storage(MemoryStorage::from_bytes(cut_header), config())
            .unwrap_err();
        assert!(matches!(err, ArError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));

        let cut_content = full[..full.len() - 2].to_vec();
        let err = Archive::from_storage(MemoryStorage::from_bytes(cut_content), config())
            .unwrap_err();
        assert!(matches!(err, ArError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_scan_rejects_corrupt_header() {
        let mut data = archive_bytes(&[("a", "ab"), ("b", "cd")]);
        let size_field = SIGNATURE.len() + HEADER_SIZE + 2 + 48;
        data[size_field] = b'z';
        let err = Archive::from_storage(MemoryStorage::from_bytes(data), config()).unwrap_err();
        assert!(matches!(err, ArError::InvalidParseValue { field: "size", .. }));
    }

    #[test]
    fn test_export_rejects_unsafe_names() {
        let archive = empty();
        for name in ["..", ".", "a/b", "a\\b", ""] {
            let err = archive.export(name, "unused").unwrap_err();
            assert!(matches!(err, ArError::UnsafeName(_)), "{name:?}");
        }
    }

    #[test]
    fn test_close_flushes() {
        let archive = empty();
        archive.write("f", b"1", 0o644).unwrap();
        archive.close().unwrap();
    }
}
