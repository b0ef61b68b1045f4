//! # runar
//!
//! A Rust codec and random-access container for Unix `ar` archives.
//!
//! The archive is scanned once on open; afterwards every member is
//! addressable by name. Members can be listed, streamed out, exported to a
//! directory, and appended either from memory or from files on disk.
//!
//! ## Features
//!
//! - Bit-exact encoding and decoding of the 60-byte member header
//! - Name index rebuilt on open, kept in step with every append
//! - Concurrent reads through positioned I/O, appends serialized by a lock
//! - Appends rolled back if any byte fails to reach storage
//!
//! ## Example
//!
//! ```no_run
//! use runar::Archive;
//!
//! fn main() -> runar::Result<()> {
//!     let archive = Archive::open("demo.ar", 0o644)?;
//!     archive.write("hello.txt", b"hello world", 0o644)?;
//!
//!     for header in archive.list() {
//!         println!("{} ({} bytes)", header.name(), header.size());
//!     }
//!
//!     let mut out = Vec::new();
//!     archive.read("hello.txt", &mut out)?;
//!     archive.close()
//! }
//! ```

pub mod ar;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;

pub use ar::{Archive, Header, Location};
pub use cli::Cli;
pub use config::ArchiveConfig;
pub use error::{ArError, Result};
pub use io::{LocalFile, MemoryStorage, ReadAt, Storage};
