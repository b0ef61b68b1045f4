//! Unix `ar` archive codec and random-access container.
//!
//! This module reads and appends to archives in the common `ar` layout used
//! by `.deb` packages and static libraries.
//!
//! ## Architecture
//!
//! - [`header`]: the fixed 60-byte member header codec and format constants
//! - [`index`]: member locations and the name lookup table
//! - [`archive`]: the [`Archive`] engine (open, list, read, write, import, export)
//!
//! ## Format Overview
//!
//! An archive is:
//! 1. The 8-byte signature `!<arch>\n`
//! 2. For each member, a 60-byte header followed by its content
//! 3. One `\n` padding byte after content of odd length
//!
//! There is no trailer or table of contents; opening an archive walks every
//! header once and keeps the resulting index in memory.
//!
//! ## Limitations
//!
//! - Member names are limited to 16 bytes (no GNU/BSD long-name tables)
//! - Symbol tables and thin archives are not supported
//! - Members are never rewritten or deleted

pub mod archive;
pub mod header;
mod index;

pub use archive::Archive;
pub use header::{HEADER_SIZE, Header, PAD, SIGNATURE, padding};
pub use index::Location;
