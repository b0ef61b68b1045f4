use std::collections::HashMap;

use super::header::Header;

/// Where a member's content lives inside the storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Offset of the first content byte
    pub offset: u64,
    /// Exact content length, without padding
    pub len: u64,
}

/// Ordered member headers plus a name lookup table.
///
/// Both are only ever appended to; the header list keeps physical order.
#[derive(Debug, Default)]
pub(crate) struct Index {
    headers: Vec<Header>,
    locations: HashMap<String, (usize, Location)>,
}

impl Index {
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Location> {
        self.locations.get(name).map(|&(_, location)| location)
    }

    pub fn header(&self, name: &str) -> Option<&Header> {
        self.locations
            .get(name)
            .and_then(|&(idx, _)| self.headers.get(idx))
    }

    /// Record a member, replacing the lookup entry of an earlier member with
    /// the same name.
    pub fn insert(&mut self, header: Header, offset: u64) {
        let location = Location {
            offset,
            len: header.size(),
        };
        self.locations
            .insert(header.name().to_owned(), (self.headers.len(), location));
        self.headers.push(header);
    }
}
