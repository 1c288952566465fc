use std::slice;

use socket2::SockAddr;

use crate::entry::SenderEntry;
use crate::error::AclResult;

/// Ordered allowed-sender list for one protocol.
///
/// Entries are only ever appended and are matched in insertion order. An empty
/// list places no restriction on senders.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SenderList {
    entries: Vec<SenderEntry>,
}

impl SenderList {
    /// Creates an empty, unrestricted list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends `entry` at the tail.
    ///
    /// # Errors
    ///
    /// Returns [`AclError::OutOfMemory`](crate::AclError::OutOfMemory) when
    /// the list cannot grow. The list is unchanged in that case.
    pub fn append(&mut self, entry: SenderEntry) -> AclResult<()> {
        self.entries.try_reserve(1)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Removes every entry, returning the list to its unrestricted state.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no restriction is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, SenderEntry> {
        self.entries.iter()
    }

    /// Returns the index of the first entry covering the sender, if any.
    #[must_use]
    pub fn first_match(&self, peer: &SockAddr, hostname: Option<&str>) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.matches(peer, hostname))
    }

    /// Decides whether the sender may submit messages.
    ///
    /// An empty list permits everyone. Otherwise the sender is permitted when
    /// any entry matches; `hostname` should be the peer's verified name or
    /// `None`.
    #[must_use]
    pub fn permits(&self, peer: &SockAddr, hostname: Option<&str>) -> bool {
        self.is_empty() || self.first_match(peer, hostname).is_some()
    }
}

impl<'a> IntoIterator for &'a SenderList {
    type Item = &'a SenderEntry;
    type IntoIter = slice::Iter<'a, SenderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
