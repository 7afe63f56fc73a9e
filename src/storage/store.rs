//! Header store collaborator
//!
//! The engine reads previously-validated headers by height through this
//! trait. Implementations own their consistency discipline; the engine
//! only requires a consistent point-in-time view per call and never
//! writes.

use std::collections::BTreeMap;

use crate::consensus::BlockHeader;

/// Read access to the canonical header chain
pub trait HeaderStore {
    /// The validated header at `height`, or `None` when not yet
    /// persisted. Absence is an answer, not an error; the engine decides
    /// whether it is fatal.
    fn read_header(&self, height: u64) -> Option<BlockHeader>;
}

/// In-memory header store
///
/// Backs tests and chains that have not been committed to disk yet.
#[derive(Debug, Default, Clone)]
pub struct MemoryHeaderStore {
    headers: BTreeMap<u64, BlockHeader>,
}

impl MemoryHeaderStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header at its own height, replacing any previous one
    pub fn insert(&mut self, header: BlockHeader) {
        self.headers.insert(header.height, header);
    }

    /// Height of the highest stored header
    pub fn tip_height(&self) -> Option<u64> {
        self.headers.keys().next_back().copied()
    }

    /// Number of stored headers
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl HeaderStore for MemoryHeaderStore {
    fn read_header(&self, height: u64) -> Option<BlockHeader> {
        self.headers.get(&height).cloned()
    }
}
