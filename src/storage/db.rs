//! Database persistence layer using Sled
//!
//! Sled-backed header store. Keys are big-endian heights so the tree
//! iterates in chain order; values are bincode-encoded headers.

use sled::{Db, Tree};
use std::path::Path;

use crate::consensus::BlockHeader;
use crate::storage::HeaderStore;

/// Database wrapper
#[derive(Debug, Clone)]
pub struct HeaderDb {
    db: Db,
    headers_tree: Tree,
    metadata_tree: Tree,
}

const TIP_HEIGHT_KEY: &str = "tip_height";

impl HeaderDb {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// In-memory database that is discarded on drop (tests, dry runs)
    pub fn temporary() -> std::io::Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: Db) -> std::io::Result<Self> {
        let headers_tree = db.open_tree("headers")?;
        let metadata_tree = db.open_tree("metadata")?;

        Ok(Self {
            db,
            headers_tree,
            metadata_tree,
        })
    }

    /// Save a header at its own height
    pub fn save_header(&self, header: &BlockHeader) -> std::io::Result<()> {
        let key = header.height.to_be_bytes();
        let value = bincode::serialize(header).unwrap();
        self.headers_tree.insert(key, value)?;

        match self.tip_height()? {
            Some(tip) if tip >= header.height => {}
            _ => {
                self.metadata_tree
                    .insert(TIP_HEIGHT_KEY, header.height.to_le_bytes().as_ref())?;
            }
        }

        self.db.flush()?;
        Ok(())
    }

    /// Get a header by height
    pub fn get_header(&self, height: u64) -> std::io::Result<Option<BlockHeader>> {
        match self.headers_tree.get(height.to_be_bytes())? {
            Some(bytes) => {
                let header = bincode::deserialize(&bytes)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                Ok(Some(header))
            }
            None => Ok(None),
        }
    }

    /// Height of the highest saved header
    pub fn tip_height(&self) -> std::io::Result<Option<u64>> {
        match self.metadata_tree.get(TIP_HEIGHT_KEY)? {
            Some(bytes) => {
                let mut h_bytes = [0u8; 8];
                h_bytes.copy_from_slice(&bytes);
                Ok(Some(u64::from_le_bytes(h_bytes)))
            }
            None => Ok(None),
        }
    }
}

impl HeaderStore for HeaderDb {
    fn read_header(&self, height: u64) -> Option<BlockHeader> {
        // A read failure surfaces as absence; the engine then fails the
        // computation with MissingHeader instead of proceeding on a
        // partial view.
        self.get_header(height).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::CompactTarget;
    use crate::crypto::Hash;

    fn header(height: u64) -> BlockHeader {
        BlockHeader::new(
            2,
            Hash::zero(),
            Hash::zero(),
            1_700_000_000 + height,
            CompactTarget(0x1e0f_fff0),
            height,
            height,
        )
    }

    #[test]
    fn test_save_and_load_header() {
        let db = HeaderDb::temporary().unwrap();
        db.save_header(&header(0)).unwrap();
        db.save_header(&header(7)).unwrap();

        assert_eq!(db.get_header(0).unwrap(), Some(header(0)));
        assert_eq!(db.get_header(7).unwrap(), Some(header(7)));
        assert_eq!(db.get_header(3).unwrap(), None);
        assert_eq!(db.tip_height().unwrap(), Some(7));
    }

    #[test]
    fn test_tip_never_moves_backward() {
        let db = HeaderDb::temporary().unwrap();
        db.save_header(&header(10)).unwrap();
        db.save_header(&header(4)).unwrap();

        assert_eq!(db.tip_height().unwrap(), Some(10));
    }

    #[test]
    fn test_header_store_trait_view() {
        let db = HeaderDb::temporary().unwrap();
        db.save_header(&header(2)).unwrap();

        assert_eq!(db.read_header(2), Some(header(2)));
        assert_eq!(db.read_header(9), None);
    }
}
