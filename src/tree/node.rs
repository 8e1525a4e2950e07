//! Tree Nodes
//!
//! Sparse interior/leaf nodes with sorted child arrays.
//!
//! ## Concurrency
//!
//! Each node protects its own state with a `parking_lot::RwLock`: shared for
//! pure lookups, exclusive for structural mutation. Concurrent writers to
//! different buckets never contend past their shared path prefix.
//!
//! ## Sparseness
//!
//! Children materialize lazily — a node at a given rank exists only once a
//! key routes through it. Dense pre-allocation would need `degree^levels`
//! pointers up front; the sorted array trades a binary search per step for
//! bounded memory.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Link, LEAF_LEVEL, LEVELS};

/// One node of the radix index tree.
///
/// Exactly one of `children`/`links` is populated, determined by `level`:
/// nodes below [`LEAF_LEVEL`] hold children, leaf nodes hold Links.
/// Ownership is strictly parent → child; there are no back-references.
#[derive(Debug)]
pub struct Node {
    /// Distance from the root (root = 0, leaves = LEAF_LEVEL)
    level: u8,

    /// This node's digit within its parent's child array
    rank: u8,

    /// Child nodes, kept sorted by rank for binary search
    children: RwLock<Vec<Arc<Node>>>,

    /// Leaf entries; non-empty only at LEAF_LEVEL
    links: RwLock<Vec<Link>>,
}

impl Node {
    /// Create a detached node at the given level and rank
    fn new(level: u8, rank: u8) -> Self {
        Self {
            level,
            rank,
            children: RwLock::new(Vec::new()),
            links: RwLock::new(Vec::new()),
        }
    }

    /// Create an empty tree root
    pub fn root() -> Arc<Self> {
        Arc::new(Self::new(0, 0))
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// True once routing cannot go deeper; Links live here
    pub fn is_leaf(&self) -> bool {
        self.level == LEAF_LEVEL
    }

    // =========================================================================
    // Child Lookup / Creation
    // =========================================================================

    /// Look up the child with the given rank (shared lock, binary search).
    ///
    /// A miss is "not found", not an error: reads translate it into a
    /// NotFound result, writes into a create.
    pub fn find_child(&self, rank: u8) -> Option<Arc<Node>> {
        let children = self.children.read();
        match children.binary_search_by_key(&rank, |child| child.rank) {
            Ok(pos) => Some(Arc::clone(&children[pos])),
            Err(_) => None,
        }
    }

    /// Get or lazily create the child with the given rank.
    ///
    /// On miss the new child is shift-inserted at its sorted position, so the
    /// array stays ordered without a second pass.
    pub fn get_or_create_child(self: &Arc<Self>, rank: u8) -> Arc<Node> {
        let mut children = self.children.write();
        match children.binary_search_by_key(&rank, |child| child.rank) {
            Ok(pos) => Arc::clone(&children[pos]),
            Err(pos) => {
                let child = Arc::new(Node::new(self.level + 1, rank));
                children.insert(pos, Arc::clone(&child));
                child
            }
        }
    }

    /// Number of materialized children
    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    /// Snapshot of the child array in rank order (Arc clones only)
    pub fn children_snapshot(&self) -> Vec<Arc<Node>> {
        self.children.read().iter().map(Arc::clone).collect()
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Follow a digit path downward, creating missing nodes (write path)
    pub fn descend_or_create(self: &Arc<Self>, digits: &[u8; LEVELS]) -> Arc<Node> {
        let mut current = Arc::clone(self);
        for &digit in digits {
            current = current.get_or_create_child(digit);
        }
        current
    }

    /// Follow a digit path downward without creating anything (read path)
    pub fn descend(self: &Arc<Self>, digits: &[u8; LEVELS]) -> Option<Arc<Node>> {
        let mut current = Arc::clone(self);
        for &digit in digits {
            current = current.find_child(digit)?;
        }
        Some(current)
    }

    // =========================================================================
    // Leaf Access
    // =========================================================================

    /// Shared access to this leaf's Links
    pub fn links(&self) -> RwLockReadGuard<'_, Vec<Link>> {
        self.links.read()
    }

    /// Exclusive access to this leaf's Links.
    ///
    /// The guard is the bucket lock from the concurrency model: Link
    /// creation/update for one bucket is serialized by holding it.
    pub fn links_mut(&self) -> RwLockWriteGuard<'_, Vec<Link>> {
        self.links.write()
    }

    /// Find a Link by key digest (linear scan; buckets stay small)
    pub fn find_link(&self, digest: &[u8; 16]) -> Option<Link> {
        self.links
            .read()
            .iter()
            .find(|link| &link.key_digest == digest)
            .cloned()
    }
}
