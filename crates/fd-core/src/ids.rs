use core::fmt;
use core::num::NonZeroU32;

/// Compact identifier for nodes and edges of a fracture network.
///
/// Stored as `index + 1` so that `Option<Id>` costs nothing extra.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index.
    ///
    /// Panics if `index == u32::MAX`; no network gets anywhere near that size.
    pub fn from_index(index: u32) -> Self {
        match index.checked_add(1).and_then(NonZeroU32::new) {
            Some(v) => Self(v),
            None => panic!("id index overflow"),
        }
    }

    /// Create an Id from a `usize` position in a contiguous vector.
    ///
    /// Panics if `index` does not fit an id.
    pub fn from_usize(index: usize) -> Self {
        let index = u32::try_from(index).expect("id index overflow");
        Self::from_index(index)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// The 0-based index as `usize`, for slicing.
    pub fn idx(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Fracture intersection (graph node).
pub type NodeId = Id;
/// Fracture channel (graph edge).
pub type EdgeId = Id;

/// Label of the fracture polygon an edge was extracted from.
pub type FracId = u32;
