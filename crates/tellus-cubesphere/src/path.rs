//! Quadtree paths addressing nodes on one cube face.

/// The location of a quadtree node on a cube face, as the sequence of
/// quadrants walked from the root.
///
/// Each element selects one of the four quadrants of its parent:
///
/// ```text
///   3   2
///     +
///   0   1
/// ```
///
/// (0 = bottom-left, 1 = bottom-right, 2 = top-right, 3 = top-left.)
/// The path length is the node's depth; the root has the empty path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkPath {
    segments: Vec<u8>,
}

impl ChunkPath {
    /// Number of quadrants a node subdivides into.
    pub const QUADRANTS: u8 = 4;

    /// The empty path addressing the root node of a face.
    #[must_use]
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// Build a path from explicit quadrant indices.
    ///
    /// # Panics
    ///
    /// Panics if any segment is not a valid quadrant index (0..4).
    #[must_use]
    pub fn new(segments: Vec<u8>) -> Self {
        for &segment in &segments {
            assert!(
                segment < Self::QUADRANTS,
                "invalid quadrant {segment} in path"
            );
        }
        Self { segments }
    }

    /// Depth of the node this path addresses (root = 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path of the child in the given quadrant.
    ///
    /// # Panics
    ///
    /// Panics if `quadrant` is not in 0..4.
    #[must_use]
    pub fn child(&self, quadrant: u8) -> Self {
        assert!(
            quadrant < Self::QUADRANTS,
            "invalid quadrant {quadrant} for child path"
        );
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(quadrant);
        Self { segments }
    }

    /// The parent's path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The quadrant sequence from the root.
    #[must_use]
    pub fn segments(&self) -> &[u8] {
        &self.segments
    }
}

impl std::fmt::Display for ChunkPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P")?;
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_root_has_depth_zero() {
        let root = ChunkPath::root();
        assert_eq!(root.depth(), 0);
        assert!(root.is_root());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_child_extends_depth() {
        let path = ChunkPath::root().child(2).child(0).child(3);
        assert_eq!(path.depth(), 3);
        assert_eq!(path.segments(), &[2, 0, 3]);
    }

    #[test]
    fn test_parent_reverses_child() {
        let path = ChunkPath::new(vec![1, 3]);
        let parent = path.parent().expect("depth-2 path should have a parent");
        assert_eq!(parent, ChunkPath::new(vec![1]));
        assert_eq!(parent.parent(), Some(ChunkPath::root()));
    }

    #[test]
    fn test_sibling_paths_are_distinct() {
        let parent = ChunkPath::new(vec![0]);
        let children: HashSet<ChunkPath> =
            (0..4).map(|q| parent.child(q)).collect();
        assert_eq!(children.len(), 4);
    }

    #[test]
    #[should_panic(expected = "invalid quadrant")]
    fn test_invalid_segment_panics() {
        ChunkPath::new(vec![0, 4]);
    }

    #[test]
    #[should_panic(expected = "invalid quadrant")]
    fn test_invalid_child_panics() {
        ChunkPath::root().child(7);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(ChunkPath::root().to_string(), "P");
        assert_eq!(ChunkPath::new(vec![0, 1, 3]).to_string(), "P013");
    }

    #[test]
    fn test_hashable() {
        let mut set = HashSet::new();
        set.insert(ChunkPath::new(vec![1, 2]));
        set.insert(ChunkPath::new(vec![1, 2]));
        assert_eq!(set.len(), 1);
    }
}
