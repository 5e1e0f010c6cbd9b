use std::fmt;

/// Identifier for a node in a [`crate::scene::SceneGraph`].
///
/// Ids are allocated from a monotonic counter and never reused, so a
/// regenerated hierarchy always carries fresh identities even when its
/// geometry is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
