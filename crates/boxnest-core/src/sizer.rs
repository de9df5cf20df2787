// crates/boxnest-core/src/sizer.rs
use glam::IVec2;
use std::fmt;

use crate::{Insets, PrimitiveId, PrimitiveTree, Result};

/// Back-reference from a sizer to the primitive whose interior it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizerOwner {
    pub id: PrimitiveId,
    pub borders: Insets,
}

/// A layout container that distributes space among the primitives it holds.
///
/// A sizer attached to a primitive is owned by it; the tree hands the sizer
/// mutable access to the rest of the tree while it runs, so implementations
/// must never address their own owner through `tree` during `set_size`,
/// `set_owner` or `destroy`.
pub trait Sizer: fmt::Debug {
    fn owner(&self) -> Option<SizerOwner>;

    /// Record the owner and link every contained primitive to it (parent and
    /// cell membership). `None` detaches the contents from any owner.
    fn set_owner(&mut self, tree: &mut PrimitiveTree, owner: Option<SizerOwner>) -> Result<()>;

    /// Offset added to every child position.
    fn origin(&self) -> IVec2;

    fn set_origin(&mut self, origin: IVec2);

    fn min_size(&self, tree: &PrimitiveTree) -> Result<IVec2>;

    /// Resize and reposition every child for the given interior size. Returns
    /// the size actually applied, which is never below `min_size`.
    fn set_size(&mut self, tree: &mut PrimitiveTree, size: IVec2) -> Result<IVec2>;

    /// Every primitive held, depth-first through nested sizers.
    fn primitives(&self) -> Vec<PrimitiveId>;

    fn destroy(&mut self, tree: &mut PrimitiveTree) -> Result<()>;
}
