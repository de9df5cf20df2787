// crates/boxnest-core/src/tree.rs
use glam::IVec2;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

use crate::{
    CellHandle, Hooks, Insets, LayoutError, Primitive, PrimitiveId, PrimitiveState, Result, Sizer,
    SizerOwner,
};

/// Arena owning every primitive of a layout.
///
/// Parent, cell and sizer-owner links are ids into this arena. Destroyed
/// primitives stay behind as tombstones until [`PrimitiveTree::purge_destroyed`]
/// so stale ids fail loudly instead of aliasing a newer primitive.
#[derive(Debug, Default)]
pub struct PrimitiveTree {
    primitives: HashMap<PrimitiveId, Primitive>,
    next_id: PrimitiveId,
}

impl PrimitiveTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, primitive: Primitive) -> PrimitiveId {
        let id = self.next_id;
        self.next_id += 1;
        trace!("Inserted primitive {} '{}' with size {:?}", id, primitive.name, primitive.size);
        self.primitives.insert(id, primitive);
        id
    }

    pub fn create(&mut self, size: IVec2, borders: impl Into<Insets>) -> PrimitiveId {
        self.insert(Primitive::new(size).with_borders(borders))
    }

    /// Raw access, including destroyed primitives.
    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(&id)
    }

    pub fn get_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.primitives.get_mut(&id)
    }

    /// Access to a live primitive.
    pub fn primitive(&self, id: PrimitiveId) -> Result<&Primitive> {
        match self.primitives.get(&id) {
            Some(prim) if prim.is_live() => Ok(prim),
            Some(_) => Err(LayoutError::Destroyed(id)),
            None => Err(LayoutError::UnknownPrimitive(id)),
        }
    }

    fn live_mut(&mut self, id: PrimitiveId) -> Result<&mut Primitive> {
        match self.primitives.get_mut(&id) {
            Some(prim) if prim.is_live() => Ok(prim),
            Some(_) => Err(LayoutError::Destroyed(id)),
            None => Err(LayoutError::UnknownPrimitive(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.primitives.values().filter(|prim| prim.is_live()).count()
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.primitive(id).is_ok()
    }

    /// Drop the tombstones of destroyed primitives.
    pub fn purge_destroyed(&mut self) -> usize {
        let before = self.primitives.len();
        self.primitives.retain(|_, prim| prim.is_live());
        before - self.primitives.len()
    }

    pub fn hooks_mut(&mut self, id: PrimitiveId) -> Result<&mut Hooks> {
        Ok(&mut self.live_mut(id)?.hooks)
    }

    /// Run `f` with the sizer of `id` taken out of its slot, putting it back
    /// afterwards whatever `f` returns.
    fn with_sizer<T>(
        &mut self,
        id: PrimitiveId,
        f: impl FnOnce(&mut Self, &mut dyn Sizer) -> Result<T>,
    ) -> Result<Option<T>> {
        let Some(mut sizer) = self.live_mut(id)?.sizer.take() else {
            return Ok(None);
        };

        let result = f(self, &mut *sizer);

        if let Some(prim) = self.primitives.get_mut(&id) {
            prim.sizer = Some(sizer);
        }

        result.map(Some)
    }

    /// Attach (or with `None`, detach) the nested sizer of `id`. The new sizer
    /// is bound to `id` as its owner; a replaced sizer is unbound and returned.
    pub fn set_sizer(
        &mut self,
        id: PrimitiveId,
        sizer: Option<Box<dyn Sizer>>,
    ) -> Result<Option<Box<dyn Sizer>>> {
        let owner = SizerOwner {
            id,
            borders: self.primitive(id)?.borders,
        };
        let mut previous = self.live_mut(id)?.sizer.take();

        if let Some(old) = previous.as_mut() {
            if let Err(err) = old.set_owner(self, None) {
                self.restore_sizer(id, owner, previous);
                return Err(err);
            }
        }

        if let Some(mut sizer) = sizer {
            if let Err(err) = sizer.set_owner(self, Some(owner)) {
                warn!("Failed to attach sizer to primitive {}: {}", id, err);
                self.restore_sizer(id, owner, previous);
                return Err(err);
            }
            self.live_mut(id)?.sizer = Some(sizer);
            debug!("Attached sizer to primitive {}", id);
        }

        Ok(previous)
    }

    /// Put `sizer` back into the slot of `id` and bind it to `owner` again.
    fn restore_sizer(&mut self, id: PrimitiveId, owner: SizerOwner, mut sizer: Option<Box<dyn Sizer>>) {
        if let Some(sizer) = sizer.as_mut() {
            if let Err(err) = sizer.set_owner(self, Some(owner)) {
                warn!("Could not rebind previous sizer of primitive {}: {}", id, err);
            }
        }
        if let Some(prim) = self.primitives.get_mut(&id) {
            prim.sizer = sizer;
        }
    }

    pub fn sizer(&self, id: PrimitiveId) -> Result<Option<&dyn Sizer>> {
        Ok(self.primitive(id)?.sizer())
    }

    pub fn borders(&self, id: PrimitiveId) -> Result<Insets> {
        Ok(self.primitive(id)?.borders)
    }

    /// Change the insets around the nested sizer and re-notify it of its owner.
    pub fn set_borders(&mut self, id: PrimitiveId, borders: impl Into<Insets>) -> Result<()> {
        let borders = borders.into();
        self.live_mut(id)?.borders = borders;

        self.with_sizer(id, |tree, sizer| {
            sizer.set_owner(tree, Some(SizerOwner { id, borders }))
        })?;

        Ok(())
    }

    /// Effective minimum size. Unless `ignore_sizer` is set, a primitive with
    /// a nested sizer reports the sizer's minimum grown by its borders.
    pub fn min_size(&self, id: PrimitiveId, ignore_sizer: bool) -> Result<IVec2> {
        let prim = self.primitive(id)?;

        match prim.sizer.as_deref() {
            Some(sizer) if !ignore_sizer => Ok(prim.borders.grow(sizer.min_size(self)?)),
            _ => Ok(prim.min_size),
        }
    }

    pub fn native_size(&self, id: PrimitiveId) -> Result<IVec2> {
        Ok(self.primitive(id)?.native_size())
    }

    pub fn size(&self, id: PrimitiveId) -> Result<IVec2> {
        Ok(self.primitive(id)?.size)
    }

    /// Negotiate a new size for `id` and return the size actually applied.
    ///
    /// The request is raised to the native size. With `is_min` the result
    /// becomes the new pinned minimum; otherwise it is also raised to the
    /// current effective minimum. The interior (size minus borders) is then
    /// forwarded to the nested sizer, if any.
    pub fn set_size(&mut self, id: PrimitiveId, size: IVec2, is_min: bool) -> Result<IVec2> {
        let prim = self.primitive(id)?;
        let borders = prim.borders;
        let requested = prim.native_size().max(size);

        let new_size = if is_min {
            requested
        } else {
            requested.max(self.min_size(id, false)?)
        };

        if new_size != size {
            trace!("Primitive {}: requested {:?}, clamped to {:?}", id, size, new_size);
        }

        self.with_sizer(id, |tree, sizer| sizer.set_size(tree, borders.shrink(new_size)))?;

        let prim = self.live_mut(id)?;
        prim.size = new_size;
        if is_min {
            prim.min_size = new_size;
        }
        prim.hooks.fire_resize(new_size);

        Ok(new_size)
    }

    pub fn set_pos(&mut self, id: PrimitiveId, pos: IVec2) -> Result<()> {
        let prim = self.live_mut(id)?;
        prim.position = pos;
        prim.hooks.fire_reposition(pos);
        Ok(())
    }

    /// Local position, or with `net` the absolute position obtained by adding
    /// the local positions of every ancestor.
    pub fn pos(&self, id: PrimitiveId, net: bool) -> Result<IVec2> {
        let prim = self.primitive(id)?;
        let mut pos = prim.position;

        if net {
            let mut current = prim.parent;
            while let Some(parent_id) = current {
                let parent = self.primitive(parent_id)?;
                pos += parent.position;
                current = parent.parent;
            }
        }

        Ok(pos)
    }

    pub fn parent(&self, id: PrimitiveId) -> Result<Option<PrimitiveId>> {
        Ok(self.primitive(id)?.parent)
    }

    /// Link `id` under `parent`, refusing links that would close a cycle.
    pub fn set_parent(&mut self, id: PrimitiveId, parent: Option<PrimitiveId>) -> Result<()> {
        if let Some(parent_id) = parent {
            let mut current = Some(parent_id);
            while let Some(ancestor) = current {
                if ancestor == id {
                    return Err(LayoutError::ParentCycle {
                        child: id,
                        parent: parent_id,
                    });
                }
                current = self.primitive(ancestor)?.parent;
            }
        }

        self.live_mut(id)?.parent = parent;
        Ok(())
    }

    pub fn cell(&self, id: PrimitiveId) -> Result<Option<CellHandle>> {
        Ok(self.primitive(id)?.cell)
    }

    pub fn set_cell(&mut self, id: PrimitiveId, cell: Option<CellHandle>) -> Result<()> {
        self.live_mut(id)?.cell = cell;
        Ok(())
    }

    /// Tear down `id`: its nested sizer (and everything in it) first, then its
    /// cell membership, then the destroy hook fires once and all hooks are
    /// disarmed. The primitive is dead afterwards.
    pub fn destroy(&mut self, id: PrimitiveId) -> Result<()> {
        self.with_sizer(id, |tree, sizer| sizer.destroy(tree))?;

        let prim = self.live_mut(id)?;
        prim.sizer = None;
        prim.cell = None;
        prim.hooks.fire_destroy();
        prim.hooks.disarm();
        prim.state = PrimitiveState::Destroyed;

        debug!("Destroyed primitive {} '{}'", id, prim.name);
        Ok(())
    }
}
