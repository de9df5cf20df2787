// src/sample.rs
//
// A sample nested layout made of three kinds of character blocks:
//
//   A: XXXXXXXX    B: ........    C: ++++++++
//
// A bordered block hosts its own grid sizer, so the sample exercises nested
// sizers, sub-sizers, gaps, cell borders, proportions and alignment.

use boxnest_core::{Insets, Primitive, PrimitiveId, PrimitiveTree, Result, Sizer};
use boxnest_layout::{Alignment, CellOptions, GridSizer, SizerItem};
use glam::IVec2;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    A,
    B,
    C,
}

impl BlockKind {
    pub fn fill(self) -> char {
        match self {
            BlockKind::A => 'X',
            BlockKind::B => '.',
            BlockKind::C => '+',
        }
    }
}

/// Resolved, absolute rectangle of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedBlock {
    pub id: PrimitiveId,
    pub kind: BlockKind,
    pub pos: IVec2,
    pub size: IVec2,
}

pub struct SampleLayout {
    pub tree: PrimitiveTree,
    pub root: GridSizer,
    kinds: HashMap<PrimitiveId, BlockKind>,
}

impl SampleLayout {
    fn block(&mut self, kind: BlockKind, width: i32, height: i32, borders: Insets) -> PrimitiveId {
        let name = format!("{:?}{}", kind, self.kinds.len());
        let id = self.tree.insert(
            Primitive::new(IVec2::new(width, height))
                .with_borders(borders)
                .with_name(name),
        );
        self.kinds.insert(id, kind);
        id
    }

    pub fn build() -> Result<Self> {
        let mut layout = Self {
            tree: PrimitiveTree::new(),
            root: GridSizer::horizontal(),
            kinds: HashMap::new(),
        };

        // Left column: a bordered block with a 3-row nested grid, a padded B
        // block and a C block.
        let mut left = GridSizer::vertical();
        let host = layout.block(BlockKind::A, 10, 10, Insets::new(2, 2, 1, 1));
        left.add(host, CellOptions::new().with_proportions(-1.0, 1.0))?;

        let mut nested = GridSizer::vertical().with_limit(3).with_gaps(1, 2);
        let nested_blocks = [
            (BlockKind::C, 5, CellOptions::new().with_proportions(-1.0, 0.5)),
            (BlockKind::B, 10, CellOptions::new().with_proportions(-1.0, 1.0)),
            (BlockKind::C, 5, CellOptions::new().with_proportions(-1.0, 0.5)),
            (BlockKind::B, 10, CellOptions::new()),
            (BlockKind::C, 5, CellOptions::new().with_proportions(1.0, -1.0)),
        ];
        for (kind, width, options) in nested_blocks {
            let id = layout.block(kind, width, 2, Insets::ZERO);
            nested.add(id, options)?;
        }
        layout.tree.set_sizer(host, Some(Box::new(nested)))?;

        let padded = layout.block(BlockKind::B, 10, 2, Insets::ZERO);
        left.add(
            padded,
            CellOptions::new()
                .with_proportions(1.0, -1.0)
                .with_borders((1, 2, 4, 3)),
        )?;
        let footer = layout.block(BlockKind::C, 5, 2, Insets::ZERO);
        left.add(footer, CellOptions::new().with_proportions(-1.0, 0.5))?;

        // Right column, centered horizontally within its half.
        let mut right = GridSizer::vertical().with_gaps(0, 2);
        let top = layout.block(BlockKind::A, 5, 2, Insets::ZERO);
        right.add(top, CellOptions::new())?;
        let middle = layout.block(BlockKind::B, 20, 2, Insets::ZERO);
        right.add(middle, CellOptions::new().with_proportions(-1.0, 0.25))?;
        let bottom = layout.block(BlockKind::C, 1, 2, Insets::ZERO);
        right.add(
            bottom,
            CellOptions::new()
                .with_proportions(-1.0, 0.75)
                .with_alignments(Alignment::Max, Alignment::Expand),
        )?;

        layout.root.set_column_proportion(0, 1.0);
        layout.root.set_column_proportion(1, 1.0);
        layout.root.set_row_proportion(0, 1.0);
        layout.root.add(
            SizerItem::sizer(left),
            CellOptions::new().with_borders(Insets::uniform(1)),
        )?;
        layout.root.add(
            SizerItem::sizer(right),
            CellOptions::new()
                .with_alignments(Alignment::Center, Alignment::Expand)
                .with_borders(Insets::uniform(1)),
        )?;

        Ok(layout)
    }

    /// Lay the sample out in `space`; returns the space actually used, which
    /// grows to the layout's minimum if `space` is too small.
    pub fn update(&mut self, space: IVec2) -> Result<IVec2> {
        self.root.update(&mut self.tree, space)
    }

    pub fn kind(&self, id: PrimitiveId) -> Option<BlockKind> {
        self.kinds.get(&id).copied()
    }

    /// Every block reachable from the root sizer, nested ones after their host.
    pub fn primitives(&self) -> Result<Vec<PrimitiveId>> {
        let mut ids = Vec::new();
        for id in self.root.primitives() {
            self.collect(id, &mut ids)?;
        }
        Ok(ids)
    }

    fn collect(&self, id: PrimitiveId, ids: &mut Vec<PrimitiveId>) -> Result<()> {
        ids.push(id);
        if let Some(sizer) = self.tree.sizer(id)? {
            for child in sizer.primitives() {
                self.collect(child, ids)?;
            }
        }
        Ok(())
    }

    pub fn placed_blocks(&self) -> Result<Vec<PlacedBlock>> {
        let mut blocks = Vec::new();
        for id in self.primitives()? {
            if let Some(kind) = self.kind(id) {
                blocks.push(PlacedBlock {
                    id,
                    kind,
                    pos: self.tree.pos(id, true)?,
                    size: self.tree.size(id)?,
                });
            }
        }
        Ok(blocks)
    }
}
