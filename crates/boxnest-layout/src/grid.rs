// crates/boxnest-layout/src/grid.rs
use boxnest_core::{
    CellHandle, LayoutError, PrimitiveId, PrimitiveTree, Result, Sizer, SizerOwner,
};
use glam::IVec2;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::cell::Cell;
use crate::taffy_engine::{self, CellRequest, GridRequest, Track, MAX_TRACK_INDEX};
use crate::{CellOptions, SizerItem};

/// Primary direction in which auto-placed items are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

/// Grid-shaped sizer: items sit in (row, column) cells, tracks grow by
/// proportion, and gaps separate rows and columns.
#[derive(Debug)]
pub struct GridSizer {
    direction: Direction,
    limit: usize,
    gaps: IVec2,
    cells: Vec<Cell>,
    column_proportions: HashMap<usize, f32>,
    row_proportions: HashMap<usize, f32>,
    owner: Option<SizerOwner>,
    origin: IVec2,
    size: IVec2,
    next_slot: usize,
}

impl GridSizer {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            limit: 0,
            gaps: IVec2::ZERO,
            cells: Vec::new(),
            column_proportions: HashMap::new(),
            row_proportions: HashMap::new(),
            owner: None,
            origin: IVec2::ZERO,
            size: IVec2::ZERO,
            next_slot: 0,
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    /// Wrap auto-placement after `limit` cells along the primary direction
    /// (`0` never wraps).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_gaps(mut self, column_gap: i32, row_gap: i32) -> Self {
        self.gaps = IVec2::new(column_gap, row_gap);
        self
    }

    /// Size applied by the last layout pass.
    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `(rows, columns)` spanned by the current cells.
    pub fn dimensions(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(rows, columns), cell| {
            (rows.max(cell.row + 1), columns.max(cell.column + 1))
        })
    }

    pub fn set_column_proportion(&mut self, column: usize, proportion: f32) {
        self.column_proportions.insert(column, proportion);
    }

    pub fn set_row_proportion(&mut self, row: usize, proportion: f32) {
        self.row_proportions.insert(row, proportion);
    }

    /// Explicit proportion if set, otherwise the largest non-negative cell
    /// proportion in the column.
    pub fn column_proportion(&self, column: usize) -> f32 {
        self.column_proportions.get(&column).copied().unwrap_or_else(|| {
            self.cells
                .iter()
                .filter(|cell| cell.column == column)
                .map(|cell| cell.options.proportions.0)
                .fold(0.0, f32::max)
        })
    }

    pub fn row_proportion(&self, row: usize) -> f32 {
        self.row_proportions.get(&row).copied().unwrap_or_else(|| {
            self.cells
                .iter()
                .filter(|cell| cell.row == row)
                .map(|cell| cell.options.proportions.1)
                .fold(0.0, f32::max)
        })
    }

    fn is_occupied(&self, row: usize, column: usize) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.row == row && cell.column == column)
    }

    fn slot_index(&self, slot: usize) -> (usize, usize) {
        let (major, minor) = if self.limit == 0 {
            (0, slot)
        } else {
            (slot / self.limit, slot % self.limit)
        };

        match self.direction {
            Direction::Horizontal => (major, minor),
            Direction::Vertical => (minor, major),
        }
    }

    fn next_free_index(&mut self) -> (usize, usize) {
        loop {
            let (row, column) = self.slot_index(self.next_slot);
            self.next_slot += 1;
            if !self.is_occupied(row, column) {
                return (row, column);
            }
        }
    }

    /// Add an item and return the `(row, column)` of its cell.
    pub fn add(&mut self, item: impl Into<SizerItem>, options: CellOptions) -> Result<(usize, usize)> {
        let (row, column) = match options.index {
            Some((row, column)) if self.is_occupied(row, column) => {
                return Err(LayoutError::CellOccupied { row, column });
            }
            Some(index) => index,
            None => self.next_free_index(),
        };
        if row > MAX_TRACK_INDEX || column > MAX_TRACK_INDEX {
            return Err(LayoutError::CellOutOfRange { row, column });
        }

        self.cells.push(Cell {
            item: item.into(),
            row,
            column,
            options,
        });

        Ok((row, column))
    }

    /// Lay out a root sizer in `size` and return the size applied, which is
    /// raised to the sizer's minimum when the space is too small.
    pub fn update(&mut self, tree: &mut PrimitiveTree, size: IVec2) -> Result<IVec2> {
        self.set_owner(tree, self.owner)?;
        self.set_size(tree, size)
    }

    fn item_min(tree: &PrimitiveTree, item: &SizerItem) -> Result<IVec2> {
        match item {
            SizerItem::Primitive(id) => Ok(tree.min_size(*id, false)?.max(tree.native_size(*id)?)),
            SizerItem::Sizer(sizer) => sizer.min_size(tree),
            SizerItem::Space(size) => Ok(size.max(IVec2::ZERO)),
        }
    }

    fn layout_input(&self, tree: &PrimitiveTree) -> Result<(Vec<Track>, Vec<Track>, Vec<CellRequest>)> {
        let (rows, columns) = self.dimensions();
        let mut column_tracks: Vec<Track> = (0..columns)
            .map(|column| Track {
                min: 0,
                proportion: self.column_proportion(column),
            })
            .collect();
        let mut row_tracks: Vec<Track> = (0..rows)
            .map(|row| Track {
                min: 0,
                proportion: self.row_proportion(row),
            })
            .collect();

        let mut requests = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            let min = Self::item_min(tree, &cell.item)?;
            let outer = cell.options.borders.grow(min);

            let column = &mut column_tracks[cell.column];
            column.min = column.min.max(outer.x);
            let row = &mut row_tracks[cell.row];
            row.min = row.min.max(outer.y);

            requests.push(CellRequest {
                row: cell.row,
                column: cell.column,
                min,
                borders: cell.options.borders,
                alignments: cell.options.alignments,
            });
        }

        Ok((column_tracks, row_tracks, requests))
    }
}

fn track_span(tracks: &[Track], gap: i32) -> i32 {
    if tracks.is_empty() {
        return 0;
    }
    tracks.iter().map(|track| track.min).sum::<i32>() + gap * (tracks.len() as i32 - 1)
}

impl Sizer for GridSizer {
    fn owner(&self) -> Option<SizerOwner> {
        self.owner
    }

    fn set_owner(&mut self, tree: &mut PrimitiveTree, owner: Option<SizerOwner>) -> Result<()> {
        self.owner = owner;
        if let Some(owner) = owner {
            self.origin = owner.borders.origin();
        }

        let owner_id = owner.map(|owner| owner.id);
        for cell in &mut self.cells {
            match &mut cell.item {
                SizerItem::Primitive(id) => {
                    tree.set_parent(*id, owner_id)?;
                    tree.set_cell(
                        *id,
                        Some(CellHandle {
                            owner: owner_id,
                            row: cell.row,
                            column: cell.column,
                        }),
                    )?;
                }
                SizerItem::Sizer(sizer) => sizer.set_owner(tree, owner)?,
                SizerItem::Space(_) => {}
            }
        }

        debug!("Bound {} cells to owner {:?}", self.cells.len(), owner_id);
        Ok(())
    }

    fn origin(&self) -> IVec2 {
        self.origin
    }

    fn set_origin(&mut self, origin: IVec2) {
        self.origin = origin;
    }

    fn min_size(&self, tree: &PrimitiveTree) -> Result<IVec2> {
        let (columns, rows, _) = self.layout_input(tree)?;
        Ok(IVec2::new(
            track_span(&columns, self.gaps.x),
            track_span(&rows, self.gaps.y),
        ))
    }

    fn set_size(&mut self, tree: &mut PrimitiveTree, size: IVec2) -> Result<IVec2> {
        let (columns, rows, requests) = self.layout_input(tree)?;
        let min = IVec2::new(
            track_span(&columns, self.gaps.x),
            track_span(&rows, self.gaps.y),
        );
        if size.x < min.x || size.y < min.y {
            warn!("Grid given {:?}, below its minimum {:?}; growing to fit", size, min);
        }
        let size = size.max(min);

        let placements = taffy_engine::solve(&GridRequest {
            size,
            gaps: self.gaps,
            columns: &columns,
            rows: &rows,
            cells: &requests,
        })?;

        let origin = self.origin;
        for ((cell, request), placement) in self.cells.iter_mut().zip(&requests).zip(placements) {
            let item_size = placement.size.max(request.min);
            let pos = origin + placement.pos;

            match &mut cell.item {
                SizerItem::Primitive(id) => {
                    tree.set_size(*id, item_size, false)?;
                    tree.set_pos(*id, pos)?;
                }
                SizerItem::Sizer(sizer) => {
                    sizer.set_origin(pos);
                    sizer.set_size(tree, item_size)?;
                }
                SizerItem::Space(_) => {}
            }
        }

        debug!(
            "Grid {}x{} laid out in {:?} (min {:?}) at {:?}",
            rows.len(),
            columns.len(),
            size,
            min,
            origin
        );

        self.size = size;
        Ok(size)
    }

    fn primitives(&self) -> Vec<PrimitiveId> {
        let mut primitives = Vec::new();
        for cell in &self.cells {
            match &cell.item {
                SizerItem::Primitive(id) => primitives.push(*id),
                SizerItem::Sizer(sizer) => primitives.extend(sizer.primitives()),
                SizerItem::Space(_) => {}
            }
        }
        primitives
    }

    fn destroy(&mut self, tree: &mut PrimitiveTree) -> Result<()> {
        for cell in self.cells.drain(..) {
            match cell.item {
                SizerItem::Primitive(id) => {
                    if tree.contains(id) {
                        tree.destroy(id)?;
                    }
                }
                SizerItem::Sizer(mut sizer) => sizer.destroy(tree)?,
                SizerItem::Space(_) => {}
            }
        }

        self.owner = None;
        self.next_slot = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Alignment;
    use boxnest_core::Insets;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn block(tree: &mut PrimitiveTree, width: i32, height: i32) -> PrimitiveId {
        tree.create(IVec2::new(width, height), Insets::ZERO)
    }

    #[test]
    fn test_auto_placement_horizontal() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal();

        for _ in 0..3 {
            let id = block(&mut tree, 1, 1);
            sizer.add(id, CellOptions::new()).unwrap();
        }

        assert_eq!(sizer.dimensions(), (1, 3));
    }

    #[test]
    fn test_auto_placement_wraps_at_limit() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::vertical().with_limit(3);

        let indices: Vec<_> = (0..5)
            .map(|_| {
                let id = block(&mut tree, 1, 1);
                sizer.add(id, CellOptions::new()).unwrap()
            })
            .collect();

        assert_eq!(indices, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)]);
        assert_eq!(sizer.dimensions(), (3, 2));
    }

    #[test]
    fn test_explicit_placement_and_occupied_cells() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal();
        let a = block(&mut tree, 1, 1);
        let b = block(&mut tree, 1, 1);
        let c = block(&mut tree, 1, 1);

        assert_eq!(sizer.add(a, CellOptions::new().at(0, 0)).unwrap(), (0, 0));
        // Auto-placement skips the taken slot.
        assert_eq!(sizer.add(b, CellOptions::new()).unwrap(), (0, 1));
        assert!(matches!(
            sizer.add(c, CellOptions::new().at(0, 1)),
            Err(LayoutError::CellOccupied { row: 0, column: 1 })
        ));
    }

    #[test]
    fn test_far_cells_are_rejected_and_layout_still_runs() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal();
        let a = block(&mut tree, 2, 2);
        let b = block(&mut tree, 1, 1);
        sizer.add(a, CellOptions::new()).unwrap();

        assert!(matches!(
            sizer.add(b, CellOptions::new().at(0, 40000)),
            Err(LayoutError::CellOutOfRange { row: 0, column: 40000 })
        ));
        assert_eq!(sizer.len(), 1);
        assert_eq!(sizer.update(&mut tree, IVec2::new(6, 6)).unwrap(), IVec2::new(6, 6));
        assert_eq!(tree.size(a).unwrap(), IVec2::new(2, 2));
    }

    #[test]
    fn test_track_proportion_defaults_to_cell_proportion() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::vertical();
        let a = block(&mut tree, 1, 1);
        let b = block(&mut tree, 1, 1);
        sizer.add(a, CellOptions::new().with_proportions(-1.0, 0.5)).unwrap();
        sizer.add(b, CellOptions::new().with_proportions(2.0, -1.0)).unwrap();

        assert_eq!(sizer.row_proportion(0), 0.5);
        assert_eq!(sizer.row_proportion(1), 0.0);
        assert_eq!(sizer.column_proportion(0), 2.0);

        sizer.set_row_proportion(1, 3.0);
        assert_eq!(sizer.row_proportion(1), 3.0);
    }

    #[test]
    fn test_min_size_sums_tracks_gaps_and_borders() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal().with_gaps(2, 0);
        let a = block(&mut tree, 5, 2);
        let b = block(&mut tree, 3, 4);
        sizer.add(a, CellOptions::new().with_borders((1, 1, 0, 0))).unwrap();
        sizer.add(b, CellOptions::new()).unwrap();
        sizer.add(SizerItem::space(4, 6), CellOptions::new()).unwrap();

        assert_eq!(sizer.min_size(&tree).unwrap(), IVec2::new(7 + 2 + 3 + 2 + 4, 6));
    }

    #[test]
    fn test_empty_sizer_has_zero_minimum() {
        let tree = PrimitiveTree::new();
        let sizer = GridSizer::vertical();
        assert_eq!(sizer.min_size(&tree).unwrap(), IVec2::ZERO);
    }

    #[test]
    fn test_fixed_tracks_keep_items_at_minimum() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal();
        let a = block(&mut tree, 5, 2);
        let b = block(&mut tree, 3, 4);
        sizer.add(a, CellOptions::new()).unwrap();
        sizer.add(b, CellOptions::new()).unwrap();

        let applied = sizer.update(&mut tree, IVec2::new(20, 10)).unwrap();

        assert_eq!(applied, IVec2::new(20, 10));
        assert_eq!(tree.size(a).unwrap(), IVec2::new(5, 4));
        assert_eq!(tree.size(b).unwrap(), IVec2::new(3, 4));
        assert_eq!(tree.pos(a, false).unwrap(), IVec2::ZERO);
        assert_eq!(tree.pos(b, false).unwrap(), IVec2::new(5, 0));
    }

    #[test]
    fn test_proportional_tracks_share_space() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal();
        sizer.set_column_proportion(0, 1.0);
        sizer.set_column_proportion(1, 1.0);
        sizer.set_row_proportion(0, 1.0);
        let a = block(&mut tree, 2, 2);
        let b = block(&mut tree, 2, 2);
        sizer.add(a, CellOptions::new()).unwrap();
        sizer.add(b, CellOptions::new()).unwrap();

        sizer.update(&mut tree, IVec2::new(20, 6)).unwrap();

        assert_eq!(tree.size(a).unwrap(), IVec2::new(10, 6));
        assert_eq!(tree.size(b).unwrap(), IVec2::new(10, 6));
        assert_eq!(tree.pos(b, false).unwrap(), IVec2::new(10, 0));
    }

    #[test]
    fn test_fractional_proportions_still_fill_space() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::vertical();
        let a = block(&mut tree, 2, 2);
        sizer.add(a, CellOptions::new().with_proportions(-1.0, 0.5)).unwrap();

        sizer.update(&mut tree, IVec2::new(2, 9)).unwrap();

        assert_eq!(tree.size(a).unwrap(), IVec2::new(2, 9));
    }

    #[test]
    fn test_update_never_goes_below_minimum() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal().with_gaps(1, 0);
        let a = block(&mut tree, 4, 3);
        let b = block(&mut tree, 4, 3);
        sizer.add(a, CellOptions::new()).unwrap();
        sizer.add(b, CellOptions::new()).unwrap();

        let applied = sizer.update(&mut tree, IVec2::new(2, 2)).unwrap();

        assert_eq!(applied, IVec2::new(9, 3));
        assert_eq!(sizer.size(), applied);
        assert_eq!(tree.pos(b, false).unwrap(), IVec2::new(5, 0));
    }

    #[test]
    fn test_aligned_items_keep_minimum_size() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal();
        sizer.set_column_proportion(0, 1.0);
        sizer.set_row_proportion(0, 1.0);
        let a = block(&mut tree, 2, 2);
        sizer
            .add(a, CellOptions::new().with_alignments(Alignment::Center, Alignment::Min))
            .unwrap();

        sizer.update(&mut tree, IVec2::new(10, 4)).unwrap();

        assert_eq!(tree.size(a).unwrap(), IVec2::new(2, 2));
        assert_eq!(tree.pos(a, false).unwrap(), IVec2::new(4, 0));
    }

    #[test]
    fn test_cell_borders_offset_items() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal();
        let a = block(&mut tree, 3, 2);
        sizer.add(a, CellOptions::new().with_borders((1, 2, 4, 3))).unwrap();

        let applied = sizer.update(&mut tree, IVec2::ZERO).unwrap();

        assert_eq!(applied, IVec2::new(6, 9));
        assert_eq!(tree.pos(a, false).unwrap(), IVec2::new(1, 3));
        assert_eq!(tree.size(a).unwrap(), IVec2::new(3, 2));
    }

    #[test]
    fn test_sub_sizer_positions_are_offset() {
        let mut tree = PrimitiveTree::new();
        let mut root = GridSizer::horizontal();
        let mut column = GridSizer::vertical();
        let a = block(&mut tree, 2, 2);
        let b = block(&mut tree, 2, 1);
        column.add(a, CellOptions::new()).unwrap();
        column.add(b, CellOptions::new()).unwrap();
        root.add(SizerItem::space(3, 1), CellOptions::new()).unwrap();
        root.add(SizerItem::sizer(column), CellOptions::new()).unwrap();

        assert_eq!(root.min_size(&tree).unwrap(), IVec2::new(5, 3));
        root.update(&mut tree, IVec2::ZERO).unwrap();

        assert_eq!(tree.pos(a, false).unwrap(), IVec2::new(3, 0));
        assert_eq!(tree.pos(b, false).unwrap(), IVec2::new(3, 2));
        assert_eq!(root.primitives(), vec![a, b]);
    }

    #[test]
    fn test_update_records_cell_membership() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal();
        let a = block(&mut tree, 1, 1);
        let b = block(&mut tree, 1, 1);
        sizer.add(a, CellOptions::new()).unwrap();
        sizer.add(b, CellOptions::new()).unwrap();

        sizer.update(&mut tree, IVec2::ZERO).unwrap();

        assert_eq!(
            tree.cell(b).unwrap(),
            Some(CellHandle {
                owner: None,
                row: 0,
                column: 1
            })
        );
        assert_eq!(tree.parent(b).unwrap(), None);
    }

    #[test]
    fn test_owned_sizer_uses_owner_borders() {
        let mut tree = PrimitiveTree::new();
        let owner = tree.create(IVec2::new(10, 10), (2, 2, 1, 1));
        let child = block(&mut tree, 3, 3);
        let mut sizer = GridSizer::horizontal();
        sizer.add(child, CellOptions::new()).unwrap();
        tree.set_sizer(owner, Some(Box::new(sizer))).unwrap();

        assert_eq!(tree.parent(child).unwrap(), Some(owner));
        assert_eq!(tree.cell(child).unwrap().and_then(|cell| cell.owner), Some(owner));
        assert_eq!(tree.min_size(owner, false).unwrap(), IVec2::new(7, 5));

        tree.set_pos(owner, IVec2::new(5, 5)).unwrap();
        tree.set_size(owner, IVec2::new(20, 12), false).unwrap();

        assert_eq!(tree.size(child).unwrap(), IVec2::new(3, 3));
        assert_eq!(tree.pos(child, false).unwrap(), IVec2::new(2, 1));
        assert_eq!(tree.pos(child, true).unwrap(), IVec2::new(7, 6));
    }

    #[test]
    fn test_destroy_releases_every_item() {
        let mut tree = PrimitiveTree::new();
        let mut sizer = GridSizer::horizontal();
        let mut inner = GridSizer::vertical();
        let a = block(&mut tree, 1, 1);
        let b = block(&mut tree, 1, 1);
        let destroyed = Rc::new(RefCell::new(Vec::new()));
        for id in [a, b] {
            let sink = destroyed.clone();
            tree.hooks_mut(id)
                .unwrap()
                .set_on_destroy(Some(Box::new(move || sink.borrow_mut().push(id))));
        }
        inner.add(b, CellOptions::new()).unwrap();
        sizer.add(a, CellOptions::new()).unwrap();
        sizer.add(SizerItem::sizer(inner), CellOptions::new()).unwrap();

        sizer.destroy(&mut tree).unwrap();

        assert_eq!(*destroyed.borrow(), vec![a, b]);
        assert!(sizer.is_empty());
        assert_eq!(tree.live_count(), 0);
    }
}
