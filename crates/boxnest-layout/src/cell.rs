// crates/boxnest-layout/src/cell.rs
use boxnest_core::{Insets, PrimitiveId, Sizer};
use glam::IVec2;

/// Placement of an item inside its cell along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Min,
    Center,
    Max,
    #[default]
    Expand,
}

/// Something a sizer cell can hold.
#[derive(Debug)]
pub enum SizerItem {
    Primitive(PrimitiveId),
    Sizer(Box<dyn Sizer>),
    /// Empty space with a fixed minimum size.
    Space(IVec2),
}

impl From<PrimitiveId> for SizerItem {
    fn from(id: PrimitiveId) -> Self {
        SizerItem::Primitive(id)
    }
}

impl SizerItem {
    pub fn sizer(sizer: impl Sizer + 'static) -> Self {
        SizerItem::Sizer(Box::new(sizer))
    }

    pub fn space(width: i32, height: i32) -> Self {
        SizerItem::Space(IVec2::new(width, height))
    }
}

/// Per-cell settings used when an item is added to a sizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellOptions {
    /// Horizontal and vertical proportion; negative means "use the track default".
    pub proportions: (f32, f32),
    pub alignments: (Alignment, Alignment),
    pub borders: Insets,
    /// Explicit `(row, column)`; auto-placed when `None`.
    pub index: Option<(usize, usize)>,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            proportions: (-1.0, -1.0),
            alignments: (Alignment::Expand, Alignment::Expand),
            borders: Insets::ZERO,
            index: None,
        }
    }
}

impl CellOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_proportions(mut self, horizontal: f32, vertical: f32) -> Self {
        self.proportions = (horizontal, vertical);
        self
    }

    pub fn with_alignments(mut self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.alignments = (horizontal, vertical);
        self
    }

    pub fn with_borders(mut self, borders: impl Into<Insets>) -> Self {
        self.borders = borders.into();
        self
    }

    pub fn at(mut self, row: usize, column: usize) -> Self {
        self.index = Some((row, column));
        self
    }
}

#[derive(Debug)]
pub(crate) struct Cell {
    pub item: SizerItem,
    pub row: usize,
    pub column: usize,
    pub options: CellOptions,
}
