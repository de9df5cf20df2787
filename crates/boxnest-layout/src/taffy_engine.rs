//! Taffy-backed track solver for grid sizers
//!
//! The sizer works out minimums and proportions itself; Taffy's CSS grid
//! algorithm then distributes the available space across tracks, applies gaps
//! and cell margins, and aligns each item inside its cell.

use boxnest_core::{Insets, LayoutError, Result};
use glam::IVec2;
use taffy::prelude::*;
use taffy::style_helpers::minmax;
use tracing::trace;

use crate::Alignment;

/// One row or column of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub min: i32,
    /// Share of the space beyond the minimums; `0.0` keeps the track at its minimum.
    pub proportion: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRequest {
    pub row: usize,
    pub column: usize,
    /// Minimum size of the item itself, excluding cell borders.
    pub min: IVec2,
    pub borders: Insets,
    pub alignments: (Alignment, Alignment),
}

/// Resolved box of an item, relative to the grid origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub pos: IVec2,
    pub size: IVec2,
}

#[derive(Debug, Clone)]
pub struct GridRequest<'a> {
    pub size: IVec2,
    pub gaps: IVec2,
    pub columns: &'a [Track],
    pub rows: &'a [Track],
    pub cells: &'a [CellRequest],
}

/// Largest row or column index a grid may use. Taffy addresses grid lines as
/// `i16` and adds track counts to them, so half the range is kept as headroom.
pub const MAX_TRACK_INDEX: usize = (i16::MAX / 2) as usize;

fn engine_error(err: taffy::TaffyError) -> LayoutError {
    LayoutError::Engine(err.to_string())
}

/// Flex factors summing to less than one would leave part of the free space
/// unused under CSS grid rules, so they are scaled up while keeping their ratios.
fn normalized_proportions(tracks: &[Track]) -> Vec<f32> {
    let total: f32 = tracks.iter().map(|t| t.proportion.max(0.0)).sum();
    let scale = if total > 0.0 && total < 1.0 { 1.0 / total } else { 1.0 };

    tracks.iter().map(|t| t.proportion.max(0.0) * scale).collect()
}

fn track_list(tracks: &[Track]) -> Vec<TrackSizingFunction> {
    tracks
        .iter()
        .zip(normalized_proportions(tracks))
        .map(|(track, proportion)| -> TrackSizingFunction {
            let min = track.min.max(0) as f32;
            if proportion > 0.0 {
                minmax(length(min), fr(proportion))
            } else {
                length(min)
            }
        })
        .collect()
}

fn align_self(alignment: Alignment) -> AlignSelf {
    match alignment {
        Alignment::Min => AlignSelf::Start,
        Alignment::Center => AlignSelf::Center,
        Alignment::Max => AlignSelf::End,
        Alignment::Expand => AlignSelf::Stretch,
    }
}

fn item_dimension(alignment: Alignment, min: i32) -> Dimension {
    match alignment {
        Alignment::Expand => Dimension::Auto,
        _ => length(min as f32),
    }
}

fn grid_line(cell: &CellRequest, index: usize) -> Result<taffy::Line<taffy::GridPlacement>> {
    let line = i16::try_from(index + 1)
        .ok()
        .filter(|_| index <= MAX_TRACK_INDEX)
        .ok_or(LayoutError::CellOutOfRange {
            row: cell.row,
            column: cell.column,
        })?;

    Ok(taffy::Line {
        start: taffy::GridPlacement::Line(line.into()),
        end: taffy::GridPlacement::Span(1),
    })
}

fn cell_style(cell: &CellRequest) -> Result<Style> {
    let (horizontal, vertical) = cell.alignments;
    let min = cell.min.max(IVec2::ZERO);

    Ok(Style {
        grid_row: grid_line(cell, cell.row)?,
        grid_column: grid_line(cell, cell.column)?,
        margin: Rect {
            left: length(cell.borders.left as f32),
            right: length(cell.borders.right as f32),
            top: length(cell.borders.top as f32),
            bottom: length(cell.borders.bottom as f32),
        },
        justify_self: Some(align_self(horizontal)),
        align_self: Some(align_self(vertical)),
        min_size: Size {
            width: length(min.x as f32),
            height: length(min.y as f32),
        },
        size: Size {
            width: item_dimension(horizontal, min.x),
            height: item_dimension(vertical, min.y),
        },
        ..Default::default()
    })
}

/// Lay out one grid level. Placements are returned in the order of `request.cells`.
pub fn solve(request: &GridRequest<'_>) -> Result<Vec<CellPlacement>> {
    if request.cells.is_empty() {
        return Ok(Vec::new());
    }

    let styles = request
        .cells
        .iter()
        .map(cell_style)
        .collect::<Result<Vec<_>>>()?;

    let mut taffy: TaffyTree<()> = TaffyTree::new();

    let children = styles
        .into_iter()
        .map(|style| taffy.new_leaf(style))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(engine_error)?;

    let width = request.size.x.max(0) as f32;
    let height = request.size.y.max(0) as f32;

    let root_style = Style {
        display: Display::Grid,
        size: Size {
            width: length(width),
            height: length(height),
        },
        grid_template_columns: track_list(request.columns),
        grid_template_rows: track_list(request.rows),
        gap: Size {
            width: length(request.gaps.x.max(0) as f32),
            height: length(request.gaps.y.max(0) as f32),
        },
        justify_content: Some(JustifyContent::Start),
        align_content: Some(AlignContent::Start),
        ..Default::default()
    };
    let root = taffy
        .new_with_children(root_style, &children)
        .map_err(engine_error)?;

    taffy
        .compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(width),
                height: AvailableSpace::Definite(height),
            },
        )
        .map_err(engine_error)?;

    let mut placements = Vec::with_capacity(children.len());
    for (cell, &node) in request.cells.iter().zip(&children) {
        let layout = taffy.layout(node).map_err(engine_error)?;
        let placement = CellPlacement {
            pos: IVec2::new(layout.location.x.round() as i32, layout.location.y.round() as i32),
            size: IVec2::new(layout.size.width.round() as i32, layout.size.height.round() as i32),
        };
        trace!(
            "Cell ({}, {}): pos={:?} size={:?}",
            cell.row,
            cell.column,
            placement.pos,
            placement.size
        );
        placements.push(placement);
    }

    Ok(placements)
}
