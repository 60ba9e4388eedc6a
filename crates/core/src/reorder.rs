// SPDX-License-Identifier: MIT

//!
//! Drag & drop reordering.
//!
//! A move is modelled as remove-then-insert (not a swap), so the drop target's
//! index has to be corrected for the shift caused by the removal.  Removing
//! only shifts the positions after the removal point, hence the branch on
//! `from < to`.
//!

use serde::{Deserialize, Serialize};

/// Where, relative to the hovered row, the dragged row should land
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Above,
    Below,
}

impl DropPosition {
    /// Compare the pointer's Y coordinate to the vertical midpoint of the
    /// hovered row
    pub fn from_pointer(pointer_y: f32, row_top: f32, row_height: f32) -> Self {
        if pointer_y < row_top + row_height / 2.0 {
            DropPosition::Above
        } else {
            DropPosition::Below
        }
    }
}

/// The index at which to re-insert the dragged item once it has been removed
/// from `from_index`.  Only meaningful when `from_index != to_index`.
pub fn insert_index(from_index: usize, to_index: usize, position: DropPosition) -> usize {
    match position {
        DropPosition::Below if from_index < to_index => to_index,
        DropPosition::Below => to_index + 1,
        DropPosition::Above if from_index < to_index => to_index - 1,
        DropPosition::Above => to_index,
    }
}

/// Move the item at `from_index` so that it sits directly above or below the
/// item currently at `to_index`.
///
/// # Panics
///
/// If either index is out of bounds.  The UI only ever produces indices of
/// rendered rows, so this is a programming error.
pub fn move_item<T>(items: &mut Vec<T>, from_index: usize, to_index: usize, position: DropPosition) {
    let len = items.len();
    assert!(
        from_index < len && to_index < len,
        "move out of bounds (from {from_index}, to {to_index}, len {len})"
    );
    if from_index == to_index {
        return;
    }
    let item = items.remove(from_index);
    items.insert(insert_index(from_index, to_index, position), item);
}

/// A completed drag, ready to be applied with [`move_item`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DragMove {
    pub from_index: usize,
    pub to_index: usize,
    pub position: DropPosition,
}

/// Transient drag feedback, used only to draw the insertion line.  Never
/// persisted, and reset on drop or cancel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DragState {
    dragged_index: Option<usize>,
    drag_over_index: Option<usize>,
    drop_position: Option<DropPosition>,
}

impl DragState {
    /// Start dragging the row at `index`
    pub fn start(&mut self, index: usize) {
        *self = DragState {
            dragged_index: Some(index),
            ..Default::default()
        };
    }

    /// The pointer is over the row at `index`
    pub fn hover(&mut self, index: usize, pointer_y: f32, row_top: f32, row_height: f32) {
        if self.dragged_index.is_none() {
            return;
        }
        self.drag_over_index = Some(index);
        self.drop_position = Some(DropPosition::from_pointer(pointer_y, row_top, row_height));
    }

    /// The pointer left the droppable region (or the drag was aborted)
    pub fn cancel(&mut self) {
        *self = DragState::default();
    }

    /// Finish the drag.  The state is always reset; a move is returned only if
    /// the drag ended over a row.
    pub fn drop(&mut self) -> Option<DragMove> {
        let state = std::mem::take(self);
        Some(DragMove {
            from_index: state.dragged_index?,
            to_index: state.drag_over_index?,
            position: state.drop_position?,
        })
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged_index.is_some()
    }

    pub fn dragged_index(&self) -> Option<usize> {
        self.dragged_index
    }

    pub fn drag_over_index(&self) -> Option<usize> {
        self.drag_over_index
    }

    pub fn drop_position(&self) -> Option<DropPosition> {
        self.drop_position
    }

    /// Which side of the row at `index` (if any) the insertion line is drawn
    pub fn insertion_line(&self, index: usize) -> Option<DropPosition> {
        match (self.dragged_index, self.drag_over_index) {
            (Some(dragged), Some(over)) if over == index && dragged != index => self.drop_position,
            _ => None,
        }
    }
}
