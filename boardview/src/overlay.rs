//! Square highlights drawn over the board

use board::Square;

use crate::{
    config::BoardConfig,
    draw::DrawCommand,
    geometry::{BoardGeometry, Point},
};

/// The two independent highlight groups
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayGroup {
    /// Squares picked for the move being entered, drawn as outlines
    Selection,
    /// Source and target of the last applied move, drawn filled
    LastMove,
}

#[derive(Clone, Debug, Default)]
struct Group {
    squares: Vec<Square>,
    /// Membership changed since the group was last rendered
    changed: bool,
}

/// Both highlight groups and which of them need redrawing
#[derive(Clone, Debug, Default)]
pub struct OverlaySet {
    selection: Group,
    last_move: Group,
    /// The square highlighted most recently, in either group
    focus: Option<Square>,
}
impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of `group`
    ///
    /// # Panics
    /// If more than two squares are given.
    pub fn set_squares(&mut self, group: OverlayGroup, squares: &[Square]) {
        assert!(
            squares.len() <= 2,
            "an overlay holds at most two squares, got {}",
            squares.len()
        );
        if let Some(&last) = squares.last() {
            self.focus = Some(last);
        }
        let target = self.group_mut(group);
        if target.squares != squares {
            tracing::trace!(?group, ?squares, "overlay changed");
            target.squares.clear();
            target.squares.extend_from_slice(squares);
            target.changed = true;
        }
    }

    pub fn clear(&mut self, group: OverlayGroup) {
        self.set_squares(group, &[]);
    }

    pub fn squares(&self, group: OverlayGroup) -> &[Square] {
        &self.group(group).squares
    }

    /// The square that was highlighted last, if any ever was
    pub fn focus(&self) -> Option<Square> {
        self.focus
    }

    /// Whether `group` changed since this was last called for it
    pub fn take_changed(&mut self, group: OverlayGroup) -> bool {
        std::mem::take(&mut self.group_mut(group).changed)
    }

    /// Whether `group` changed since it was last taken, without resetting the flag
    pub fn is_changed(&self, group: OverlayGroup) -> bool {
        self.group(group).changed
    }

    /// Flag both groups for redrawing, for when every square moved on screen
    pub fn mark_all_changed(&mut self) {
        self.selection.changed = true;
        self.last_move.changed = true;
    }

    /// The draw commands for `group`
    ///
    /// Each square gets the highlight color for its position in the group and a rectangle inset by
    /// the grid line width, so the grid stays visible around it.
    pub fn render<T>(
        &self,
        group: OverlayGroup,
        geometry: &BoardGeometry,
        config: &BoardConfig,
    ) -> Vec<DrawCommand<T>> {
        self.squares(group)
            .iter()
            .zip(config.highlight_colors)
            .map(|(&square, color)| {
                let rect = geometry
                    .square_rect(square)
                    .inset(config.grid_line_width);
                match group {
                    OverlayGroup::Selection => DrawCommand::OutlineRect {
                        rect,
                        color,
                        width: config.selection_line_width,
                    },
                    OverlayGroup::LastMove => DrawCommand::FillRect { rect, color },
                }
            })
            .collect()
    }

    /// The pixel center of [`Self::focus`]
    pub fn focus_center(&self, geometry: &BoardGeometry) -> Option<Point> {
        self.focus
            .map(|square| geometry.square_rect(square).center())
    }

    fn group(&self, group: OverlayGroup) -> &Group {
        match group {
            OverlayGroup::Selection => &self.selection,
            OverlayGroup::LastMove => &self.last_move,
        }
    }

    fn group_mut(&mut self, group: OverlayGroup) -> &mut Group {
        match group {
            OverlayGroup::Selection => &mut self.selection,
            OverlayGroup::LastMove => &mut self.last_move,
        }
    }
}
