//! Mapping between pixels and squares
//!
//! Pixel coordinates have their origin at the bottom-left of the viewport with `y` growing
//! upwards, so with the board unflipped rank 1 is at the bottom and the a-file on the left.

use board::Square;

use crate::config::BoardConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
impl Point {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}
impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The length of the shorter side
    pub fn min_side(self) -> f64 {
        self.width.min(self.height)
    }
}

/// An axis-aligned rectangle given by its bottom-left corner and size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn square(origin: Point, side: f64) -> Self {
        Self::new(origin.x, origin.y, side, side)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `point` is inside, counting the bottom and left edges but not the top and right
    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x
            && point.x < self.x + self.width
            && self.y <= point.y
            && point.y < self.y + self.height
    }

    /// Shrink by `amount` on every side
    ///
    /// Never produces a negative size; an over-inset rectangle collapses onto its center.
    pub fn inset(&self, amount: f64) -> Self {
        let dx = amount.min(self.width / 2.0);
        let dy = amount.min(self.height / 2.0);
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }
}

/// The pixel layout of the board for one viewport size and orientation
///
/// `square_size == (board_size - 2 * margin) / 8` always holds, and the playing area starts at
/// `board_pos + margin` on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardGeometry {
    board_pos: Point,
    board_size: f64,
    margin: f64,
    square_size: f64,
    flipped: bool,
}
impl BoardGeometry {
    /// Lay out a board of `board_size` pixels with its bottom-left corner at `board_pos`
    pub fn new(board_pos: Point, board_size: f64, margin: f64, flipped: bool) -> Self {
        Self {
            board_pos,
            board_size,
            margin,
            square_size: (board_size - 2.0 * margin) / 8.0,
            flipped,
        }
    }

    /// Fit the largest square board into `viewport`
    ///
    /// Margin and squares scale together with the shorter side of the viewport, and the free space
    /// along the longer side is split according to the configured anchor.
    pub fn fit(viewport: Size, config: &BoardConfig, flipped: bool) -> Self {
        let board_size = viewport.min_side().max(0.0);
        let scale = board_size / (2.0 * config.margin_units + 8.0 * config.square_units);
        let board_pos = Point::new(
            (viewport.width - board_size) * config.anchor.horizontal.fraction(),
            (viewport.height - board_size) * config.anchor.vertical.fraction(),
        );
        Self::new(board_pos, board_size, config.margin_units * scale, flipped)
    }

    /// The same layout seen from the other side
    pub fn with_flipped(self, flipped: bool) -> Self {
        Self { flipped, ..self }
    }

    pub fn board_pos(&self) -> Point {
        self.board_pos
    }

    pub fn board_size(&self) -> f64 {
        self.board_size
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn square_size(&self) -> f64 {
        self.square_size
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// The bottom-left corner of the 8x8 playing area
    pub fn origin(&self) -> Point {
        self.board_pos.offset(self.margin, self.margin)
    }

    /// The whole board, margin included
    pub fn board_rect(&self) -> Rect {
        Rect::square(self.board_pos, self.board_size)
    }

    /// The 8x8 playing area, margin excluded
    pub fn playing_area(&self) -> Rect {
        Rect::square(self.origin(), 8.0 * self.square_size)
    }

    /// Whether the board is big enough to draw
    ///
    /// A viewport a few pixels across, or one not laid out yet, rounds the board or its squares to
    /// zero pixels. Nothing is rendered for such a layout.
    pub fn is_drawable(&self) -> bool {
        self.board_pixel_size() > 0 && self.piece_pixel_size() > 0
    }

    /// Pixel size piece images are generated at
    pub fn piece_pixel_size(&self) -> u32 {
        self.square_size.round().max(0.0) as u32
    }

    /// Pixel size the board image is generated at
    pub fn board_pixel_size(&self) -> u32 {
        self.board_size.round().max(0.0) as u32
    }

    /// The square under `point`, or `None` in the margin band and outside the board
    pub fn square_at(&self, point: Point) -> Option<Square> {
        if !self.playing_area().contains(point) {
            return None;
        }
        let origin = self.origin();
        let col = (point.x - origin.x) / self.square_size;
        let row = (point.y - origin.y) / self.square_size;
        // Rounding at the far edges can land exactly on 8
        let (col, row) = ((col as u8).min(7), (row as u8).min(7));
        let square = Square::from_file_rank(col, row)?;
        Some(if self.flipped {
            square.mirrored()
        } else {
            square
        })
    }

    /// The bottom-left pixel corner of `square` as drawn
    pub fn point_for(&self, square: Square) -> Point {
        let square = if self.flipped {
            square.mirrored()
        } else {
            square
        };
        self.origin().offset(
            f64::from(square.file()) * self.square_size,
            f64::from(square.rank()) * self.square_size,
        )
    }

    /// The pixel area `square` covers
    pub fn square_rect(&self, square: Square) -> Rect {
        Rect::square(self.point_for(square), self.square_size)
    }
}
