//! An interactive chessboard engine
//!
//! [`BoardView`] turns pointer input into moves and board state into draw commands. It doesn't
//! draw anything itself and knows nothing about chess rules: images come from a [`Renderer`], the
//! position comes from a [`Model`], and every move the user enters is put to a [`MoveHandler`]
//! which decides whether it happens.

pub mod atlas;
pub mod config;
pub mod draw;
pub mod geometry;
pub mod input;
pub mod overlay;
pub mod texture;
pub mod view;

pub use board::{Color, LongAlgebraicMove, Piece, PieceKind, Square};
pub use config::{Anchor, BoardConfig, ConfigError, HorizontalAnchor, VerticalAnchor};
pub use draw::{DrawCommand, Frame, Layer, Rgba};
pub use geometry::{BoardGeometry, Point, Rect, Size};
pub use input::{InputState, LongPress, TapOutcome};
pub use overlay::{OverlayGroup, OverlaySet};
pub use texture::{TextureCache, TextureError, TextureKey};
pub use view::BoardView;

/// Produces the images the board is drawn with
///
/// Generation is the slow part of drawing. [`TextureCache`] makes sure each image is generated
/// once per size it is needed at.
pub trait Renderer {
    /// A handle to a decoded image the backend can draw
    ///
    /// Cloning should be cheap: the cache hands out clones of the handles it holds.
    type Texture: Clone;

    /// An error type that can be returned
    type Error: std::error::Error + 'static;

    /// Encoded image of `piece`, `pixel_size` pixels square
    fn generate_piece_image(&mut self, piece: Piece, pixel_size: u32)
        -> Result<Vec<u8>, Self::Error>;

    /// Encoded image of the empty board including its margin, `pixel_size` pixels square
    fn generate_board_image(&mut self, pixel_size: u32, flipped: bool)
        -> Result<Vec<u8>, Self::Error>;

    /// Turn an encoded image into something drawable
    fn decode_image(&mut self, bytes: &[u8]) -> Result<Self::Texture, Self::Error>;
}

/// Read access to the game being shown
///
/// The view never changes the model. After the model changes, call
/// [`BoardView::model_updated`].
pub trait Model {
    /// Every occupied square and what stands there
    fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_;

    /// The move that produced the current position, if any
    fn last_move(&self) -> Option<LongAlgebraicMove>;
}

/// Decides on moves the user entered
pub trait MoveHandler {
    /// Try to play `mv`, returning whether it was accepted
    ///
    /// This is called synchronously from the tap that completed the move; the verdict decides what
    /// the next tap does.
    fn on_user_move(&mut self, mv: LongAlgebraicMove) -> bool;
}

impl<F: FnMut(LongAlgebraicMove) -> bool> MoveHandler for F {
    fn on_user_move(&mut self, mv: LongAlgebraicMove) -> bool {
        self(mv)
    }
}
