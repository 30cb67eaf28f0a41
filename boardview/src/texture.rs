//! Memoized board and piece images
//!
//! Piece images depend only on the piece and the square size; the board image depends on the
//! board size and the orientation. Entries are dropped when those inputs change and at no other
//! time.

use core::fmt;
use std::collections::{hash_map::Entry, HashMap};

use board::Piece;

use crate::Renderer;

/// What an image was generated for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Piece { piece: Piece, pixel_size: u32 },
    Board { pixel_size: u32, flipped: bool },
}
impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Piece { piece, pixel_size } => {
                write!(f, "piece {piece} at {pixel_size}px")
            }
            Self::Board {
                pixel_size,
                flipped: false,
            } => write!(f, "board at {pixel_size}px"),
            Self::Board {
                pixel_size,
                flipped: true,
            } => write!(f, "flipped board at {pixel_size}px"),
        }
    }
}

/// A failure of the [`Renderer`] while producing an image
///
/// Nothing is cached for the key when this is returned, so the next request tries again.
#[derive(Debug, thiserror::Error)]
pub enum TextureError<E: std::error::Error + 'static> {
    #[error("failed to generate image of {key}")]
    Generate {
        key: TextureKey,
        #[source]
        source: E,
    },
    #[error("failed to decode image of {key}")]
    Decode {
        key: TextureKey,
        #[source]
        source: E,
    },
}
impl<E: std::error::Error + 'static> TextureError<E> {
    pub fn key(&self) -> TextureKey {
        match self {
            Self::Generate { key, .. } | Self::Decode { key, .. } => *key,
        }
    }
}

/// Cache of decoded images
///
/// Holds piece images for one square size and a single board image.
#[derive(Debug)]
pub struct TextureCache<T> {
    /// The square size every entry in `pieces` was generated at
    piece_size: Option<u32>,
    pieces: HashMap<Piece, T>,
    board: Option<(TextureKey, T)>,
}
impl<T: Clone> TextureCache<T> {
    pub fn new() -> Self {
        Self {
            piece_size: None,
            pieces: HashMap::new(),
            board: None,
        }
    }

    /// The image of `piece` at `pixel_size`, generating it if needed
    ///
    /// Asking for a different size than the cached piece images have evicts all of them.
    pub fn piece_texture<R>(
        &mut self,
        renderer: &mut R,
        piece: Piece,
        pixel_size: u32,
    ) -> Result<T, TextureError<R::Error>>
    where
        R: Renderer<Texture = T>,
    {
        if self.piece_size != Some(pixel_size) {
            self.evict_pieces();
            self.piece_size = Some(pixel_size);
        }
        match self.pieces.entry(piece) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let key = TextureKey::Piece { piece, pixel_size };
                let texture = generate(renderer, key, |renderer| {
                    renderer.generate_piece_image(piece, pixel_size)
                })?;
                Ok(entry.insert(texture).clone())
            }
        }
    }

    /// The board image at `pixel_size` in the given orientation, generating it if needed
    ///
    /// Only one board image is kept.
    pub fn board_texture<R>(
        &mut self,
        renderer: &mut R,
        pixel_size: u32,
        flipped: bool,
    ) -> Result<T, TextureError<R::Error>>
    where
        R: Renderer<Texture = T>,
    {
        let key = TextureKey::Board {
            pixel_size,
            flipped,
        };
        if let Some((cached_key, texture)) = &self.board {
            if *cached_key == key {
                return Ok(texture.clone());
            }
        }
        self.invalidate_board();
        let texture = generate(renderer, key, |renderer| {
            renderer.generate_board_image(pixel_size, flipped)
        })?;
        self.board = Some((key, texture.clone()));
        Ok(texture)
    }

    /// Drop whatever a board laid out with these sizes would not use
    pub fn retain_geometry(&mut self, piece_size: u32, board_size: u32, flipped: bool) {
        if self.piece_size.is_some_and(|size| size != piece_size) {
            self.evict_pieces();
            self.piece_size = None;
        }
        let board_key = TextureKey::Board {
            pixel_size: board_size,
            flipped,
        };
        if self.board.as_ref().is_some_and(|(key, _)| *key != board_key) {
            self.invalidate_board();
        }
    }

    /// Drop the board image
    pub fn invalidate_board(&mut self) {
        if let Some((key, _)) = self.board.take() {
            tracing::debug!(%key, "dropping board image");
        }
    }

    /// Drop every image
    ///
    /// Only needed when the images themselves go stale, as when the renderer is replaced. Layout
    /// changes go through [`Self::retain_geometry`].
    pub fn invalidate_all(&mut self) {
        self.evict_pieces();
        self.piece_size = None;
        self.invalidate_board();
    }

    /// The number of cached images
    pub fn len(&self) -> usize {
        self.pieces.len() + usize::from(self.board.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_pieces(&mut self) {
        if !self.pieces.is_empty() {
            tracing::debug!(
                count = self.pieces.len(),
                pixel_size = ?self.piece_size,
                "dropping piece images"
            );
            self.pieces.clear();
        }
    }
}
impl<T: Clone> Default for TextureCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate and decode one image
fn generate<R: Renderer>(
    renderer: &mut R,
    key: TextureKey,
    image: impl FnOnce(&mut R) -> Result<Vec<u8>, R::Error>,
) -> Result<R::Texture, TextureError<R::Error>> {
    tracing::debug!(%key, "generating image");
    let bytes = image(renderer).map_err(|source| TextureError::Generate { key, source })?;
    renderer
        .decode_image(&bytes)
        .map_err(|source| TextureError::Decode { key, source })
}
