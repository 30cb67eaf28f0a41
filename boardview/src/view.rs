//! The board view: events in, frames out

use std::time::Instant;

use board::Square;

use crate::{
    config::BoardConfig,
    draw::{DrawCommand, Frame, Layer},
    geometry::{BoardGeometry, Point, Size},
    input::{InputState, LongPress, MoveInput, TapOutcome},
    overlay::{OverlayGroup, OverlaySet},
    texture::{TextureCache, TextureError},
    Model, MoveHandler, Renderer,
};

/// Layers that have to be rebuilt by the next frame
///
/// Overlay layers track their own changes in [`OverlaySet`].
#[derive(Clone, Copy, Debug)]
struct Dirty {
    background: bool,
    pieces: bool,
}

/// An interactive board
///
/// Feed it viewport changes, pointer events and model updates; call [`Self::frame`] to get the
/// layers that changed since the previous call. Nothing is drawn until the first
/// [`Self::resize`].
pub struct BoardView<R: Renderer, M> {
    renderer: R,
    model: M,
    config: BoardConfig,
    viewport: Option<Size>,
    flipped: bool,
    geometry: Option<BoardGeometry>,
    textures: TextureCache<R::Texture>,
    overlays: OverlaySet,
    input: MoveInput,
    dirty: Dirty,
}

impl<R: Renderer, M: Model> BoardView<R, M> {
    pub fn new(renderer: R, model: M, config: BoardConfig) -> Self {
        let mut view = Self {
            renderer,
            model,
            input: MoveInput::new(config.long_press_delay()),
            config,
            viewport: None,
            flipped: false,
            geometry: None,
            textures: TextureCache::new(),
            overlays: OverlaySet::new(),
            dirty: Dirty {
                background: true,
                pieces: true,
            },
        };
        view.model_updated();
        view
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Swap in new settings and redraw everything with them
    pub fn set_config(&mut self, config: BoardConfig) {
        self.input.set_long_press_delay(config.long_press_delay());
        self.config = config;
        self.relayout();
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model
    ///
    /// Call [`Self::model_updated`] after changing what it shows.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Show a different game
    ///
    /// Drops the move being entered and both highlights, and returns the old model.
    pub fn set_model(&mut self, model: M) -> M {
        let old = std::mem::replace(&mut self.model, model);
        self.input.reset(&mut self.overlays);
        self.input.cancel_long_press();
        self.overlays.clear(OverlayGroup::LastMove);
        self.model_updated();
        old
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Draw with a different renderer from now on, returning the old one
    ///
    /// Every cached image came from the old renderer, so all of them are dropped.
    pub fn set_renderer(&mut self, renderer: R) -> R {
        let old = std::mem::replace(&mut self.renderer, renderer);
        self.textures.invalidate_all();
        self.invalidate();
        old
    }

    /// The current layout, once the view has a size
    pub fn geometry(&self) -> Option<&BoardGeometry> {
        self.geometry.as_ref()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn input_state(&self) -> InputState {
        self.input.state()
    }

    /// The move entered so far: empty, or the name of the source square
    pub fn pending_move(&self) -> String {
        self.input.pending_move()
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    pub fn textures(&self) -> &TextureCache<R::Texture> {
        &self.textures
    }

    /// The center of the most recently highlighted square, for placing popups
    pub fn highlight_center(&self) -> Option<Point> {
        self.overlays.focus_center(self.geometry.as_ref()?)
    }

    /// The square under a pixel position
    pub fn square_at(&self, x: f64, y: f64) -> Option<Square> {
        self.geometry.as_ref()?.square_at(Point::new(x, y))
    }

    /// The viewport is now `width` by `height` pixels
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Some(Size::new(width, height));
        self.relayout();
    }

    /// Turn the board around
    ///
    /// The move being entered and the highlights stay; only where they are drawn changes.
    pub fn rotate(&mut self) {
        self.flipped = !self.flipped;
        tracing::debug!(flipped = self.flipped, "rotating board");
        self.relayout();
    }

    /// The model changed: redraw the pieces and highlight its last move
    pub fn model_updated(&mut self) {
        match self.model.last_move() {
            Some(mv) => self
                .overlays
                .set_squares(OverlayGroup::LastMove, &[mv.from, mv.to]),
            None => self.overlays.clear(OverlayGroup::LastMove),
        }
        self.dirty.pieces = true;
    }

    /// A tap at a pixel position
    pub fn pointer_tap(&mut self, x: f64, y: f64, handler: &mut impl MoveHandler) -> TapOutcome {
        let square = self.square_at(x, y);
        self.input.tap(square, &mut self.overlays, handler)
    }

    /// A pointer went down: starts the long-press timer if it is over a square
    pub fn pointer_down(&mut self, x: f64, y: f64, now: Instant) {
        let square = self.square_at(x, y);
        self.input.press(square, Point::new(x, y), now);
    }

    /// A pointer went up: cancels a pending long press and counts as a tap
    pub fn pointer_up(&mut self, x: f64, y: f64, handler: &mut impl MoveHandler) -> TapOutcome {
        self.input.cancel_long_press();
        self.pointer_tap(x, y, handler)
    }

    /// Advance timers to `now`, returning a long press that became due
    pub fn tick(&mut self, now: Instant) -> Option<LongPress> {
        self.input.poll_long_press(now)
    }

    /// Redraw everything on the next frame, regenerating no images that are still valid
    pub fn invalidate(&mut self) {
        self.dirty = Dirty {
            background: true,
            pieces: true,
        };
        self.overlays.mark_all_changed();
    }

    /// The layers that changed since the last frame
    ///
    /// The frame is empty until the view has been resized to something big enough to draw; the
    /// layers stay pending until then. If an image can't be produced the error is returned and
    /// the failed layer is retried on the next call.
    pub fn frame(&mut self) -> Result<Frame<R::Texture>, TextureError<R::Error>> {
        let mut frame = Frame::new();
        let Some(geometry) = self.geometry.filter(BoardGeometry::is_drawable) else {
            return Ok(frame);
        };

        let background = if self.dirty.background {
            Some(self.background_layer(&geometry)?)
        } else {
            None
        };
        let pieces = if self.dirty.pieces {
            Some(self.piece_layer(&geometry)?)
        } else {
            None
        };

        if let Some(background) = background {
            frame.push(Layer::Background, background);
            self.dirty.background = false;
        }
        if let Some(pieces) = pieces {
            frame.push(Layer::Pieces, pieces);
            self.dirty.pieces = false;
        }
        for (group, layer) in [
            (OverlayGroup::LastMove, Layer::LastMove),
            (OverlayGroup::Selection, Layer::Selection),
        ] {
            if self.overlays.take_changed(group) {
                frame.push(layer, self.overlays.render(group, &geometry, &self.config));
            }
        }
        Ok(frame)
    }

    fn relayout(&mut self) {
        let Some(viewport) = self.viewport else {
            return;
        };
        let geometry = BoardGeometry::fit(viewport, &self.config, self.flipped);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            board_size = geometry.board_size(),
            square_size = geometry.square_size(),
            flipped = self.flipped,
            "board laid out"
        );
        self.textures.retain_geometry(
            geometry.piece_pixel_size(),
            geometry.board_pixel_size(),
            self.flipped,
        );
        self.geometry = Some(geometry);
        self.invalidate();
    }

    /// Clear color, board image and grid lines
    fn background_layer(
        &mut self,
        geometry: &BoardGeometry,
    ) -> Result<Vec<DrawCommand<R::Texture>>, TextureError<R::Error>> {
        let board_rect = geometry.board_rect();
        let texture = self.textures.board_texture(
            &mut self.renderer,
            geometry.board_pixel_size(),
            geometry.is_flipped(),
        )?;

        let mut commands = Vec::with_capacity(2 + 2 * 9);
        commands.push(DrawCommand::FillRect {
            rect: board_rect,
            color: self.config.clear_color,
        });
        commands.push(DrawCommand::Image {
            rect: board_rect,
            texture,
        });

        let origin = geometry.origin();
        let span = 8.0 * geometry.square_size();
        let (color, width) = (self.config.grid_color, self.config.grid_line_width);
        for i in 0..9 {
            let step = f64::from(i) * geometry.square_size();
            commands.push(DrawCommand::Line {
                from: origin.offset(step, 0.0),
                to: origin.offset(step, span),
                color,
                width,
            });
        }
        for i in 0..9 {
            let step = f64::from(i) * geometry.square_size();
            commands.push(DrawCommand::Line {
                from: origin.offset(0.0, step),
                to: origin.offset(span, step),
                color,
                width,
            });
        }
        Ok(commands)
    }

    /// One image per occupied square
    fn piece_layer(
        &mut self,
        geometry: &BoardGeometry,
    ) -> Result<Vec<DrawCommand<R::Texture>>, TextureError<R::Error>> {
        let Self {
            renderer,
            model,
            textures,
            ..
        } = self;
        let pixel_size = geometry.piece_pixel_size();
        let mut commands = Vec::new();
        for (square, piece) in model.pieces() {
            let texture = textures.piece_texture(&mut *renderer, piece, pixel_size)?;
            commands.push(DrawCommand::Image {
                rect: geometry.square_rect(square),
                texture,
            });
        }
        Ok(commands)
    }
}
