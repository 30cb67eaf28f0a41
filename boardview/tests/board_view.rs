use std::time::{Duration, Instant};

use boardview::{
    BoardConfig, BoardView, Color, DrawCommand, InputState, Layer, LongAlgebraicMove, LongPress,
    Model, OverlayGroup, Piece, PieceKind, Point, Renderer, Square, TapOutcome, TextureError,
    TextureKey,
};

#[derive(Debug, thiserror::Error)]
#[error("renderer failed")]
struct RenderFailure;

/// Renders every image as its own description and logs what it was asked for
#[derive(Default)]
struct LoggingRenderer {
    generated: Vec<TextureKey>,
    fail_board: bool,
}

impl LoggingRenderer {
    fn pieces_generated(&self) -> usize {
        self.generated
            .iter()
            .filter(|key| matches!(key, TextureKey::Piece { .. }))
            .count()
    }

    fn boards_generated(&self) -> usize {
        self.generated.len() - self.pieces_generated()
    }
}

impl Renderer for LoggingRenderer {
    type Texture = String;
    type Error = RenderFailure;

    fn generate_piece_image(&mut self, piece: Piece, pixel_size: u32) -> Result<Vec<u8>, Self::Error> {
        self.generated.push(TextureKey::Piece { piece, pixel_size });
        Ok(format!("{piece}@{pixel_size}").into_bytes())
    }

    fn generate_board_image(&mut self, pixel_size: u32, flipped: bool) -> Result<Vec<u8>, Self::Error> {
        if self.fail_board {
            return Err(RenderFailure);
        }
        self.generated.push(TextureKey::Board {
            pixel_size,
            flipped,
        });
        Ok(format!("board@{pixel_size}/{flipped}").into_bytes())
    }

    fn decode_image(&mut self, bytes: &[u8]) -> Result<Self::Texture, Self::Error> {
        String::from_utf8(bytes.to_vec()).map_err(|_| RenderFailure)
    }
}

#[derive(Default)]
struct Position {
    pieces: Vec<(Square, Piece)>,
    last_move: Option<LongAlgebraicMove>,
}

impl Position {
    fn kings() -> Self {
        Self {
            pieces: vec![
                (Square::E1, Piece::new(PieceKind::King, Color::White)),
                (Square::E2, Piece::new(PieceKind::Pawn, Color::White)),
                (Square::E8, Piece::new(PieceKind::King, Color::Black)),
            ],
            last_move: None,
        }
    }

    fn apply(&mut self, mv: LongAlgebraicMove) {
        self.pieces.retain(|(square, _)| *square != mv.to);
        for (square, _) in &mut self.pieces {
            if *square == mv.from {
                *square = mv.to;
            }
        }
        self.last_move = Some(mv);
    }
}

impl Model for Position {
    fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces.iter().copied()
    }

    fn last_move(&self) -> Option<LongAlgebraicMove> {
        self.last_move
    }
}

/// A 400px board with a 15px margin and no scaling
fn plain_config() -> BoardConfig {
    BoardConfig {
        margin_units: 15.0,
        square_units: 46.25,
        ..BoardConfig::default()
    }
}

fn laid_out_view() -> BoardView<LoggingRenderer, Position> {
    let mut view = BoardView::new(LoggingRenderer::default(), Position::kings(), plain_config());
    view.resize(400.0, 400.0);
    view
}

fn accept_all(_: LongAlgebraicMove) -> bool {
    true
}

fn reject_all(_: LongAlgebraicMove) -> bool {
    false
}

/// Pixel center of a square in the current layout
fn center(view: &BoardView<LoggingRenderer, Position>, square: Square) -> Point {
    view.geometry()
        .expect("view has not been laid out")
        .square_rect(square)
        .center()
}

fn tap(
    view: &mut BoardView<LoggingRenderer, Position>,
    square: Square,
    handler: &mut impl boardview::MoveHandler,
) -> TapOutcome {
    let point = center(view, square);
    view.pointer_tap(point.x, point.y, handler)
}

fn layers(frame: &boardview::Frame<String>) -> Vec<Layer> {
    frame.layers().map(|(layer, _)| layer).collect()
}

#[test]
fn nothing_drawn_before_resize() {
    let mut view = BoardView::new(LoggingRenderer::default(), Position::kings(), plain_config());
    assert!(view.frame().unwrap().is_empty());
    assert_eq!(view.pointer_tap(60.0, 60.0, &mut accept_all), TapOutcome::Ignored);
    assert!(view.renderer().generated.is_empty());
}

#[test]
fn empty_viewport_renders_nothing() {
    let mut view = BoardView::new(LoggingRenderer::default(), Position::kings(), plain_config());
    view.resize(0.0, 0.0);
    assert!(view.frame().unwrap().is_empty());
    assert!(view.renderer().generated.is_empty());

    // Squares too small to round to a pixel
    view.resize(3.0, 3.0);
    assert!(view.frame().unwrap().is_empty());
    assert!(view.renderer().generated.is_empty());

    // Everything is drawn once there is room
    view.resize(400.0, 400.0);
    let frame = view.frame().unwrap();
    assert_eq!(
        layers(&frame),
        [Layer::Background, Layer::LastMove, Layer::Pieces, Layer::Selection]
    );
    assert_eq!(view.renderer().generated.len(), 4);
}

#[test]
fn new_renderer_regenerates_images() {
    let mut view = laid_out_view();
    view.frame().unwrap();
    let old = view.set_renderer(LoggingRenderer::default());
    assert_eq!(old.generated.len(), 4);
    assert!(view.textures().is_empty());

    let frame = view.frame().unwrap();
    assert_eq!(
        layers(&frame),
        [Layer::Background, Layer::LastMove, Layer::Pieces, Layer::Selection]
    );
    assert_eq!(view.renderer().pieces_generated(), 3);
    assert_eq!(view.renderer().boards_generated(), 1);
}

#[test]
fn tap_lands_on_scenario_squares() {
    let mut view = laid_out_view();
    let geometry = view.geometry().unwrap();
    assert_eq!(geometry.square_size(), 46.25);
    assert_eq!(geometry.margin(), 15.0);
    assert_eq!(view.square_at(60.0, 60.0), Some(Square::A1));
    view.rotate();
    assert_eq!(view.square_at(60.0, 60.0), Some(Square::H8));
}

#[test]
fn first_frame_has_every_layer() {
    let mut view = laid_out_view();
    let frame = view.frame().unwrap();
    assert_eq!(
        layers(&frame),
        [Layer::Background, Layer::LastMove, Layer::Pieces, Layer::Selection]
    );

    let background = frame.layer(Layer::Background).unwrap();
    assert_eq!(background.len(), 2 + 18);
    assert!(matches!(
        &background[1],
        DrawCommand::Image { texture, .. } if texture == "board@400/false"
    ));

    let pieces = frame.layer(Layer::Pieces).unwrap();
    assert_eq!(pieces.len(), 3);
    assert!(pieces.iter().any(|command| matches!(
        command,
        DrawCommand::Image { texture, rect } if texture == "K@46" && rect.origin() == Point::new(200.0, 15.0)
    )));

    assert!(view.frame().unwrap().is_empty());
}

#[test]
fn tap_only_redraws_selection() {
    let mut view = laid_out_view();
    view.frame().unwrap();
    tap(&mut view, Square::E2, &mut accept_all);
    let frame = view.frame().unwrap();
    assert_eq!(layers(&frame), [Layer::Selection]);
    assert_eq!(frame.layer(Layer::Selection).unwrap().len(), 1);
}

#[test]
fn tap_outside_changes_nothing() {
    let mut view = laid_out_view();
    view.frame().unwrap();
    assert_eq!(view.pointer_tap(5.0, 5.0, &mut accept_all), TapOutcome::Ignored);
    assert!(view.frame().unwrap().is_empty());
    assert_eq!(view.pending_move(), "");
}

#[test]
fn double_tap_returns_to_idle() {
    let mut view = laid_out_view();
    tap(&mut view, Square::E2, &mut accept_all);
    tap(&mut view, Square::E2, &mut accept_all);
    assert_eq!(view.input_state(), InputState::Idle);
    assert_eq!(view.pending_move(), "");
    assert!(view.overlays().squares(OverlayGroup::Selection).is_empty());
}

#[test]
fn accepted_move_flows_into_model() {
    let mut view = laid_out_view();
    view.frame().unwrap();

    let mut moves = Vec::new();
    let mut handler = |mv: LongAlgebraicMove| {
        moves.push(mv.to_string());
        true
    };
    assert_eq!(
        tap(&mut view, Square::E2, &mut handler),
        TapOutcome::Selected(Square::E2)
    );
    let outcome = tap(&mut view, Square::E4, &mut handler);
    assert_eq!(moves, ["e2e4"]);
    assert_eq!(view.pending_move(), "");
    assert!(view.overlays().squares(OverlayGroup::Selection).is_empty());

    let TapOutcome::Accepted(mv) = outcome else {
        panic!("expected the move to be accepted, got {outcome:?}");
    };
    view.model_mut().apply(mv);
    view.model_updated();
    assert_eq!(
        view.overlays().squares(OverlayGroup::LastMove),
        [Square::E2, Square::E4]
    );

    let frame = view.frame().unwrap();
    assert_eq!(layers(&frame), [Layer::LastMove, Layer::Pieces, Layer::Selection]);
    let last_move = frame.layer(Layer::LastMove).unwrap();
    assert_eq!(last_move.len(), 2);
    assert!(last_move
        .iter()
        .all(|command| matches!(command, DrawCommand::FillRect { .. })));
    assert!(frame.layer(Layer::Selection).unwrap().is_empty());
}

#[test]
fn rejected_move_restarts_selection() {
    let mut view = laid_out_view();
    tap(&mut view, Square::E2, &mut reject_all);
    let outcome = tap(&mut view, Square::D5, &mut reject_all);
    assert_eq!(
        outcome,
        TapOutcome::Rejected(LongAlgebraicMove::new(Square::E2, Square::D5))
    );
    assert_eq!(view.input_state(), InputState::OneSelected(Square::D5));
    assert_eq!(view.pending_move(), "d5");
    assert_eq!(view.overlays().squares(OverlayGroup::Selection), [Square::D5]);
}

#[test]
fn textures_generated_once_per_geometry() {
    let mut view = laid_out_view();
    view.frame().unwrap();
    assert_eq!(view.renderer().pieces_generated(), 3);
    assert_eq!(view.renderer().boards_generated(), 1);

    // Same size again: everything redrawn, nothing regenerated
    view.resize(400.0, 400.0);
    view.frame().unwrap();
    assert_eq!(view.renderer().generated.len(), 4);

    // Rotation only changes the board image
    view.rotate();
    view.frame().unwrap();
    assert_eq!(view.renderer().pieces_generated(), 3);
    assert_eq!(view.renderer().boards_generated(), 2);

    // A new square size needs new pieces
    view.resize(800.0, 800.0);
    let frame = view.frame().unwrap();
    assert_eq!(view.renderer().pieces_generated(), 6);
    assert_eq!(view.renderer().boards_generated(), 3);
    assert!(frame.layer(Layer::Pieces).unwrap().iter().any(|command| matches!(
        command,
        DrawCommand::Image { texture, .. } if texture == "K@93"
    )));
}

#[test]
fn non_square_viewport_keeps_piece_images() {
    let mut view = laid_out_view();
    view.frame().unwrap();
    view.resize(900.0, 400.0);
    view.frame().unwrap();
    assert_eq!(view.renderer().pieces_generated(), 3);
    assert_eq!(view.renderer().boards_generated(), 1);
    assert_eq!(view.geometry().unwrap().board_pos(), Point::new(250.0, 0.0));
}

#[test]
fn rotation_keeps_pending_move() {
    let mut view = laid_out_view();
    tap(&mut view, Square::E2, &mut accept_all);
    view.frame().unwrap();
    view.rotate();
    assert_eq!(view.pending_move(), "e2");
    assert_eq!(view.overlays().squares(OverlayGroup::Selection), [Square::E2]);

    // The selection is redrawn where e2 now is
    let frame = view.frame().unwrap();
    let DrawCommand::OutlineRect { rect, .. } = &frame.layer(Layer::Selection).unwrap()[0] else {
        panic!("selection should be an outline");
    };
    let e2_flipped = view.geometry().unwrap().square_rect(Square::E2);
    assert_eq!(rect.center(), e2_flipped.center());
    assert_eq!(e2_flipped.origin(), Point::new(15.0 + 3.0 * 46.25, 15.0 + 6.0 * 46.25));

    // The move finishes against the flipped layout
    let mut seen = None;
    tap(&mut view, Square::E4, &mut |mv: LongAlgebraicMove| {
        seen = Some(mv);
        true
    });
    assert_eq!(seen, Some(LongAlgebraicMove::new(Square::E2, Square::E4)));
}

#[test]
fn failed_board_image_is_retried() {
    let mut view = laid_out_view();
    view.renderer_mut().fail_board = true;
    let err = view.frame().unwrap_err();
    assert!(matches!(err, TextureError::Generate { .. }));
    assert_eq!(
        err.key(),
        TextureKey::Board {
            pixel_size: 400,
            flipped: false
        }
    );
    assert!(view.textures().is_empty());

    view.renderer_mut().fail_board = false;
    let frame = view.frame().unwrap();
    assert_eq!(
        layers(&frame),
        [Layer::Background, Layer::LastMove, Layer::Pieces, Layer::Selection]
    );
}

#[test]
fn set_model_drops_pending_move() {
    let mut view = laid_out_view();
    tap(&mut view, Square::E2, &mut accept_all);
    let old = view.set_model(Position {
        pieces: Vec::new(),
        last_move: Some(LongAlgebraicMove::new(Square::G8, Square::F6)),
    });
    assert_eq!(old.pieces.len(), 3);
    assert_eq!(view.pending_move(), "");
    assert!(view.overlays().squares(OverlayGroup::Selection).is_empty());
    assert_eq!(
        view.overlays().squares(OverlayGroup::LastMove),
        [Square::G8, Square::F6]
    );
}

#[test]
fn long_press_forwarded_once() {
    let start = Instant::now();
    let mut view = laid_out_view();
    let point = center(&view, Square::B7);

    view.pointer_down(point.x, point.y, start);
    assert_eq!(view.tick(start + Duration::from_millis(10)), None);
    assert_eq!(
        view.tick(start + Duration::from_secs(1)),
        Some(LongPress {
            square: Square::B7,
            position: point,
        })
    );
    assert_eq!(view.tick(start + Duration::from_secs(2)), None);
    assert_eq!(view.input_state(), InputState::Idle);

    // Releasing still taps
    assert_eq!(
        view.pointer_up(point.x, point.y, &mut accept_all),
        TapOutcome::Selected(Square::B7)
    );
}

#[test]
fn quick_release_cancels_long_press() {
    let start = Instant::now();
    let mut view = laid_out_view();
    let point = center(&view, Square::B7);
    view.pointer_down(point.x, point.y, start);
    view.pointer_up(point.x, point.y, &mut accept_all);
    assert_eq!(view.tick(start + Duration::from_secs(5)), None);
}

#[test]
fn highlight_center_follows_latest_square() {
    let mut view = laid_out_view();
    assert_eq!(view.highlight_center(), None);
    tap(&mut view, Square::C3, &mut accept_all);
    assert_eq!(view.highlight_center(), Some(center(&view, Square::C3)));
}
