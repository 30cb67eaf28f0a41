//! Turning taps into moves
//!
//! A move is entered as two taps: the source square, then the target square. Tapping the
//! source again takes it back. A target the [`MoveHandler`] refuses becomes the source of a new
//! move, so the user can start over without an extra tap.

use std::time::{Duration, Instant};

use board::{LongAlgebraicMove, Square};

use crate::{
    geometry::Point,
    overlay::{OverlayGroup, OverlaySet},
    MoveHandler,
};

/// How far along entering a move is
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputState {
    /// Nothing selected
    #[default]
    Idle,
    /// The source square has been picked
    OneSelected(Square),
}

/// What a tap did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// The tap was outside the playing area
    Ignored,
    /// The square became the source of a move
    Selected(Square),
    /// The source square was tapped again and is no longer selected
    Deselected(Square),
    /// The move was handed off and accepted
    Accepted(LongAlgebraicMove),
    /// The move was handed off and refused; its target is now selected instead
    Rejected(LongAlgebraicMove),
}

/// A pointer held down on a square for the long-press delay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LongPress {
    pub square: Square,
    /// Where the pointer went down
    pub position: Point,
}

#[derive(Clone, Copy, Debug)]
struct PendingPress {
    press: LongPress,
    deadline: Instant,
}

/// The tap state machine, plus the long-press timer
#[derive(Clone, Debug)]
pub struct MoveInput {
    state: InputState,
    pending_press: Option<PendingPress>,
    long_press_delay: Duration,
}
impl MoveInput {
    pub fn new(long_press_delay: Duration) -> Self {
        Self {
            state: InputState::Idle,
            pending_press: None,
            long_press_delay,
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    /// The move entered so far: empty, or the name of the source square
    pub fn pending_move(&self) -> String {
        match self.state {
            InputState::Idle => String::new(),
            InputState::OneSelected(square) => square.to_string(),
        }
    }

    /// Feed a tap on `square`, or on no square if `None`
    ///
    /// Keeps the selection overlay in step with the state. When the tap completes a move, the
    /// handler is asked before this returns.
    pub fn tap(
        &mut self,
        square: Option<Square>,
        overlays: &mut OverlaySet,
        handler: &mut impl MoveHandler,
    ) -> TapOutcome {
        let Some(square) = square else {
            return TapOutcome::Ignored;
        };
        let outcome = match self.state {
            InputState::Idle => {
                self.select(square, overlays);
                TapOutcome::Selected(square)
            }
            InputState::OneSelected(source) if source == square => {
                self.reset(overlays);
                TapOutcome::Deselected(square)
            }
            InputState::OneSelected(source) => {
                let mv = LongAlgebraicMove::new(source, square);
                if handler.on_user_move(mv) {
                    tracing::debug!(%mv, "move accepted");
                    self.reset(overlays);
                    TapOutcome::Accepted(mv)
                } else {
                    tracing::debug!(%mv, "move rejected, restarting from its target");
                    self.select(square, overlays);
                    TapOutcome::Rejected(mv)
                }
            }
        };
        tracing::trace!(?outcome, state = ?self.state, "tap");
        outcome
    }

    /// Forget the move being entered
    pub fn reset(&mut self, overlays: &mut OverlaySet) {
        self.state = InputState::Idle;
        overlays.clear(OverlayGroup::Selection);
    }

    /// A pointer went down
    ///
    /// Any earlier pending long press is dropped. Starts the long-press timer if the pointer is
    /// over a square.
    pub fn press(&mut self, square: Option<Square>, position: Point, now: Instant) {
        self.cancel_long_press();
        self.pending_press = square.map(|square| PendingPress {
            press: LongPress { square, position },
            deadline: now + self.long_press_delay,
        });
    }

    /// Stop a long press from firing
    pub fn cancel_long_press(&mut self) {
        if let Some(pending) = self.pending_press.take() {
            tracing::trace!(square = %pending.press.square, "long press canceled");
        }
    }

    /// The long press, if its timer has run out by `now`
    ///
    /// A long press fires at most once.
    pub fn poll_long_press(&mut self, now: Instant) -> Option<LongPress> {
        let pending = self.pending_press?;
        if now < pending.deadline {
            return None;
        }
        self.pending_press = None;
        tracing::debug!(square = %pending.press.square, "long press");
        Some(pending.press)
    }

    pub fn long_press_pending(&self) -> bool {
        self.pending_press.is_some()
    }

    pub fn set_long_press_delay(&mut self, delay: Duration) {
        self.long_press_delay = delay;
    }

    fn select(&mut self, square: Square, overlays: &mut OverlaySet) {
        self.state = InputState::OneSelected(square);
        overlays.set_squares(OverlayGroup::Selection, &[square]);
    }
}
impl Default for MoveInput {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
