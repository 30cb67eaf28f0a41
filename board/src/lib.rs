//! Chess value types shared by the board view
//!
//! Nothing in here knows about legality. These are the names the view and the rule engine use to
//! talk to each other: squares, pieces, and moves written as two square names.

use core::{fmt, str::FromStr};

/// The types of pieces there are
///
/// The order matches the usual piece-type numbering (pawn first, king last), which is also the
/// column order of a piece atlas.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    /// All the kinds of pieces there are
    pub const KINDS: [PieceKind; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    /// The capitalized version of the letter used for this piece in FEN
    pub const fn fen_letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Parse a FEN letter of either case
    pub const fn from_fen_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(Self::Pawn),
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'R' => Some(Self::Rook),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            _ => None,
        }
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

/// A piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}
impl Piece {
    /// Every piece there is, white first
    pub const ALL: [Piece; 12] = {
        let mut all = [Piece::new(PieceKind::Pawn, Color::White); 12];
        let mut idx = 0;
        while idx < 6 {
            all[idx] = Piece::new(PieceKind::KINDS[idx], Color::White);
            all[idx + 6] = Piece::new(PieceKind::KINDS[idx], Color::Black);
            idx += 1;
        }
        all
    };

    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// The FEN symbol for this piece: uppercase for white, lowercase for black
    pub const fn symbol(self) -> char {
        match self.color {
            Color::White => self.kind.fen_letter().to_ascii_uppercase(),
            Color::Black => self.kind.fen_letter().to_ascii_lowercase(),
        }
    }

    /// Parse a piece from its FEN symbol
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match PieceKind::from_fen_letter(symbol) {
            Some(kind) => Some(Self::new(kind, color)),
            None => None,
        }
    }
}
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid piece symbol {0:?}")]
pub struct PieceParseError(pub String);

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => {
                Self::from_symbol(symbol).ok_or_else(|| PieceParseError(s.to_owned()))
            }
            _ => Err(PieceParseError(s.to_owned())),
        }
    }
}

/// A square on the board
///
/// Stored as the index `file + 8 * rank` with both coordinates 0-based, so `a1` is 0, `h1` is 7
/// and `h8` is 63. Every value of this type is a real square; the only ways in are checked.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

macro_rules! square_consts {
    ($($rank:literal => [$a:ident, $b:ident, $c:ident, $d:ident, $e:ident, $f:ident, $g:ident, $h:ident]),* $(,)?) => {$(
        pub const $a: Self = Self(8 * $rank);
        pub const $b: Self = Self(8 * $rank + 1);
        pub const $c: Self = Self(8 * $rank + 2);
        pub const $d: Self = Self(8 * $rank + 3);
        pub const $e: Self = Self(8 * $rank + 4);
        pub const $f: Self = Self(8 * $rank + 5);
        pub const $g: Self = Self(8 * $rank + 6);
        pub const $h: Self = Self(8 * $rank + 7);
    )*};
}

impl Square {
    square_consts! {
        0 => [A1, B1, C1, D1, E1, F1, G1, H1],
        1 => [A2, B2, C2, D2, E2, F2, G2, H2],
        2 => [A3, B3, C3, D3, E3, F3, G3, H3],
        3 => [A4, B4, C4, D4, E4, F4, G4, H4],
        4 => [A5, B5, C5, D5, E5, F5, G5, H5],
        5 => [A6, B6, C6, D6, E6, F6, G6, H6],
        6 => [A7, B7, C7, D7, E7, F7, G7, H7],
        7 => [A8, B8, C8, D8, E8, F8, G8, H8],
    }

    /// The file letters, in order
    pub const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

    /// The square with the given index, if it is on the board
    ///
    /// ```
    /// # use board::Square;
    /// assert_eq!(Square::new(12), Some(Square::E2));
    /// assert_eq!(Square::new(64), None);
    /// ```
    pub const fn new(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The square at the given 0-based file and rank, if both are on the board
    pub const fn from_file_rank(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self(file + 8 * rank))
        } else {
            None
        }
    }

    /// The index `file + 8 * rank`
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The 0-based file, 0 for the a-file
    pub const fn file(self) -> u8 {
        self.0 & 0x07
    }

    /// The 0-based rank, 0 for the first rank
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// The square seen from the other side of the board (file and rank both mirrored)
    ///
    /// ```
    /// # use board::Square;
    /// assert_eq!(Square::A1.mirrored(), Square::H8);
    /// assert_eq!(Square::E2.mirrored(), Square::D7);
    /// ```
    pub const fn mirrored(self) -> Self {
        Self(63 - self.0)
    }

    pub const fn file_char(self) -> char {
        Self::FILES[self.file() as usize]
    }

    pub const fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }

    /// An iterator over all squares, from a1 to h8
    ///
    /// ```
    /// assert_eq!(board::Square::all().count(), 64);
    /// ```
    pub fn all() -> impl Iterator<Item = Self> {
        (0..64).map(Self)
    }
}
impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Square")
            .field("index", &self.0)
            .field("readable", &format_args!("{self}"))
            .finish()
    }
}
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid square name {0:?}")]
pub struct SquareParseError(pub String);

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SquareParseError(s.to_owned());
        let &[file, rank] = s.as_bytes() else {
            return Err(invalid());
        };
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Self::from_file_rank(file - b'a', rank - b'1').ok_or_else(invalid)
    }
}

/// A move written as its source and target squares, like `e2e4`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LongAlgebraicMove {
    pub from: Square,
    pub to: Square,
}
impl LongAlgebraicMove {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}
impl fmt::Display for LongAlgebraicMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MoveParseError {
    #[error("move {0:?} is not exactly two square names")]
    Length(String),
    #[error(transparent)]
    Square(#[from] SquareParseError),
}

impl FromStr for LongAlgebraicMove {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.is_char_boundary(2) {
            return Err(MoveParseError::Length(s.to_owned()));
        }
        let (from, to) = s.split_at(2);
        Ok(Self {
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}

#[cfg(feature = "quickcheck")]
impl quickcheck::Arbitrary for Square {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self(u8::arbitrary(g) % 64)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}
