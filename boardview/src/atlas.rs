//! Piece sprite atlases
//!
//! An atlas packs all twelve piece images into one sheet, six columns by two rows, and comes with
//! an index file naming the sheet and the region of every piece in it:
//!
//! ```json
//! { "pieces.png": { "K": [360, 72, 72, 72], "p": [0, 0, 72, 72] } }
//! ```
//!
//! Black pieces take the top row of the image and white pieces the bottom row. Regions are
//! given from the bottom-left corner of the sheet, so white pieces have `y == 0`.

use std::{collections::BTreeMap, fs, path::Path};

use board::{Color, Piece};
use serde::{Deserialize, Serialize};

/// A rectangle of the sheet, in pixels from its bottom-left corner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
impl From<[u32; 4]> for Region {
    fn from([x, y, width, height]: [u32; 4]) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
impl From<Region> for [u32; 4] {
    fn from(region: Region) -> Self {
        [region.x, region.y, region.width, region.height]
    }
}

/// Where each piece goes on a sheet of square cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasLayout {
    cell_size: u32,
}
impl AtlasLayout {
    /// One column per piece kind
    pub const COLUMNS: u32 = 6;
    /// Black on the top row, white on the bottom row
    pub const ROWS: u32 = 2;

    pub const fn new(cell_size: u32) -> Self {
        Self { cell_size }
    }

    pub const fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// `(width, height)` of the whole sheet
    pub const fn sheet_size(&self) -> (u32, u32) {
        (Self::COLUMNS * self.cell_size, Self::ROWS * self.cell_size)
    }

    /// Top-left corner of the cell for `piece`, in image coordinates (`y` grows downwards)
    ///
    /// This is where a sheet producer pastes the piece image.
    pub const fn cell_origin(&self, piece: Piece) -> (u32, u32) {
        let row = match piece.color {
            Color::Black => 0,
            Color::White => 1,
        };
        (piece.kind as u32 * self.cell_size, row * self.cell_size)
    }

    /// The cell for `piece` as an atlas region (`y` grows upwards)
    pub const fn region(&self, piece: Piece) -> Region {
        let (x, top) = self.cell_origin(piece);
        let (_, sheet_height) = self.sheet_size();
        Region {
            x,
            y: sheet_height - top - self.cell_size,
            width: self.cell_size,
            height: self.cell_size,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("could not access atlas file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed atlas index: {0}")]
    Json(#[from] serde_json::Error),
    #[error("atlas index must name exactly one sheet, found {0}")]
    SheetCount(usize),
    #[error("atlas index has an entry for unknown piece {0:?}")]
    UnknownPiece(String),
}

/// An atlas index: the sheet's file name and each piece's region in it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atlas {
    sheet: String,
    regions: BTreeMap<Piece, Region>,
}
impl Atlas {
    /// The index for a sheet named `<name>.png` packed by `layout`
    pub fn generate(name: &str, layout: AtlasLayout) -> Self {
        Self {
            sheet: format!("{name}.png"),
            regions: Piece::ALL
                .into_iter()
                .map(|piece| (piece, layout.region(piece)))
                .collect(),
        }
    }

    /// File name of the sheet, relative to the index file
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn region(&self, piece: Piece) -> Option<Region> {
        self.regions.get(&piece).copied()
    }

    /// Every piece with a region, in piece order
    pub fn regions(&self) -> impl Iterator<Item = (Piece, Region)> + '_ {
        self.regions.iter().map(|(piece, region)| (*piece, *region))
    }

    pub fn from_json_str(json: &str) -> Result<Self, AtlasError> {
        let mut sheets: BTreeMap<String, BTreeMap<String, Region>> = serde_json::from_str(json)?;
        if sheets.len() != 1 {
            return Err(AtlasError::SheetCount(sheets.len()));
        }
        let Some((sheet, entries)) = sheets.pop_first() else {
            return Err(AtlasError::SheetCount(0));
        };
        let regions = entries
            .into_iter()
            .map(|(symbol, region)| match symbol.parse::<Piece>() {
                Ok(piece) => Ok((piece, region)),
                Err(_) => Err(AtlasError::UnknownPiece(symbol)),
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { sheet, regions })
    }

    pub fn to_json_string(&self) -> Result<String, AtlasError> {
        let entries: BTreeMap<String, Region> = self
            .regions
            .iter()
            .map(|(piece, region)| (piece.to_string(), *region))
            .collect();
        let sheets = BTreeMap::from([(self.sheet.as_str(), entries)]);
        Ok(serde_json::to_string(&sheets)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| AtlasError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AtlasError> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?).map_err(|source| AtlasError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), sheet = %self.sheet, "wrote atlas index");
        Ok(())
    }
}
