//! The draw-command list handed to the rendering backend
//!
//! A frame is a set of replaced layers. A layer missing from a frame keeps whatever the backend
//! drew for it last time, so a tap only ships the selection layer.

use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// A color with straight alpha, each channel in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}
impl Rgba {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    ///
    /// ```
    /// # use boardview::Rgba;
    /// let color = Rgba::from_hex("#ff0080").unwrap();
    /// assert_eq!(color, Rgba::new(1.0, 0.0, 128.0 / 255.0, 1.0));
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError(hex.to_owned());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |idx: usize| {
            u8::from_str_radix(&digits[2 * idx..2 * idx + 2], 16)
                .map(|value| f32::from(value) / 255.0)
                .map_err(|_| invalid())
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(1)?,
            b: channel(2)?,
            a: if digits.len() == 8 { channel(3)? } else { 1.0 },
        })
    }
}
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))?;
        if self.a < 1.0 {
            write!(f, "{:02x}", byte(self.a))?;
        }
        Ok(())
    }
}
impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}
impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid hex color {0:?}")]
pub struct ColorParseError(pub String);

/// One drawing primitive
///
/// `T` is the backend's texture handle, as produced by [`crate::Renderer::decode_image`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand<T> {
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    OutlineRect {
        rect: Rect,
        color: Rgba,
        width: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    },
    /// Draw the texture stretched over `rect`
    Image {
        rect: Rect,
        texture: T,
    },
}

/// The layers of a frame, in the order they are painted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Clear color, board image and grid
    Background,
    /// Filled squares of the last applied move
    LastMove,
    Pieces,
    /// Outlines of the squares picked for the move being entered
    Selection,
}

/// The layers that changed since the previous frame
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T> {
    layers: Vec<(Layer, Vec<DrawCommand<T>>)>,
}
impl<T> Frame<T> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Replace `layer` with `commands`
    ///
    /// Layers are kept in paint order no matter the order they are pushed in.
    pub fn push(&mut self, layer: Layer, commands: Vec<DrawCommand<T>>) {
        match self.layers.binary_search_by_key(&layer, |(l, _)| *l) {
            Ok(idx) => self.layers[idx].1 = commands,
            Err(idx) => self.layers.insert(idx, (layer, commands)),
        }
    }

    /// The new contents of `layer`, or `None` if it did not change
    pub fn layer(&self, layer: Layer) -> Option<&[DrawCommand<T>]> {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, commands)| commands.as_slice())
    }

    /// The changed layers, in paint order
    pub fn layers(&self) -> impl Iterator<Item = (Layer, &[DrawCommand<T>])> {
        self.layers
            .iter()
            .map(|(layer, commands)| (*layer, commands.as_slice()))
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
impl<T> Default for Frame<T> {
    fn default() -> Self {
        Self::new()
    }
}
