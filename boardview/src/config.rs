//! Board appearance and layout settings
//!
//! Every field has a default, so a settings file only needs the keys it changes:
//!
//! ```json
//! { "anchor": { "horizontal": "left" }, "grid_line_width": 2.0 }
//! ```

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::draw::Rgba;

/// Where the board sits horizontally when the viewport is wider than it is tall
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAnchor {
    Left,
    #[default]
    Center,
    Right,
}
impl HorizontalAnchor {
    /// The share of the free space placed before the board
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

/// Where the board sits vertically when the viewport is taller than it is wide
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Bottom,
    #[default]
    Center,
    Top,
}
impl VerticalAnchor {
    /// The share of the free space placed below the board
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Bottom => 0.0,
            Self::Center => 0.5,
            Self::Top => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Anchor {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

/// Settings for a [`crate::BoardView`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Width of the margin band in board-image units
    ///
    /// Only the ratio to [`Self::square_units`] matters; the board is scaled to the viewport.
    pub margin_units: f64,
    /// Width of one square in board-image units
    pub square_units: f64,
    pub anchor: Anchor,
    pub grid_line_width: f64,
    pub grid_color: Rgba,
    /// Painted under the board image
    pub clear_color: Rgba,
    /// Outline width of selected squares
    pub selection_line_width: f64,
    /// Overlay color for the first and second square of a group
    pub highlight_colors: [Rgba; 2],
    /// How long a pointer has to stay down to count as a long press
    pub long_press_delay_ms: u64,
}
impl BoardConfig {
    /// Parse a configuration from JSON, filling in defaults for missing keys
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "loaded board config");
        Ok(config)
    }

    /// Check the values a board can't be laid out with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = |name: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { name, value })
            }
        };
        non_negative("margin_units", self.margin_units)?;
        non_negative("grid_line_width", self.grid_line_width)?;
        non_negative("selection_line_width", self.selection_line_width)?;
        if !(self.square_units.is_finite() && self.square_units > 0.0) {
            return Err(ConfigError::Invalid {
                name: "square_units",
                value: self.square_units,
            });
        }
        Ok(())
    }

    pub fn long_press_delay(&self) -> Duration {
        Duration::from_millis(self.long_press_delay_ms)
    }
}
impl Default for BoardConfig {
    fn default() -> Self {
        const OLIVE: Rgba = Rgba::new(170.0 / 255.0, 162.0 / 255.0, 59.0 / 255.0, 1.0);
        const PALE_OLIVE: Rgba = Rgba::new(205.0 / 255.0, 209.0 / 255.0, 106.0 / 255.0, 1.0);
        Self {
            margin_units: 15.0,
            square_units: 45.0,
            anchor: Anchor::default(),
            grid_line_width: 1.25,
            grid_color: Rgba::BLACK,
            clear_color: Rgba::WHITE,
            selection_line_width: 3.0,
            highlight_colors: [OLIVE, PALE_OLIVE],
            long_press_delay_ms: 1000,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config value {name} = {value} is out of range")]
    Invalid { name: &'static str, value: f64 },
}
