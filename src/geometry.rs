use crate::error::{PosterError, PosterResult};

/// Canvas proportions as `width:height`, e.g. `"4:5"` for a portrait poster.
///
/// Parsing is total: anything that is not two positive finite numbers
/// separated by a colon falls back to [`AspectRatio::DEFAULT`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    /// The portrait ratio assumed when none is supplied.
    pub const DEFAULT: Self = Self {
        width: 4.0,
        height: 5.0,
    };

    pub fn new(width: f64, height: f64) -> PosterResult<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(PosterError::validation("aspect ratio width must be > 0"));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(PosterError::validation("aspect ratio height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Parses `"W:H"`, falling back to the default ratio on malformed input.
    pub fn parse(raw: &str) -> Self {
        let Some((w, h)) = raw.split_once(':') else {
            return Self::DEFAULT;
        };
        match (w.trim().parse::<f64>(), h.trim().parse::<f64>()) {
            (Ok(w), Ok(h)) => Self::new(w, h).unwrap_or(Self::DEFAULT),
            _ => Self::DEFAULT,
        }
    }

    pub fn is_landscape(self) -> bool {
        self.width > self.height
    }

    pub fn is_square(self) -> bool {
        self.width == self.height
    }

    /// The CSS `aspect-ratio` value, e.g. `"16/9"`.
    pub fn css_value(self) -> String {
        format!("{}/{}", self.width, self.height)
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Layout constants derived from an aspect ratio.
///
/// Landscape canvases trade vertical space for width, so they get tighter
/// container padding and compressed font sizes relative to the portrait
/// baseline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometryParams {
    pub ratio: AspectRatio,
    pub is_landscape: bool,
    pub is_square: bool,
    /// Glass-container padding as a fraction of the canvas width.
    pub padding_fraction: f64,
    /// Multiplier applied to every derived font size. Portrait is the 1.0
    /// baseline; square and landscape compress from there.
    pub font_scale: f64,
}

const PADDING_LANDSCAPE: f64 = 0.03;
const PADDING_SQUARE: f64 = 0.06;
const PADDING_PORTRAIT: f64 = 0.06;

const FONT_SCALE_LANDSCAPE: f64 = 0.6;
const FONT_SCALE_SQUARE: f64 = 0.9;
const FONT_SCALE_PORTRAIT: f64 = 1.0;

/// Resolves an aspect ratio into the layout constants used by derivation.
///
/// Pure and total: same input, same output, never fails.
pub fn resolve(ratio: AspectRatio) -> GeometryParams {
    let (padding_fraction, font_scale) = if ratio.is_landscape() {
        (PADDING_LANDSCAPE, FONT_SCALE_LANDSCAPE)
    } else if ratio.is_square() {
        (PADDING_SQUARE, FONT_SCALE_SQUARE)
    } else {
        (PADDING_PORTRAIT, FONT_SCALE_PORTRAIT)
    };
    GeometryParams {
        ratio,
        is_landscape: ratio.is_landscape(),
        is_square: ratio.is_square(),
        padding_fraction,
        font_scale,
    }
}
