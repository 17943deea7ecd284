use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    /// `assignment` is the zero-based position in the assignment list
    #[error("Assignment {assignment}: slot {slot} is not one of 1-4")]
    InvalidSlot { assignment: usize, slot: usize },
    /// `input` is the zero-based position in the input list
    #[error("Failed to decode input {input}: {source}")]
    Decode {
        input: usize,
        #[source]
        source: DecodeError,
    },
    #[error("Assignment {assignment}: label image is {width}x{height}, expected a non-empty image")]
    DegenerateImage {
        assignment: usize,
        width: u32,
        height: u32,
    },
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// Failure to turn an input document into a raster label
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Document has no pages")]
    NoPages,
    #[error("Malformed PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Render error: {0}")]
    Render(String),
    #[error("PDF input requires the `pdfium` feature")]
    RendererUnavailable,
    #[error("Unrecognised document format")]
    UnsupportedFormat,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to turn the composed canvas into an output document
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Cannot encode a {width}x{height} canvas")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("Resolution must be at least 1 dpi")]
    InvalidResolution,
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A label image with no pixels on at least one axis
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Label image is {width}x{height}, expected a non-empty image")]
pub struct DegenerateImage {
    pub width: u32,
    pub height: u32,
}

/// Opaque RGB color used for the sheet background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(rgb: image::Rgb<u8>) -> Self {
        let [r, g, b] = rgb.0;
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parses `#rrggbb` or `rrggbb`
impl FromStr for Color {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ComposeError::Config(format!(
                "Color must be six hex digits, got {:?}",
                s
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ComposeError::Config(format!("Invalid hex color {:?}", s)))
        };

        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}
