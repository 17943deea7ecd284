//! Document codec
//!
//! This module converts between page documents and raster images:
//! - Decoding page 1 of an input (PDF or raster image) to a label
//! - Encoding the composed canvas as a single-page PDF
//! - Scoped scratch files for decoders that need a path on disk

mod decode;
mod encode;
mod scratch;

pub use decode::{InputFormat, decode_first_page, detect_format};
#[cfg(feature = "pdfium")]
pub use decode::init_pdfium;
pub use encode::{encode_page, encode_png};
pub use scratch::ScratchFile;
