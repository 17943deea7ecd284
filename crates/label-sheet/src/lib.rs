pub mod codec;
mod compose;
pub mod constants;
mod fit;
mod io;
pub mod layout;
mod options;
mod preview;
mod stats;
mod types;

pub use codec::{decode_first_page, encode_page, encode_png};
pub use compose::{
    Assignment, compose, compose_documents, compose_documents_sync, compose_with,
    decode_assignments, resolve_slots,
};
pub use constants::{DEFAULT_DPI, DEFAULT_PREVIEW_WIDTH, mm_to_px};
pub use fit::{FittedLabel, LabelImage, fit_dimensions, fit_label};
pub use io::{load_document, load_multiple_documents, save_document};
pub use layout::{SlotIndex, Template, TemplateLayout, build_template, build_template_with};
pub use options::*;
pub use preview::generate_preview;
pub use stats::{CompositionStatistics, OutputSummary, calculate_statistics};
pub use types::*;
