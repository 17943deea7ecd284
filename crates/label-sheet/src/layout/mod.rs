//! Template geometry for label sheets
//!
//! This module handles the geometric side of composition:
//! - Converting the physical sheet description to pixels
//! - Slot numbering and grid positions
//! - Building the blank template canvas

mod grid;
mod types;

pub use grid::*;
pub use types::*;
