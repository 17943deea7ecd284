use crate::compose::resolve_slots;
use crate::constants::SLOT_COUNT;
use crate::layout::SlotIndex;
use crate::types::*;
use std::fmt;

/// Statistics about a composition request
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionStatistics {
    /// Number of labels supplied
    pub labels: usize,
    /// Slots that end up with a label, in slot order
    pub occupied_slots: Vec<SlotIndex>,
    /// Slots left as background, in slot order
    pub empty_slots: Vec<SlotIndex>,
    /// Slots targeted more than once (only the last label stays visible)
    pub overwritten_slots: Vec<SlotIndex>,
}

/// Calculate statistics for a list of requested slot numbers
pub fn calculate_statistics(slots: &[usize]) -> Result<CompositionStatistics> {
    let resolved = resolve_slots(slots.iter().copied())?;

    let mut counts = [0usize; SLOT_COUNT];
    for slot in &resolved {
        counts[slot.zero_based()] += 1;
    }

    let select = |keep: fn(usize) -> bool| -> Vec<SlotIndex> {
        SlotIndex::ALL
            .into_iter()
            .filter(|slot| keep(counts[slot.zero_based()]))
            .collect()
    };

    Ok(CompositionStatistics {
        labels: resolved.len(),
        occupied_slots: select(|count| count > 0),
        empty_slots: select(|count| count == 0),
        overwritten_slots: select(|count| count > 1),
    })
}

/// Size and resolution of an encoded sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSummary {
    pub bytes: usize,
    pub dpi: u32,
}

impl OutputSummary {
    pub fn new(bytes: usize, dpi: u32) -> Self {
        Self { bytes, dpi }
    }

    pub fn size_kb(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

impl fmt::Display for OutputSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PDF Size: {:.1} KB | Resolution: {} DPI",
            self.size_kb(),
            self.dpi
        )
    }
}
