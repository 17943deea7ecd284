use crate::constants::{DEFAULT_DPI, MAX_CANVAS_BYTES, MAX_DPI};
use crate::layout::{TemplateLayout, sheet_geometry};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Composition configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComposeOptions {
    /// Physical sheet description
    pub layout: TemplateLayout,
    /// Resolution for rasterising inputs and for the output page
    pub dpi: u32,
    /// Fill color of the sheet and of any unused slot area
    pub background: Color,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            layout: TemplateLayout::A4_FOUR_UP,
            dpi: DEFAULT_DPI,
            background: Color::WHITE,
        }
    }
}

impl ComposeOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(ComposeError::Config(
                "Resolution must be at least 1 dpi".to_string(),
            ));
        }
        if self.dpi > MAX_DPI {
            return Err(ComposeError::Config(format!(
                "Resolution must be at most {} dpi, got {}",
                MAX_DPI, self.dpi
            )));
        }

        let layout = &self.layout;
        let positive = [
            ("page width", layout.page_width_mm),
            ("page height", layout.page_height_mm),
            ("slot width", layout.slot_width_mm),
            ("slot height", layout.slot_height_mm),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ComposeError::Config(format!(
                    "{} must be a positive length, got {} mm",
                    name, value
                )));
            }
        }

        // Negative spacing would let neighbouring slots overlap
        let spacing = [
            ("horizontal margin", layout.margin_x_mm),
            ("vertical margin", layout.margin_y_mm),
            ("horizontal gap", layout.gap_x_mm),
            ("vertical gap", layout.gap_y_mm),
        ];
        for (name, value) in spacing {
            if !value.is_finite() || value < 0.0 {
                return Err(ComposeError::Config(format!(
                    "{} must not be negative, got {} mm",
                    name, value
                )));
            }
        }

        // Every slot must start on the page, even if it runs off the edge
        let last_column_x = layout.margin_x_mm + layout.slot_width_mm + layout.gap_x_mm;
        let last_row_y = layout.margin_y_mm + layout.slot_height_mm + layout.gap_y_mm;
        if last_column_x >= layout.page_width_mm || last_row_y >= layout.page_height_mm {
            return Err(ComposeError::Config(format!(
                "Slots start outside the {}x{} mm page",
                layout.page_width_mm, layout.page_height_mm
            )));
        }

        let geometry = sheet_geometry(layout, self.dpi);
        if geometry.page_width == 0 || geometry.page_height == 0 {
            return Err(ComposeError::Config(format!(
                "Page is empty at {} dpi",
                self.dpi
            )));
        }
        if geometry.canvas_bytes() > MAX_CANVAS_BYTES {
            return Err(ComposeError::Config(format!(
                "A {}x{} px page at {} dpi exceeds the {} MiB canvas limit",
                geometry.page_width,
                geometry.page_height,
                self.dpi,
                MAX_CANVAS_BYTES >> 20
            )));
        }

        Ok(())
    }
}
