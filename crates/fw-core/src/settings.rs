//! Conversion settings.
//!
//! Loaded from JSON (camelCase keys). The longer Tailwind-prefixed option names
//! (`customTailwindPrefix`, ...) are accepted as aliases so exported settings files
//! load unchanged.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

// ─── Generation mode ──────────────────────────────────────────────────────

/// Markup dialect of the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Plain HTML: `class="…"`, explicit close tags for empty elements.
    Html,
    /// JSX: `className="…"`, every empty element self-closes.
    #[default]
    Jsx,
}

impl GenerationMode {
    /// The attribute name that carries the class list.
    pub fn class_attribute(self) -> &'static str {
        match self {
            GenerationMode::Html => "class",
            GenerationMode::Jsx => "className",
        }
    }

    /// Whether empty elements are written as `<tag />`.
    pub fn self_closes_empty(self) -> bool {
        matches!(self, GenerationMode::Jsx)
    }
}

// ─── Settings ─────────────────────────────────────────────────────────────

/// Options recognized by the normalizer and the emission engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Resolve bound color variables and emit their names instead of literals.
    pub use_color_variables: bool,

    /// Render flattenable shapes as inline `<svg>` markup.
    pub embed_vectors: bool,

    /// Image fills always become placeholders; when set, the warning says
    /// embedding was requested but is not available.
    pub embed_images: bool,

    #[serde(alias = "tailwindGenerationMode")]
    pub generation_mode: GenerationMode,

    /// Pixel size of `1rem`, used by rem-based typography scales.
    pub base_font_size: f64,

    /// Prepended to every emitted utility token (e.g. `tw-`).
    #[serde(alias = "customTailwindPrefix")]
    pub custom_prefix: String,

    /// Snap typography values to the nearest named step within tolerance.
    #[serde(alias = "roundTailwindValues")]
    pub round_values: bool,

    /// Snap colors to the nearest palette entry within tolerance.
    #[serde(alias = "roundTailwindColors")]
    pub round_colors: bool,

    /// Attach `data-layer="<name>"` to every emitted element.
    pub show_layer_names: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_color_variables: false,
            embed_vectors: false,
            embed_images: false,
            generation_mode: GenerationMode::Jsx,
            base_font_size: 16.0,
            custom_prefix: String::new(),
            round_values: true,
            round_colors: true,
            show_layer_names: false,
        }
    }
}

impl Settings {
    /// Parse a settings document. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns `ConvertError::Json` if the document is not valid settings JSON.
    pub fn from_json(text: &str) -> Result<Self, ConvertError> {
        Ok(serde_json::from_str(text)?)
    }
}
