//! Layout configuration loaded from a TOML file.

use serde::Deserialize;

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Layout configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Keep positions already carried by components instead of recomputing
    /// them
    pub keep_positions: bool,

    /// Margin around the top-level components
    pub root_margin: f32,

    /// Gap of the top-level packing lattice
    pub root_gap: f32,

    /// Horizontal spacing between delegated graph layers
    pub horizontal_spacing: f32,

    /// Vertical spacing between delegated graph layers
    pub vertical_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            keep_positions: false,
            root_margin: 10.0,
            root_gap: 10.0,
            horizontal_spacing: 50.0,
            vertical_spacing: 80.0,
        }
    }
}
