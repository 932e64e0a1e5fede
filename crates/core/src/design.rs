//! Design snapshot types — the read-only view of the host application's
//! currently loaded project.
//!
//! The host tool produces one snapshot per analysis request; the core never
//! caches it beyond a single turn. A snapshot may be empty (no project
//! loaded), and every consumer must handle that case.

use serde::{Deserialize, Serialize};

/// One placed component as the host tool reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    /// Reference designator (R1, C3, U2, ...).
    pub reference: String,

    /// Component value ("10K", "100nF", "STM32F407VGT6").
    pub value: String,

    /// Footprint library item name.
    pub footprint: String,
}

/// Board-level statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardStats {
    pub width_mm: f64,
    pub height_mm: f64,
    pub copper_layers: u32,
    pub track_count: u32,
}

/// A read-only snapshot of the loaded design.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    /// Project title from the title block, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// All components, in the host tool's reference order.
    #[serde(default)]
    pub components: Vec<ComponentEntry>,

    /// Named nets (unnamed/auto nets are omitted by the provider).
    #[serde(default)]
    pub nets: Vec<String>,

    /// Board statistics; absent for schematic-only snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BoardStats>,
}

impl DesignSnapshot {
    /// True when there is nothing useful to describe to the model.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.nets.is_empty() && self.stats.is_none()
    }
}
