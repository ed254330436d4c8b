//! Layout engine settings.

use radar_core::enums::{PlacementMode, Ring};
use serde::{Deserialize, Serialize};

const fn default_min_canvas() -> u32 {
    200
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RingColors {
    pub adopt: String,
    pub trial: String,
    pub assess: String,
    pub hold: String,
}

impl Default for RingColors {
    fn default() -> Self {
        Self {
            adopt: "#5ba300".to_string(),
            trial: "#009eb0".to_string(),
            assess: "#c7ba00".to_string(),
            hold: "#e09b96".to_string(),
        }
    }
}

impl RingColors {
    #[must_use]
    pub fn for_ring(&self, ring: Ring) -> &str {
        match ring {
            Ring::Adopt => &self.adopt,
            Ring::Trial => &self.trial,
            Ring::Assess => &self.assess,
            Ring::Hold => &self.hold,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LayoutConfig {
    #[serde(default)]
    pub placement: PlacementMode,

    /// Smallest accepted canvas edge, in pixels.
    #[serde(default = "default_min_canvas")]
    pub min_canvas: u32,

    #[serde(default)]
    pub colors: RingColors,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            placement: PlacementMode::default(),
            min_canvas: default_min_canvas(),
            colors: RingColors::default(),
        }
    }
}
