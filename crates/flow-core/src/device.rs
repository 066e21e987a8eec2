//! Coarse device-capability description used to pick a scene tier.
//!
//! The web front-end fills this from `navigator` and `matchMedia`; tests build
//! it by hand.

use crate::constants::{LOW_TIER_MAX_CORES, MOBILE_UA_TOKENS};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceInfo {
    pub user_agent: String,
    /// Logical core count as reported by the platform. `0` means unknown and
    /// does not by itself demote the device.
    pub hardware_concurrency: u32,
    pub prefers_reduced_motion: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceTier {
    Full,
    Low,
}

impl DeviceInfo {
    pub fn is_mobile(&self) -> bool {
        let ua = self.user_agent.to_ascii_lowercase();
        MOBILE_UA_TOKENS.iter().any(|t| ua.contains(t))
    }

    pub fn tier(&self) -> DeviceTier {
        let few_cores =
            self.hardware_concurrency != 0 && self.hardware_concurrency <= LOW_TIER_MAX_CORES;
        if self.is_mobile() || few_cores {
            DeviceTier::Low
        } else {
            DeviceTier::Full
        }
    }
}
