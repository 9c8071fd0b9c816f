use bevy::log::info;
use constants::render_settings::{DESKTOP_TARGET_FPS, MOBILE_TARGET_FPS};

/// Rendering capability class used to scale particle budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceTier {
    Desktop,
    Mobile,
}

/// Raw capability flags read once from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceProbe {
    pub is_mobile: bool,
    pub reduced_motion: bool,
}

/// Device classification fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub tier: DeviceTier,
    pub reduced_motion: bool,
}

impl DeviceProfile {
    pub fn from_probe(probe: DeviceProbe) -> Self {
        let tier = if probe.is_mobile {
            DeviceTier::Mobile
        } else {
            DeviceTier::Desktop
        };
        Self {
            tier,
            reduced_motion: probe.reduced_motion,
        }
    }

    pub fn default_target_fps(&self) -> u32 {
        match self.tier {
            DeviceTier::Desktop => DESKTOP_TARGET_FPS,
            DeviceTier::Mobile => MOBILE_TARGET_FPS,
        }
    }
}

/// Probe the host once. Web builds read the user agent and the
/// `prefers-reduced-motion` media query.
#[cfg(target_arch = "wasm32")]
pub fn probe_host() -> DeviceProbe {
    let Some(window) = web_sys::window() else {
        return DeviceProbe::default();
    };

    let is_mobile = window
        .navigator()
        .user_agent()
        .map(|agent| {
            let agent = agent.to_lowercase();
            ["mobi", "android", "iphone", "ipad"]
                .iter()
                .any(|marker| agent.contains(marker))
        })
        .unwrap_or(false);

    let reduced_motion = window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false);

    let probe = DeviceProbe {
        is_mobile,
        reduced_motion,
    };
    info!("Device probe: {:?}", probe);
    probe
}

/// Probe the host once. Native builds classify by target OS; reduced motion
/// is opted into through `PHASE_VISUALIZER_REDUCED_MOTION`.
#[cfg(not(target_arch = "wasm32"))]
pub fn probe_host() -> DeviceProbe {
    let is_mobile = cfg!(any(target_os = "android", target_os = "ios"));
    let reduced_motion = std::env::var("PHASE_VISUALIZER_REDUCED_MOTION")
        .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    let probe = DeviceProbe {
        is_mobile,
        reduced_motion,
    };
    info!("Device probe: {:?}", probe);
    probe
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_probe_selects_mobile_tier_and_frame_rate() {
        let profile = DeviceProfile::from_probe(DeviceProbe {
            is_mobile: true,
            reduced_motion: false,
        });
        assert_eq!(profile.tier, DeviceTier::Mobile);
        assert_eq!(profile.default_target_fps(), MOBILE_TARGET_FPS);
    }

    #[test]
    fn reduced_motion_is_carried_independently_of_tier() {
        let profile = DeviceProfile::from_probe(DeviceProbe {
            is_mobile: false,
            reduced_motion: true,
        });
        assert_eq!(profile.tier, DeviceTier::Desktop);
        assert!(profile.reduced_motion);
    }
}
