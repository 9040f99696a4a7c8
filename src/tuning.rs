//! Gameplay tuning and gesture calibration
//!
//! The single injected configuration surface. The core only ever reads a
//! `Tuning`; the surrounding shell may edit and persist it. Every constructor
//! that derives geometry from a `Tuning` expects [`Tuning::validate`] to have
//! passed - the game refuses to start on malformed numbers rather than
//! producing undefined gameplay.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gameplay tuning parameters
///
/// All values are plain numerics; the simulation tolerates any in-range value
/// without special-casing. Velocities and gravity are in world units per
/// second (and per second squared); fractions are of the visible world size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration, world units/s². Range: (0, 5000]
    pub gravity: f32,
    /// Horizontal launch speed at zero charge, world units/s. Range: (0, max_vx]
    pub min_vx: f32,
    /// Horizontal launch speed at full charge. Range: [min_vx, 2000]
    pub max_vx: f32,
    /// Vertical launch speed at zero charge (negative = upward). Range: [max_vy, 0)
    pub min_vy: f32,
    /// Vertical launch speed at full charge. Range: [-2000, min_vy]
    pub max_vy: f32,
    /// Seconds of holding for a full-power jump. Range: (0, 10]
    pub max_charge: f32,
    /// Platform width as a fraction of visible world width. Range: (0, 0.5]
    pub platform_width_pct: f32,
    /// Smallest horizontal gap between platforms, fraction of world width. Range: (0, max_gap_x_pct]
    pub min_gap_x_pct: f32,
    /// Largest horizontal gap between platforms. Range: [min_gap_x_pct, 0.5]
    pub max_gap_x_pct: f32,
    /// Vertical placement variance (symmetric ± band), fraction of world height. Range: [0, 0.25]
    pub gap_y_pct: f32,
    /// Design-reference canvas width in pixels; camera scale = canvas / reference. Range: (0, 4096]
    pub reference_width: f32,
    /// Arm-openness ratio below which the gesture engages. Range: (0, threshold_open)
    pub threshold_closed: f32,
    /// Arm-openness ratio above which the gesture releases. Range: (threshold_closed, 10]
    pub threshold_open: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1500.0,
            min_vx: 120.0,
            max_vx: 200.0,
            min_vy: -450.0,
            max_vy: -620.0,
            max_charge: 1.0,
            platform_width_pct: 0.16,
            min_gap_x_pct: 0.12,
            max_gap_x_pct: 0.28,
            gap_y_pct: 0.05,
            reference_width: 480.0,
            threshold_closed: 1.0,
            threshold_open: 2.2,
        }
    }
}

impl Tuning {
    /// Launch velocity for a charge fraction `t` in [0, 1].
    ///
    /// Linear interpolation between the min and max launch envelope; the only
    /// place charge is converted into velocity.
    pub fn launch_velocity(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        Vec2::new(
            self.min_vx + t * (self.max_vx - self.min_vx),
            self.min_vy + t * (self.max_vy - self.min_vy),
        )
    }

    /// Horizontal distance a jump at charge fraction `t` covers before
    /// returning to launch height (projectile range `vx · 2|vy| / g`).
    pub fn launch_range(&self, t: f32) -> f32 {
        let v = self.launch_velocity(t);
        v.x * (2.0 * -v.y / self.gravity)
    }

    /// Charge fraction whose range best matches `range`, clamped to [0, 1].
    ///
    /// `launch_range` is monotone in the charge fraction (both factors grow
    /// with charge), so a bisection converges.
    pub fn charge_for_range(&self, range: f32) -> f32 {
        if range <= self.launch_range(0.0) {
            return 0.0;
        }
        if range >= self.launch_range(1.0) {
            return 1.0;
        }
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        for _ in 0..24 {
            let mid = 0.5 * (lo + hi);
            if self.launch_range(mid) < range {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    /// Validate the tuning as a whole.
    ///
    /// Checks individual ranges, the gesture dead zone, and the
    /// cross-component reachability contract between the jump envelope and
    /// the platform gap range: minimum charge must clear the smallest gap,
    /// and maximum charge must not overshoot the largest gap by more than a
    /// platform width.
    pub fn validate(&self) -> Result<(), TuningError> {
        let all = [
            self.gravity,
            self.min_vx,
            self.max_vx,
            self.min_vy,
            self.max_vy,
            self.max_charge,
            self.platform_width_pct,
            self.min_gap_x_pct,
            self.max_gap_x_pct,
            self.gap_y_pct,
            self.reference_width,
            self.threshold_closed,
            self.threshold_open,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(TuningError::NonFinite);
        }

        if self.gravity <= 0.0 {
            return Err(TuningError::NonPositive("gravity"));
        }
        if self.max_charge <= 0.0 {
            return Err(TuningError::NonPositive("max_charge"));
        }
        if self.reference_width <= 0.0 {
            return Err(TuningError::NonPositive("reference_width"));
        }
        if self.min_vx <= 0.0 || self.max_vx < self.min_vx {
            return Err(TuningError::InvertedRange("min_vx..max_vx"));
        }
        if self.min_vy >= 0.0 || self.max_vy > self.min_vy {
            return Err(TuningError::InvertedRange("min_vy..max_vy"));
        }
        if self.platform_width_pct <= 0.0 || self.platform_width_pct > 0.5 {
            return Err(TuningError::FractionOutOfRange("platform_width_pct"));
        }
        if self.min_gap_x_pct <= 0.0 || self.max_gap_x_pct < self.min_gap_x_pct {
            return Err(TuningError::InvertedRange("min_gap_x_pct..max_gap_x_pct"));
        }
        if self.max_gap_x_pct > 0.5 {
            return Err(TuningError::FractionOutOfRange("max_gap_x_pct"));
        }
        if self.gap_y_pct < 0.0 || self.gap_y_pct > 0.25 {
            return Err(TuningError::FractionOutOfRange("gap_y_pct"));
        }
        if self.threshold_closed <= 0.0 || self.threshold_closed >= self.threshold_open {
            return Err(TuningError::GestureBand {
                closed: self.threshold_closed,
                open: self.threshold_open,
            });
        }

        // Reachability: the camera maps the canvas to exactly reference_width
        // world units, so gap geometry is derivable from tuning alone.
        let world_w = self.reference_width;
        let min_gap = crate::round_world(world_w * self.min_gap_x_pct);
        let max_gap = crate::round_world(world_w * self.max_gap_x_pct);
        let platform_w = crate::round_world(world_w * self.platform_width_pct);

        let min_range = self.launch_range(0.0);
        if min_range < min_gap {
            return Err(TuningError::ShortJump { min_range, min_gap });
        }
        let max_range = self.launch_range(1.0);
        let max_reach = max_gap + platform_w;
        if max_range > max_reach {
            return Err(TuningError::LongJump {
                max_range,
                max_reach,
            });
        }

        Ok(())
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "charge_leap_tuning";

    /// Load tuning from LocalStorage, falling back to defaults on missing,
    /// corrupt or invalid data (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(tuning) = serde_json::from_str::<Tuning>(&json) {
                    match tuning.validate() {
                        Ok(()) => {
                            log::info!("Loaded tuning from LocalStorage");
                            return tuning;
                        }
                        Err(e) => {
                            log::warn!("Stored tuning rejected ({e}), using defaults");
                        }
                    }
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Construction-time tuning contract violations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TuningError {
    /// A parameter is NaN or infinite
    NonFinite,
    /// A parameter that must be strictly positive is not
    NonPositive(&'static str),
    /// A min..max pair is inverted or degenerate
    InvertedRange(&'static str),
    /// A fractional parameter left its documented range
    FractionOutOfRange(&'static str),
    /// Gesture thresholds do not form a dead zone (closed < open)
    GestureBand { closed: f32, open: f32 },
    /// Minimum-charge jump cannot clear the smallest platform gap
    ShortJump { min_range: f32, min_gap: f32 },
    /// Maximum-charge jump overshoots the largest gap by more than a platform
    LongJump { max_range: f32, max_reach: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::NonFinite => write!(f, "tuning contains a non-finite value"),
            TuningError::NonPositive(name) => write!(f, "{name} must be > 0"),
            TuningError::InvertedRange(name) => write!(f, "{name} is inverted or degenerate"),
            TuningError::FractionOutOfRange(name) => {
                write!(f, "{name} is outside its documented range")
            }
            TuningError::GestureBand { closed, open } => write!(
                f,
                "gesture thresholds must satisfy closed < open (closed={closed}, open={open})"
            ),
            TuningError::ShortJump { min_range, min_gap } => write!(
                f,
                "minimum jump range {min_range:.1} cannot clear the minimum gap {min_gap:.1}"
            ),
            TuningError::LongJump {
                max_range,
                max_reach,
            } => write!(
                f,
                "maximum jump range {max_range:.1} overshoots the farthest landing {max_reach:.1}"
            ),
        }
    }
}

impl std::error::Error for TuningError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        Tuning::default().validate().expect("defaults must be sane");
    }

    #[test]
    fn test_launch_velocity_endpoints() {
        let t = Tuning::default();
        let lo = t.launch_velocity(0.0);
        let hi = t.launch_velocity(1.0);
        assert_eq!(lo, Vec2::new(t.min_vx, t.min_vy));
        assert_eq!(hi, Vec2::new(t.max_vx, t.max_vy));
        // Clamped beyond the ends
        assert_eq!(t.launch_velocity(4.0), hi);
        assert_eq!(t.launch_velocity(-1.0), lo);
    }

    #[test]
    fn test_reachability_contract_holds_for_defaults() {
        let t = Tuning::default();
        let world_w = t.reference_width;
        let min_gap = crate::round_world(world_w * t.min_gap_x_pct);
        let max_reach = crate::round_world(world_w * t.max_gap_x_pct)
            + crate::round_world(world_w * t.platform_width_pct);
        assert!(t.launch_range(0.0) >= min_gap);
        assert!(t.launch_range(1.0) <= max_reach);
    }

    #[test]
    fn test_rejects_inverted_gesture_band() {
        let bad = Tuning {
            threshold_closed: 2.5,
            threshold_open: 1.0,
            ..Tuning::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(TuningError::GestureBand { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_core_values() {
        for field in ["gravity", "max_charge", "reference_width"] {
            let mut bad = Tuning::default();
            match field {
                "gravity" => bad.gravity = 0.0,
                "max_charge" => bad.max_charge = -1.0,
                _ => bad.reference_width = 0.0,
            }
            assert!(
                matches!(bad.validate(), Err(TuningError::NonPositive(_))),
                "{field} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_unreachable_gaps() {
        // Feeble jump against wide gaps
        let bad = Tuning {
            min_vx: 10.0,
            max_vx: 20.0,
            min_vy: -50.0,
            max_vy: -60.0,
            ..Tuning::default()
        };
        assert!(matches!(bad.validate(), Err(TuningError::ShortJump { .. })));

        // Rocket jump against narrow gaps
        let bad = Tuning {
            min_vx: 400.0,
            max_vx: 900.0,
            min_vy: -900.0,
            max_vy: -1200.0,
            min_gap_x_pct: 0.05,
            max_gap_x_pct: 0.06,
            ..Tuning::default()
        };
        assert!(matches!(bad.validate(), Err(TuningError::LongJump { .. })));
    }

    #[test]
    fn test_charge_for_range_inverts_launch_range() {
        let t = Tuning::default();
        for target in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let range = t.launch_range(target);
            let recovered = t.charge_for_range(range);
            assert!(
                (recovered - target).abs() < 1e-3,
                "target {target} recovered as {recovered}"
            );
        }
        assert_eq!(t.charge_for_range(0.0), 0.0);
        assert_eq!(t.charge_for_range(f32::MAX), 1.0);
    }
}
