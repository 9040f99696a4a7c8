//! Pose-gesture decoding
//!
//! Turns the continuous arm-openness signal from a pose estimator into the
//! same discrete press/release edges a keyboard produces. The decoder is a
//! two-threshold hysteresis state machine: the signal must cross cleanly out
//! the far side of the dead zone to flip state, so a noisy ratio hovering
//! near a cutoff can never chatter events. Tracking loss is silence, not an
//! error - no sample, no transition.

use glam::Vec2;

use crate::input::{InputCode, InputHub};
use crate::tuning::Tuning;

/// Shoulder spans below this are treated as tracking loss rather than risk a
/// near-zero division.
const MIN_SHOULDER_SPAN: f32 = 1e-3;

/// Arm openness from pose landmarks: wrist span over shoulder span.
///
/// Landmarks arrive in whatever consistent 2D space the estimator uses; the
/// ratio is scale-invariant. Returns `None` on non-finite input or a
/// degenerate shoulder span (side-on pose, occlusion), never an infinity or
/// NaN.
pub fn openness_ratio(
    left_wrist: Vec2,
    right_wrist: Vec2,
    left_shoulder: Vec2,
    right_shoulder: Vec2,
) -> Option<f32> {
    let wrist_span = (left_wrist - right_wrist).length();
    let shoulder_span = (left_shoulder - right_shoulder).length();
    if !wrist_span.is_finite() || !shoulder_span.is_finite() {
        return None;
    }
    if shoulder_span < MIN_SHOULDER_SPAN {
        return None;
    }
    Some(wrist_span / shoulder_span)
}

/// Discrete edge produced by a decoder transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Arms closed: begin charging (press)
    Engage,
    /// Arms opened: launch (release)
    Release,
}

/// Hysteresis state machine over the openness ratio
#[derive(Debug, Clone)]
pub struct GestureDecoder {
    /// The single piece of state: are the arms currently closed?
    closed: bool,
    threshold_closed: f32,
    threshold_open: f32,
}

impl GestureDecoder {
    /// Thresholds come from a validated [`Tuning`]
    /// (`threshold_closed < threshold_open` is enforced there).
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            closed: false,
            threshold_closed: tuning.threshold_closed,
            threshold_open: tuning.threshold_open,
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Feed one sample; `None` means tracking was lost this frame.
    ///
    /// At most one event per sample, only on a clean threshold crossing from
    /// the opposite state. Values inside the dead zone hold the current state
    /// regardless of direction of travel.
    pub fn sample(&mut self, ratio: Option<f32>) -> Option<GestureEvent> {
        let ratio = ratio.filter(|r| r.is_finite())?;

        if !self.closed && ratio < self.threshold_closed {
            self.closed = true;
            log::trace!("gesture engage at ratio {ratio:.2}");
            return Some(GestureEvent::Engage);
        }
        if self.closed && ratio > self.threshold_open {
            self.closed = false;
            log::trace!("gesture release at ratio {ratio:.2}");
            return Some(GestureEvent::Release);
        }
        None
    }

    /// Decode one sample and forward any edge to the input hub as the jump
    /// key, so the simulation cannot tell gesture from keyboard.
    pub fn feed(&mut self, ratio: Option<f32>, hub: &InputHub) {
        match self.sample(ratio) {
            Some(GestureEvent::Engage) => hub.trigger_press(InputCode::Jump),
            Some(GestureEvent::Release) => hub.trigger_release(InputCode::Jump),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decoder(closed: f32, open: f32) -> GestureDecoder {
        GestureDecoder::new(&Tuning {
            threshold_closed: closed,
            threshold_open: open,
            ..Tuning::default()
        })
    }

    #[test]
    fn test_reference_sequence() {
        // The calibration sequence: engage at index 1, release at index 4,
        // silence everywhere else (indices 2 and 3 sit in or below the band
        // while already closed).
        let mut dec = decoder(1.0, 2.5);
        let samples = [1.5, 0.5, 0.5, 1.2, 2.6];
        let expected = [
            None,
            Some(GestureEvent::Engage),
            None,
            None,
            Some(GestureEvent::Release),
        ];
        for (ratio, want) in samples.iter().zip(expected) {
            assert_eq!(dec.sample(Some(*ratio)), want, "ratio {ratio}");
        }
    }

    #[test]
    fn test_dead_zone_holds_state_both_directions() {
        let mut dec = decoder(1.0, 2.5);

        // Open state: dipping to the band's floor is not a close
        assert_eq!(dec.sample(Some(1.0)), None);
        assert_eq!(dec.sample(Some(2.4)), None);
        assert!(!dec.is_closed());

        // Cross into closed, then rattle around inside the band
        assert_eq!(dec.sample(Some(0.2)), Some(GestureEvent::Engage));
        for ratio in [1.1, 2.0, 2.5, 1.3, 2.49] {
            assert_eq!(dec.sample(Some(ratio)), None, "ratio {ratio}");
            assert!(dec.is_closed());
        }
    }

    #[test]
    fn test_no_signal_is_silence() {
        let mut dec = decoder(1.0, 2.5);
        assert_eq!(dec.sample(Some(0.5)), Some(GestureEvent::Engage));

        // Occlusion while closed: no implicit release
        for _ in 0..10 {
            assert_eq!(dec.sample(None), None);
        }
        assert!(dec.is_closed());

        // Signal returns already open: one release, not a replay
        assert_eq!(dec.sample(Some(3.0)), Some(GestureEvent::Release));
    }

    #[test]
    fn test_non_finite_ratio_is_no_signal() {
        let mut dec = decoder(1.0, 2.5);
        assert_eq!(dec.sample(Some(f32::NAN)), None);
        assert_eq!(dec.sample(Some(f32::INFINITY)), None);
        assert_eq!(dec.sample(Some(f32::NEG_INFINITY)), None);
        assert!(!dec.is_closed());
    }

    #[test]
    fn test_feed_drives_input_hub() {
        let hub = InputHub::new();
        let mut dec = decoder(1.0, 2.5);

        dec.feed(Some(0.4), &hub);
        assert!(hub.is_just_pressed(InputCode::Jump));
        assert!(hub.is_held(InputCode::Jump));
        hub.flush();

        dec.feed(Some(1.5), &hub);
        assert!(!hub.is_just_released(InputCode::Jump), "dead zone is quiet");

        dec.feed(Some(2.8), &hub);
        assert!(hub.is_just_released(InputCode::Jump));
        assert!(!hub.is_held(InputCode::Jump));
    }

    #[test]
    fn test_openness_ratio_guards() {
        let shoulder_l = Vec2::new(-0.2, 0.0);
        let shoulder_r = Vec2::new(0.2, 0.0);

        let open = openness_ratio(
            Vec2::new(-0.5, 0.1),
            Vec2::new(0.5, 0.1),
            shoulder_l,
            shoulder_r,
        )
        .expect("valid landmarks");
        assert!((open - 2.5).abs() < 1e-4);

        // Degenerate shoulder span: no signal, not infinity
        let collapsed = openness_ratio(
            Vec2::new(-0.5, 0.0),
            Vec2::new(0.5, 0.0),
            Vec2::ZERO,
            Vec2::new(1e-5, 0.0),
        );
        assert_eq!(collapsed, None);

        // NaN landmark: no signal
        let nan = openness_ratio(
            Vec2::new(f32::NAN, 0.0),
            Vec2::new(0.5, 0.0),
            shoulder_l,
            shoulder_r,
        );
        assert_eq!(nan, None);
    }

    proptest! {
        #[test]
        fn prop_dead_zone_never_emits(ratio in 1.0_f32..=2.5) {
            // From either state, a ratio inside [closed, open] is silent
            let mut open_state = decoder(1.0, 2.5);
            prop_assert_eq!(open_state.sample(Some(ratio)), None);

            let mut closed_state = decoder(1.0, 2.5);
            closed_state.sample(Some(0.1));
            prop_assert_eq!(closed_state.sample(Some(ratio)), None);
        }

        #[test]
        fn prop_events_strictly_alternate(ratios in proptest::collection::vec(0.0_f32..4.0, 0..200)) {
            let mut dec = decoder(1.0, 2.5);
            let mut last = None;
            for r in ratios {
                if let Some(event) = dec.sample(Some(r)) {
                    prop_assert_ne!(Some(event), last, "same edge twice in a row");
                    last = Some(event);
                }
            }
        }
    }
}
