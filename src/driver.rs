use std::f32::consts::TAU;

use crate::easing::Easing;
use crate::scene::Scene;

/// Peak of the periodic loop signal
pub const LOOP_AMPLITUDE: f32 = 2.0;

/// One full sine period per loop: 0 at both ends, +2 at a quarter, -2 at three
/// quarters. Any continuous map of this value loops seamlessly.
pub fn loop_signal(playhead: f32) -> f32 {
    (playhead * TAU).sin() * LOOP_AMPLITUDE
}

/// Writes per-frame state into the scene: eased root rotation from the
/// wrapping playhead, and the free-running elapsed time into shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDriver {
    easing: Easing,
}

impl AnimationDriver {
    pub fn new(easing: Easing) -> Self {
        Self { easing }
    }

    pub fn easing(&self) -> &Easing {
        &self.easing
    }

    /// Root rotation about z for a playhead; periodic with period 1
    pub fn rotation(&self, playhead: f32) -> f32 {
        let wrapped = playhead.rem_euclid(1.0);
        self.easing.apply(loop_signal(wrapped))
    }

    pub fn update(&self, scene: &mut Scene, playhead: f32, elapsed: f32) {
        scene.set_rotation(self.rotation(playhead));
        // Elapsed time skips the easing and never wraps
        scene.set_time(elapsed.max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::{EasingDomain, EasingKind};

    #[test]
    fn test_loop_signal_quarter_points() {
        let expected = [(0.0, 0.0), (0.25, 2.0), (0.5, 0.0), (0.75, -2.0), (1.0, 0.0)];
        for (playhead, value) in expected {
            assert!(
                (loop_signal(playhead) - value).abs() < 1e-5,
                "signal({}) = {}",
                playhead,
                loop_signal(playhead)
            );
        }
    }

    #[test]
    fn test_rotation_is_periodic() {
        for kind in [EasingKind::QuadInOut, EasingKind::CubicBezier] {
            for domain in [EasingDomain::Clamp, EasingDomain::Extrapolate] {
                let driver = AnimationDriver::new(Easing::new(kind, domain));
                for i in 0..100 {
                    let p = i as f32 / 100.0;
                    // p + n only differs from p by float rounding of the sum
                    assert!((driver.rotation(p) - driver.rotation(p + 1.0)).abs() < 1e-4);
                    assert!((driver.rotation(p) - driver.rotation(p + 3.0)).abs() < 1e-4);
                    assert!((driver.rotation(p) - driver.rotation(p - 1.0)).abs() < 1e-4);
                }
                assert_eq!(driver.rotation(0.0), driver.rotation(1.0));
            }
        }
    }

    #[test]
    fn test_rotation_matches_end_of_loop() {
        for domain in [EasingDomain::Clamp, EasingDomain::Extrapolate] {
            let driver = AnimationDriver::new(Easing::new(EasingKind::CubicBezier, domain));
            let just_before_end = 1.0 - 1e-6;
            assert!((driver.rotation(0.0) - driver.rotation(just_before_end)).abs() < 1e-3);
        }
    }
}
