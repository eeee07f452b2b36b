use crate::components::CameraPose;
use bevy::prelude::*;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Reflect)]
pub enum Easing {
    Linear,
    #[default]
    QuadraticOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Reflect)]
pub struct TransitionSettings {
    /// Seconds, independent of the distance travelled
    pub duration: f32,
    pub easing: Easing,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration: 0.5,
            easing: Easing::QuadraticOut,
        }
    }
}

/// An in-flight interpolation between two camera poses.
#[derive(Debug, Copy, Clone, PartialEq, Reflect)]
pub struct Tween {
    start: CameraPose,
    end: CameraPose,
    elapsed: f32,
    settings: TransitionSettings,
}

impl Tween {
    pub fn new(start: CameraPose, end: CameraPose, settings: TransitionSettings) -> Self {
        Self {
            start,
            end,
            elapsed: 0.0,
            settings,
        }
    }

    pub fn advance(&mut self, delta: f32) {
        self.elapsed = (self.elapsed + delta.max(0.0)).min(self.settings.duration.max(0.0));
    }

    pub fn fraction(&self) -> f32 {
        if self.settings.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.settings.duration).clamp(0.0, 1.0)
    }

    pub fn sample(&self) -> CameraPose {
        let fraction = self.fraction();
        if fraction >= 1.0 {
            return self.end;
        }
        self.start
            .lerp(&self.end, self.settings.easing.apply(fraction))
    }

    pub fn is_finished(&self) -> bool {
        self.fraction() >= 1.0
    }

    pub fn start(&self) -> CameraPose {
        self.start
    }

    pub fn destination(&self) -> CameraPose {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tween(settings: TransitionSettings) -> Tween {
        Tween::new(
            CameraPose::new(Vec3::ZERO, Vec3::ZERO),
            CameraPose::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 10.0)),
            settings,
        )
    }

    #[test]
    fn easing_hits_endpoints() {
        for easing in [Easing::Linear, Easing::QuadraticOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert_abs_diff_eq!(Easing::QuadraticOut.apply(0.5), 0.75);
    }

    #[test]
    fn tween_reaches_destination_after_duration() {
        let mut tween = tween(TransitionSettings::default());
        tween.advance(0.2);
        assert!(!tween.is_finished());
        tween.advance(0.2);
        tween.advance(0.2);
        assert!(tween.is_finished());
        assert_eq!(tween.sample(), tween.destination());
    }

    #[test]
    fn tween_samples_eased_midpoint() {
        let mut tween = tween(TransitionSettings {
            duration: 1.0,
            easing: Easing::Linear,
        });
        tween.advance(0.5);
        let pose = tween.sample();
        assert_abs_diff_eq!(pose.position.x, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(pose.target.z, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let tween = tween(TransitionSettings {
            duration: 0.0,
            easing: Easing::QuadraticOut,
        });
        assert!(tween.is_finished());
        assert_eq!(tween.sample(), tween.destination());
    }
}
