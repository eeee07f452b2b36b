use crate::components::CameraPose;
use crate::tween::{TransitionSettings, Tween};
use bevy::prelude::*;

/// Camera distance from a focused body, in body radii.
pub const FRAMING_RADII: f32 = 3.0;

/// A body the camera can focus on.
#[derive(Debug, Copy, Clone, PartialEq, Reflect)]
pub struct FocusTarget {
    pub position: Vec3,
    pub radius: f32,
}

/// Focus targets in navigation order. Index 0 is the innermost.
#[derive(Debug, Clone, Default, Resource, Deref, DerefMut)]
pub struct FocusTargets(pub Vec<FocusTarget>);

/// Camera pose framing `target` from azimuth `view_angle`.
pub fn destination(target: &FocusTarget, view_angle: f32) -> CameraPose {
    let distance = target.radius * FRAMING_RADII;
    let offset = Vec3::new(view_angle.sin() * distance, 0.0, view_angle.cos() * distance);
    CameraPose::new(target.position + offset, target.position)
}

#[derive(Debug, Copy, Clone, PartialEq, Reflect)]
pub enum FocusPhase {
    Settled,
    Transitioning(Tween),
}

#[derive(Debug, Clone, Component, Reflect)]
#[reflect(Component)]
pub struct FocusController {
    focus_index: usize,
    view_angle: f32,
    pose: CameraPose,
    phase: FocusPhase,
    settings: TransitionSettings,
}

impl FocusController {
    /// Controller resting at the destination for `index` and `view_angle`.
    pub fn settled_at(
        index: i64,
        view_angle: f32,
        targets: &[FocusTarget],
        settings: TransitionSettings,
    ) -> Self {
        let focus_index = clamp_index(index, targets.len());
        let pose = targets
            .get(focus_index)
            .map(|target| destination(target, view_angle))
            .unwrap_or_default();
        Self {
            focus_index,
            view_angle,
            pose,
            phase: FocusPhase::Settled,
            settings,
        }
    }

    pub fn focus_index(&self) -> usize {
        self.focus_index
    }

    pub fn view_angle(&self) -> f32 {
        self.view_angle
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn phase(&self) -> &FocusPhase {
        &self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, FocusPhase::Transitioning(_))
    }

    /// Destination of the transition in flight, if any.
    pub fn heading(&self) -> Option<CameraPose> {
        match &self.phase {
            FocusPhase::Transitioning(tween) => Some(tween.destination()),
            FocusPhase::Settled => None,
        }
    }

    /// Clamps `index` into the valid range and starts a transition toward it.
    /// Does nothing when there are no targets.
    pub fn set_focus(&mut self, index: i64, targets: &[FocusTarget]) {
        if targets.is_empty() {
            return;
        }
        self.focus_index = clamp_index(index, targets.len());
        self.retarget(targets);
    }

    pub fn set_view_angle(&mut self, view_angle: f32, targets: &[FocusTarget]) {
        self.view_angle = view_angle;
        self.retarget(targets);
    }

    pub fn navigate_in(&mut self, targets: &[FocusTarget]) {
        self.set_focus(self.focus_index as i64 - 1, targets);
    }

    pub fn navigate_out(&mut self, targets: &[FocusTarget]) {
        self.set_focus(self.focus_index as i64 + 1, targets);
    }

    /// Abandons any transition in flight and heads for the current
    /// destination, starting from the current pose.
    fn retarget(&mut self, targets: &[FocusTarget]) {
        let Some(target) = targets.get(self.focus_index) else {
            return;
        };
        let end = destination(target, self.view_angle);
        self.phase = FocusPhase::Transitioning(Tween::new(self.pose, end, self.settings));
    }

    /// Advances the transition by `delta` seconds and returns the new pose.
    pub fn tick(&mut self, delta: f32) -> CameraPose {
        if let FocusPhase::Transitioning(tween) = &mut self.phase {
            tween.advance(delta);
            self.pose = tween.sample();
            if tween.is_finished() {
                self.phase = FocusPhase::Settled;
            }
        }
        self.pose
    }

    /// Orbits the camera around its target. Ignored mid-transition.
    pub fn orbit(&mut self, yaw: f32, pitch: f32, zoom: f32, min_distance: f32) {
        if self.is_transitioning() {
            return;
        }
        self.pose.orbit(yaw, pitch, zoom, min_distance);
    }
}

fn clamp_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.clamp(0, len as i64 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    // Same layout as the default solar system.
    fn targets() -> Vec<FocusTarget> {
        [
            (696.434, 0.0),
            (2.4397, 1000.0),
            (6.0518, 1100.0),
            (6.371, 1200.0),
            (3.3895, 1250.0),
            (69.911, 1400.0),
            (58.232, 1700.0),
            (25.362, 2000.0),
            (24.622, 2200.0),
            (1.1883, 2300.0),
        ]
        .into_iter()
        .map(|(radius, distance)| FocusTarget {
            position: Vec3::new(0.0, 0.0, distance),
            radius,
        })
        .collect()
    }

    fn controller(targets: &[FocusTarget]) -> FocusController {
        FocusController::settled_at(0, 3.86, targets, TransitionSettings::default())
    }

    #[test]
    fn destination_at_zero_angle_sits_on_z() {
        let target = FocusTarget {
            position: Vec3::new(1.0, 2.0, 3.0),
            radius: 10.0,
        };
        let pose = destination(&target, 0.0);
        assert_eq!(pose.target, target.position);
        assert_abs_diff_eq!(pose.position.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(pose.position.y, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(pose.position.z, 33.0, epsilon = 1e-5);
    }

    #[test]
    fn destination_at_right_angle_sits_on_x() {
        let target = FocusTarget {
            position: Vec3::ZERO,
            radius: 10.0,
        };
        let pose = destination(&target, FRAC_PI_2);
        assert_abs_diff_eq!(pose.position.x, 30.0, epsilon = 1e-4);
        assert_abs_diff_eq!(pose.position.y, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(pose.position.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn set_focus_clamps_any_index() {
        let targets = targets();
        let mut controller = controller(&targets);
        for (input, expected) in [(-5, 0), (0, 0), (4, 4), (9, 9), (10, 9), (i64::MAX, 9), (i64::MIN, 0)] {
            controller.set_focus(input, &targets);
            assert_eq!(controller.focus_index(), expected, "input {input}");
        }
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        let targets = targets();
        let mut controller = controller(&targets);
        controller.set_focus(9, &targets);
        for _ in 0..targets.len() {
            controller.navigate_in(&targets);
        }
        assert_eq!(controller.focus_index(), 0);
        controller.navigate_in(&targets);
        assert_eq!(controller.focus_index(), 0);

        for _ in 0..20 {
            controller.navigate_out(&targets);
        }
        assert_eq!(controller.focus_index(), 9);
    }

    #[test]
    fn navigate_in_at_center_still_retriggers() {
        let targets = targets();
        let mut controller = controller(&targets);
        assert!(!controller.is_transitioning());
        controller.navigate_in(&targets);
        assert_eq!(controller.focus_index(), 0);
        assert!(controller.is_transitioning());
    }

    #[test]
    fn set_view_angle_starts_transition() {
        let targets = targets();
        let mut controller = controller(&targets);
        controller.set_view_angle(0.0, &targets);
        assert_eq!(controller.view_angle(), 0.0);
        let heading = controller.heading().unwrap();
        assert_abs_diff_eq!(heading.position.z, 696.434 * 3.0, epsilon = 1e-3);
    }

    #[test]
    fn retargeting_abandons_previous_destination() {
        let targets = targets();
        let mut controller = controller(&targets);
        controller.set_focus(3, &targets);
        controller.tick(0.1);
        let midway = controller.pose();
        controller.set_focus(6, &targets);

        let FocusPhase::Transitioning(tween) = controller.phase() else {
            panic!("expected a transition");
        };
        assert_eq!(tween.start(), midway);
        assert_eq!(tween.destination(), destination(&targets[6], 3.86));

        for _ in 0..10 {
            controller.tick(0.1);
        }
        assert!(!controller.is_transitioning());
        assert_eq!(controller.pose(), destination(&targets[6], 3.86));
    }

    #[test]
    fn transition_settles_on_destination() {
        let targets = targets();
        let mut controller = controller(&targets);
        controller.set_focus(5, &targets);
        let pose = controller.tick(0.25);
        assert!(controller.is_transitioning());
        assert_ne!(pose, destination(&targets[5], 3.86));
        let pose = controller.tick(0.25);
        assert!(!controller.is_transitioning());
        assert_eq!(pose, destination(&targets[5], 3.86));
    }

    #[test]
    fn orbit_is_ignored_while_transitioning() {
        let targets = targets();
        let mut controller = controller(&targets);
        controller.set_focus(3, &targets);
        let before = controller.pose();
        controller.orbit(1.0, 0.0, 0.0, 0.1);
        assert_eq!(controller.pose(), before);
    }

    #[test]
    fn empty_targets_leave_controller_untouched() {
        let mut controller = FocusController::settled_at(3, 1.0, &[], TransitionSettings::default());
        assert_eq!(controller.focus_index(), 0);
        controller.navigate_out(&[]);
        assert_eq!(controller.focus_index(), 0);
        assert!(!controller.is_transitioning());
    }

    #[test]
    fn earth_viewed_from_default_angle() {
        let targets = targets();
        let mut controller = controller(&targets);
        controller.set_focus(3, &targets);
        let heading = controller.heading().unwrap();
        assert_eq!(heading.target, Vec3::new(0.0, 0.0, 1200.0));
        assert_abs_diff_eq!(heading.position.x, -12.5799, epsilon = 1e-3);
        assert_abs_diff_eq!(heading.position.y, 0.0);
        assert_abs_diff_eq!(heading.position.z, 1200.0 - 14.3893, epsilon = 1e-3);
    }
}
