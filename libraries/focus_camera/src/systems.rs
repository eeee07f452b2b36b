use bevy::prelude::*;

use crate::components::{OrbitControls, OrbitMotion};
use crate::controller::{FocusController, FocusTargets};
use crate::events::FocusCommand;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};

#[derive(Default)]
pub(crate) struct BlockedInputs {
    pointer: bool,
}

pub(crate) fn get_blocked_inputs(
    mut egui: bevy_egui::EguiContexts,
    q_window_entities: Query<Entity, With<Window>>,
) -> BlockedInputs {
    let mut ret = BlockedInputs::default();
    for window_entity in &q_window_entities {
        if let Some(ctx) = egui.try_ctx_for_entity_mut(window_entity) {
            ret.pointer |= ctx.wants_pointer_input();
        }
    }
    ret
}

pub(crate) fn orbit_controls(
    In(blocked_inputs): In<BlockedInputs>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut evr_motion: EventReader<MouseMotion>,
    mut evr_scroll: EventReader<MouseWheel>,
    mut q_camera: Query<(&OrbitControls, &mut OrbitMotion, &mut FocusController)>,
) {
    // Drain the readers even when blocked so stale input does not pile up.
    let total_motion: Vec2 = evr_motion.read().map(|ev| ev.delta).sum();

    let mut total_scroll_lines = 0.0;
    let mut total_scroll_pixels = 0.0;
    for ev in evr_scroll.read() {
        match ev.unit {
            MouseScrollUnit::Line => total_scroll_lines += ev.y,
            MouseScrollUnit::Pixel => total_scroll_pixels += ev.y,
        }
    }

    for (settings, mut motion, mut controller) in &mut q_camera {
        if controller.is_transitioning() {
            motion.clear();
            continue;
        }

        if !blocked_inputs.pointer && mouse_buttons.pressed(MouseButton::Left) {
            // Dragging right swings the camera left around the target,
            // dragging down raises it.
            motion.yaw -= total_motion.x * settings.orbit_sensitivity;
            motion.pitch -= total_motion.y * settings.orbit_sensitivity;
        }

        // Zoom is exponential and undamped
        let mut zoom = 0.0;
        if !blocked_inputs.pointer {
            zoom -= total_scroll_lines
                * settings.scroll_line_sensitivity
                * settings.zoom_sensitivity;
            zoom -= total_scroll_pixels
                * settings.scroll_pixel_sensitivity
                * settings.zoom_sensitivity;
        }

        let (yaw, pitch) = motion.drain(settings.damping_factor);
        if yaw != 0.0 || pitch != 0.0 || zoom != 0.0 {
            controller.orbit(yaw, pitch, zoom, settings.min_distance);
        }
    }
}

pub(crate) fn drive_camera(
    time: Res<Time<Real>>,
    mut q_camera: Query<(&mut FocusController, &mut Transform)>,
) {
    for (mut controller, mut transform) in &mut q_camera {
        let pose = controller.tick(time.delta_secs());
        let new_transform = pose.transform();
        if *transform != new_transform {
            *transform = new_transform;
        }
    }
}

pub fn apply_focus_command(
    trigger: Trigger<FocusCommand>,
    targets: Res<FocusTargets>,
    mut q_controller: Query<&mut FocusController>,
) {
    if q_controller.is_empty() {
        warn!("Focus command {:?} with no focus camera", trigger.event());
        return;
    }
    for mut controller in &mut q_controller {
        match *trigger.event() {
            FocusCommand::NavigateIn => controller.navigate_in(&targets),
            FocusCommand::NavigateOut => controller.navigate_out(&targets),
            FocusCommand::SetFocus(index) => controller.set_focus(index, &targets),
            FocusCommand::SetViewAngle(angle) => controller.set_view_angle(angle, &targets),
        }
        debug!(
            "Focusing body {} from {:.2} rad",
            controller.focus_index(),
            controller.view_angle()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{destination, FocusTarget};
    use crate::tween::TransitionSettings;

    fn app() -> App {
        let targets = (0..4)
            .map(|i| FocusTarget {
                position: Vec3::new(0.0, 0.0, i as f32 * 100.0),
                radius: 1.0 + i as f32,
            })
            .collect::<Vec<_>>();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(FocusTargets(targets))
            .add_observer(apply_focus_command)
            .add_systems(Update, drive_camera);
        app
    }

    fn spawn_camera(app: &mut App) -> Entity {
        let targets = app.world().resource::<FocusTargets>().0.clone();
        let controller =
            FocusController::settled_at(0, 0.0, &targets, TransitionSettings::default());
        let transform = controller.pose().transform();
        app.world_mut().spawn((controller, transform)).id()
    }

    #[test]
    fn navigate_out_command_moves_focus() {
        let mut app = app();
        let camera = spawn_camera(&mut app);
        app.world_mut().trigger(FocusCommand::NavigateOut);
        app.world_mut().trigger(FocusCommand::NavigateOut);

        let controller = app.world().get::<FocusController>(camera).unwrap();
        let targets = app.world().resource::<FocusTargets>();
        assert_eq!(controller.focus_index(), 2);
        assert_eq!(controller.heading(), Some(destination(&targets[2], 0.0)));
    }

    #[test]
    fn later_command_wins() {
        let mut app = app();
        let camera = spawn_camera(&mut app);
        app.world_mut().trigger(FocusCommand::SetFocus(1));
        app.world_mut().trigger(FocusCommand::SetFocus(3));
        app.world_mut().trigger(FocusCommand::SetViewAngle(1.0));

        let controller = app.world().get::<FocusController>(camera).unwrap();
        let targets = app.world().resource::<FocusTargets>();
        assert_eq!(controller.focus_index(), 3);
        assert_eq!(controller.heading(), Some(destination(&targets[3], 1.0)));
    }

    #[test]
    fn out_of_range_command_is_clamped() {
        let mut app = app();
        let camera = spawn_camera(&mut app);
        app.world_mut().trigger(FocusCommand::SetFocus(42));
        app.world_mut().trigger(FocusCommand::NavigateOut);

        let controller = app.world().get::<FocusController>(camera).unwrap();
        assert_eq!(controller.focus_index(), 3);
    }

    #[test]
    fn settled_camera_transform_matches_pose() {
        let mut app = app();
        let camera = spawn_camera(&mut app);
        app.update();

        let controller = app.world().get::<FocusController>(camera).unwrap();
        let transform = app.world().get::<Transform>(camera).unwrap();
        assert!(!controller.is_transitioning());
        assert_eq!(*transform, controller.pose().transform());
    }
}
