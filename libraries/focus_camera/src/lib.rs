use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod events;
mod systems;
pub mod tween;

pub use controller::{FocusController, FocusTarget, FocusTargets};
pub use events::FocusCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub struct FocusCameraSet;

/// Focus transitions plus mouse orbit/zoom around the focused body.
pub struct FocusCameraPlugin {
    pub with_orbit_controls: bool,
}

impl Default for FocusCameraPlugin {
    fn default() -> Self {
        Self {
            with_orbit_controls: true,
        }
    }
}

impl Plugin for FocusCameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::OrbitControls>()
            .register_type::<components::OrbitMotion>()
            .register_type::<controller::FocusController>()
            .init_resource::<FocusTargets>()
            .add_observer(systems::apply_focus_command)
            .add_systems(Update, systems::drive_camera.in_set(FocusCameraSet));

        if self.with_orbit_controls {
            app.add_systems(
                Update,
                systems::get_blocked_inputs
                    .pipe(systems::orbit_controls)
                    .run_if(
                        any_with_component::<components::OrbitControls>
                            .and(resource_exists::<bevy_egui::EguiUserTextures>),
                    )
                    .in_set(FocusCameraSet)
                    .before(systems::drive_camera),
            );
        }
    }
}
