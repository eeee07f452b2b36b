use crate::ui;
use bevy::core_pipeline::bloom::Bloom;
use bevy::core_pipeline::Skybox;
use bevy::log::{debug, info};
use bevy::prelude::{
    default, App, Camera, Camera3d, ClearColor, Color, Commands, IntoSystemConfigs, Name,
    PerspectiveProjection, PluginGroup, Projection, Quat, Res, Resource, Startup, Window,
    WindowPlugin,
};
use bevy::render::camera::Exposure;
use bevy::window::WindowResolution;
use bevy::DefaultPlugins;
use focus_camera::components::OrbitControls;
use focus_camera::tween::TransitionSettings;
use focus_camera::{FocusCameraPlugin, FocusController, FocusTarget, FocusTargets};
use solar_system::environment::{load_environment, Environment};
use solar_system::{BodyRegistry, SolarSystemPlugin};

const FIELD_OF_VIEW_DEG: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100_000.0;
// cd/m², bright enough to show through `Exposure::SUNLIGHT`.
const SKYBOX_BRIGHTNESS: f32 = 40_000.0;

pub(crate) struct AppSettings {
    pub(crate) resolution: WindowResolution,
    pub(crate) with_inspector: bool,
    pub(crate) registry: BodyRegistry,
    pub(crate) initial_focus: InitialFocus,
}

#[derive(Debug, Copy, Clone, Resource)]
pub(crate) struct InitialFocus {
    pub(crate) index: i64,
    pub(crate) view_angle: f32,
}

pub(crate) fn focus_targets(registry: &BodyRegistry) -> FocusTargets {
    FocusTargets(
        registry
            .bodies()
            .iter()
            .map(|body| FocusTarget {
                position: body.position(),
                radius: body.radius,
            })
            .collect(),
    )
}

pub(crate) fn get_app(settings: AppSettings) -> App {
    let targets = focus_targets(&settings.registry);
    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins.build().set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bevy Solar System".to_string(),
                resolution: settings.resolution,
                ..default()
            }),
            ..default()
        }),
        FocusCameraPlugin::default(),
    ))
    .add_plugins((
        SolarSystemPlugin::new(settings.registry),
        ui::UiPlugin {
            with_inspector: settings.with_inspector,
        },
    ))
    // Shown until the environment cubemap is assembled
    .insert_resource(ClearColor(Color::BLACK))
    .insert_resource(targets)
    .insert_resource(settings.initial_focus)
    .add_systems(Startup, setup_camera.after(load_environment));
    app
}

fn setup_camera(
    mut commands: Commands,
    targets: Res<FocusTargets>,
    initial: Res<InitialFocus>,
    environment: Res<Environment>,
) {
    let controller = FocusController::settled_at(
        initial.index,
        initial.view_angle,
        &targets,
        TransitionSettings::default(),
    );
    info!(
        "Focusing body {} of {} at {:.2} rad",
        controller.focus_index(),
        targets.len(),
        controller.view_angle()
    );
    debug!("Scene camera starts at {}", controller.pose().position);
    commands.spawn((
        Name::new("Scene Camera"),
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: FIELD_OF_VIEW_DEG.to_radians(),
            near: NEAR_PLANE,
            far: FAR_PLANE,
            ..default()
        }),
        Exposure::SUNLIGHT,
        Skybox {
            image: environment.cubemap(),
            brightness: SKYBOX_BRIGHTNESS,
            rotation: Quat::IDENTITY,
        },
        Bloom {
            intensity: 0.05,
            ..default()
        },
        controller.pose().transform(),
        controller,
        OrbitControls::default(),
    ));
}
