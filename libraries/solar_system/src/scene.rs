use crate::integrator::{SceneState, SolarSystemSet};
use crate::registry::{Body, BodyRegistry, Ring, Shading};
use bevy::asset::LoadState;
use bevy::prelude::*;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlanetaryBody>()
            .register_type::<Satellite>()
            .register_type::<PlanetRing>()
            .init_resource::<SceneTextures>()
            .add_systems(Startup, spawn_scene)
            .add_systems(
                Update,
                (sync_bodies, sync_satellite).in_set(SolarSystemSet::Sync),
            );
    }
}

// Lumens. Tuned against `Exposure::SUNLIGHT` for the outermost planets.
const SUNLIGHT_INTENSITY: f32 = 6.5e12;
const SUNLIGHT_RANGE: f32 = 100_000.0;
const MOONLIGHT_INTENSITY: f32 = 2.0e7;
const MOONLIGHT_RANGE: f32 = 20.0;

#[derive(Debug, Copy, Clone, Component, Reflect)]
#[reflect(Component)]
pub struct PlanetaryBody {
    pub index: usize,
}

#[derive(Debug, Copy, Clone, Component, Reflect)]
#[reflect(Component)]
pub struct Satellite;

#[derive(Debug, Copy, Clone, Component, Reflect)]
#[reflect(Component)]
pub struct PlanetRing {
    pub host: usize,
}

#[derive(Debug, Copy, Clone, Component)]
pub struct Sunlight;

/// Textures requested while building the scene, for load progress reporting.
#[derive(Debug, Default, Resource)]
pub struct SceneTextures {
    handles: Vec<Handle<Image>>,
}

impl SceneTextures {
    pub(crate) fn load(&mut self, asset_server: &AssetServer, path: &str) -> Handle<Image> {
        let handle = asset_server.load(path.to_string());
        self.handles.push(handle.clone());
        handle
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Fraction of textures settled, in `[0, 1]`. Failed loads count as settled.
    pub fn progress(&self, asset_server: &AssetServer) -> f32 {
        if self.handles.is_empty() {
            return 1.0;
        }
        let loaded = self
            .handles
            .iter()
            .filter(|handle| {
                asset_server.is_loaded_with_dependencies(handle.id())
                    || matches!(
                        asset_server.get_load_state(handle.id()),
                        Some(LoadState::Failed(_))
                    )
            })
            .count();
        loaded as f32 / self.handles.len() as f32
    }
}

/// Sun gets a denser sphere since it fills the view at close range.
fn sphere_resolution(index: usize) -> (u32, u32) {
    if index == 0 {
        (128, 64)
    } else {
        (64, 32)
    }
}

fn body_material(shading: Shading, texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        unlit: shading == Shading::Unlit,
        perceptual_roughness: 1.0,
        ..default()
    }
}

fn ring_material(texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        perceptual_roughness: 1.0,
        ..default()
    }
}

fn spawn_scene(
    mut commands: Commands,
    registry: Res<BodyRegistry>,
    state: Res<SceneState>,
    asset_server: Res<AssetServer>,
    mut textures: ResMut<SceneTextures>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (index, body) in registry.bodies().iter().enumerate() {
        spawn_body(
            &mut commands,
            &asset_server,
            &mut textures,
            &mut meshes,
            &mut materials,
            index,
            body,
        );
        if let Some(ring) = &body.ring {
            spawn_ring(
                &mut commands,
                &asset_server,
                &mut textures,
                &mut meshes,
                &mut materials,
                index,
                body,
                ring,
            );
        }
    }

    let moon = registry.moon();
    let texture = textures.load(&asset_server, &moon.texture);
    debug!("Spawning {} around body {}", moon.name, moon.host);
    commands
        .spawn((
            Name::new(moon.name.clone()),
            Satellite,
            Mesh3d(meshes.add(Sphere::new(moon.radius).mesh().uv(64, 32))),
            MeshMaterial3d(materials.add(body_material(Shading::Lit, texture))),
            Transform::from_translation(state.moon().position)
                .with_rotation(Quat::from_rotation_y(state.moon().rotation)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Name::new(format!("{} (Light)", moon.name)),
                PointLight {
                    color: Color::WHITE,
                    intensity: MOONLIGHT_INTENSITY,
                    range: MOONLIGHT_RANGE,
                    ..default()
                },
            ));
        });

    commands.spawn((
        Name::new("Sunlight"),
        Sunlight,
        PointLight {
            color: Color::WHITE,
            intensity: SUNLIGHT_INTENSITY,
            range: SUNLIGHT_RANGE,
            ..default()
        },
        Transform::from_translation(registry.body_position(0).unwrap_or_default()),
    ));
    info!(
        "Scene built with {} bodies, {} textures requested",
        registry.len(),
        textures.len()
    );
}

fn spawn_body(
    commands: &mut Commands,
    asset_server: &AssetServer,
    textures: &mut SceneTextures,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    index: usize,
    body: &Body,
) -> Entity {
    let texture = textures.load(asset_server, &body.texture);
    let (sectors, stacks) = sphere_resolution(index);
    debug!("Spawning body {index}: {} at {}", body.name, body.position());
    commands
        .spawn((
            Name::new(body.name.clone()),
            PlanetaryBody { index },
            Mesh3d(meshes.add(Sphere::new(body.radius).mesh().uv(sectors, stacks))),
            MeshMaterial3d(materials.add(body_material(body.shading, texture))),
            Transform::from_translation(body.position()),
        ))
        .id()
}

// Rings are siblings of the body so they do not inherit its spin.
#[allow(clippy::too_many_arguments)]
fn spawn_ring(
    commands: &mut Commands,
    asset_server: &AssetServer,
    textures: &mut SceneTextures,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    index: usize,
    body: &Body,
    ring: &Ring,
) -> Entity {
    let texture = textures.load(asset_server, &ring.texture);
    let mesh = Annulus::new(ring.inner_radius, ring.outer_radius)
        .mesh()
        .resolution(128)
        .build();
    commands
        .spawn((
            Name::new(format!("{} (Ring)", body.name)),
            PlanetRing { host: index },
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(materials.add(ring_material(texture))),
            Transform::from_translation(body.position())
                .with_rotation(Quat::from_rotation_x(ring.tilt)),
        ))
        .id()
}

fn sync_bodies(state: Res<SceneState>, mut q: Query<(&PlanetaryBody, &mut Transform)>) {
    for (body, mut transform) in &mut q {
        if let Some(rotation) = state.rotation(body.index) {
            transform.rotation = Quat::from_rotation_y(rotation);
        }
    }
}

fn sync_satellite(state: Res<SceneState>, mut q: Query<&mut Transform, With<Satellite>>) {
    let moon = state.moon();
    for mut transform in &mut q {
        transform.translation = moon.position;
        transform.rotation = Quat::from_rotation_y(moon.rotation);
    }
}
