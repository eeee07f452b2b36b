use crate::registry::{BodyRegistry, Moon};
use bevy::prelude::*;

pub struct IntegratorPlugin;

impl Plugin for IntegratorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SceneState>()
            .init_resource::<SceneState>()
            .configure_sets(
                Update,
                (SolarSystemSet::Integrate, SolarSystemSet::Sync).chain(),
            )
            .add_systems(Update, advance_scene.in_set(SolarSystemSet::Integrate));
    }
}

/// Per-frame ordering: integrate first, then copy the results onto transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum SolarSystemSet {
    Integrate,
    Sync,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Reflect)]
pub struct MoonState {
    pub rotation: f32,
    pub phase: f32,
    pub position: Vec3,
}

impl MoonState {
    /// Moon state at `elapsed` seconds. Depends only on its arguments, never
    /// on a previous state.
    pub fn at(moon: &Moon, host_position: Vec3, elapsed: f32) -> Self {
        let phase = elapsed * moon.orbital_rate;
        Self {
            rotation: elapsed * moon.spin_rate,
            phase,
            position: host_position + orbital_offset(phase, moon.distance_from_host),
        }
    }
}

/// Offset of the moon from its host. X and Y share the same `sin` term.
pub fn orbital_offset(phase: f32, distance: f32) -> Vec3 {
    let (sin, cos) = phase.sin_cos();
    Vec3::new(sin * distance, sin * distance, cos * distance)
}

/// Mutable animation state of the scene: one accumulated rotation per body,
/// plus the moon's derived state.
#[derive(Debug, Clone, PartialEq, Resource, Reflect)]
#[reflect(Resource)]
pub struct SceneState {
    rotations: Vec<f32>,
    moon: MoonState,
}

impl FromWorld for SceneState {
    fn from_world(world: &mut World) -> Self {
        Self::new(world.resource::<BodyRegistry>())
    }
}

impl SceneState {
    pub fn new(registry: &BodyRegistry) -> Self {
        let host = registry
            .body_position(registry.moon().host)
            .unwrap_or_default();
        Self {
            rotations: vec![0.0; registry.len()],
            moon: MoonState::at(registry.moon(), host, 0.0),
        }
    }

    pub fn advance(&mut self, registry: &BodyRegistry, delta: f32, elapsed: f32) {
        for (rotation, body) in self.rotations.iter_mut().zip(registry.bodies()) {
            *rotation += delta * body.spin_rate;
        }
        let moon = registry.moon();
        let host = registry.body_position(moon.host).unwrap_or_default();
        self.moon = MoonState::at(moon, host, elapsed);
    }

    pub fn rotation(&self, index: usize) -> Option<f32> {
        self.rotations.get(index).copied()
    }

    pub fn rotations(&self) -> &[f32] {
        &self.rotations
    }

    pub fn moon(&self) -> &MoonState {
        &self.moon
    }
}

fn advance_scene(
    time: Res<Time<Virtual>>,
    registry: Res<BodyRegistry>,
    mut state: ResMut<SceneState>,
) {
    state.advance(&registry, time.delta_secs(), time.elapsed_secs());
}
