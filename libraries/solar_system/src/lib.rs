use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

pub mod environment;
pub mod error;
pub mod integrator;
pub mod manifest;
pub mod registry;
pub mod scene;

pub use integrator::{SceneState, SolarSystemSet};
pub use registry::BodyRegistry;

/// Registry, integrator, scene construction and background, in dependency order.
#[derive(Default)]
pub struct SolarSystemPlugin {
    registry: BodyRegistry,
}

impl SolarSystemPlugin {
    pub fn new(registry: BodyRegistry) -> Self {
        Self { registry }
    }
}

impl PluginGroup for SolarSystemPlugin {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(registry::RegistryPlugin(self.registry))
            .add(integrator::IntegratorPlugin)
            .add(scene::ScenePlugin)
            .add(environment::EnvironmentPlugin)
    }
}
