use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContext;
use bevy_inspector_egui::bevy_inspector;
use egui::containers;
use solar_system::{BodyRegistry, SceneState};

pub struct Plugin;

impl bevy::prelude::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, inspector_ui);
    }
}

fn inspector_ui(world: &mut World) {
    let Ok(mut ctx) = world
        .query_filtered::<&mut EguiContext, With<PrimaryWindow>>()
        .get_single_mut(world)
        .map(|ctx| ctx.clone())
    else {
        return;
    };

    containers::Window::new("Scene State")
        .default_open(false)
        .frame(super::translucent_frame())
        .show(ctx.get_mut(), |ui| {
            egui::CollapsingHeader::new("Registry").show(ui, |ui| {
                bevy_inspector::ui_for_resource::<BodyRegistry>(world, ui);
            });
            egui::CollapsingHeader::new("Integrator")
                .default_open(true)
                .show(ui, |ui| {
                    bevy_inspector::ui_for_resource::<SceneState>(world, ui);
                });
        });

    containers::Window::new("Inspector")
        .default_open(false)
        .frame(super::translucent_frame())
        .show(ctx.get_mut(), |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                bevy_inspector::ui_for_world_entities(world, ui);
            });
        });
}
