use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiContext, EguiPlugin};
use egui::panel::TopBottomSide;
use egui::{containers, widgets, Align, Align2, SliderClamping, Ui};
use focus_camera::{FocusCommand, FocusController};
use solar_system::scene::SceneTextures;
use solar_system::BodyRegistry;
use std::f32::consts::TAU;

mod inspector;

const VIEW_ANGLE_STEP: f64 = 0.01;

#[derive(Default)]
pub struct UiPlugin {
    pub with_inspector: bool,
}

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin);
        }
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin);
        }

        app.init_resource::<UiState>()
            .add_systems(Update, (toggle_controls, ui).chain());

        if self.with_inspector {
            app.add_plugins(inspector::Plugin);
        }
    }
}

#[derive(Debug, Default, Resource)]
struct UiState {
    controls_visible: bool,
}

fn toggle_controls(keys: Res<ButtonInput<KeyCode>>, mut state: ResMut<UiState>) {
    if keys.just_pressed(KeyCode::KeyH) {
        state.controls_visible = !state.controls_visible;
    }
}

#[derive(SystemParam)]
struct UiSystems<'w, 's> {
    state: ResMut<'w, UiState>,
    registry: Res<'w, BodyRegistry>,
    textures: Res<'w, SceneTextures>,
    asset_server: Res<'w, AssetServer>,
    diagnostics: Res<'w, DiagnosticsStore>,
    q_controller: Query<'w, 's, &'static FocusController>,
    commands: Commands<'w, 's>,
}

fn ui(mut this: UiSystems, mut q_egui: Query<&mut EguiContext, With<PrimaryWindow>>) {
    let Ok(mut egui) = q_egui.get_single_mut() else {
        return;
    };

    let ctx = egui.get_mut();
    this.toplevel(ctx);
}

impl UiSystems<'_, '_> {
    fn toplevel(&mut self, ctx: &egui::Context) {
        self.navigation_bar(ctx);
        self.controls_window(ctx);
        self.loading_overlay(ctx);
    }

    fn navigation_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::new(TopBottomSide::Bottom, "navigation")
            .frame(translucent_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("In").clicked() {
                        self.commands.trigger(FocusCommand::NavigateIn);
                    }
                    if ui.button("Out").clicked() {
                        self.commands.trigger(FocusCommand::NavigateOut);
                    }
                    ui.separator();
                    ui.label(self.current_body().unwrap_or("unknown"));
                    ui.with_layout(egui::Layout::right_to_left(Align::Max), |ui| {
                        self.fps_display(ui);
                        ui.separator();
                        let label = if self.state.controls_visible {
                            "Hide controls (H)"
                        } else {
                            "Show controls (H)"
                        };
                        if ui.button(label).clicked() {
                            self.state.controls_visible = !self.state.controls_visible;
                        }
                    });
                });
            });
    }

    fn controls_window(&mut self, ctx: &egui::Context) {
        let mut open = self.state.controls_visible;
        let Some((focus_index, view_angle)) = self
            .q_controller
            .iter()
            .next()
            .map(|controller| (controller.focus_index(), controller.view_angle()))
        else {
            return;
        };
        egui::Window::new("Controls")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .frame(translucent_frame())
            .show(ctx, |ui| {
                self.focus_selector(ui, focus_index);
                self.focus_slider(ui, focus_index);
                self.view_angle_slider(ui, view_angle);
            });
        self.state.controls_visible = open;
    }

    fn focus_selector(&mut self, ui: &mut Ui, focus_index: usize) {
        let selected = self
            .registry
            .body(focus_index)
            .map(|body| body.name.clone())
            .unwrap_or_default();
        let mut clicked = None;
        containers::ComboBox::new("bodies", "Body")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                for (index, name) in self.registry.names().enumerate() {
                    if ui.selectable_label(index == focus_index, name).clicked() {
                        clicked = Some(index);
                    }
                }
            });
        if let Some(index) = clicked {
            self.commands.trigger(FocusCommand::SetFocus(index as i64));
        }
    }

    fn focus_slider(&mut self, ui: &mut Ui, focus_index: usize) {
        let Some(last) = self.registry.len().checked_sub(1) else {
            return;
        };
        let mut index = focus_index;
        if ui
            .add(widgets::Slider::new(&mut index, 0..=last).text("Focus"))
            .changed()
        {
            self.commands.trigger(FocusCommand::SetFocus(index as i64));
        }
    }

    fn view_angle_slider(&mut self, ui: &mut Ui, view_angle: f32) {
        let mut angle = view_angle;
        if view_angle_widget(ui, &mut angle) {
            self.commands.trigger(FocusCommand::SetViewAngle(angle));
        }
    }

    fn loading_overlay(&mut self, ctx: &egui::Context) {
        let Some(text) = loading_label(self.textures.progress(&self.asset_server)) else {
            return;
        };
        egui::Area::new(egui::Id::new("loading"))
            .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .interactable(false)
            .show(ctx, |ui| {
                translucent_frame().show(ui, |ui| {
                    ui.heading(text);
                });
            });
    }

    fn fps_display(&mut self, ui: &mut Ui) {
        let Some(fps) = self.diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) else {
            return;
        };
        if !fps.is_enabled {
            return;
        }
        ui.label(
            fps.smoothed()
                .map(|v| format!("FPS: {v:2.1} Hz"))
                .unwrap_or_else(|| String::from("N/A")),
        );
    }

    fn current_body(&self) -> Option<&str> {
        let controller = self.q_controller.iter().next()?;
        self.registry
            .body(controller.focus_index())
            .map(|body| body.name.as_str())
    }
}

/// Only user edits are clamped and snapped, so drawing never rewrites the angle.
fn view_angle_widget(ui: &mut Ui, angle: &mut f32) -> bool {
    ui.add(
        widgets::Slider::new(angle, 0.0..=TAU)
            .step_by(VIEW_ANGLE_STEP)
            .clamping(SliderClamping::Edits)
            .text("View angle"),
    )
    .changed()
}

/// Text for the loading overlay, or `None` once everything is loaded.
fn loading_label(progress: f32) -> Option<String> {
    if progress >= 1.0 {
        return None;
    }
    Some(format!("Loading {:.0}%", progress.clamp(0.0, 1.0) * 100.0))
}

fn translucent_frame() -> egui::Frame {
    let default_frame = egui::Frame::default();
    let [r, g, b, _] = default_frame.fill.to_array();
    default_frame
        .fill(egui::Color32::from_rgba_unmultiplied(r, g, b, 128))
        .inner_margin(egui::vec2(8.0, 6.0))
}
