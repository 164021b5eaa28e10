/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for the flocking weights, radii and
 * tank walls, and an on-screen overlay with debug information.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::SimulationParams;
use crate::renderer::Projection;

// What the user asked for this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiActions {
    pub reset: bool,
    pub params_changed: bool,
    pub restock: bool,
}

// Update the UI and report which changes the app has to apply
pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    debug_info: &DebugInfo,
    projection: &mut Projection,
) -> UiActions {
    let mut actions = UiActions::default();
    let mut changed = false;

    // Take a snapshot of the population-shaping values for change detection
    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Aquarium Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Population", |ui| {
                ui.add(egui::Slider::new(&mut params.num_fish, SimulationParams::get_num_fish_range()).text("Fish"));
                ui.add(egui::Slider::new(&mut params.group_count, SimulationParams::get_group_count_range()).text("Schools"));
                if ui.button("Reset Aquarium").clicked() {
                    actions.reset = true;
                }
            });

            ui.collapsing("Flocking Behavior", |ui| {
                let weight = SimulationParams::get_weight_range;
                let radius = SimulationParams::get_radius_range;
                changed |= ui.add(egui::Slider::new(&mut params.separation_weight, weight()).text("Separation Weight")).changed();
                changed |= ui.add(egui::Slider::new(&mut params.alignment_weight, weight()).text("Alignment Weight")).changed();
                changed |= ui.add(egui::Slider::new(&mut params.cohesion_weight, weight()).text("Cohesion Weight")).changed();
                changed |= ui.add(egui::Slider::new(&mut params.separation_radius, radius()).text("Separation Radius")).changed();
                changed |= ui.add(egui::Slider::new(&mut params.alignment_radius, radius()).text("Alignment Radius")).changed();
                changed |= ui.add(egui::Slider::new(&mut params.cohesion_radius, radius()).text("Cohesion Radius")).changed();
            });

            ui.collapsing("Tank Walls", |ui| {
                changed |= ui.add(egui::Slider::new(&mut params.border_weight, SimulationParams::get_weight_range()).text("Border Weight")).changed();
                changed |= ui.add(egui::Slider::new(&mut params.border_strength, SimulationParams::get_border_strength_range()).text("Border Strength")).changed();
            });

            ui.collapsing("View", |ui| {
                ui.radio_value(&mut *projection, Projection::Top, "Top view");
                ui.radio_value(&mut *projection, Projection::Front, "Front view");
            });

            ui.separator();
            ui.label(format!("FPS: {:.1}", debug_info.fps));
            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    actions.restock = params.population_changed();
    actions.params_changed = changed || actions.restock;
    actions
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect, fish: usize) {
    // Create a background panel in the top-right corner
    let margin = 20.0;
    let line_height = 20.0;
    let lines = debug_info.lines(fish);
    let panel_width = 240.0;
    let panel_height = line_height * lines.len() as f32 + margin;
    let panel_x = window_rect.right() - panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    // Draw the background panel
    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_y = window_rect.top() - margin;

    for (i, text) in lines.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);
        draw.text(text)
            .x_y(panel_x, y)
            .w(panel_width - margin)
            .left_justify()
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
