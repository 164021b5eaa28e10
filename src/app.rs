/*
 * Application Module
 *
 * This module defines the nannou application model for the aquarium viewer.
 * It owns the running Simulation, forwards UI changes to it and advances it
 * with a fixed timestep every frame. Rendering only reads positions and
 * facing directions back out.
 */

use clap::Parser;
use nannou::prelude::*;
use nannou_egui::Egui;

use crate::cli::Args;
use crate::debug::DebugInfo;
use crate::driver::Simulation;
use crate::params::SimulationParams;
use crate::renderer::{self, Projection};
use crate::ui;

// Main model for the application
pub struct Model {
    pub sim: Simulation,
    // Copy edited by the UI, pushed into the simulation when it changes
    pub params: SimulationParams,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub projection: Projection,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let params = match Args::parse().load_params() {
        Ok(params) => params,
        Err(err) => {
            tracing::error!(%err, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Create the main window
    let window_id = app
        .new_window()
        .title("Koi Aquarium")
        .size(1280, 800)
        .view(renderer::view)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    // Create the UI
    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let sim = match Simulation::new(params.clone()) {
        Ok(sim) => sim,
        Err(err) => {
            tracing::error!(%err, "failed to build simulation");
            std::process::exit(1);
        }
    };

    Model {
        sim,
        params,
        egui,
        debug_info: DebugInfo::default(),
        projection: Projection::Front,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    // Update debug info
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.egui.set_elapsed_time(update.since_start);

    let actions = ui::update_ui(&mut model.egui, &mut model.params, &model.debug_info, &mut model.projection);

    if actions.params_changed {
        if let Err(err) = model.sim.set_params(model.params.clone(), actions.restock) {
            tracing::warn!(%err, "rejected parameter change");
            model.params = model.sim.flock.params().clone();
        }
    }
    if actions.reset {
        model.sim.reset();
    }

    // Only advance the simulation if it is not paused
    if model.params.pause_simulation {
        model.sim.clock.reset();
        model.debug_info.physics_updates_per_frame = 0;
    } else {
        model.debug_info.physics_updates_per_frame = model.sim.advance(update.since_last);
    }

    model.debug_info.sync(&model.sim);
}

// Handle raw window events for egui
fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
