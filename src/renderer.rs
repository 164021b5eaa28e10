/*
 * Renderer Module
 *
 * This module draws the aquarium. The tank is 3D but the viewer is a flat
 * nannou window, so the scene is shown through one of two orthographic
 * projections: looking down on the tank, or through its front glass. Fish are
 * oriented triangles pointing along their smoothed facing direction; the
 * predator is drawn larger and red.
 */

use nannou::prelude::*;

use crate::app::Model;
use crate::boid::{Boid, Group};
use crate::ui;

const FISH_SIZE: f32 = 4.0;
const PREDATOR_SCALE: f32 = 2.2;
const BACKGROUND: (u8, u8, u8) = (0x22, 0x2e, 0x3c);
const PREDATOR_COLOR: (u8, u8, u8) = (0xcc, 0x22, 0x22);
const GROUP_COLORS: [(u8, u8, u8); 8] = [
    (0xf2, 0x8c, 0x28),
    (0xf7, 0xe7, 0xb6),
    (0xff, 0xc0, 0xcb),
    (0x7e, 0xd9, 0x57),
    (0x1a, 0xbc, 0x9c),
    (0x99, 0xcc, 0xff),
    (0xe0, 0xe0, 0xe0),
    (0xff, 0xd7, 0x00),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    // Looking down: x to the right, z up the screen
    Top,
    // Through the front glass: x to the right, y up the screen
    Front,
}

impl Projection {
    pub fn project(&self, p: glam::Vec3) -> Vec2 {
        match self {
            Projection::Top => vec2(p.x, -p.z),
            Projection::Front => vec2(p.x, p.y),
        }
    }
}

// Maps projected world coordinates onto the window
struct ScreenMap {
    center: Vec2,
    scale: f32,
}

impl ScreenMap {
    fn fit(min: Vec2, max: Vec2, window_rect: Rect) -> Self {
        let extent = (max - min).abs().max(vec2(1.0, 1.0));
        let scale = (window_rect.w() / extent.x).min(window_rect.h() / extent.y) * 0.9;
        Self {
            center: (min + max) / 2.0,
            scale,
        }
    }

    fn to_screen(&self, p: Vec2) -> Point2 {
        (p - self.center) * self.scale
    }
}

fn color_for(group: Group) -> Rgb<u8> {
    let (r, g, b) = match group {
        Group::School(n) => GROUP_COLORS[n as usize % GROUP_COLORS.len()],
        Group::Predator => PREDATOR_COLOR,
    };
    rgb(r, g, b)
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    // Begin drawing
    let draw = app.draw();
    let (r, g, b) = BACKGROUND;
    draw.background().color(rgb(r, g, b));

    let window_rect = app.window_rect();
    let flock = &model.sim.flock;
    let projection = model.projection;

    // Tank outline
    let tank_min = projection.project(flock.bounds.min);
    let tank_max = projection.project(flock.bounds.max);
    let map = ScreenMap::fit(tank_min, tank_max, window_rect);
    let corner_a = map.to_screen(tank_min);
    let corner_b = map.to_screen(tank_max);
    draw.rect()
        .xy((corner_a + corner_b) / 2.0)
        .wh((corner_b - corner_a).abs())
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.6, 0.8, 1.0, 0.6));

    // Draw each fish, then the predator on top
    for fish in &flock.fish {
        draw_boid(&draw, fish, projection, &map, FISH_SIZE);
    }
    if let Some(predator) = &flock.predator {
        draw_boid(&draw, &predator.boid, projection, &map, FISH_SIZE * PREDATOR_SCALE);
    }

    // Draw debug visualization if enabled
    if model.params.show_debug {
        if let Some(first) = flock.fish.first() {
            // Separation radius of the first fish
            draw.ellipse()
                .xy(map.to_screen(projection.project(first.position)))
                .radius(model.params.separation_radius * map.scale)
                .no_fill()
                .stroke(RED)
                .stroke_weight(1.0);
        }

        if let Some(predator) = &flock.predator {
            let states = flock.states();
            if let Some(target) = predator.target_position(&states) {
                draw.line()
                    .start(map.to_screen(projection.project(predator.boid.position)))
                    .end(map.to_screen(projection.project(target)))
                    .weight(1.0)
                    .color(rgba(1.0, 0.3, 0.3, 0.6));
            }
        }

        ui::draw_debug_info(&draw, &model.debug_info, window_rect, flock.fish.len());
    }

    // Finish drawing
    if let Err(err) = draw.to_frame(app, &frame) {
        tracing::warn!(?err, "failed to draw frame");
    }

    // Draw the egui UI
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        tracing::warn!(?err, "failed to draw ui");
    }
}

fn draw_boid(draw: &Draw, boid: &Boid, projection: Projection, map: &ScreenMap, size: f32) {
    let screen_pos = map.to_screen(projection.project(boid.position()));
    let facing = projection.project(boid.facing_direction());
    let angle = facing.y.atan2(facing.x);
    let scaled_size = size * map.scale;

    let points = [
        pt2(scaled_size, 0.0),
        pt2(-scaled_size, scaled_size / 2.0),
        pt2(-scaled_size, -scaled_size / 2.0),
    ];

    draw.polygon()
        .color(color_for(boid.group()))
        .points(points)
        .xy(screen_pos)
        .rotate(angle);
}
