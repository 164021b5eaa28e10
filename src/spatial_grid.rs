/*
 * Spatial Grid Module
 *
 * Neighbor lookups for the flock. Both implementations answer the same
 * question: which agents of the same group lie strictly within `radius` of
 * agent `index`, excluding the agent itself. Results come back in ascending
 * index order so that force sums do not depend on the strategy used.
 *
 * BruteForce scans the whole population, which is fine for an aquarium of a
 * few dozen fish. SpatialGrid buckets agents into cubic cells over the tank so
 * that only nearby cells have to be scanned. Agents that drift outside the
 * tank are clamped into the border cells.
 */

use glam::Vec3;

use crate::boid::BoidState;
use crate::bounds::WorldBounds;

pub trait NeighborQuery {
    // Indices of same-group agents strictly within `radius` of agent `index`, excluding itself
    fn neighbors_within(&self, states: &[BoidState], index: usize, radius: f32, out: &mut Vec<usize>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl NeighborQuery for BruteForce {
    fn neighbors_within(&self, states: &[BoidState], index: usize, radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let me = &states[index];
        let radius_sq = radius * radius;

        for (i, other) in states.iter().enumerate() {
            if i != index
                && other.group == me.group
                && me.position.distance_squared(other.position) < radius_sq
            {
                out.push(i);
            }
        }
    }
}

pub struct SpatialGrid {
    pub cell_size: f32,
    pub grid: Vec<Vec<usize>>,
    pub dims: [usize; 3],
    origin: Vec3,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, bounds: &WorldBounds) -> Self {
        let size = bounds.size();
        let cells = |extent: f32| ((extent / cell_size).ceil() as usize).max(1);
        let dims = [cells(size.x), cells(size.y), cells(size.z)];

        // Initialize an empty grid
        let grid = vec![Vec::new(); dims[0] * dims[1] * dims[2]];

        Self {
            cell_size,
            grid,
            dims,
            origin: bounds.min,
        }
    }

    // Convert world coordinates to (clamped) integer cell coordinates
    #[inline]
    fn cell_coords(&self, pos: Vec3) -> [isize; 3] {
        let local = (pos - self.origin) / self.cell_size;
        let axis = |v: f32, dim: usize| (v.floor() as isize).clamp(0, dim as isize - 1);
        [
            axis(local.x, self.dims[0]),
            axis(local.y, self.dims[1]),
            axis(local.z, self.dims[2]),
        ]
    }

    #[inline]
    fn flat_index(&self, [x, y, z]: [isize; 3]) -> usize {
        (z as usize * self.dims[1] + y as usize) * self.dims[0] + x as usize
    }

    // Convert world coordinates to grid cell index
    #[inline]
    pub fn pos_to_cell_index(&self, pos: Vec3) -> usize {
        self.flat_index(self.cell_coords(pos))
    }

    // Clear the grid
    pub fn clear(&mut self) {
        for cell in &mut self.grid {
            cell.clear();
        }
    }

    // Insert a boid into the grid
    #[inline]
    pub fn insert(&mut self, boid_index: usize, position: Vec3) {
        let cell_index = self.pos_to_cell_index(position);
        self.grid[cell_index].push(boid_index);
    }

    // Re-bucket every agent
    pub fn rebuild(&mut self, states: &[BoidState]) {
        self.clear();
        for (i, state) in states.iter().enumerate() {
            self.insert(i, state.position);
        }
    }

    // Move a boid to the cell of its new position
    pub fn relocate(&mut self, boid_index: usize, from: Vec3, to: Vec3) {
        let old_cell = self.pos_to_cell_index(from);
        let new_cell = self.pos_to_cell_index(to);
        if old_cell == new_cell {
            return;
        }
        self.grid[old_cell].retain(|&i| i != boid_index);
        self.grid[new_cell].push(boid_index);
    }

    // Get boid indices in every cell within `rings` cells of the given position
    pub fn get_nearby_indices(&self, position: Vec3, rings: isize, result: &mut Vec<usize>) {
        let [cx, cy, cz] = self.cell_coords(position);
        let [dx, dy, dz] = self.dims.map(|d| d as isize);

        for z in (cz - rings).max(0)..=(cz + rings).min(dz - 1) {
            for y in (cy - rings).max(0)..=(cy + rings).min(dy - 1) {
                for x in (cx - rings).max(0)..=(cx + rings).min(dx - 1) {
                    let cell_index = self.flat_index([x, y, z]);
                    result.extend_from_slice(&self.grid[cell_index]);
                }
            }
        }
    }
}

impl NeighborQuery for SpatialGrid {
    fn neighbors_within(&self, states: &[BoidState], index: usize, radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let me = &states[index];
        let rings = (radius / self.cell_size).ceil().max(1.0) as isize;

        self.get_nearby_indices(me.position, rings, out);

        let radius_sq = radius * radius;
        out.retain(|&i| {
            let other = &states[i];
            i != index && other.group == me.group && me.position.distance_squared(other.position) < radius_sq
        });
        out.sort_unstable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boid::Group;
    use crate::params::SimulationParams;

    fn at(x: f32, y: f32, z: f32, group: u32) -> BoidState {
        BoidState {
            position: Vec3::new(x, y, z),
            velocity: Vec3::X,
            group: Group::School(group),
        }
    }

    #[test]
    fn brute_force_excludes_self_other_groups_and_far_agents() {
        let states = [
            at(0.0, 50.0, 0.0, 0),
            at(10.0, 50.0, 0.0, 0),
            at(5.0, 50.0, 0.0, 1),
            at(80.0, 50.0, 0.0, 0),
        ];
        let mut out = Vec::new();
        BruteForce.neighbors_within(&states, 0, 75.0, &mut out);
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn radius_is_exclusive() {
        let states = [at(0.0, 50.0, 0.0, 0), at(75.0, 50.0, 0.0, 0)];
        let mut out = Vec::new();
        BruteForce.neighbors_within(&states, 0, 75.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn grid_matches_brute_force_including_escaped_agents() {
        let bounds = WorldBounds::from_params(&SimulationParams::default());
        let mut grid = SpatialGrid::new(40.0, &bounds);
        let states = [
            at(-99.0, 2.0, -54.0, 0),
            at(-80.0, 10.0, -40.0, 0),
            at(-130.0, 10.0, -40.0, 0),
            at(0.0, 60.0, 0.0, 0),
            at(30.0, 60.0, 10.0, 0),
            at(30.0, 60.0, 10.0, 1),
            at(99.0, 200.0, 54.0, 0),
        ];
        grid.rebuild(&states);

        let mut expected = Vec::new();
        let mut actual = Vec::new();
        for radius in [10.0, 40.0, 75.0, 150.0] {
            for i in 0..states.len() {
                BruteForce.neighbors_within(&states, i, radius, &mut expected);
                grid.neighbors_within(&states, i, radius, &mut actual);
                assert_eq!(expected, actual, "agent {i}, radius {radius}");
            }
        }
    }

    #[test]
    fn out_of_bounds_positions_land_in_border_cells() {
        let bounds = WorldBounds::from_params(&SimulationParams::default());
        let grid = SpatialGrid::new(50.0, &bounds);
        let far = grid.pos_to_cell_index(Vec3::splat(1.0e6));
        assert_eq!(far, grid.grid.len() - 1);
        assert_eq!(grid.pos_to_cell_index(Vec3::splat(-1.0e6)), 0);
    }
}
