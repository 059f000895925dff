//! Particle initialization.
//!
//! Layout helpers used when a simulation is (re)initialized, plus the
//! [`SpawnContext`] handed to custom spawners. All randomness flows from the
//! simulation's seeded generator so that a given seed always reproduces the
//! same initial state.

use crate::boundary::Container;
use crate::spatial::SpatialGrid;
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use std::f32::consts::TAU;
use tracing::trace;

/// Rejection-sampling attempts per particle before accepting an overlap.
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// Uniformly distributed unit vector.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    // Uniform z and azimuth give a uniform distribution on the sphere
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Context provided to spawner functions.
///
/// ```ignore
/// Simulation::new()
///     .with_particle_count(2)
///     .with_spawner(|ctx| {
///         let species = if ctx.index == 0 { Species::ReactantA } else { Species::ReactantB };
///         Particle::with_species(ctx.random_in_container(0.3), ctx.thermal_velocity(), species)
///     })
/// ```
pub struct SpawnContext<'a> {
    /// Index of the particle being spawned (0 to count-1).
    pub index: u32,
    /// Total number of particles being spawned.
    pub count: u32,
    /// Lower corner of the container at spawn time.
    pub min_corner: Vec3,
    /// Upper corner of the container at spawn time.
    pub max_corner: Vec3,
    /// Thermostat target speed for the configured temperature.
    pub thermal_speed: f32,
    rng: &'a mut SmallRng,
}

impl<'a> SpawnContext<'a> {
    pub(crate) fn new(
        index: u32,
        count: u32,
        container: &Container,
        thermal_speed: f32,
        rng: &'a mut SmallRng,
    ) -> Self {
        Self {
            index,
            count,
            min_corner: container.min_corner(),
            max_corner: container.max_corner(),
            thermal_speed,
            rng,
        }
    }

    /// Normalized progress through the spawn (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        self.index as f32 / self.count.max(1) as f32
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in the given range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    /// Random unit vector.
    pub fn random_direction(&mut self) -> Vec3 {
        random_unit_vector(&mut *self.rng)
    }

    /// Random point inside the container, at least `margin` from every wall
    /// where the container is large enough to allow it.
    pub fn random_in_container(&mut self, margin: f32) -> Vec3 {
        random_in_box(self.min_corner, self.max_corner, margin, &mut *self.rng)
    }

    /// Random velocity scaled to the configured temperature.
    ///
    /// Direction is isotropic; magnitude lies between half and the full
    /// thermostat target speed.
    pub fn thermal_velocity(&mut self) -> Vec3 {
        thermal_velocity(self.thermal_speed, &mut *self.rng)
    }

    /// Position in a `cols × rows × layers` grid spanning the container.
    ///
    /// A zero dimension is treated as one.
    pub fn grid_position(&self, cols: u32, rows: u32, layers: u32) -> Vec3 {
        let (cols, rows, layers) = (cols.max(1), rows.max(1), layers.max(1));
        let layer = cols.saturating_mul(rows);
        let total = layer.saturating_mul(layers);
        let idx = self.index % total;

        let x = idx % cols;
        let y = (idx / cols) % rows;
        let z = idx / layer;

        let t = Vec3::new(
            x as f32 / (cols - 1).max(1) as f32,
            y as f32 / (rows - 1).max(1) as f32,
            z as f32 / (layers - 1).max(1) as f32,
        );
        self.min_corner + (self.max_corner - self.min_corner) * t
    }
}

/// Isotropic velocity with magnitude in `[speed / 2, speed)`.
pub(crate) fn thermal_velocity<R: Rng + ?Sized>(speed: f32, rng: &mut R) -> Vec3 {
    if speed <= 0.0 {
        return Vec3::ZERO;
    }
    let direction = random_unit_vector(&mut *rng);
    direction * rng.gen_range(0.5 * speed..speed)
}

fn random_in_box<R: Rng + ?Sized>(min: Vec3, max: Vec3, margin: f32, rng: &mut R) -> Vec3 {
    let mut sample = Vec3::ZERO;
    for axis in 0..3 {
        let (mut lo, mut hi) = (min[axis] + margin, max[axis] - margin);
        if lo >= hi {
            lo = min[axis];
            hi = max[axis];
        }
        sample[axis] = if lo < hi { rng.gen_range(lo..hi) } else { lo };
    }
    sample
}

/// Cubic lattice resting on the floor of `container`.
///
/// The lattice is `n × rows × n` with `n = ceil(cbrt(count))`, centered in x
/// and z. Spacing starts at `spacing` and shrinks if needed so the whole
/// lattice fits under the piston.
pub fn lattice_positions(count: usize, container: &Container, spacing: f32) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }

    let side = (count as f32).cbrt().ceil().max(1.0) as usize;
    // Guard against cbrt rounding leaving the lattice one short
    let side = if side * side * side < count { side + 1 } else { side };
    let layers = count.div_ceil(side * side);

    let min = container.min_corner();
    let max = container.max_corner();
    let extent = max - min;
    let s = spacing
        .min(extent.x / side as f32)
        .min(extent.z / side as f32)
        .min(extent.y / layers as f32);

    let center_offset = (side as f32 - 1.0) * 0.5;
    (0..count)
        .map(|i| {
            let ix = i % side;
            let iz = (i / side) % side;
            let iy = i / (side * side);
            Vec3::new(
                (ix as f32 - center_offset) * s,
                min.y + (iy as f32 + 0.5) * s,
                (iz as f32 - center_offset) * s,
            )
        })
        .collect()
}

/// Random positions inside `container`, kept at least `min_separation`
/// apart when rejection sampling finds room.
///
/// Accepted positions go into a [`SpatialGrid`] with `min_separation` cells,
/// so each overlap check only visits the 27 surrounding cells. Once a
/// particle exhausts its attempts the box is treated as full and the rest
/// are placed without checks.
pub(crate) fn scattered_positions(
    count: usize,
    container: &Container,
    min_separation: f32,
    rng: &mut SmallRng,
) -> Vec<Vec3> {
    let min = container.min_corner();
    let max = container.max_corner();
    let margin = 0.5 * min_separation;
    let min_sq = min_separation * min_separation;

    let mut positions: Vec<Vec3> = Vec::with_capacity(count);
    if !(min_separation > 0.0 && min_separation.is_finite()) {
        positions.extend((0..count).map(|_| random_in_box(min, max, 0.0, rng)));
        return positions;
    }

    let mut grid = SpatialGrid::new(min_separation);
    let mut crowded = false;
    for _ in 0..count {
        let mut candidate = random_in_box(min, max, margin, rng);
        if !crowded {
            let mut placed = false;
            for attempt in 0..MAX_PLACEMENT_ATTEMPTS {
                if attempt > 0 {
                    candidate = random_in_box(min, max, margin, rng);
                }
                let clear = grid
                    .neighbors_of(grid.cell_key(candidate))
                    .all(|j| positions[j].distance_squared(candidate) >= min_sq);
                if clear {
                    placed = true;
                    break;
                }
            }
            if placed {
                grid.insert(candidate);
            } else {
                trace!(placed = positions.len(), count, "container full, dropping separation");
                crowded = true;
            }
        }
        positions.push(candidate);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_PARTICLES;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_context_progress() {
        let mut rng = SmallRng::seed_from_u64(0);
        let ctx = SpawnContext::new(50, 100, &Container::default(), 1.0, &mut rng);
        assert!((ctx.progress() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_thermal_velocity_range() {
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..100 {
            let speed = thermal_velocity(3.0, &mut rng).length();
            assert!((1.5 - 1e-4..3.0 + 1e-4).contains(&speed));
        }
        assert_eq!(thermal_velocity(0.0, &mut rng), Vec3::ZERO);
    }

    #[test]
    fn test_lattice_fits_container() {
        let mut container = Container::default();
        for pressure in [0.0, 100.0, 1000.0] {
            container.set_pressure(pressure);
            for count in [1, 8, 27, 100, 500] {
                let positions = lattice_positions(count, &container, 0.6);
                assert_eq!(positions.len(), count);
                for p in &positions {
                    assert!(container.contains(*p), "{:?} outside at pressure {}", p, pressure);
                }
            }
        }
    }

    #[test]
    fn test_lattice_positions_are_distinct() {
        let positions = lattice_positions(64, &Container::default(), 0.6);
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                assert!(positions[i].distance(positions[j]) > 0.5);
            }
        }
    }

    #[test]
    fn test_scattered_positions_inside_and_apart() {
        let container = Container::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let positions = scattered_positions(60, &container, 0.6, &mut rng);
        assert_eq!(positions.len(), 60);
        for (i, p) in positions.iter().enumerate() {
            assert!(container.contains(*p));
            for q in &positions[i + 1..] {
                assert!(p.distance(*q) >= 0.6);
            }
        }
    }

    #[test]
    fn test_grid_position_spans_container() {
        let mut rng = SmallRng::seed_from_u64(4);
        let container = Container::default();
        let ctx = SpawnContext::new(0, 27, &container, 1.0, &mut rng);
        assert_eq!(ctx.grid_position(3, 3, 3), container.min_corner());
    }

    #[test]
    fn test_grid_position_zero_dimensions() {
        let mut rng = SmallRng::seed_from_u64(4);
        let container = Container::default();
        let ctx = SpawnContext::new(5, 27, &container, 1.0, &mut rng);
        assert_eq!(ctx.grid_position(0, 0, 0), container.min_corner());

        let along_x = ctx.grid_position(6, 0, 0);
        assert!(container.contains(along_x));
        let (min, max) = (container.min_corner(), container.max_corner());
        assert_eq!(along_x, Vec3::new(max.x, min.y, min.z));
    }

    #[test]
    fn test_scattered_positions_fill_a_crowded_box() {
        let container = Container::new(Vec3::splat(2.0));
        let mut rng = SmallRng::seed_from_u64(5);
        let positions = scattered_positions(MAX_PARTICLES, &container, 0.6, &mut rng);
        assert_eq!(positions.len(), MAX_PARTICLES);
        assert!(positions.iter().all(|p| container.contains(*p)));
    }

    #[test]
    fn test_scattered_positions_without_separation() {
        let container = Container::default();
        let mut rng = SmallRng::seed_from_u64(6);
        for separation in [0.0, -1.0, f32::NAN] {
            let positions = scattered_positions(10, &container, separation, &mut rng);
            assert_eq!(positions.len(), 10);
            assert!(positions.iter().all(|p| container.contains(*p)));
        }
    }
}
