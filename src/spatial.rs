//! Uniform spatial hash grid for neighbor queries.
//!
//! Space is cut into cubic cells whose side equals the interaction cutoff,
//! so two particles closer than the cutoff always share a cell or sit in
//! adjacent cells. A neighbor query therefore only has to look at the 3x3x3
//! block around a cell. The grid is cleared and rebuilt from the live
//! positions every time it is used; it never carries entries across steps,
//! which keeps it correct for fast-moving particles.
//!
//! Cost: O(N) to rebuild, O(N·k) to enumerate candidate pairs where k is the
//! average occupancy of a 3x3x3 block.

use crate::Vec3;
use glam::IVec3;
use rustc_hash::FxHashMap;

/// Offsets for the 27 cells of a 3x3x3 block (including the center).
#[rustfmt::skip]
pub const NEIGHBOR_OFFSETS: [IVec3; 27] = [
    IVec3::new(-1, -1, -1), IVec3::new(0, -1, -1), IVec3::new(1, -1, -1),
    IVec3::new(-1,  0, -1), IVec3::new(0,  0, -1), IVec3::new(1,  0, -1),
    IVec3::new(-1,  1, -1), IVec3::new(0,  1, -1), IVec3::new(1,  1, -1),
    IVec3::new(-1, -1,  0), IVec3::new(0, -1,  0), IVec3::new(1, -1,  0),
    IVec3::new(-1,  0,  0), IVec3::new(0,  0,  0), IVec3::new(1,  0,  0),
    IVec3::new(-1,  1,  0), IVec3::new(0,  1,  0), IVec3::new(1,  1,  0),
    IVec3::new(-1, -1,  1), IVec3::new(0, -1,  1), IVec3::new(1, -1,  1),
    IVec3::new(-1,  0,  1), IVec3::new(0,  0,  1), IVec3::new(1,  0,  1),
    IVec3::new(-1,  1,  1), IVec3::new(0,  1,  1), IVec3::new(1,  1,  1),
];

/// A uniform 3D hash grid of particle indices.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    inv_cell_size: f32,
    cells: FxHashMap<IVec3, Vec<usize>>,
    /// Cell key of every particle, indexed like the positions it was built from.
    keys: Vec<IVec3>,
}

impl SpatialGrid {
    /// Create an empty grid.
    ///
    /// `cell_size` should equal the largest interaction distance queried
    /// against this grid.
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: FxHashMap::default(),
            keys: Vec::new(),
        }
    }

    /// Build a grid from a position array.
    pub fn build(positions: &[Vec3], cell_size: f32) -> Self {
        let mut grid = Self::new(cell_size);
        grid.rebuild(positions);
        grid
    }

    /// Change the cell size. Takes effect on the next rebuild.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        debug_assert!(cell_size > 0.0, "cell_size must be positive");
        self.cell_size = cell_size;
        self.inv_cell_size = 1.0 / cell_size;
    }

    /// Discard every entry and re-bucket `positions`.
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        self.cells.clear();
        self.keys.clear();
        self.keys.reserve(positions.len());

        for (i, &position) in positions.iter().enumerate() {
            let key = self.cell_key(position);
            self.keys.push(key);
            self.cells.entry(key).or_default().push(i);
        }
    }

    /// Append one position and return its index.
    ///
    /// Used to grow a layout incrementally; stepping always rebuilds.
    pub fn insert(&mut self, position: Vec3) -> usize {
        let index = self.keys.len();
        let key = self.cell_key(position);
        self.keys.push(key);
        self.cells.entry(key).or_default().push(index);
        index
    }

    /// Discretized cell coordinates of a world position.
    #[inline]
    pub fn cell_key(&self, position: Vec3) -> IVec3 {
        (position * self.inv_cell_size).floor().as_ivec3()
    }

    /// Cell key recorded for particle `index` at the last rebuild.
    #[inline]
    pub fn key_of(&self, index: usize) -> Option<IVec3> {
        self.keys.get(index).copied()
    }

    /// Particle indices stored in exactly one cell.
    pub fn cell(&self, key: IVec3) -> &[usize] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Particle indices in the 3x3x3 block of cells centered on `key`.
    ///
    /// Keys wrap at the `i32` range, so a saturated key can pull in a far
    /// cell; callers reject those by distance.
    pub fn neighbors_of(&self, key: IVec3) -> impl Iterator<Item = usize> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |offset| self.cells.get(&key.wrapping_add(*offset)))
            .flat_map(|indices| indices.iter().copied())
    }

    /// Call `f(i, j)` once for every unordered candidate pair, with `i < j`.
    ///
    /// Candidates share a cell or sit in adjacent cells. Every pair closer
    /// than `cell_size` is visited; farther pairs may be visited too and
    /// must be rejected by the caller's distance check.
    pub fn for_each_candidate_pair<F: FnMut(usize, usize)>(&self, mut f: F) {
        for (i, &key) in self.keys.iter().enumerate() {
            for j in self.neighbors_of(key) {
                if j > i {
                    f(i, j);
                }
            }
        }
    }

    /// Side length of a cell.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of particles bucketed at the last rebuild.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the grid holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of non-empty cells.
    #[inline]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}
