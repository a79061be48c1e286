//! Grid geometry and candidate domain storage
//!
//! The solve volume is a dense 3D grid with fixed dimensions for the lifetime
//! of a run. Cells are addressed either by `[x, y, z]` coordinate or by a flat
//! index; the y axis is vertical. Each cell owns a domain of candidate module
//! ids which only ever shrinks while the solver runs.

use bitvec::vec::BitVec;
use ndarray::Array3;

use crate::solver::bitset::ModuleBitset;

/// Cell coordinate as `[x, y, z]` with y vertical
pub type Coordinate = [usize; 3];

/// One of the six axis-aligned neighbor directions
///
/// The discriminant order matches the face order of module signatures:
/// Left, Back, Right, Forward, Down, Up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Negative x
    Left = 0,
    /// Negative z
    Back = 1,
    /// Positive x
    Right = 2,
    /// Positive z
    Forward = 3,
    /// Negative y
    Down = 4,
    /// Positive y
    Up = 5,
}

/// All six directions in face order
pub const ALL_DIRECTIONS: [Direction; 6] = [
    Direction::Left,
    Direction::Back,
    Direction::Right,
    Direction::Forward,
    Direction::Down,
    Direction::Up,
];

impl Direction {
    /// The direction a neighboring cell sees this cell from
    ///
    /// Horizontal opposites pair up as `(i + 2) % 4`; Down and Up swap.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Back => Self::Forward,
            Self::Right => Self::Left,
            Self::Forward => Self::Back,
            Self::Down => Self::Up,
            Self::Up => Self::Down,
        }
    }

    /// Coordinate delta `[dx, dy, dz]` of one step in this direction
    pub const fn delta(self) -> [i64; 3] {
        match self {
            Self::Left => [-1, 0, 0],
            Self::Back => [0, 0, -1],
            Self::Right => [1, 0, 0],
            Self::Forward => [0, 0, 1],
            Self::Down => [0, -1, 0],
            Self::Up => [0, 1, 0],
        }
    }

    /// Whether this direction lies in the horizontal plane
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Back | Self::Right | Self::Forward)
    }

    /// Face slot index of this direction (0..6)
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Fixed dimensions of the solve volume with flat-index conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridVolume {
    /// Cell count along x
    pub size_x: usize,
    /// Cell count along y (vertical)
    pub size_y: usize,
    /// Cell count along z
    pub size_z: usize,
}

impl GridVolume {
    /// Create a volume with the given dimensions
    pub const fn new(size_x: usize, size_y: usize, size_z: usize) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
        }
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.size_x * self.size_y * self.size_z
    }

    /// Flat index of a coordinate
    pub const fn flat_index(&self, coordinate: Coordinate) -> usize {
        coordinate[0] + coordinate[1] * self.size_x + coordinate[2] * self.size_x * self.size_y
    }

    /// Coordinate of a flat index
    pub const fn coordinate_of(&self, index: usize) -> Coordinate {
        [
            index % self.size_x,
            (index / self.size_x) % self.size_y,
            index / (self.size_x * self.size_y),
        ]
    }

    /// Whether a coordinate lies inside the volume
    pub const fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate[0] < self.size_x && coordinate[1] < self.size_y && coordinate[2] < self.size_z
    }

    /// The neighboring coordinate one step in `direction`, if inside bounds
    ///
    /// The volume does not wrap; stepping outside returns `None`.
    pub const fn neighbor(&self, coordinate: Coordinate, direction: Direction) -> Option<Coordinate> {
        let delta = direction.delta();
        let next = [
            coordinate[0] as i64 + delta[0],
            coordinate[1] as i64 + delta[1],
            coordinate[2] as i64 + delta[2],
        ];
        if next[0] < 0
            || next[1] < 0
            || next[2] < 0
            || next[0] >= self.size_x as i64
            || next[1] >= self.size_y as i64
            || next[2] >= self.size_z as i64
        {
            return None;
        }
        Some([next[0] as usize, next[1] as usize, next[2] as usize])
    }

    /// Iterate all coordinates in flat-index order
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> {
        let volume = *self;
        (0..volume.cell_count()).map(move |index| volume.coordinate_of(index))
    }
}

/// Candidate domains for every cell of a volume, plus the pinned mask
///
/// Owned exclusively by the solver for the duration of one attempt. Domains
/// shrink monotonically under propagation; a pinned cell whose domain empties
/// is a hard contradiction rather than an air fallback.
#[derive(Clone, Debug)]
pub struct DomainGrid {
    volume: GridVolume,
    domains: Array3<ModuleBitset>,
    pinned: BitVec,
}

impl DomainGrid {
    /// Create a grid where every cell starts with the full candidate set
    pub fn full(volume: GridVolume, module_count: usize) -> Self {
        let all = ModuleBitset::all(module_count);
        Self {
            volume,
            domains: Array3::from_elem((volume.size_x, volume.size_y, volume.size_z), all),
            pinned: BitVec::repeat(false, volume.cell_count()),
        }
    }

    /// Dimensions of the underlying volume
    pub const fn volume(&self) -> GridVolume {
        self.volume
    }

    /// Domain of the cell at `coordinate`
    pub fn domain(&self, coordinate: Coordinate) -> Option<&ModuleBitset> {
        self.domains.get(coordinate)
    }

    /// Mutable domain of the cell at `coordinate`
    pub fn domain_mut(&mut self, coordinate: Coordinate) -> Option<&mut ModuleBitset> {
        self.domains.get_mut(coordinate)
    }

    /// Domain of the cell with the given flat index
    pub fn domain_at(&self, index: usize) -> Option<&ModuleBitset> {
        self.domains.get(self.volume.coordinate_of(index))
    }

    /// Mutable domain of the cell with the given flat index
    pub fn domain_at_mut(&mut self, index: usize) -> Option<&mut ModuleBitset> {
        self.domains.get_mut(self.volume.coordinate_of(index))
    }

    /// Mark the cell at `coordinate` as pinned
    pub fn set_pinned(&mut self, coordinate: Coordinate) {
        let index = self.volume.flat_index(coordinate);
        if let Some(mut bit) = self.pinned.get_mut(index) {
            *bit = true;
        }
    }

    /// Whether the cell with the given flat index is pinned
    pub fn is_pinned(&self, index: usize) -> bool {
        self.pinned.get(index).as_deref() == Some(&true)
    }

    /// Number of cells whose domain still holds more than one candidate
    pub fn undecided_count(&self) -> usize {
        self.domains.iter().filter(|domain| domain.len() > 1).count()
    }

    /// Whether every cell is decided down to a single candidate
    pub fn is_collapsed(&self) -> bool {
        self.domains.iter().all(|domain| domain.len() == 1)
    }
}
