use glam::{IVec3, Vec3};

/// One of the six axis-aligned voxel faces.
///
/// The discriminant is the face index written into the picking pass and
/// must stay in 0..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    West = 0,
    East = 1,
    Down = 2,
    Up = 3,
    North = 4,
    South = 5,
}

/// All six faces in index order.
pub const ALL_FACES: [Face; 6] = [
    Face::West,
    Face::East,
    Face::Down,
    Face::Up,
    Face::North,
    Face::South,
];

impl Face {
    pub fn from_index(index: u8) -> Option<Self> {
        ALL_FACES.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Offset to the neighbouring cell across this face. Y-up convention.
    pub fn offset(self) -> IVec3 {
        match self {
            Face::West => IVec3::new(-1, 0, 0),
            Face::East => IVec3::new(1, 0, 0),
            Face::Down => IVec3::new(0, -1, 0),
            Face::Up => IVec3::new(0, 1, 0),
            Face::North => IVec3::new(0, 0, -1),
            Face::South => IVec3::new(0, 0, 1),
        }
    }

    pub fn normal(self) -> Vec3 {
        self.offset().as_vec3()
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::West => Face::East,
            Face::East => Face::West,
            Face::Down => Face::Up,
            Face::Up => Face::Down,
            Face::North => Face::South,
            Face::South => Face::North,
        }
    }
}
