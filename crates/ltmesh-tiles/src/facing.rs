use ltmesh_geom::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned face direction. The discriminants are the renderer's facing
/// ordinals and `Facing::ALL` is its iteration order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Facing {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Facing {
    pub const ALL: [Facing; 6] = [
        Facing::Down,
        Facing::Up,
        Facing::North,
        Facing::South,
        Facing::West,
        Facing::East,
    ];

    /// Returns the `[0..6)` ordinal of this facing.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts an ordinal back into a `Facing`.
    /// Falls back to `Down` for out-of-range indices.
    #[inline]
    pub fn from_index(i: usize) -> Facing {
        match i {
            1 => Facing::Up,
            2 => Facing::North,
            3 => Facing::South,
            4 => Facing::West,
            5 => Facing::East,
            _ => Facing::Down,
        }
    }

    /// World axis index (0 = X, 1 = Y, 2 = Z).
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            Facing::West | Facing::East => 0,
            Facing::Down | Facing::Up => 1,
            Facing::North | Facing::South => 2,
        }
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, Facing::East | Facing::Up | Facing::South)
    }

    #[inline]
    pub fn sign(self) -> i32 {
        if self.is_positive() { 1 } else { -1 }
    }

    #[inline]
    pub fn opposite(self) -> Facing {
        match self {
            Facing::Down => Facing::Up,
            Facing::Up => Facing::Down,
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::West => Facing::East,
            Facing::East => Facing::West,
        }
    }

    /// The two in-plane axes, in increasing index order.
    #[inline]
    pub fn plane_axes(self) -> (usize, usize) {
        match self.axis() {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        }
    }

    /// Returns the unit-normal vector for this facing.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let mut n = Vec3::ZERO;
        n[self.axis()] = self.sign() as f64;
        n
    }

    pub fn name(self) -> &'static str {
        match self {
            Facing::Down => "DOWN",
            Facing::Up => "UP",
            Facing::North => "NORTH",
            Facing::South => "SOUTH",
            Facing::West => "WEST",
            Facing::East => "EAST",
        }
    }

    /// Closest facing to an arbitrary direction: the first strictly largest
    /// dot product in `ALL` order. A zero vector maps to `Down`.
    pub fn nearest(n: Vec3) -> Facing {
        if n.x == 0.0 && n.y == 0.0 && n.z == 0.0 {
            return Facing::Down;
        }
        let mut best = Facing::Down;
        let mut distance = f64::NEG_INFINITY;
        for f in Facing::ALL {
            let d = n.dot(f.normal());
            if d > distance {
                distance = d;
                best = f;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_round_trip() {
        for f in Facing::ALL {
            assert_eq!(Facing::from_index(f.index()), f);
            assert_eq!(f.opposite().opposite(), f);
            assert_eq!(f.opposite().axis(), f.axis());
            assert_ne!(f.opposite().is_positive(), f.is_positive());
        }
    }

    #[test]
    fn nearest_prefers_earlier_facing_on_ties() {
        assert_eq!(Facing::nearest(Vec3::new(0.0, 1.0, 0.0)), Facing::Up);
        assert_eq!(Facing::nearest(Vec3::new(0.7, 0.7, 0.0)), Facing::Up);
        assert_eq!(Facing::nearest(Vec3::new(0.7, 0.0, -0.7)), Facing::North);
        assert_eq!(Facing::nearest(Vec3::ZERO), Facing::Down);
    }
}
