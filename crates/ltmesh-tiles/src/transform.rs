//! Corner displacement payload of transformable boxes.

use ltmesh_geom::Vec3;

use crate::facing::Facing;

/// Box corner, named East/West, Up/Down, North/South.
/// The order is the bit order of the payload indicator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Corner {
    Eun = 0,
    Eus = 1,
    Edn = 2,
    Eds = 3,
    Wun = 4,
    Wus = 5,
    Wdn = 6,
    Wds = 7,
}

impl Corner {
    pub const ALL: [Corner; 8] = [
        Corner::Eun,
        Corner::Eus,
        Corner::Edn,
        Corner::Eds,
        Corner::Wun,
        Corner::Wus,
        Corner::Wdn,
        Corner::Wds,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_east(self) -> bool {
        self.index() < 4
    }

    #[inline]
    pub fn is_up(self) -> bool {
        self.index() & 2 == 0
    }

    #[inline]
    pub fn is_south(self) -> bool {
        self.index() & 1 == 1
    }

    /// Undisplaced position of this corner on the box `min..max`.
    pub fn base(self, min: [i32; 3], max: [i32; 3]) -> [i32; 3] {
        [
            if self.is_east() { max[0] } else { min[0] },
            if self.is_up() { max[1] } else { min[1] },
            if self.is_south() { max[2] } else { min[2] },
        ]
    }
}

/// Corner loop of each box side, in the order the cache visits them.
pub const FACE_CORNERS: [(Facing, [Corner; 4]); 6] = [
    (Facing::East, [Corner::Eus, Corner::Eds, Corner::Edn, Corner::Eun]),
    (Facing::West, [Corner::Wun, Corner::Wdn, Corner::Wds, Corner::Wus]),
    (Facing::Up, [Corner::Wun, Corner::Wus, Corner::Eus, Corner::Eun]),
    (Facing::Down, [Corner::Wds, Corner::Wdn, Corner::Edn, Corner::Eds]),
    (Facing::South, [Corner::Wus, Corner::Wds, Corner::Eds, Corner::Eus]),
    (Facing::North, [Corner::Eun, Corner::Edn, Corner::Wdn, Corner::Wun]),
];

pub fn face_corners(facing: Facing) -> [Corner; 4] {
    FACE_CORNERS
        .iter()
        .find(|(f, _)| *f == facing)
        .map(|(_, c)| *c)
        .unwrap_or(FACE_CORNERS[0].1)
}

/// Decoded payload: the raw indicator word plus per-corner grid offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CornerTransform {
    pub indicator: u32,
    pub offsets: [[i32; 3]; 8],
}

impl CornerTransform {
    /// Bit `corner * 3 + axis` of the indicator marks an offset present in the
    /// packed stream; absent offsets and reads past the end are zero.
    pub fn decode(data: &[i32]) -> CornerTransform {
        let indicator = data.first().copied().unwrap_or(0) as u32;
        let mut offsets = [[0i32; 3]; 8];
        let mut active = 0usize;
        for corner in Corner::ALL {
            for (axis, slot) in offsets[corner.index()].iter_mut().enumerate() {
                if bit(indicator, corner.index() * 3 + axis) {
                    *slot = data_short(data, active);
                    active += 1;
                }
            }
        }
        CornerTransform { indicator, offsets }
    }

    /// Whether the split diagonal of `facing` runs the other way.
    #[inline]
    pub fn flipped(&self, facing: Facing) -> bool {
        bit(self.indicator, 24 + facing.index())
    }

    /// Displaced corner positions in raw grid units.
    pub fn corners(&self, min: [i32; 3], max: [i32; 3]) -> [Vec3; 8] {
        Corner::ALL.map(|c| {
            let b = c.base(min, max);
            let o = self.offsets[c.index()];
            Vec3::new((b[0] + o[0]) as f64, (b[1] + o[1]) as f64, (b[2] + o[2]) as f64)
        })
    }
}

/// Undisplaced corner positions in raw grid units.
pub fn base_corners(min: [i32; 3], max: [i32; 3]) -> [Vec3; 8] {
    Corner::ALL.map(|c| {
        let b = c.base(min, max);
        Vec3::new(b[0] as f64, b[1] as f64, b[2] as f64)
    })
}

#[inline]
fn bit(value: u32, bit: usize) -> bool {
    (value >> bit) & 1 == 1
}

/// Two signed 16-bit values per word after the indicator, high half first.
fn data_short(data: &[i32], index: usize) -> i32 {
    let real = (index >> 1) + 1;
    let Some(&word) = data.get(real) else {
        return 0;
    };
    let word = word as u32;
    let half = if index & 1 == 1 { word & 0xffff } else { word >> 16 };
    half as u16 as i16 as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(high: i16, low: i16) -> i32 {
        (((high as u16 as u32) << 16) | low as u16 as u32) as i32
    }

    #[test]
    fn decodes_present_offsets_in_order() {
        // EUN.y and WDS.z present.
        let indicator = (1 << 1) | (1 << 23);
        let t = CornerTransform::decode(&[indicator, pack(-3, 5)]);
        assert_eq!(t.offsets[Corner::Eun.index()], [0, -3, 0]);
        assert_eq!(t.offsets[Corner::Wds.index()], [0, 0, 5]);
        assert_eq!(t.offsets[Corner::Eds.index()], [0, 0, 0]);
    }

    #[test]
    fn missing_words_decode_as_zero() {
        let t = CornerTransform::decode(&[0b111]);
        assert_eq!(t.offsets[0], [0, 0, 0]);
    }

    #[test]
    fn flip_bits_follow_facing_ordinals() {
        let t = CornerTransform::decode(&[1 << (24 + Facing::South.index())]);
        assert!(t.flipped(Facing::South));
        assert!(!t.flipped(Facing::North));
    }

    #[test]
    fn corner_bases() {
        let (min, max) = ([0, 1, 2], [3, 4, 5]);
        assert_eq!(Corner::Eun.base(min, max), [3, 4, 2]);
        assert_eq!(Corner::Wds.base(min, max), [0, 1, 5]);
        assert_eq!(Corner::Edn.base(min, max), [3, 1, 2]);
    }
}
