use crate::polygon::{Polygon, is_point_between};
use crate::{EPSILON, Vec3, fround};

/// Oriented cut plane. `invalid` planes (zero-length normal) never cut anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
    pub invalid: bool,
}

impl Plane {
    pub fn new(origin: Vec3, normal: Vec3) -> Plane {
        let normal = normal.normalized_f32();
        Plane {
            origin: origin.rounded_f32(),
            normal,
            invalid: normal.has_nan(),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.invalid
    }

    /// `Some(true)` in front of the plane, `Some(false)` behind, `None` within `epsilon`.
    pub fn side(&self, point: Vec3, epsilon: f64) -> Option<bool> {
        let value = self.normal.dot_f32(point.sub_f32(self.origin));
        let on_plane = if value < 0.0 {
            value > -epsilon
        } else {
            value < epsilon
        };
        if on_plane { None } else { Some(value > 0.0) }
    }

    /// Point where the segment crosses the plane, or `None` for very short or
    /// near-parallel segments.
    pub fn intersect_segment(&self, start: Vec3, end: Vec3) -> Option<Vec3> {
        let dir = end.sub_f32(start);
        let len = dir.length_f32();
        if len <= EPSILON {
            return None;
        }
        let unit = Vec3::new(fround(dir.x / len), fround(dir.y / len), fround(dir.z / len));
        let denom = self.normal.dot_f32(unit);
        if denom.abs() <= EPSILON {
            return None;
        }
        let t = fround((self.normal.dot_f32(self.origin) - self.normal.dot_f32(start)) / denom);
        Some(Vec3::new(
            fround(start.x + unit.x * t),
            fround(start.y + unit.y * t),
            fround(start.z + unit.z * t),
        ))
    }

    /// Keeps the part of `polygon` behind the plane.
    ///
    /// A polygon that is entirely behind or on the plane comes back unchanged;
    /// one that is entirely in front (or entirely on it) is dropped. On-plane
    /// vertices never force a split.
    pub fn clip(&self, polygon: &[Vec3], epsilon: f64) -> Option<Polygon> {
        if polygon.len() < 3 || self.invalid {
            return None;
        }

        // `Some(true)` marks a kept vertex.
        let mut kept: Vec<Option<bool>> = Vec::with_capacity(polygon.len());
        let mut all_same = true;
        let mut all_value: Option<bool> = None;
        for (i, p) in polygon.iter().enumerate() {
            let value = self.side(*p, epsilon).map(|front| !front);
            kept.push(value);
            if all_same {
                if i == 0 || all_value.is_none() {
                    all_value = value;
                } else if value.is_some() && all_value != value {
                    all_same = false;
                }
            }
        }

        if all_same {
            return if all_value == Some(true) {
                Some(polygon.to_vec())
            } else {
                None
            };
        }

        let mut out: Polygon = Vec::with_capacity(polygon.len() + 2);
        let mut before_kept = kept[kept.len() - 1];
        let mut before = polygon[polygon.len() - 1];
        for (i, &vec) in polygon.iter().enumerate() {
            match (before_kept, kept[i]) {
                (Some(false), Some(true)) => {
                    if let Some(hit) = self.intersect_segment(vec, before) {
                        out.push(hit);
                    }
                    out.push(vec);
                }
                (Some(true), Some(false)) => {
                    if let Some(hit) = self.intersect_segment(vec, before) {
                        out.push(hit);
                    }
                }
                (_, None) | (_, Some(true)) => out.push(vec),
                _ => {}
            }
            before_kept = kept[i];
            before = vec;
        }

        let n = out.len();
        if n >= 3 && is_point_between(out[n - 2], out[0], out[n - 1], EPSILON) {
            out.pop();
        }
        if out.len() >= 3 && is_point_between(out[out.len() - 1], out[1], out[0], EPSILON) {
            out.remove(0);
        }

        if out.len() < 3 { None } else { Some(out) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_z0() -> Polygon {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn zero_normal_is_invalid() {
        let plane = Plane::new(Vec3::ZERO, Vec3::ZERO);
        assert!(!plane.is_valid());
        assert!(plane.clip(&square_z0(), EPSILON).is_none());
    }

    #[test]
    fn side_reports_none_on_plane() {
        let plane = Plane::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(plane.side(Vec3::new(3.0, 3.0, 0.0), EPSILON), None);
        assert_eq!(plane.side(Vec3::new(0.0, 0.0, 1.0), EPSILON), Some(true));
        assert_eq!(plane.side(Vec3::new(0.0, 0.0, -1.0), EPSILON), Some(false));
    }

    #[test]
    fn coplanar_polygon_is_dropped() {
        let plane = Plane::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(plane.clip(&square_z0(), EPSILON).is_none());
    }

    #[test]
    fn clip_halves_square() {
        let plane = Plane::new(Vec3::new(0.5, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let out = plane.clip(&square_z0(), EPSILON).expect("half remains");
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|p| p.x <= 0.5 + 1e-6));
        assert!(out.iter().any(|p| (p.x - 0.5).abs() < 1e-6 && p.y == 0.0));
        assert!(out.iter().any(|p| (p.x - 0.5).abs() < 1e-6 && p.y == 1.0));
    }

    #[test]
    fn segment_parallel_to_plane_has_no_hit() {
        let plane = Plane::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let hit = plane.intersect_segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(4.0, 1.0, 0.0));
        assert!(hit.is_none());
    }
}
