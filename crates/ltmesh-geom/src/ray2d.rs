use crate::{EPSILON, Vec3};

/// Raised by [`Ray2d::intersect_when`] when both lines are the same line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collinear;

/// Parametric line restricted to the `(one, two)` plane of a face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray2d {
    pub one: usize,
    pub two: usize,
    pub origin_one: f64,
    pub origin_two: f64,
    pub dir_one: f64,
    pub dir_two: f64,
}

impl Ray2d {
    pub fn new(one: usize, two: usize, start_one: f64, start_two: f64, end_one: f64, end_two: f64) -> Ray2d {
        Ray2d {
            one,
            two,
            origin_one: start_one,
            origin_two: start_two,
            dir_one: end_one - start_one,
            dir_two: end_two - start_two,
        }
    }

    pub fn through(one: usize, two: usize, start: Vec3, end: Vec3) -> Ray2d {
        Ray2d::new(one, two, start[one], start[two], end[one], end[two])
    }

    #[inline]
    fn origin(&self, axis: usize) -> f64 {
        if axis == self.one { self.origin_one } else { self.origin_two }
    }

    #[inline]
    fn direction(&self, axis: usize) -> f64 {
        if axis == self.one { self.dir_one } else { self.dir_two }
    }

    #[inline]
    fn other(&self, axis: usize) -> usize {
        if axis == self.one { self.two } else { self.one }
    }

    /// Line parameter at which coordinate `axis` equals `value`.
    pub fn t_at(&self, axis: usize, value: f64) -> f64 {
        (value - self.origin(axis)) / self.direction(axis)
    }

    /// The other coordinate where coordinate `axis` equals `value`.
    pub fn value_at(&self, axis: usize, value: f64) -> f64 {
        let other = self.other(axis);
        self.origin(other) + self.direction(other) * (value - self.origin(axis)) / self.direction(axis)
    }

    pub fn is_on_line(&self, one: f64, two: f64) -> bool {
        if self.dir_one.abs() <= EPSILON {
            return eq_eps(self.origin_one, one, EPSILON);
        }
        if self.dir_two.abs() <= EPSILON {
            return eq_eps(self.origin_two, two, EPSILON);
        }
        eq_eps(self.value_at(self.one, one), two, EPSILON)
    }

    /// `Some(true)` right of the ray, `Some(false)` left, `None` on it.
    pub fn side(&self, one: f64, two: f64) -> Option<bool> {
        let r = self.dir_one * (two - self.origin_two) - self.dir_two * (one - self.origin_one);
        if r > -EPSILON && r < EPSILON {
            return None;
        }
        Some(r < 0.0)
    }

    /// Crossing of `self` with the segment `start..end`; the third coordinate
    /// of the result is set to `third_value`.
    pub fn intersect_segment(&self, start: Vec3, end: Vec3, third_value: f64) -> Option<Vec3> {
        let line = Ray2d::through(self.one, self.two, start, end);
        if (self.dir_one * line.dir_two - self.dir_two * line.dir_one).abs() <= EPSILON {
            return None;
        }
        let t = self.crossing_param(&line);
        let mut point = Vec3::new(third_value, third_value, third_value);
        point[self.one] = self.origin_one + t * self.dir_one;
        point[self.two] = self.origin_two + t * self.dir_two;
        Some(point)
    }

    /// Parameter along `self` where it meets `line`; `-1` when the lines are
    /// parallel but distinct.
    pub fn intersect_when(&self, line: &Ray2d) -> Result<f64, Collinear> {
        if (self.dir_one * line.dir_two - self.dir_two * line.dir_one).abs() <= EPSILON {
            if self.is_on_line(line.origin_one, line.origin_two) {
                return Err(Collinear);
            }
            return Ok(-1.0);
        }
        Ok(self.crossing_param(line))
    }

    #[inline]
    fn crossing_param(&self, line: &Ray2d) -> f64 {
        ((line.origin_two - self.origin_two) * line.dir_one + self.origin_one * line.dir_two
            - line.origin_one * line.dir_two)
            / (line.dir_one * self.dir_two - self.dir_one * line.dir_two)
    }
}

#[inline]
pub(crate) fn eq_eps(a: f64, b: f64, eps: f64) -> bool {
    a == b || (a - b).abs() < eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_side_is_clockwise() {
        // Ray along +one; a point with larger `two` is on the left.
        let ray = Ray2d::new(0, 1, 0.0, 0.0, 1.0, 0.0);
        assert_eq!(ray.side(0.5, 1.0), Some(false));
        assert_eq!(ray.side(0.5, -1.0), Some(true));
        assert_eq!(ray.side(5.0, 0.0), None);
    }

    #[test]
    fn crossing_lines_meet_at_param() {
        let a = Ray2d::new(0, 1, 0.0, 0.0, 2.0, 0.0);
        let b = Ray2d::new(0, 1, 1.0, -1.0, 1.0, 1.0);
        assert_eq!(a.intersect_when(&b), Ok(0.5));
        assert_eq!(b.intersect_when(&a), Ok(0.5));
    }

    #[test]
    fn overlapping_lines_are_collinear() {
        let a = Ray2d::new(0, 2, 0.0, 0.0, 1.0, 0.0);
        let b = Ray2d::new(0, 2, 0.5, 0.0, 3.0, 0.0);
        let c = Ray2d::new(0, 2, 0.0, 1.0, 1.0, 1.0);
        assert_eq!(a.intersect_when(&b), Err(Collinear));
        assert_eq!(a.intersect_when(&c), Ok(-1.0));
    }

    #[test]
    fn segment_hit_keeps_third_value() {
        let ray = Ray2d::new(1, 2, 0.5, 0.0, 0.5, 1.0);
        let hit = ray
            .intersect_segment(Vec3::new(7.0, 0.0, 0.25), Vec3::new(7.0, 1.0, 0.25), 3.0)
            .expect("crossing");
        assert_eq!(hit, Vec3::new(3.0, 0.5, 0.25));
    }
}
