//! Axis-aligned bounding boxes
//!
//! Every overlap test in the game (hook vs. entity, carried entity vs. ship)
//! is a plain AABB check. Touching edges do not count as overlap.

use glam::Vec2;

/// An axis-aligned box in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from its top-left corner and size
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self { min, max: min + size }
    }

    /// Box centered on a point
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: boxes sharing only an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Aabb::from_min_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_min_size(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::from_min_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let right = Aabb::from_min_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let below = Aabb::from_min_size(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = Aabb::from_center(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0));
        let b = Aabb::from_center(Vec2::new(1.0, 50.0), Vec2::new(4.0, 4.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_from_center() {
        let b = Aabb::from_center(Vec2::new(400.0, 220.0), Vec2::new(80.0, 40.0));
        assert_eq!(b.min, Vec2::new(360.0, 200.0));
        assert_eq!(b.max, Vec2::new(440.0, 240.0));
        assert_eq!(b.center(), Vec2::new(400.0, 220.0));
        assert_eq!(b.size(), Vec2::new(80.0, 40.0));
    }
}
