//! Axis-aligned bounding boxes
//!
//! Boxes can be *void* (contain nothing). Aggregation of per-object boxes into
//! per-entity and scene-wide boxes always goes through [`BoundingBox::add`],
//! so a void box is the neutral element of aggregation.

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-Aligned Bounding Box, possibly void
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner, meaningless when the box is void
    pub min: Vec3,
    /// Maximum corner, meaningless when the box is void
    pub max: Vec3,
    void: bool,
}

impl BoundingBox {
    /// Create a void box
    pub fn void() -> Self {
        Self {
            min: Vec3::zeros(),
            max: Vec3::zeros(),
            void: true,
        }
    }

    /// Create a new box from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "bounding box min must not exceed max"
        );
        Self { min, max, void: false }
    }

    /// Whether the box contains nothing
    pub fn is_void(&self) -> bool {
        self.void
    }

    /// Get the center of the box, `None` when void
    pub fn center(&self) -> Option<Vec3> {
        (!self.void).then(|| (self.min + self.max) * 0.5)
    }

    /// Grow this box so it also encloses `other`
    pub fn add(&mut self, other: &Self) {
        if other.void {
            return;
        }
        if self.void {
            *self = *other;
            return;
        }
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Box enclosing every box of an iterator
    pub fn enclosing<'a>(boxes: impl IntoIterator<Item = &'a Self>) -> Self {
        let mut result = Self::void();
        for bbox in boxes {
            result.add(bbox);
        }
        result
    }

    /// Box enclosing the eight transformed corners of this box
    pub fn transformed(&self, placement: &Mat4) -> Self {
        if self.void {
            return *self;
        }
        let mut result = Self::void();
        for i in 0..8 {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = placement.transform_point(&corner).coords;
            result.add(&Self::new(p, p));
        }
        result
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::void()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use approx::assert_relative_eq;

    #[test]
    fn test_void_is_neutral() {
        let unit = BoundingBox::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let mut acc = BoundingBox::void();
        acc.add(&unit);
        assert_eq!(acc, unit);
        acc.add(&BoundingBox::void());
        assert_eq!(acc, unit);
        assert!(BoundingBox::void().center().is_none());
    }

    #[test]
    fn test_add_grows_both_corners() {
        let mut a = BoundingBox::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let b = BoundingBox::new(Vec3::new(-2.0, 0.5, 0.5), Vec3::new(0.5, 3.0, 0.5));
        a.add(&b);
        assert_eq!(a.min, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(a.max, Vec3::new(1.0, 3.0, 1.0));
    }

    #[test]
    fn test_transformed_by_translation() {
        let bbox = BoundingBox::new(Vec3::zeros(), Vec3::new(1.0, 2.0, 3.0));
        let moved = bbox.transformed(&Transform::from_position(Vec3::new(5.0, 0.0, 0.0)).to_matrix());
        assert_relative_eq!(moved.min, Vec3::new(5.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(moved.max, Vec3::new(6.0, 2.0, 3.0), epsilon = 1e-6);
    }
}
