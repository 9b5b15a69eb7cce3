use bevy::prelude::*;

/// Slack used when comparing boxes that went through float arithmetic.
const CONTAINMENT_EPSILON: f32 = 1e-3;

/// Axis-aligned bounding box stored as center + half-extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Union of every box yielded, or `None` for an empty iterator.
    pub fn union_all(boxes: impl IntoIterator<Item = Aabb>) -> Option<Aabb> {
        boxes.into_iter().reduce(|total, next| total.union(&next))
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        let delta = (point - self.center).abs();
        delta.cmple(self.half_extents).all()
    }

    /// Whether `other` lies inside `self`, tolerating float round-off.
    pub fn contains(&self, other: &Aabb) -> bool {
        let slack = Vec3::splat(CONTAINMENT_EPSILON);
        (self.min() - slack).cmple(other.min()).all() && (self.max() + slack).cmpge(other.max()).all()
    }

    /// A box is usable when it is finite, has no negative extent and is not a single point.
    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.half_extents.is_finite()
            && self.half_extents.cmpge(Vec3::ZERO).all()
            && self.half_extents.max_element() > 0.0
    }

    /// World-space box enclosing this local box once `transform` is applied.
    ///
    /// Rotations that are not multiples of 90 degrees grow the box to keep
    /// the rotated corners inside it.
    pub fn transformed(&self, transform: &Transform) -> Aabb {
        let rotation = Mat3::from_quat(transform.rotation);
        let scaled = self.half_extents * transform.scale.abs();
        let half_extents = rotation.x_axis.abs() * scaled.x
            + rotation.y_axis.abs() * scaled.y
            + rotation.z_axis.abs() * scaled.z;

        Aabb {
            center: transform.transform_point(self.center),
            half_extents,
        }
    }
}
