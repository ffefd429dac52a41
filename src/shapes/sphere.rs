//! This module defines a Sphere and its intersection algorithm

use nalgebra::{Point3, Vector3};

use crate::aabb::{Aabb, Bounded};
use crate::bounding_hierarchy::BHValue;
use crate::hit::HitRecord;
use crate::intersector::Intersect;
use crate::ray::Ray;
use crate::scalar::RayScalar;
use crate::traverse::{Leaf, Primitive};

/// A representation of a Sphere
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere<T: BHValue> {
    /// Center of the sphere
    pub center: Point3<T>,
    /// Radius of the sphere
    pub radius: T,
    /// Identifier reported in hit records
    pub id: u32,
}

impl<T: BHValue> Sphere<T> {
    /// Creates a sphere centered on a given point with a radius
    pub fn new(center: Point3<T>, radius: T, id: u32) -> Sphere<T> {
        Sphere { center, radius, id }
    }
}

impl<T: BHValue> Bounded<T> for Sphere<T> {
    fn aabb(&self) -> Aabb<T> {
        let half_size = Vector3::new(self.radius, self.radius, self.radius);
        Aabb::with_bounds(self.center - half_size, self.center + half_size)
    }
}

impl<T: BHValue> Primitive for Sphere<T> {
    type Kind = Leaf;
}

impl<E: BHValue, T: RayScalar<Lane = E>> Intersect<T> for Sphere<E> {
    type Hit = HitRecord<T>;

    /// Reports the nearest intersection in front of the ray origin, which is the far one
    /// when the origin lies inside the sphere.
    fn intersect(&self, ray: &Ray<T>) -> HitRecord<T> {
        let center = self.center.map(T::splat_lane);
        let radius = T::splat_lane(self.radius);

        // The direction is normalized, so the quadratic's leading coefficient is one.
        let oc = ray.origin - center;
        let half_b = oc.dot(&ray.direction);
        let c = oc.dot(&oc) - radius * radius;
        let discriminant = half_b * half_b - c;

        let sqrtd = discriminant.simd_max(T::zero()).simd_sqrt();
        let near = -half_b - sqrtd;
        let far = -half_b + sqrtd;
        let t = near.select(near.simd_gt(T::zero()), far);

        let hit = discriminant.simd_ge(T::zero()) & t.simd_gt(T::zero());
        HitRecord::new(hit, t, self.id, ())
    }
}
