//! This module defines a Triangle and its intersection algorithm

use nalgebra::Point3;
use num_traits::Float;

use crate::aabb::{Aabb, Bounded};
use crate::bounding_hierarchy::BHValue;
use crate::hit::{Barycentric, HitRecord};
use crate::intersector::Intersect;
use crate::ray::Ray;
use crate::scalar::RayScalar;
use crate::traverse::{Leaf, Primitive};

/// A triangle struct. Instance of a more complex `Bounded` primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle<T: BHValue> {
    /// First point on the triangle
    pub a: Point3<T>,
    /// Second point on the triangle
    pub b: Point3<T>,
    /// Third point on the triangle
    pub c: Point3<T>,
    /// Identifier reported in hit records
    pub id: u32,
}

impl<T: BHValue> Triangle<T> {
    /// Creates a new triangle given a counter clockwise set of points
    pub fn new(a: Point3<T>, b: Point3<T>, c: Point3<T>, id: u32) -> Triangle<T> {
        Triangle { a, b, c, id }
    }
}

impl<T: BHValue> Bounded<T> for Triangle<T> {
    fn aabb(&self) -> Aabb<T> {
        Aabb::empty().grow(&self.a).grow(&self.b).grow(&self.c)
    }
}

impl<T: BHValue> Primitive for Triangle<T> {
    type Kind = Leaf;
}

impl<E: BHValue, T: RayScalar<Lane = E>> Intersect<T> for Triangle<E> {
    type Hit = HitRecord<T, Barycentric<T>>;

    /// Implementation of the
    /// [Möller-Trumbore triangle/ray intersection algorithm](https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm).
    /// Both faces are hit, the barycentric coordinates are reported as surface data.
    #[allow(clippy::many_single_char_names)]
    fn intersect(&self, ray: &Ray<T>) -> HitRecord<T, Barycentric<T>> {
        let a = self.a.map(T::splat_lane);
        let a_to_b = self.b.map(T::splat_lane) - a;
        let a_to_c = self.c.map(T::splat_lane) - a;
        let epsilon = T::splat_lane(<E as Float>::epsilon());

        // A determinant near zero means the ray lies in the plane of the triangle.
        let u_vec = ray.direction.cross(&a_to_c);
        let det = a_to_b.dot(&u_vec);
        let front_or_back = det.simd_abs().simd_ge(epsilon);
        let inv_det = T::one() / det;

        let a_to_origin = ray.origin - a;
        let u = a_to_origin.dot(&u_vec) * inv_det;

        let v_vec = a_to_origin.cross(&a_to_b);
        let v = ray.direction.dot(&v_vec) * inv_det;

        let t = a_to_c.dot(&v_vec) * inv_det;

        let hit = front_or_back
            & u.simd_ge(T::zero())
            & v.simd_ge(T::zero())
            & (u + v).simd_le(T::one())
            & t.simd_gt(epsilon);
        HitRecord::new(hit, t, self.id, Barycentric { u, v })
    }
}
