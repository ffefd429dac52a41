//! This module defines a Ray structure and the slab test against axis aligned bounding boxes.

use nalgebra::{Point3, Vector3};
use num_traits::Float;

use crate::aabb::Aabb;
use crate::scalar::{Mask, RayScalar};

/// A struct which defines a ray and some of its cached values.
///
/// `T` is either a plain float, making this a single ray, or a SIMD scalar, making this
/// a packet of rays with one ray per lane.
#[derive(Debug, Clone, Copy)]
pub struct Ray<T: RayScalar> {
    /// The ray origin.
    pub origin: Point3<T>,

    /// The ray direction.
    pub direction: Vector3<T>,

    /// Inverse (1/x) ray direction. Cached for use in [`Aabb`] intersections.
    ///
    /// [`Aabb`]: ../aabb/struct.Aabb.html
    ///
    pub inv_direction: Vector3<T>,
}

/// Takes `replacement` in the lanes where `x` is NaN.
#[inline(always)]
fn or_if_nan<T: RayScalar>(x: T, replacement: T) -> T {
    x.select(x.simd_eq(x), replacement)
}

impl<T: RayScalar> Ray<T> {
    /// Creates a new [`Ray`] from an `origin` and a `direction`.
    /// `direction` will be normalized.
    ///
    /// # Examples
    /// ```
    /// use ray_traverse::ray::Ray;
    /// use nalgebra::{Point3,Vector3};
    ///
    /// let origin = Point3::new(0.0,0.0,0.0);
    /// let direction = Vector3::new(1.0,0.0,0.0);
    /// let ray = Ray::new(origin, direction);
    ///
    /// assert_eq!(ray.origin, origin);
    /// assert_eq!(ray.direction, direction);
    /// ```
    ///
    /// [`Ray`]: struct.Ray.html
    ///
    pub fn new(origin: Point3<T>, direction: Vector3<T>) -> Ray<T> {
        let direction = direction.normalize();
        Ray {
            origin,
            direction,
            inv_direction: direction.map(|x| T::one() / x),
        }
    }

    /// Returns the point at distance `t` along the ray.
    pub fn point_at(&self, t: T) -> Point3<T> {
        self.origin + self.direction * t
    }

    /// Intersects the [`Aabb`] with every lane of this [`Ray`] using the slab method.
    ///
    /// Returns the entry and the exit distance per lane. The entry distance is clamped
    /// to zero, a lane misses the box exactly when its entry is past its exit.
    ///
    /// # Examples
    /// ```
    /// use ray_traverse::aabb::Aabb;
    /// use ray_traverse::ray::Ray;
    /// use nalgebra::{Point3,Vector3};
    ///
    /// let ray = Ray::new(Point3::new(0.0f32, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    /// let aabb = Aabb::with_bounds(Point3::new(2.0, -1.0, -1.0), Point3::new(4.0, 1.0, 1.0));
    ///
    /// assert_eq!(ray.intersection_slice_for_aabb(&aabb), (2.0, 4.0));
    /// ```
    ///
    /// [`Aabb`]: ../aabb/struct.Aabb.html
    /// [`Ray`]: struct.Ray.html
    ///
    pub fn intersection_slice_for_aabb(&self, aabb: &Aabb<T::Lane>) -> (T, T) {
        let infinity = T::splat_lane(<T::Lane as Float>::infinity());
        let neg_infinity = T::splat_lane(<T::Lane as Float>::neg_infinity());

        // NaN where the origin lies on a slab plane the ray runs parallel to.
        // Such a slab does not restrict the ray at all.
        let to_min = (aabb.min.map(T::splat_lane) - self.origin).component_mul(&self.inv_direction);
        let to_max = (aabb.max.map(T::splat_lane) - self.origin).component_mul(&self.inv_direction);

        let near = to_min.zip_map(&to_max, |a, b| {
            or_if_nan(a, neg_infinity).simd_min(or_if_nan(b, neg_infinity))
        });
        let far = to_min.zip_map(&to_max, |a, b| {
            or_if_nan(a, infinity).simd_max(or_if_nan(b, infinity))
        });

        let entry = near.x.simd_max(near.y).simd_max(near.z).simd_max(T::zero());
        let exit = far.x.simd_min(far.y).simd_min(far.z);
        (entry, exit)
    }

    /// Tests the intersection of every lane of this [`Ray`] with an [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use ray_traverse::aabb::Aabb;
    /// use ray_traverse::ray::Ray;
    /// use nalgebra::{Point3,Vector3};
    ///
    /// let origin = Point3::new(0.0f32,0.0,0.0);
    /// let direction = Vector3::new(1.0,0.0,0.0);
    /// let ray = Ray::new(origin, direction);
    ///
    /// let point1 = Point3::new(99.9,-1.0,-1.0);
    /// let point2 = Point3::new(100.1,1.0,1.0);
    /// let aabb = Aabb::with_bounds(point1, point2);
    ///
    /// assert!(ray.intersects_aabb(&aabb));
    /// ```
    ///
    /// [`Ray`]: struct.Ray.html
    /// [`Aabb`]: ../aabb/struct.Aabb.html
    ///
    pub fn intersects_aabb(&self, aabb: &Aabb<T::Lane>) -> Mask<T> {
        let (entry, exit) = self.intersection_slice_for_aabb(aabb);
        entry.simd_le(exit)
    }
}
