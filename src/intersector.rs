//! The ray/primitive intersection capability used by the traversal kernel.

use crate::hit::Hit;
use crate::ray::Ray;
use crate::scalar::RayScalar;

/// A primitive's own intersection routine.
pub trait Intersect<T: RayScalar> {
    /// The hit record produced by this primitive.
    type Hit: Hit<Scalar = T>;

    /// Intersects every lane of `ray` with this primitive.
    fn intersect(&self, ray: &Ray<T>) -> Self::Hit;
}

/// Computes the hit of a ray with a primitive of type `P` on behalf of the kernel.
///
/// Taking `&mut self` lets intersectors carry per-traversal state, like counters or
/// random number generators for stochastic alpha tests. Any closure
/// `FnMut(&Ray<T>, &P) -> H` is an intersector too.
///
/// # Examples
/// ```
/// use ray_traverse::hit::HitRecord;
/// use ray_traverse::intersector::Intersect;
/// use ray_traverse::query::closest_hit_with;
/// use ray_traverse::ray::Ray;
/// use ray_traverse::shapes::Sphere;
/// use nalgebra::{Point3, Vector3};
///
/// let spheres = [
///     Sphere::new(Point3::new(3.0f32, 0.0, 0.0), 0.5, 0),
///     Sphere::new(Point3::new(6.0, 0.0, 0.0), 0.5, 1),
/// ];
/// let ray = Ray::new(Point3::origin(), Vector3::x());
///
/// // Ignore sphere 0, as if it was transparent.
/// let mut skip_first = |ray: &Ray<f32>, sphere: &Sphere<f32>| {
///     if sphere.id == 0 {
///         HitRecord::new(false, 0.0, sphere.id, ())
///     } else {
///         sphere.intersect(ray)
///     }
/// };
/// let hit = closest_hit_with(&ray, &spheres, f32::MAX, &mut skip_first);
/// assert_eq!(hit.prim_id, 1);
/// ```
pub trait Intersector<T: RayScalar, P: ?Sized> {
    /// The hit record produced for `P`.
    type Hit: Hit<Scalar = T>;

    /// Intersects every lane of `ray` with `primitive`.
    fn intersect(&mut self, ray: &Ray<T>, primitive: &P) -> Self::Hit;
}

/// Delegates to the primitive's [`Intersect`] implementation.
///
/// [`Intersect`]: trait.Intersect.html
///
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultIntersector;

impl<T: RayScalar, P: Intersect<T> + ?Sized> Intersector<T, P> for DefaultIntersector {
    type Hit = P::Hit;

    #[inline(always)]
    fn intersect(&mut self, ray: &Ray<T>, primitive: &P) -> P::Hit {
        primitive.intersect(ray)
    }
}

impl<T, P, H, F> Intersector<T, P> for F
where
    T: RayScalar,
    P: ?Sized,
    H: Hit<Scalar = T>,
    F: FnMut(&Ray<T>, &P) -> H,
{
    type Hit = H;

    #[inline(always)]
    fn intersect(&mut self, ray: &Ray<T>, primitive: &P) -> H {
        self(ray, primitive)
    }
}
