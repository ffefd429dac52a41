//! Entry points which fix the traversal mode and fill in defaults.
//!
//! Every family comes in three forms:
//!
//! - `*(ray, primitives)` uses the [`DefaultIntersector`] and accepts hits up to
//!   [`RayScalar::max_distance`].
//! - `*_within(ray, primitives, max_t)` bounds the accepted distance.
//! - `*_with(ray, primitives, max_t, intersector)` also takes a custom intersector.
//!
//! All of them use the [`IsCloser`] update policy; call [`traverse`] directly for any
//! other policy.
//!
//! [`DefaultIntersector`]: ../intersector/struct.DefaultIntersector.html
//! [`RayScalar::max_distance`]: ../scalar/trait.RayScalar.html#tymethod.max_distance
//! [`IsCloser`]: ../policy/struct.IsCloser.html
//! [`traverse`]: ../traverse/fn.traverse.html

use crate::hit::MultiHitRecord;
use crate::intersector::DefaultIntersector;
use crate::mode::{AnyHit, ClosestHit, MultiHit};
use crate::policy::IsCloser;
use crate::ray::Ray;
use crate::scalar::RayScalar;
use crate::traverse::{traverse, Dispatch, HitOf, Primitive};

/// Finds whether `ray` hits any of `primitives`, stopping at the first accepted hit.
pub fn any_hit<T, P>(ray: &Ray<T>, primitives: &[P]) -> HitOf<T, P, DefaultIntersector>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, DefaultIntersector>,
{
    any_hit_within(ray, primitives, T::max_distance())
}

/// [`any_hit`] accepting only hits up to `max_t`.
///
/// [`any_hit`]: fn.any_hit.html
///
pub fn any_hit_within<T, P>(
    ray: &Ray<T>,
    primitives: &[P],
    max_t: T,
) -> HitOf<T, P, DefaultIntersector>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, DefaultIntersector>,
{
    any_hit_with(ray, primitives, max_t, &mut DefaultIntersector)
}

/// [`any_hit`] with a custom intersector.
///
/// [`any_hit`]: fn.any_hit.html
///
pub fn any_hit_with<T, P, I>(
    ray: &Ray<T>,
    primitives: &[P],
    max_t: T,
    intersector: &mut I,
) -> HitOf<T, P, I>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, I>,
{
    traverse(AnyHit, &IsCloser, ray, primitives, max_t, intersector)
}

/// Finds the closest hit of `ray` with `primitives`.
///
/// # Examples
/// ```
/// use ray_traverse::query::closest_hit;
/// use ray_traverse::ray::Ray;
/// use ray_traverse::shapes::Sphere;
/// use nalgebra::{Point3, Vector3};
///
/// let spheres = [
///     Sphere::new(Point3::new(0.0f32, 0.0, 5.0), 1.0, 0),
///     Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0, 1),
/// ];
/// let ray = Ray::<f32>::new(Point3::origin(), -Vector3::z());
/// let hit = closest_hit(&ray, &spheres);
///
/// assert!(hit.hit);
/// assert_eq!(hit.prim_id, 1);
/// assert_eq!(hit.t, 4.0);
/// ```
pub fn closest_hit<T, P>(ray: &Ray<T>, primitives: &[P]) -> HitOf<T, P, DefaultIntersector>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, DefaultIntersector>,
{
    closest_hit_within(ray, primitives, T::max_distance())
}

/// [`closest_hit`] accepting only hits up to `max_t`.
///
/// [`closest_hit`]: fn.closest_hit.html
///
pub fn closest_hit_within<T, P>(
    ray: &Ray<T>,
    primitives: &[P],
    max_t: T,
) -> HitOf<T, P, DefaultIntersector>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, DefaultIntersector>,
{
    closest_hit_with(ray, primitives, max_t, &mut DefaultIntersector)
}

/// [`closest_hit`] with a custom intersector.
///
/// [`closest_hit`]: fn.closest_hit.html
///
pub fn closest_hit_with<T, P, I>(
    ray: &Ray<T>,
    primitives: &[P],
    max_t: T,
    intersector: &mut I,
) -> HitOf<T, P, I>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, I>,
{
    traverse(ClosestHit, &IsCloser, ray, primitives, max_t, intersector)
}

/// Finds the `N` closest hits of `ray` with `primitives`, closest first.
///
/// # Examples
/// ```
/// use ray_traverse::query::multi_hit;
/// use ray_traverse::ray::Ray;
/// use ray_traverse::shapes::Sphere;
/// use nalgebra::{Point3, Vector3};
///
/// let spheres: Vec<_> = [5.0f32, 2.0, 8.0]
///     .iter()
///     .enumerate()
///     .map(|(id, d)| Sphere::new(Point3::new(d + 0.5, 0.0, 0.0), 0.5, id as u32))
///     .collect();
/// let ray = Ray::new(Point3::origin(), Vector3::x());
///
/// let hits = multi_hit::<2, _, _>(&ray, &spheres);
/// let distances: Vec<f32> = hits.iter().map(|hit| hit.t).collect();
/// assert_eq!(distances, [2.0, 5.0]);
/// ```
pub fn multi_hit<const N: usize, T, P>(
    ray: &Ray<T>,
    primitives: &[P],
) -> MultiHitRecord<HitOf<T, P, DefaultIntersector>, N>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, DefaultIntersector>,
{
    multi_hit_within(ray, primitives, T::max_distance())
}

/// [`multi_hit`] accepting only hits up to `max_t`.
///
/// [`multi_hit`]: fn.multi_hit.html
///
pub fn multi_hit_within<const N: usize, T, P>(
    ray: &Ray<T>,
    primitives: &[P],
    max_t: T,
) -> MultiHitRecord<HitOf<T, P, DefaultIntersector>, N>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, DefaultIntersector>,
{
    multi_hit_with(ray, primitives, max_t, &mut DefaultIntersector)
}

/// [`multi_hit`] with a custom intersector.
///
/// [`multi_hit`]: fn.multi_hit.html
///
pub fn multi_hit_with<const N: usize, T, P, I>(
    ray: &Ray<T>,
    primitives: &[P],
    max_t: T,
    intersector: &mut I,
) -> MultiHitRecord<HitOf<T, P, I>, N>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, I>,
{
    traverse(MultiHit::<N>, &IsCloser, ray, primitives, max_t, intersector)
}
