//! Parallel traversal of many rays over the same primitives.
//!
//! Every ray (or ray packet) is traced independently on the rayon thread pool. Results
//! come back in the order of the rays.

use log::debug;
use rayon::prelude::*;

use crate::intersector::DefaultIntersector;
use crate::mode::{AnyHit, ClosestHit, TraversalMode};
use crate::policy::{IsCloser, UpdatePolicy};
use crate::ray::Ray;
use crate::scalar::RayScalar;
use crate::traverse::{traverse, Dispatch, HitOf, Primitive};

/// Runs [`traverse`] for each of `rays` in parallel.
///
/// Each worker traces with its own clone of `intersector`, so state kept by the
/// intersector is per worker and never shared.
///
/// # Examples
/// ```
/// use ray_traverse::batch::par_traverse;
/// use ray_traverse::intersector::DefaultIntersector;
/// use ray_traverse::mode::MultiHit;
/// use ray_traverse::policy::IsCloser;
/// use ray_traverse::ray::Ray;
/// use ray_traverse::shapes::Sphere;
/// use nalgebra::{Point3, Vector3};
///
/// let spheres: Vec<_> = (0..4u32)
///     .map(|i| Sphere::new(Point3::new(0.0f32, 0.0, 3.0 * (i + 1) as f32), 1.0, i))
///     .collect();
/// let rays: Vec<_> = (0..64)
///     .map(|i| Ray::new(Point3::new(0.0, 0.0, -(i as f32)), Vector3::z()))
///     .collect();
///
/// let results = par_traverse(MultiHit::<2>, &IsCloser, &rays, &spheres, f32::MAX, &DefaultIntersector);
/// assert_eq!(results.len(), 64);
/// assert!(results.iter().all(|hits| hits.hits[0].prim_id == 0 && hits.hits[1].prim_id == 1));
/// ```
///
/// [`traverse`]: ../traverse/fn.traverse.html
///
pub fn par_traverse<T, P, I, M, U>(
    mode: M,
    policy: &U,
    rays: &[Ray<T>],
    primitives: &[P],
    max_t: T,
    intersector: &I,
) -> Vec<M::Result<HitOf<T, P, I>>>
where
    T: RayScalar + Send + Sync,
    P: Primitive + Sync,
    P::Kind: Dispatch<T, P, I>,
    I: Clone + Send,
    M: TraversalMode,
    U: UpdatePolicy<HitOf<T, P, I>> + Sync,
    M::Result<HitOf<T, P, I>>: Send,
{
    debug!(
        "{} traversal of {} rays ({} lanes each) over {} primitives",
        M::NAME,
        rays.len(),
        T::LANES,
        primitives.len()
    );
    rays.par_iter()
        .map_with(intersector.clone(), |intersector, ray| {
            traverse(mode, policy, ray, primitives, max_t, intersector)
        })
        .collect()
}

/// [`any_hit`] for each of `rays`, in parallel.
///
/// [`any_hit`]: ../query/fn.any_hit.html
///
pub fn par_any_hit<T, P>(rays: &[Ray<T>], primitives: &[P]) -> Vec<HitOf<T, P, DefaultIntersector>>
where
    T: RayScalar + Send + Sync,
    P: Primitive + Sync,
    P::Kind: Dispatch<T, P, DefaultIntersector>,
    HitOf<T, P, DefaultIntersector>: Send,
{
    par_traverse(
        AnyHit,
        &IsCloser,
        rays,
        primitives,
        T::max_distance(),
        &DefaultIntersector,
    )
}

/// [`closest_hit`] for each of `rays`, in parallel.
///
/// [`closest_hit`]: ../query/fn.closest_hit.html
///
pub fn par_closest_hit<T, P>(
    rays: &[Ray<T>],
    primitives: &[P],
) -> Vec<HitOf<T, P, DefaultIntersector>>
where
    T: RayScalar + Send + Sync,
    P: Primitive + Sync,
    P::Kind: Dispatch<T, P, DefaultIntersector>,
    HitOf<T, P, DefaultIntersector>: Send,
{
    par_traverse(
        ClosestHit,
        &IsCloser,
        rays,
        primitives,
        T::max_distance(),
        &DefaultIntersector,
    )
}

#[cfg(test)]
mod tests {
    use super::{par_any_hit, par_closest_hit, par_traverse};
    use crate::bvh::Bvh;
    use crate::hit::{Hit, HitRecord};
    use crate::intersector::Intersect;
    use crate::mode::MultiHit;
    use crate::policy::IsCloser;
    use crate::query::{any_hit, closest_hit, multi_hit_with};
    use crate::shapes::Sphere;
    use crate::testbase::{random_rays, random_sphere_soup, TRay3};

    #[test]
    fn results_follow_ray_order() {
        let spheres = random_sphere_soup(21, 80);
        let bvh = [Bvh::build(spheres.clone())];
        let rays = random_rays(22, 200);

        let closest = par_closest_hit(&rays, &bvh);
        let any = par_any_hit(&rays, &spheres);
        assert_eq!(closest.len(), rays.len());
        for (i, ray) in rays.iter().enumerate() {
            assert_eq!(closest[i].lane(0), closest_hit(ray, &spheres).lane(0));
            assert_eq!(any[i].hit, any_hit(ray, &spheres).hit);
        }
    }

    #[test]
    fn workers_use_the_given_intersector() {
        let spheres = random_sphere_soup(23, 40);
        let rays = random_rays(24, 64);
        let only_even = |ray: &TRay3, sphere: &Sphere<f32>| {
            if sphere.id % 2 == 0 {
                sphere.intersect(ray)
            } else {
                HitRecord::<f32>::miss()
            }
        };

        let results = par_traverse(
            MultiHit::<3>,
            &IsCloser,
            &rays,
            &spheres,
            f32::MAX,
            &only_even,
        );
        for (ray, hits) in rays.iter().zip(&results) {
            let expected = multi_hit_with::<3, _, _, _>(ray, &spheres, f32::MAX, &mut only_even.clone());
            for (hit, expected) in hits.iter().zip(expected.iter()) {
                assert_eq!(hit.lane(0), expected.lane(0));
                assert!(!hit.hit || hit.prim_id % 2 == 0);
            }
        }
    }

    #[test]
    fn no_rays_no_results() {
        let spheres = random_sphere_soup(25, 4);
        assert!(par_closest_hit::<f32, _>(&[], &spheres).is_empty());
    }
}
