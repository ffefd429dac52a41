//! Mode-aware traversal of a [`Bvh`].
//!
//! [`Bvh`]: struct.Bvh.html
//!

use nalgebra::{SimdBool, SimdPartialOrd};
use num_traits::Float;

use crate::aabb::Aabb;
use crate::bounding_hierarchy::{Aggregate, BHValue};
use crate::bvh::{Bvh, BvhNode};
use crate::hit::Hit;
use crate::intersector::Intersector;
use crate::mode::TraversalMode;
use crate::policy::UpdatePolicy;
use crate::ray::Ray;
use crate::scalar::{Mask, RayScalar};
use crate::traverse::accumulate;

/// Distance at which each lane enters `aabb`, infinite for lanes which miss it, and the
/// mask of lanes which hit it.
#[inline(always)]
fn entry_distance<T: RayScalar>(ray: &Ray<T>, aabb: &Aabb<T::Lane>) -> (T, Mask<T>) {
    let (entry, exit) = ray.intersection_slice_for_aabb(aabb);
    let reached = entry.simd_le(exit);
    let entry = entry.select(reached, T::splat_lane(<T::Lane as Float>::infinity()));
    (entry, reached)
}

/// Whether a subtree entered at `entry` may still hold a candidate the result accepts.
///
/// A lane needs the subtree when it is not finished, reaches its box and enters it within
/// `max_t`. With `closer_only` set, the reference hit (if any) must also not be closer
/// than the entry.
#[inline(always)]
fn needs_visit<M: TraversalMode, H: Hit>(
    (entry, reached): (H::Scalar, Mask<H::Scalar>),
    max_t: H::Scalar,
    result: &M::Result<H>,
    closer_only: bool,
) -> bool {
    let mut visit = !M::finished(result) & reached & entry.simd_le(max_t);
    if closer_only {
        let reference = M::reference(result);
        visit = visit & (!reference.is_hit() | entry.simd_le(reference.distance()));
    }
    H::Scalar::any_lane(visit)
}

impl<P, E, T, I> Aggregate<T, I> for Bvh<P, E>
where
    E: BHValue,
    T: RayScalar<Lane = E>,
    I: Intersector<T, P>,
{
    type Hit = I::Hit;

    /// Traverses the nodes depth first, the nearer child first, and skips every subtree
    /// which no lane needs. Stops as soon as every lane is finished.
    fn intersect<M, U>(
        &self,
        mode: M,
        ray: &Ray<T>,
        max_t: T,
        policy: &U,
        intersector: &mut I,
    ) -> M::Result<I::Hit>
    where
        M: TraversalMode,
        U: UpdatePolicy<I::Hit>,
    {
        let mut result = M::empty();
        if self.nodes().is_empty() {
            return result;
        }

        let closer_only = policy.accepts_only_closer();
        let mut stack = Vec::with_capacity(self.depth() + 2);
        stack.push((0, (T::zero(), T::all_mask())));

        while let Some((node_index, entry)) = stack.pop() {
            // The result may have improved since this node was pushed.
            if !needs_visit::<M, I::Hit>(entry, max_t, &result, closer_only) {
                continue;
            }

            match self.nodes()[node_index] {
                BvhNode::Leaf {
                    primitive_index, ..
                } => {
                    let candidate = intersector.intersect(ray, &self.primitives()[primitive_index]);
                    if accumulate(mode, &mut result, candidate, policy, max_t) {
                        return result;
                    }
                }
                BvhNode::Node {
                    child_l_index,
                    ref child_l_aabb,
                    child_r_index,
                    ref child_r_aabb,
                    ..
                } => {
                    let l_entry = entry_distance(ray, child_l_aabb);
                    let r_entry = entry_distance(ray, child_r_aabb);

                    // Most lanes reach the left child first: push it last.
                    let left_closer = l_entry.0.simd_le(r_entry.0).bitmask().count_ones();
                    let left_first = 2 * left_closer as usize >= T::LANES;
                    let (near, far) = if left_first {
                        ((child_l_index, l_entry), (child_r_index, r_entry))
                    } else {
                        ((child_r_index, r_entry), (child_l_index, l_entry))
                    };

                    if needs_visit::<M, I::Hit>(far.1, max_t, &result, closer_only) {
                        stack.push(far);
                    }
                    if needs_visit::<M, I::Hit>(near.1, max_t, &result, closer_only) {
                        stack.push(near);
                    }
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::bvh::Bvh;
    use crate::hit::HitRecord;
    use crate::query::{
        any_hit, any_hit_with, closest_hit, closest_hit_with, closest_hit_within, multi_hit,
    };
    use crate::shapes::Sphere;
    use crate::testbase::{
        five_two_eight, generate_aligned_spheres, sphere_at_distance, x_axis_ray, TPoint3, TRay3,
        TVector3,
    };

    #[test]
    fn closest_hit_through_bvh() {
        let bvh = Bvh::build(generate_aligned_spheres());
        let ray = TRay3::new(TPoint3::new(-20.0, 0.0, 0.0), TVector3::new(1.0, 0.0, 0.0));
        let hit = closest_hit(&ray, &[bvh]);
        assert!(hit.hit);
        assert_eq!(hit.prim_id, 0);
    }

    #[test]
    fn empty_bvh_misses() {
        let bvh: Bvh<Sphere<f32>> = Bvh::build(Vec::new());
        assert!(!closest_hit(&x_axis_ray(), &[bvh]).hit);
    }

    #[test]
    fn max_distance_prunes_subtrees() {
        let spheres: Vec<_> = (1..=100).map(|d| sphere_at_distance(d as f32, d)).collect();
        let bvh = Bvh::build(spheres);

        let mut visited = 0;
        let mut counting = |ray: &TRay3, sphere: &Sphere<f32>| -> HitRecord<f32> {
            visited += 1;
            crate::intersector::Intersect::intersect(sphere, ray)
        };
        let hit = any_hit_with(&x_axis_ray(), &[bvh], 10.5, &mut counting);
        assert!(hit.hit);
        assert!(hit.t <= 10.5);
        assert!(visited < 100);
    }

    #[test]
    fn infinite_max_distance_still_culls_missed_boxes() {
        let row: Vec<_> = (0..200u32)
            .map(|i| Sphere::new(TPoint3::new(i as f32, 10.0, 0.0), 0.5, i))
            .collect();
        let bvh = [Bvh::build(row)];

        let mut visited = 0;
        let mut counting = |ray: &TRay3, sphere: &Sphere<f32>| -> HitRecord<f32> {
            visited += 1;
            crate::intersector::Intersect::intersect(sphere, ray)
        };
        let hit = closest_hit_with(&x_axis_ray(), &bvh, f32::INFINITY, &mut counting);
        assert!(!hit.hit);
        assert_eq!(visited, 0);

        // A ray along the row hits the first sphere without testing every one.
        let along = TRay3::new(TPoint3::new(-5.0, 10.0, 0.0), TVector3::x());
        let mut visited = 0;
        let mut counting = |ray: &TRay3, sphere: &Sphere<f32>| -> HitRecord<f32> {
            visited += 1;
            crate::intersector::Intersect::intersect(sphere, ray)
        };
        let hit = closest_hit_with(&along, &bvh, f32::INFINITY, &mut counting);
        assert_eq!(hit.prim_id, 0);
        assert!(visited < 200);
    }

    #[test]
    fn ties_agree_on_distance_with_linear_traversal() {
        // Two spheres on either side of the ray at the same distance.
        let spheres = vec![
            Sphere::new(TPoint3::new(3.0, 0.4, 0.0), 0.5, 0),
            Sphere::new(TPoint3::new(3.0, -0.4, 0.0), 0.5, 1),
        ];
        let linear = closest_hit(&x_axis_ray(), &spheres);
        let through_bvh = closest_hit(&x_axis_ray(), &[Bvh::build(spheres)]);
        assert_eq!(linear.prim_id, 0);
        assert_eq!(through_bvh.t, linear.t);
        assert!(through_bvh.prim_id == 0 || through_bvh.prim_id == 1);
    }

    #[test]
    fn closest_hit_respects_max_distance() {
        let bvh = [Bvh::build(five_two_eight())];
        assert_eq!(closest_hit_within(&x_axis_ray(), &bvh, 3.0).t, 2.0);
        assert!(!closest_hit_within(&x_axis_ray(), &bvh, 1.0).hit);
        assert!(any_hit(&x_axis_ray(), &bvh).hit);
        let hits = multi_hit::<2, _, _>(&x_axis_ray(), &bvh);
        assert_eq!([hits.hits[0].t, hits.hits[1].t], [2.0, 5.0]);
    }

    #[cfg(feature = "simd")]
    #[test]
    fn packet_lanes_match_single_rays() {
        use simba::simd::WideF32x4;

        use crate::ray::Ray;

        let bvh = [Bvh::build(generate_aligned_spheres())];
        let rays = [
            TRay3::new(TPoint3::new(-20.0, 0.0, 0.0), TVector3::new(1.0, 0.0, 0.0)),
            TRay3::new(TPoint3::new(20.0, 0.0, 0.0), TVector3::new(-1.0, 0.0, 0.0)),
            TRay3::new(TPoint3::new(3.0, 10.0, 0.0), TVector3::new(0.0, -1.0, 0.0)),
            TRay3::new(TPoint3::new(0.0, 10.0, 0.0), TVector3::new(0.0, 1.0, 0.0)),
        ];
        let packet = Ray::<WideF32x4>::from_lanes(&rays).unwrap();
        let packet_hit = closest_hit(&packet, &bvh);
        for (i, ray) in rays.iter().enumerate() {
            let single = closest_hit(ray, &bvh);
            let lane = packet_hit.lane(i);
            assert_eq!(lane.hit, single.hit);
            assert_eq!(lane.prim_id, single.prim_id);
        }
        assert_eq!(packet_hit.lane(0).prim_id, 0);
        assert_eq!(packet_hit.lane(1).prim_id, 15);
        assert!(!packet_hit.lane(3).hit);
    }
}
