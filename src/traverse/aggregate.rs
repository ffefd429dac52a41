use log::trace;

use super::accumulate;
use crate::bounding_hierarchy::Aggregate;
use crate::mode::TraversalMode;
use crate::policy::UpdatePolicy;
use crate::ray::Ray;
use crate::scalar::RayScalar;

/// Lets every aggregate run its own traversal and merges all hits it reports.
pub(super) fn traverse_aggregates<T, P, I, M, U>(
    mode: M,
    policy: &U,
    ray: &Ray<T>,
    aggregates: &[P],
    max_t: T,
    intersector: &mut I,
) -> M::Result<P::Hit>
where
    T: RayScalar,
    P: Aggregate<T, I>,
    M: TraversalMode,
    U: UpdatePolicy<P::Hit>,
{
    let mut result = M::empty();
    for (index, aggregate) in aggregates.iter().enumerate() {
        let partial = aggregate.intersect(mode, ray, max_t, policy, intersector);

        let mut finished = false;
        for candidate in M::candidates(&partial) {
            finished = accumulate(mode, &mut result, *candidate, policy, max_t);
        }

        if finished {
            trace!(
                "{} traversal finished after {} of {} aggregates",
                M::NAME,
                index + 1,
                aggregates.len()
            );
            return result;
        }
    }
    result
}
