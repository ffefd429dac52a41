use log::trace;

use super::accumulate;
use crate::intersector::Intersector;
use crate::mode::TraversalMode;
use crate::policy::UpdatePolicy;
use crate::ray::Ray;
use crate::scalar::RayScalar;

/// Intersects every primitive in order and merges the candidates one by one.
pub(super) fn traverse_linear<T, P, I, M, U>(
    mode: M,
    policy: &U,
    ray: &Ray<T>,
    primitives: &[P],
    max_t: T,
    intersector: &mut I,
) -> M::Result<I::Hit>
where
    T: RayScalar,
    I: Intersector<T, P>,
    M: TraversalMode,
    U: UpdatePolicy<I::Hit>,
{
    let mut result = M::empty();
    for (index, primitive) in primitives.iter().enumerate() {
        let candidate = intersector.intersect(ray, primitive);
        if accumulate(mode, &mut result, candidate, policy, max_t) {
            trace!(
                "{} traversal finished after {} of {} primitives",
                M::NAME,
                index + 1,
                primitives.len()
            );
            return result;
        }
    }
    result
}
