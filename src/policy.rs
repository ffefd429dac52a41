//! Update policies decide, lane by lane, whether a candidate hit replaces (or, for
//! multi-hit traversal, is inserted into) the accumulated result.

use nalgebra::SimdPartialOrd;
use num_traits::Zero;

use crate::hit::Hit;
use crate::scalar::Mask;

/// Decides whether `candidate` is merged into a result whose reference hit is `reference`.
///
/// The reference is the accumulated hit for any-hit and closest-hit traversal and the
/// farthest retained slot for multi-hit traversal. Policies are stateless values.
/// Any closure `Fn(&H, &H, H::Scalar) -> Mask` is a policy as well.
pub trait UpdatePolicy<H: Hit> {
    /// Returns the lanes in which `candidate` should be merged.
    fn should_update(&self, candidate: &H, reference: &H, max_t: H::Scalar) -> Mask<H::Scalar>;

    /// Whether this policy rejects every candidate which is not closer than a hitting
    /// reference. Aggregates may then skip whatever lies beyond the reference hit.
    fn accepts_only_closer(&self) -> bool {
        false
    }
}

/// The default policy: accept hits in `(0, max_t]` which are strictly closer than the
/// reference, or any such hit while the reference is a miss.
///
/// The strict comparison keeps the first visited of several equally distant hits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IsCloser;

impl<H: Hit> UpdatePolicy<H> for IsCloser {
    #[inline(always)]
    fn should_update(&self, candidate: &H, reference: &H, max_t: H::Scalar) -> Mask<H::Scalar> {
        let t = candidate.distance();
        candidate.is_hit()
            & t.simd_gt(H::Scalar::zero())
            & t.simd_le(max_t)
            & (!reference.is_hit() | t.simd_lt(reference.distance()))
    }

    fn accepts_only_closer(&self) -> bool {
        true
    }
}

impl<H, F> UpdatePolicy<H> for F
where
    H: Hit,
    F: Fn(&H, &H, H::Scalar) -> Mask<H::Scalar>,
{
    #[inline(always)]
    fn should_update(&self, candidate: &H, reference: &H, max_t: H::Scalar) -> Mask<H::Scalar> {
        self(candidate, reference, max_t)
    }
}
