//! Traversal modes.
//!
//! A mode is a zero sized type which fixes, at compile time, the shape of the result
//! ([`TraversalMode::Result`]), how accepted candidates are merged into it, and when a
//! lane has seen enough to stop (the exit policy).
//!
//! | mode             | result                    | merge               | lane finished   |
//! |------------------|---------------------------|---------------------|-----------------|
//! | [`AnyHit`]       | `H`                       | replace             | once it hit     |
//! | [`ClosestHit`]   | `H`                       | replace             | never           |
//! | [`MultiHit<N>`]  | [`MultiHitRecord<H, N>`]  | sorted insertion    | never           |
//!
//! [`TraversalMode::Result`]: trait.TraversalMode.html#associatedtype.Result
//! [`AnyHit`]: struct.AnyHit.html
//! [`ClosestHit`]: struct.ClosestHit.html
//! [`MultiHit<N>`]: struct.MultiHit.html
//! [`MultiHitRecord<H, N>`]: ../hit/struct.MultiHitRecord.html

use core::fmt::Debug;

use crate::hit::{Hit, MultiHitRecord};
use crate::scalar::{Mask, RayScalar};

/// Capacity of [`MultiHit`] when none is given.
///
/// [`MultiHit`]: struct.MultiHit.html
///
pub const DEFAULT_MULTI_HIT_CAPACITY: usize = 16;

/// Compile-time description of a traversal semantic.
pub trait TraversalMode: Copy + Default + Debug + Send + Sync + 'static {
    /// The accumulated result for single-candidate hit type `H`.
    type Result<H: Hit>;

    /// Name used in log messages.
    const NAME: &'static str;

    /// The result before any candidate was merged.
    fn empty<H: Hit>() -> Self::Result<H>;

    /// The hit candidates are compared against by the update policy.
    fn reference<H: Hit>(result: &Self::Result<H>) -> H;

    /// Merges `candidate` into `result` in the lanes of `accept`.
    fn merge<H: Hit>(result: &mut Self::Result<H>, candidate: H, accept: Mask<H::Scalar>);

    /// Exit policy: lanes which need no further candidates.
    fn finished<H: Hit>(result: &Self::Result<H>) -> Mask<H::Scalar>;

    /// Every hit held by `result`, in order.
    fn candidates<H: Hit>(result: &Self::Result<H>) -> &[H];
}

/// Stop at the first accepted hit. Which hit is reported is unspecified.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnyHit;

/// Report the closest accepted hit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClosestHit;

/// Report up to `N` closest accepted hits, in ascending order of distance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MultiHit<const N: usize = DEFAULT_MULTI_HIT_CAPACITY>;

impl TraversalMode for AnyHit {
    type Result<H: Hit> = H;

    const NAME: &'static str = "any-hit";

    #[inline(always)]
    fn empty<H: Hit>() -> H {
        H::miss()
    }

    #[inline(always)]
    fn reference<H: Hit>(result: &H) -> H {
        *result
    }

    #[inline(always)]
    fn merge<H: Hit>(result: &mut H, candidate: H, accept: Mask<H::Scalar>) {
        *result = candidate.blend(accept, *result);
    }

    #[inline(always)]
    fn finished<H: Hit>(result: &H) -> Mask<H::Scalar> {
        result.is_hit()
    }

    #[inline(always)]
    fn candidates<H: Hit>(result: &H) -> &[H] {
        core::slice::from_ref(result)
    }
}

impl TraversalMode for ClosestHit {
    type Result<H: Hit> = H;

    const NAME: &'static str = "closest-hit";

    #[inline(always)]
    fn empty<H: Hit>() -> H {
        H::miss()
    }

    #[inline(always)]
    fn reference<H: Hit>(result: &H) -> H {
        *result
    }

    #[inline(always)]
    fn merge<H: Hit>(result: &mut H, candidate: H, accept: Mask<H::Scalar>) {
        *result = candidate.blend(accept, *result);
    }

    #[inline(always)]
    fn finished<H: Hit>(_result: &H) -> Mask<H::Scalar> {
        H::Scalar::none_mask()
    }

    #[inline(always)]
    fn candidates<H: Hit>(result: &H) -> &[H] {
        core::slice::from_ref(result)
    }
}

impl<const N: usize> TraversalMode for MultiHit<N> {
    type Result<H: Hit> = MultiHitRecord<H, N>;

    const NAME: &'static str = "multi-hit";

    #[inline(always)]
    fn empty<H: Hit>() -> MultiHitRecord<H, N> {
        MultiHitRecord::empty()
    }

    #[inline(always)]
    fn reference<H: Hit>(result: &MultiHitRecord<H, N>) -> H {
        result.worst()
    }

    #[inline(always)]
    fn merge<H: Hit>(result: &mut MultiHitRecord<H, N>, candidate: H, accept: Mask<H::Scalar>) {
        result.insert(candidate, accept);
    }

    // A full buffer still admits closer hits, so no lane is ever done early.
    #[inline(always)]
    fn finished<H: Hit>(_result: &MultiHitRecord<H, N>) -> Mask<H::Scalar> {
        H::Scalar::none_mask()
    }

    #[inline(always)]
    fn candidates<H: Hit>(result: &MultiHitRecord<H, N>) -> &[H] {
        &result.hits
    }
}
