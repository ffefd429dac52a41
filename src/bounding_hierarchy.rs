//! This module defines the [`Aggregate`] trait, implemented by acceleration structures
//! which run their own mode-aware traversal, and the [`BHValue`] bound for their
//! bounding box coordinates.

use core::fmt::Debug;

use nalgebra::{ClosedAddAssign, ClosedDivAssign, ClosedMulAssign, ClosedSubAssign, Scalar};
use num_traits::{Float, FromPrimitive};

use crate::hit::Hit;
use crate::mode::TraversalMode;
use crate::policy::UpdatePolicy;
use crate::ray::Ray;
use crate::scalar::RayScalar;

/// Coordinate type of bounding boxes and hierarchy construction.
pub trait BHValue:
    Scalar
    + Copy
    + Debug
    + Float
    + FromPrimitive
    + ClosedAddAssign
    + ClosedSubAssign
    + ClosedMulAssign
    + ClosedDivAssign
    + Send
    + Sync
{
}

impl<T> BHValue for T where
    T: Scalar
        + Copy
        + Debug
        + Float
        + FromPrimitive
        + ClosedAddAssign
        + ClosedSubAssign
        + ClosedMulAssign
        + ClosedDivAssign
        + Send
        + Sync
{
}

/// An acceleration structure over leaf primitives which performs its own internal
/// traversal. Ranges of aggregates are traversed by the aggregate variant of
/// [`traverse`].
///
/// Implementors visit their leaves through the intersector `I`, feed every candidate
/// through [`accumulate`] (or apply the same policy, merge and exit discipline by hand)
/// and may skip any part of the structure that provably holds no accepted candidate.
///
/// [`traverse`]: ../traverse/fn.traverse.html
/// [`accumulate`]: ../traverse/fn.accumulate.html
///
pub trait Aggregate<T: RayScalar, I> {
    /// The single-candidate hit record produced for the leaves.
    type Hit: Hit<Scalar = T>;

    /// Traverses the aggregate with `ray` in mode `M`.
    /// Returns a result already merged according to `policy` and bounded by `max_t`.
    fn intersect<M, U>(
        &self,
        mode: M,
        ray: &Ray<T>,
        max_t: T,
        policy: &U,
        intersector: &mut I,
    ) -> M::Result<Self::Hit>
    where
        M: TraversalMode,
        U: UpdatePolicy<Self::Hit>;
}
