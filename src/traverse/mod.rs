//! The traversal kernel.
//!
//! [`traverse`] runs one ray (or ray packet) over a slice of primitives in a given
//! [`TraversalMode`]. Which variant runs is decided at compile time by the primitive type:
//!
//! - [`Leaf`] primitives are handed to the intersector one by one, in order.
//! - [`Hierarchy`] primitives are acceleration structures implementing [`Aggregate`];
//!   each one runs its own internal traversal and the kernel merges what it reports.
//!
//! Both variants accept candidates through the same discipline, see [`accumulate`].
//!
//! [`traverse`]: fn.traverse.html
//! [`TraversalMode`]: ../mode/trait.TraversalMode.html
//! [`Leaf`]: struct.Leaf.html
//! [`Hierarchy`]: struct.Hierarchy.html
//! [`Aggregate`]: ../bounding_hierarchy/trait.Aggregate.html
//! [`accumulate`]: fn.accumulate.html

mod aggregate;
mod linear;

use crate::bounding_hierarchy::Aggregate;
use crate::hit::Hit;
use crate::intersector::Intersector;
use crate::mode::TraversalMode;
use crate::policy::UpdatePolicy;
use crate::ray::Ray;
use crate::scalar::RayScalar;

/// Category marker of primitives the intersector handles directly.
#[derive(Debug, Clone, Copy)]
pub struct Leaf;

/// Category marker of primitives which are themselves acceleration structures.
#[derive(Debug, Clone, Copy)]
pub struct Hierarchy;

/// Declares the category of a primitive type, either [`Leaf`] or [`Hierarchy`].
///
/// [`Leaf`]: struct.Leaf.html
/// [`Hierarchy`]: struct.Hierarchy.html
///
pub trait Primitive {
    /// [`Leaf`] or [`Hierarchy`].
    ///
    /// [`Leaf`]: struct.Leaf.html
    /// [`Hierarchy`]: struct.Hierarchy.html
    ///
    type Kind;
}

/// Selects the traversal variant for primitives of type `P`, intersected by `I`.
///
/// Implemented by [`Leaf`] whenever `I` can intersect `P`, and by [`Hierarchy`] whenever
/// `P` is an [`Aggregate`] over `I`. Pairing a primitive with the wrong category leaves
/// this bound unsatisfied and fails to compile:
///
/// ```compile_fail
/// use ray_traverse::query::closest_hit;
/// use ray_traverse::ray::Ray;
/// use ray_traverse::traverse::{Hierarchy, Primitive};
/// use nalgebra::{Point3, Vector3};
///
/// // Claims to be a hierarchy but has no internal traversal.
/// struct NotAnAggregate;
///
/// impl Primitive for NotAnAggregate {
///     type Kind = Hierarchy;
/// }
///
/// let ray = Ray::<f32>::new(Point3::origin(), Vector3::x());
/// closest_hit(&ray, &[NotAnAggregate]);
/// ```
///
/// [`Leaf`]: struct.Leaf.html
/// [`Hierarchy`]: struct.Hierarchy.html
/// [`Aggregate`]: ../bounding_hierarchy/trait.Aggregate.html
///
pub trait Dispatch<T: RayScalar, P, I> {
    /// The single-candidate hit record of this traversal.
    type Hit: Hit<Scalar = T>;

    /// Runs the traversal, see [`traverse`].
    ///
    /// [`traverse`]: fn.traverse.html
    ///
    fn run<M, U>(
        mode: M,
        policy: &U,
        ray: &Ray<T>,
        primitives: &[P],
        max_t: T,
        intersector: &mut I,
    ) -> M::Result<Self::Hit>
    where
        M: TraversalMode,
        U: UpdatePolicy<Self::Hit>;
}

/// The single-candidate hit record of traversing `P`s with intersector `I`.
pub type HitOf<T, P, I> = <<P as Primitive>::Kind as Dispatch<T, P, I>>::Hit;

impl<T, P, I> Dispatch<T, P, I> for Leaf
where
    T: RayScalar,
    I: Intersector<T, P>,
{
    type Hit = I::Hit;

    #[inline]
    fn run<M, U>(
        mode: M,
        policy: &U,
        ray: &Ray<T>,
        primitives: &[P],
        max_t: T,
        intersector: &mut I,
    ) -> M::Result<I::Hit>
    where
        M: TraversalMode,
        U: UpdatePolicy<I::Hit>,
    {
        linear::traverse_linear(mode, policy, ray, primitives, max_t, intersector)
    }
}

impl<T, P, I> Dispatch<T, P, I> for Hierarchy
where
    T: RayScalar,
    P: Aggregate<T, I>,
{
    type Hit = P::Hit;

    #[inline]
    fn run<M, U>(
        mode: M,
        policy: &U,
        ray: &Ray<T>,
        primitives: &[P],
        max_t: T,
        intersector: &mut I,
    ) -> M::Result<P::Hit>
    where
        M: TraversalMode,
        U: UpdatePolicy<P::Hit>,
    {
        aggregate::traverse_aggregates(mode, policy, ray, primitives, max_t, intersector)
    }
}

/// Traverses `primitives` with `ray` in mode `mode`.
///
/// Candidates are accepted according to `policy` and must lie in `(0, max_t]` for the
/// default policy. The result is the empty (missed) result for an empty slice.
///
/// - [`AnyHit`]: reports a hit in every lane where some visited primitive produced an
///   accepted candidate, and stops as soon as every lane has one.
/// - [`ClosestHit`]: reports the closest accepted candidate over the whole slice.
///   Of equally distant candidates the first visited one is kept.
/// - [`MultiHit<N>`]: reports the `N` closest accepted candidates, ascending.
///
/// A slice of leaves is visited in slice order. A hierarchy visits its primitives in its
/// own near-first order, so over a hierarchy "first visited" need not be the first in the
/// slice it was built from. Distances and hit masks match between the two, but on ties
/// `prim_id` (and the order of equal distances in a multi-hit result) may differ.
///
/// # Examples
/// ```
/// use ray_traverse::mode::ClosestHit;
/// use ray_traverse::intersector::DefaultIntersector;
/// use ray_traverse::policy::IsCloser;
/// use ray_traverse::ray::Ray;
/// use ray_traverse::shapes::Sphere;
/// use ray_traverse::traverse::traverse;
/// use nalgebra::{Point3, Vector3};
///
/// let spheres = [
///     Sphere::new(Point3::new(5.5f32, 0.0, 0.0), 0.5, 0),
///     Sphere::new(Point3::new(2.5, 0.0, 0.0), 0.5, 1),
/// ];
/// let ray = Ray::new(Point3::origin(), Vector3::x());
/// let hit = traverse(ClosestHit, &IsCloser, &ray, &spheres, f32::MAX, &mut DefaultIntersector);
/// assert_eq!((hit.t, hit.prim_id), (2.0, 1));
/// ```
///
/// [`AnyHit`]: ../mode/struct.AnyHit.html
/// [`ClosestHit`]: ../mode/struct.ClosestHit.html
/// [`MultiHit<N>`]: ../mode/struct.MultiHit.html
///
pub fn traverse<T, P, I, M, U>(
    mode: M,
    policy: &U,
    ray: &Ray<T>,
    primitives: &[P],
    max_t: T,
    intersector: &mut I,
) -> M::Result<HitOf<T, P, I>>
where
    T: RayScalar,
    P: Primitive,
    P::Kind: Dispatch<T, P, I>,
    M: TraversalMode,
    U: UpdatePolicy<HitOf<T, P, I>>,
{
    <P::Kind as Dispatch<T, P, I>>::run(mode, policy, ray, primitives, max_t, intersector)
}

/// Offers `candidate` to `result`, the step shared by every traversal.
///
/// The candidate is merged in the lanes which the policy accepts and which are not yet
/// finished according to the mode's exit policy. Returns `true` once every lane is
/// finished, after which the caller must stop visiting primitives.
///
/// Implementors of [`Aggregate`] use this for each leaf they visit.
///
/// [`Aggregate`]: ../bounding_hierarchy/trait.Aggregate.html
///
#[inline(always)]
pub fn accumulate<M, H, U>(
    _mode: M,
    result: &mut M::Result<H>,
    candidate: H,
    policy: &U,
    max_t: H::Scalar,
) -> bool
where
    M: TraversalMode,
    H: Hit,
    U: UpdatePolicy<H>,
{
    let active = !M::finished(result);
    let reference = M::reference(result);
    let accept = policy.should_update(&candidate, &reference, max_t) & active;
    M::merge(result, candidate, accept);
    H::Scalar::all_lanes(M::finished(result))
}
