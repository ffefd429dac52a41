//! Utilities module.

use crate::aabb::{Aabb, Bounded};
use crate::bounding_hierarchy::BHValue;

/// Fast floating point minimum.  This function matches the semantics of
///
/// ```no_compile
/// if x < y { x } else { y }
/// ```
///
/// which has efficient instruction sequences on many platforms (1 instruction on x86).  For most
/// values, it matches the semantics of `x.min(y)`; the special cases are:
///
/// ```text
/// min(-0.0, +0.0); +0.0
/// min(+0.0, -0.0): -0.0
/// min( NaN,  1.0):  1.0
/// min( 1.0,  NaN):  NaN
/// ```
///
/// Note: This exists because [`std::cmp::min`] requires Ord which floating point types do not satisfy
#[inline(always)]
pub fn fast_min<T: Copy + PartialOrd>(x: T, y: T) -> T {
    if x < y {
        x
    } else {
        y
    }
}

/// Fast floating point maximum.  This function matches the semantics of
///
/// ```no_compile
/// if x > y { x } else { y }
/// ```
///
/// which has efficient instruction sequences on many platforms (1 instruction on x86).  For most
/// values, it matches the semantics of `x.max(y)`; the special cases are:
///
/// ```text
/// max(-0.0, +0.0); +0.0
/// max(+0.0, -0.0): -0.0
/// max( NaN,  1.0):  1.0
/// max( 1.0,  NaN):  NaN
/// ```
///
/// Note: This exists because [`std::cmp::max`] requires Ord which floating point types do not satisfy
#[inline(always)]
pub fn fast_max<T: Copy + PartialOrd>(x: T, y: T) -> T {
    if x > y {
        x
    } else {
        y
    }
}

/// Defines a Bucket utility object. Used to store the properties of primitive partitions
/// in the [`Bvh`] build procedure using SAH.
///
/// [`Bvh`]: ../bvh/struct.Bvh.html
///
#[derive(Clone, Copy)]
pub struct Bucket<T: BHValue> {
    /// The number of primitives in this [`Bucket`].
    pub size: usize,

    /// The joint [`Aabb`] of the primitives in this [`Bucket`].
    pub aabb: Aabb<T>,

    /// The [`Aabb`] of the centers of the primitives in this [`Bucket`].
    pub centroid: Aabb<T>,
}

impl<T: BHValue> Bucket<T> {
    /// Returns an empty bucket.
    pub fn empty() -> Bucket<T> {
        Bucket {
            size: 0,
            aabb: Aabb::empty(),
            centroid: Aabb::empty(),
        }
    }

    /// Extend this [`Bucket`] by a primitive with the given [`Aabb`].
    pub fn add_aabb(&mut self, aabb: &Aabb<T>) {
        self.size += 1;
        self.aabb.join_mut(aabb);
        self.centroid.grow_mut(&aabb.center());
    }

    /// Join the contents of two [`Bucket`]'s.
    pub fn join_bucket(a: Bucket<T>, b: &Bucket<T>) -> Bucket<T> {
        Bucket {
            size: a.size + b.size,
            aabb: a.aabb.join(&b.aabb),
            centroid: a.centroid.join(&b.centroid),
        }
    }
}

/// Returns the joint [`Aabb`] of the primitives at `indices` together with the [`Aabb`]
/// of their centers.
pub fn joint_aabb_of_shapes<T: BHValue, P: Bounded<T>>(
    indices: &[usize],
    primitives: &[P],
) -> (Aabb<T>, Aabb<T>) {
    let mut aabb = Aabb::empty();
    let mut centroid = Aabb::empty();
    for index in indices {
        let primitive_aabb = primitives[*index].aabb();
        aabb.join_mut(&primitive_aabb);
        centroid.grow_mut(&primitive_aabb.center());
    }
    (aabb, centroid)
}
