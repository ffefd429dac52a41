//! Hit records produced by intersectors and accumulated by the traversal kernel.
//!
//! A hit record describes the outcome of one ray (or one packet of rays) against one
//! primitive. Every field is lane-wise so that a packet carries an independent result per
//! ray; lanes which missed hold [`RayScalar::max_distance`] and [`INVALID_PRIMITIVE`].
//!
//! [`RayScalar::max_distance`]: ../scalar/trait.RayScalar.html#tymethod.max_distance
//! [`INVALID_PRIMITIVE`]: ../scalar/constant.INVALID_PRIMITIVE.html

mod multi_hit;

pub use self::multi_hit::*;

use core::fmt;

use nalgebra::SimdBool;

use crate::scalar::{mask_lane, Mask, RayScalar, INVALID_PRIMITIVE};

/// The single-candidate result of intersecting a ray with a primitive.
pub trait Hit: Copy {
    /// The scalar type of the ray this hit belongs to.
    type Scalar: RayScalar;

    /// A record which missed in every lane.
    fn miss() -> Self;

    /// Lanes which hit.
    fn is_hit(&self) -> Mask<Self::Scalar>;

    /// Distance along the ray, per lane.
    fn distance(&self) -> Self::Scalar;

    /// Takes `self` in the lanes where `mask` is set and `other` everywhere else.
    fn blend(self, mask: Mask<Self::Scalar>, other: Self) -> Self;
}

/// Primitive specific data carried along with a hit, like surface coordinates.
pub trait SurfaceData<T: RayScalar>: Copy {
    /// The value stored for lanes which missed.
    fn empty() -> Self;

    /// Takes `self` in the lanes where `mask` is set and `other` everywhere else.
    fn blend(self, mask: Mask<T>, other: Self) -> Self;
}

impl<T: RayScalar> SurfaceData<T> for () {
    #[inline(always)]
    fn empty() {}

    #[inline(always)]
    fn blend(self, _mask: Mask<T>, _other: ()) {}
}

/// Barycentric coordinates of a hit on a triangle.
/// The hit point is `(1 - u - v) * a + u * b + v * c`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Barycentric<T> {
    /// Weight of the second vertex.
    pub u: T,

    /// Weight of the third vertex.
    pub v: T,
}

impl<T: RayScalar> SurfaceData<T> for Barycentric<T> {
    #[inline(always)]
    fn empty() -> Self {
        Barycentric {
            u: T::zero(),
            v: T::zero(),
        }
    }

    #[inline(always)]
    fn blend(self, mask: Mask<T>, other: Self) -> Self {
        Barycentric {
            u: self.u.select(mask, other.u),
            v: self.v.select(mask, other.v),
        }
    }
}

/// Lane-wise blend of two masks.
#[inline(always)]
pub(crate) fn blend_mask<B: SimdBool>(mask: B, a: B, b: B) -> B {
    (mask & a) | (!mask & b)
}

/// The hit record of the built-in shapes: hit mask, distance, primitive id and surface data.
///
/// [`HitRecord::new`] keeps missed lanes canonical, so two records of the same outcome
/// compare equal lane by lane through [`HitRecord::lane`].
///
/// [`HitRecord::new`]: struct.HitRecord.html#method.new
/// [`HitRecord::lane`]: struct.HitRecord.html#method.lane
///
#[derive(Clone, Copy)]
pub struct HitRecord<T: RayScalar, S = ()> {
    /// Lanes which hit.
    pub hit: Mask<T>,

    /// Distance along the ray.
    pub t: T,

    /// Identifier of the primitive which was hit.
    pub prim_id: T::Index,

    /// Primitive specific surface data.
    pub surface: S,
}

/// One lane of a [`HitRecord`].
///
/// [`HitRecord`]: struct.HitRecord.html
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitLane<T> {
    /// Whether this lane hit.
    pub hit: bool,

    /// Distance along the ray.
    pub t: T,

    /// Identifier of the primitive which was hit, [`INVALID_PRIMITIVE`] on a miss.
    ///
    /// [`INVALID_PRIMITIVE`]: ../scalar/constant.INVALID_PRIMITIVE.html
    ///
    pub prim_id: u32,
}

impl<T: RayScalar, S: SurfaceData<T>> HitRecord<T, S> {
    /// Creates a record for primitive `prim_id` which hit in the lanes of `hit`.
    /// Lanes outside of `hit` are reset to the miss values.
    pub fn new(hit: Mask<T>, t: T, prim_id: u32, surface: S) -> Self {
        HitRecord {
            hit,
            t: t.select(hit, T::max_distance()),
            prim_id: T::index_select(hit, T::index_splat(prim_id), T::index_splat(INVALID_PRIMITIVE)),
            surface: surface.blend(hit, S::empty()),
        }
    }

    /// Returns the result of lane `i`.
    pub fn lane(&self, i: usize) -> HitLane<T::Lane> {
        HitLane {
            hit: mask_lane(self.hit, i),
            t: self.t.lane(i),
            prim_id: T::index_lane(&self.prim_id, i),
        }
    }
}

impl<T: RayScalar, S: SurfaceData<T>> Hit for HitRecord<T, S> {
    type Scalar = T;

    #[inline(always)]
    fn miss() -> Self {
        HitRecord {
            hit: T::none_mask(),
            t: T::max_distance(),
            prim_id: T::index_splat(INVALID_PRIMITIVE),
            surface: S::empty(),
        }
    }

    #[inline(always)]
    fn is_hit(&self) -> Mask<T> {
        self.hit
    }

    #[inline(always)]
    fn distance(&self) -> T {
        self.t
    }

    #[inline(always)]
    fn blend(self, mask: Mask<T>, other: Self) -> Self {
        HitRecord {
            hit: blend_mask(mask, self.hit, other.hit),
            t: self.t.select(mask, other.t),
            prim_id: T::index_select(mask, self.prim_id, other.prim_id),
            surface: self.surface.blend(mask, other.surface),
        }
    }
}

impl<T: RayScalar, S: fmt::Debug> fmt::Debug for HitRecord<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HitRecord")
            .field("hit", &format_args!("{:#b}", self.hit.bitmask()))
            .field("t", &self.t)
            .field("prim_id", &self.prim_id)
            .field("surface", &self.surface)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_is_canonical() {
        let miss = HitRecord::<f32>::miss();
        assert_eq!(
            miss.lane(0),
            HitLane {
                hit: false,
                t: f32::MAX,
                prim_id: INVALID_PRIMITIVE
            }
        );
    }

    #[test]
    fn new_resets_missed_lanes() {
        let record = HitRecord::<f32, Barycentric<f32>>::new(
            false,
            3.0,
            7,
            Barycentric { u: 0.5, v: 0.25 },
        );
        assert_eq!(record.t, f32::MAX);
        assert_eq!(record.prim_id, INVALID_PRIMITIVE);
        assert_eq!(record.surface, Barycentric::default());
    }

    #[test]
    fn blend_takes_masked_side() {
        let a = HitRecord::<f64>::new(true, 1.0, 1, ());
        let b = HitRecord::<f64>::new(true, 2.0, 2, ());
        assert_eq!(a.blend(true, b).prim_id, 1);
        assert_eq!(a.blend(false, b).prim_id, 2);
        assert_eq!(a.blend(false, b).t, 2.0);
    }

    #[cfg(feature = "simd")]
    #[test]
    fn blend_is_lane_wise() {
        use nalgebra::SimdPartialOrd;
        use simba::simd::WideF32x4;

        let t = WideF32x4::from_lane_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let near = HitRecord::<WideF32x4>::new(WideF32x4::all_mask(), t, 1, ());
        let far = HitRecord::<WideF32x4>::new(
            WideF32x4::all_mask(),
            WideF32x4::splat_lane(2.5),
            2,
            (),
        );
        let mask = near.t.simd_lt(far.t);
        let closest = near.blend(mask, far);
        assert_eq!(closest.lane(0).prim_id, 1);
        assert_eq!(closest.lane(1).prim_id, 1);
        assert_eq!(closest.lane(2).prim_id, 2);
        assert_eq!(closest.lane(3).t, 2.5);
    }
}
