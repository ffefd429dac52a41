use core::fmt;
use core::ops::Index;

use nalgebra::{Point3, Vector3};

use crate::bounding_hierarchy::BHValue;
use crate::utils::{fast_max, fast_min};

/// [`Aabb`] struct.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb<T: BHValue> {
    /// Minimum coordinates
    pub min: Point3<T>,

    /// Maximum coordinates
    pub max: Point3<T>,
}

impl<T: BHValue + fmt::Display> fmt::Display for Aabb<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Min bound: {}; Max bound: {}", self.min, self.max)
    }
}

/// A trait implemented by things which can be bounded by an [`Aabb`].
///
/// [`Aabb`]: struct.Aabb.html
///
pub trait Bounded<T: BHValue> {
    /// Returns the geometric bounds of this object in the form of an [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use ray_traverse::aabb::{Aabb, Bounded};
    /// use nalgebra::Point3;
    ///
    /// struct Something;
    ///
    /// impl Bounded<f32> for Something {
    ///     fn aabb(&self) -> Aabb<f32> {
    ///         let point1 = Point3::new(0.0,0.0,0.0);
    ///         let point2 = Point3::new(1.0,1.0,1.0);
    ///         Aabb::with_bounds(point1, point2)
    ///     }
    /// }
    ///
    /// let something = Something;
    /// let aabb = something.aabb();
    ///
    /// assert!(aabb.contains(&Point3::new(0.0,0.0,0.0)));
    /// assert!(aabb.contains(&Point3::new(1.0,1.0,1.0)));
    /// ```
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    fn aabb(&self) -> Aabb<T>;
}

impl<T: BHValue, B: Bounded<T>> Bounded<T> for &B {
    fn aabb(&self) -> Aabb<T> {
        B::aabb(self)
    }
}

impl<T: BHValue> Aabb<T> {
    /// Creates a new [`Aabb`] with the given bounds.
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn with_bounds(min: Point3<T>, max: Point3<T>) -> Aabb<T> {
        Aabb { min, max }
    }

    /// Creates a new empty [`Aabb`].
    /// The minimum is at positive infinity and the maximum at negative infinity, so
    /// that growing it by any point yields exactly that point.
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn empty() -> Aabb<T> {
        Aabb {
            min: Point3::new(T::infinity(), T::infinity(), T::infinity()),
            max: Point3::new(T::neg_infinity(), T::neg_infinity(), T::neg_infinity()),
        }
    }

    /// Returns true if this [`Aabb`] holds no point at all.
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    /// Returns true if the [`Point3`] is inside the [`Aabb`].
    ///
    /// [`Aabb`]: struct.Aabb.html
    /// [`Point3`]: nalgebra::Point3
    ///
    pub fn contains(&self, p: &Point3<T>) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and `other`.
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn join(&self, other: &Aabb<T>) -> Aabb<T> {
        Aabb::with_bounds(
            Point3::from(self.min.coords.zip_map(&other.min.coords, fast_min)),
            Point3::from(self.max.coords.zip_map(&other.max.coords, fast_max)),
        )
    }

    /// Mutable version of [`Aabb::join`].
    ///
    /// [`Aabb::join`]: struct.Aabb.html#method.join
    ///
    pub fn join_mut(&mut self, other: &Aabb<T>) {
        *self = self.join(other);
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and the point `other`.
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn grow(&self, other: &Point3<T>) -> Aabb<T> {
        Aabb::with_bounds(
            Point3::from(self.min.coords.zip_map(&other.coords, fast_min)),
            Point3::from(self.max.coords.zip_map(&other.coords, fast_max)),
        )
    }

    /// Mutable version of [`Aabb::grow`].
    ///
    /// [`Aabb::grow`]: struct.Aabb.html#method.grow
    ///
    pub fn grow_mut(&mut self, other: &Point3<T>) {
        *self = self.grow(other);
    }

    /// Returns the size of this [`Aabb`] in all three dimensions.
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn size(&self) -> Vector3<T> {
        self.max - self.min
    }

    /// Returns the center [`Point3`] of the [`Aabb`].
    ///
    /// [`Aabb`]: struct.Aabb.html
    /// [`Point3`]: nalgebra::Point3
    ///
    pub fn center(&self) -> Point3<T> {
        let half = T::from_f32(0.5).unwrap_or_else(T::one);
        self.min + self.size() * half
    }

    /// Returns the total surface area of this [`Aabb`].
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn surface_area(&self) -> T {
        let size = self.size();
        let half_area = size.x * size.y + size.x * size.z + size.y * size.z;
        half_area + half_area
    }

    /// Returns the axis along which the [`Aabb`] is stretched the most.
    ///
    /// [`Aabb`]: struct.Aabb.html
    ///
    pub fn largest_axis(&self) -> usize {
        let size = self.size();
        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }
}

impl<T: BHValue> Default for Aabb<T> {
    fn default() -> Aabb<T> {
        Aabb::empty()
    }
}

/// Make [`Aabb`]s indexable. `aabb[0]` gives a reference to the minimum bound.
/// All other indices return a reference to the maximum bound.
///
/// [`Aabb`]: struct.Aabb.html
///
impl<T: BHValue> Index<usize> for Aabb<T> {
    type Output = Point3<T>;

    fn index(&self, index: usize) -> &Point3<T> {
        if index == 0 {
            &self.min
        } else {
            &self.max
        }
    }
}

/// Implementation of [`Bounded`] for [`Aabb`].
///
/// [`Bounded`]: trait.Bounded.html
/// [`Aabb`]: struct.Aabb.html
///
impl<T: BHValue> Bounded<T> for Aabb<T> {
    fn aabb(&self) -> Aabb<T> {
        *self
    }
}

/// Implementation of [`Bounded`] for single points.
///
/// [`Bounded`]: trait.Bounded.html
///
impl<T: BHValue> Bounded<T> for Point3<T> {
    fn aabb(&self) -> Aabb<T> {
        Aabb::with_bounds(*self, *self)
    }
}

#[cfg(test)]
mod tests {
    use crate::aabb::{Aabb, Bounded};
    use crate::testbase::{tuple_to_point, tuplevec_small_strategy, TAabb3, TPoint3};

    use float_eq::assert_float_eq;
    use proptest::prelude::*;

    #[test]
    fn test_empty_is_empty() {
        assert!(TAabb3::empty().is_empty());
        assert!(!TPoint3::new(1.0, 2.0, 3.0).aabb().is_empty());
    }

    #[test]
    fn test_surface_area_of_unit_cube() {
        let aabb = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(1.0, 1.0, 1.0));
        assert_float_eq!(aabb.surface_area(), 6.0, abs <= f32::EPSILON);
    }

    #[test]
    fn test_grow_and_join_take_componentwise_bounds() {
        let grown = TAabb3::empty()
            .grow(&TPoint3::new(1.0, -2.0, 3.0))
            .grow(&TPoint3::new(-1.0, 2.0, 0.0));
        assert_eq!(grown.min, TPoint3::new(-1.0, -2.0, 0.0));
        assert_eq!(grown.max, TPoint3::new(1.0, 2.0, 3.0));

        let other = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, -5.0), TPoint3::new(4.0, 1.0, 1.0));
        let joint = grown.join(&other);
        assert_eq!(joint.min, TPoint3::new(-1.0, -2.0, -5.0));
        assert_eq!(joint.max, TPoint3::new(4.0, 2.0, 3.0));
    }

    #[test]
    fn test_largest_axis() {
        let aabb = TAabb3::with_bounds(TPoint3::new(0.0, 0.0, 0.0), TPoint3::new(1.0, 3.0, 2.0));
        assert_eq!(aabb.largest_axis(), 1);
    }

    proptest! {
        // Test whether an empty `Aabb` does not contains anything.
        #[test]
        fn test_empty_contains_nothing(tpl in tuplevec_small_strategy()) {
            let p = tuple_to_point(&tpl);
            let aabb = TAabb3::empty();
            assert!(!aabb.contains(&p));
        }

        // Test whether an `Aabb` always contains its center.
        #[test]
        fn test_aabb_contains_center(a in tuplevec_small_strategy(), b in tuplevec_small_strategy()) {
            let aabb = TAabb3::empty().grow(&tuple_to_point(&a)).grow(&tuple_to_point(&b));
            assert!(aabb.contains(&aabb.center()));
        }

        // Test whether the joint of two point-sets contains all the points.
        #[test]
        fn test_join_two_aabbs(a in proptest::collection::vec(tuplevec_small_strategy(), 1..8),
                               b in proptest::collection::vec(tuplevec_small_strategy(), 1..8)) {
            let a = a.iter().map(tuple_to_point).collect::<Vec<_>>();
            let b = b.iter().map(tuple_to_point).collect::<Vec<_>>();
            let aabb1 = a.iter().fold(Aabb::empty(), |aabb, point| aabb.grow(point));
            let aabb2 = b.iter().fold(Aabb::empty(), |aabb, point| aabb.grow(point));
            let joint = aabb1.join(&aabb2);

            assert!(a.iter().all(|point| aabb1.contains(point)));
            assert!(b.iter().all(|point| aabb2.contains(point)));
            assert!(a.iter().chain(b.iter()).all(|point| joint.contains(point)));
        }
    }
}
