//! Common utilities shared by unit tests.
#![cfg(test)]

use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::aabb::Aabb;
use crate::ray::Ray;
use crate::shapes::Sphere;

/// A point in single precision.
pub type TPoint3 = Point3<f32>;

/// A vector in single precision.
pub type TVector3 = Vector3<f32>;

/// A scalar ray.
pub type TRay3 = Ray<f32>;

/// A bounding box in single precision.
pub type TAabb3 = Aabb<f32>;

/// A vector represented as a tuple
pub type TupleVec = (f32, f32, f32);

/// Generate a `TupleVec` for [`proptest::strategy::Strategy`] from -10e10 to 10e10
/// A small enough range to prevent most fp32 errors from breaking certain tests
pub fn tuplevec_small_strategy() -> impl Strategy<Value = TupleVec> {
    (
        -10e10_f32..10e10_f32,
        -10e10_f32..10e10_f32,
        -10e10_f32..10e10_f32,
    )
}

/// Generate a `TupleVec` from -1e3 to 1e3, for tests which square or cross coordinates.
pub fn tuplevec_bounded_strategy() -> impl Strategy<Value = TupleVec> {
    (-1e3_f32..1e3_f32, -1e3_f32..1e3_f32, -1e3_f32..1e3_f32)
}

/// Convert a `TupleVec` to a [`Point3`].
pub fn tuple_to_point(tpl: &TupleVec) -> TPoint3 {
    TPoint3::new(tpl.0, tpl.1, tpl.2)
}

/// Convert a `TupleVec` to a [`Vector3`].
pub fn tuple_to_vector(tpl: &TupleVec) -> TVector3 {
    TVector3::new(tpl.0, tpl.1, tpl.2)
}

/// A ray from the origin along the positive x axis.
pub fn x_axis_ray() -> TRay3 {
    TRay3::new(TPoint3::origin(), TVector3::x())
}

/// A sphere of radius 0.5 on the positive x axis which [`x_axis_ray`] hits at distance `d`.
pub fn sphere_at_distance(d: f32, id: u32) -> Sphere<f32> {
    Sphere::new(TPoint3::new(d + 0.5, 0.0, 0.0), 0.5, id)
}

/// Spheres at the distances 5, 2 and 8 along [`x_axis_ray`], with ids 0, 1 and 2.
pub fn five_two_eight() -> Vec<Sphere<f32>> {
    [5.0, 2.0, 8.0]
        .iter()
        .zip(0..)
        .map(|(d, id)| sphere_at_distance(*d, id))
        .collect()
}

/// Generates 21 spheres of radius 0.5 along the x axis, centered on
/// `x = -10, -8, ..., 30`. Sphere `i` has id `i`.
pub fn generate_aligned_spheres() -> Vec<Sphere<f32>> {
    (0..21u32)
        .map(|i| Sphere::new(TPoint3::new(2.0 * i as f32 - 10.0, 0.0, 0.0), 0.5, i))
        .collect()
}

/// Generates `count` spheres scattered in the cube `[-10, 10]^3`, ids in creation order.
pub fn random_sphere_soup(seed: u64, count: u32) -> Vec<Sphere<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|id| {
            let center = TPoint3::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            );
            Sphere::new(center, rng.random_range(0.1..1.5), id)
        })
        .collect()
}

/// Generates rays starting on a sphere of radius 20 around the origin, each aimed at a
/// random point in the cube `[-5, 5]^3`.
pub fn random_rays(seed: u64, count: usize) -> Vec<TRay3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let start = TVector3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            let start = TPoint3::from(start.try_normalize(1e-3).unwrap_or(TVector3::z()) * 20.0);
            let target = TPoint3::new(
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
            );
            TRay3::new(start, target - start)
        })
        .collect()
}

/// Returns a copy of `items` in a seeded random order.
pub fn shuffled<T: Clone>(items: &[T], seed: u64) -> Vec<T> {
    let mut items = items.to_vec();
    items.shuffle(&mut StdRng::seed_from_u64(seed));
    items
}
