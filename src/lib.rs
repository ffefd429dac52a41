//! A crate which traces rays, and SIMD packets of rays, through lists of primitives and
//! bounding volume hierarchies.
//!
//! ## About
//!
//! Three traversal semantics are offered: any-hit (occlusion, stop at the first accepted
//! hit), closest-hit and multi-hit (the `N` closest hits, in order). They run over a
//! slice of leaf primitives, which are intersected one after the other, or over a slice
//! of acceleration structures like [`bvh::Bvh`], each of which runs its own traversal.
//! The choice between the two happens at compile time through [`traverse::Primitive`].
//!
//! The numeric type of a ray is any [`scalar::RayScalar`]: `f32` and `f64` for single
//! rays, and with the `simd` feature the `wide`-backed types of [`simba`] for packets.
//! Packet lanes are traced together and every result carries one outcome per lane.
//!
//! Intersection tests ([`intersector::Intersector`]) and the rule deciding which hits are
//! kept ([`policy::UpdatePolicy`]) can be replaced by closures.
//!
//! ## Example
//!
//! ```
//! use ray_traverse::bvh::Bvh;
//! use ray_traverse::query::{any_hit, closest_hit, multi_hit};
//! use ray_traverse::ray::Ray;
//! use ray_traverse::shapes::Sphere;
//! use nalgebra::{Point3, Vector3};
//!
//! let origin = Point3::new(0.0, 0.0, 0.0);
//! let direction = Vector3::new(1.0, 0.0, 0.0);
//! let ray = Ray::<f32>::new(origin, direction);
//!
//! let mut spheres = Vec::new();
//! for i in 0..1000u32 {
//!     let position = Point3::new(i as f32, i as f32, i as f32);
//!     let radius = (i % 10) as f32 + 1.0;
//!     spheres.push(Sphere::new(position, radius, i));
//! }
//!
//! // Plain list and hierarchy give the same answers.
//! let linear = closest_hit(&ray, &spheres);
//! let bvh = [Bvh::build(spheres)];
//! let hit = closest_hit(&ray, &bvh);
//! assert_eq!(hit.t, linear.t);
//! assert!(any_hit(&ray, &bvh).hit);
//!
//! let hits = multi_hit::<4, _, _>(&ray, &bvh);
//! assert!(hits.iter().zip(hits.iter().skip(1)).all(|(a, b)| a.t <= b.t));
//! ```
//!
//! ## Features
//!
//! - `rayon` (default **enabled**) - parallel batch traversal in [`batch`] and `Bvh::build_par`
//! - `simd` (default **disabled**) - [`scalar::RayScalar`] for `WideF32x4`, `WideF32x8` and `WideF64x4`
//! - `serde` (default **disabled**) - adds `Serialize` and `Deserialize` implementations for some types
//!

pub mod aabb;
#[cfg(feature = "rayon")]
pub mod batch;
pub mod bounding_hierarchy;
pub mod bvh;
pub mod hit;
pub mod intersector;
pub mod mode;
pub mod policy;
pub mod query;
pub mod ray;
pub mod scalar;
pub mod shapes;
pub mod traverse;
mod utils;

#[cfg(test)]
mod testbase;
