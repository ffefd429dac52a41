#![no_main]
use std::fmt::{self, Debug, Formatter};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nalgebra::Point3;
use ordered_float::NotNan;
use ray_traverse::bvh::Bvh;
use ray_traverse::query::{any_hit, closest_hit, closest_hit_within, multi_hit};
use ray_traverse::ray::Ray;
use ray_traverse::shapes::Sphere;

type Float = f32;
const LIMIT: Float = 1_000.0;
const MAX_RADIUS: Float = 100.0;

fuzz_target!(|workload: Workload| {
    workload.fuzz();
});

#[derive(Arbitrary)]
struct ArbitraryPoint {
    coordinates: [NotNan<Float>; 3],
}

impl ArbitraryPoint {
    fn point(&self) -> Point3<Float> {
        Point3::from_slice(&self.coordinates).map(|f| f.into_inner().clamp(-LIMIT, LIMIT))
    }
}

#[derive(Arbitrary)]
struct ArbitrarySphere {
    center: ArbitraryPoint,
    radius: NotNan<Float>,
}

impl ArbitrarySphere {
    fn sphere(&self, id: u32) -> Sphere<Float> {
        let radius = self.radius.into_inner().abs().clamp(0.01, MAX_RADIUS);
        Sphere::new(self.center.point(), radius, id)
    }
}

impl Debug for ArbitrarySphere {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.sphere(0), f)
    }
}

#[derive(Arbitrary)]
struct ArbitraryRay {
    origin: ArbitraryPoint,
    destination: ArbitraryPoint,
}

impl Debug for ArbitraryRay {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.ray(), f)
    }
}

impl ArbitraryRay {
    fn ray(&self) -> Ray<Float> {
        let mut direction = self.destination.point() - self.origin.point();
        // Ensure no degenerate direction.
        if direction.magnitude() < 1e-3 {
            direction.iter_mut().for_each(|f| *f = 1.0);
        }
        Ray::new(self.origin.point(), direction)
    }
}

#[derive(Debug, Arbitrary)]
struct Workload {
    spheres: Vec<ArbitrarySphere>,
    ray: ArbitraryRay,
    parts: u8,
}

impl Workload {
    fn fuzz(self) {
        let spheres: Vec<_> = self
            .spheres
            .iter()
            .zip(0..)
            .map(|(sphere, id)| sphere.sphere(id))
            .collect();
        let ray = self.ray.ray();

        let chunk = spheres.len().div_ceil(self.parts.max(1) as usize).max(1);
        let bvhs: Vec<_> = spheres
            .chunks(chunk)
            .map(|chunk| Bvh::build(chunk.to_vec()))
            .collect();

        // Ties may resolve to different primitives, distances must agree.
        let linear = closest_hit(&ray, &spheres);
        let aggregate = closest_hit(&ray, &bvhs);
        assert_eq!(linear.hit, aggregate.hit);
        assert_eq!(linear.t, aggregate.t);

        let bounded = closest_hit_within(&ray, &bvhs, linear.t);
        assert_eq!(bounded.t, linear.t);

        assert_eq!(any_hit(&ray, &spheres).hit, any_hit(&ray, &bvhs).hit);

        let linear_multi = multi_hit::<4, _, _>(&ray, &spheres);
        let aggregate_multi = multi_hit::<4, _, _>(&ray, &bvhs);
        for (a, b) in linear_multi.iter().zip(aggregate_multi.iter()) {
            assert_eq!((a.hit, a.t), (b.hit, b.t));
        }
    }
}
