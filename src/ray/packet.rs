//! Conversions between single rays and ray packets.

use thiserror::Error;

use super::Ray;
use crate::scalar::RayScalar;

/// Errors which can occur when assembling a ray packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PacketError {
    /// The number of rays does not match the packet width.
    #[error("a packet holds {expected} rays but {actual} were given")]
    LaneCount {
        /// Packet width.
        expected: usize,
        /// Number of rays given.
        actual: usize,
    },
}

impl<T: RayScalar> Ray<T> {
    /// Broadcasts a single ray to every lane.
    pub fn splat(ray: &Ray<T::Lane>) -> Ray<T> {
        Ray {
            origin: ray.origin.map(T::splat_lane),
            direction: ray.direction.map(T::splat_lane),
            inv_direction: ray.inv_direction.map(T::splat_lane),
        }
    }

    /// Extracts the single ray held in lane `i`.
    pub fn lane(&self, i: usize) -> Ray<T::Lane> {
        Ray {
            origin: self.origin.map(|x| x.lane(i)),
            direction: self.direction.map(|x| x.lane(i)),
            inv_direction: self.inv_direction.map(|x| x.lane(i)),
        }
    }

    /// Packs one single ray per lane into a packet.
    ///
    /// # Examples
    /// ```
    /// use ray_traverse::ray::{PacketError, Ray};
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let ray = Ray::<f32>::new(Point3::origin(), Vector3::x());
    /// let packet = Ray::<f32>::from_lanes(&[ray]).unwrap();
    /// assert_eq!(packet.origin, ray.origin);
    ///
    /// assert_eq!(
    ///     Ray::<f32>::from_lanes(&[ray, ray]).unwrap_err(),
    ///     PacketError::LaneCount { expected: 1, actual: 2 },
    /// );
    /// ```
    pub fn from_lanes(rays: &[Ray<T::Lane>]) -> Result<Ray<T>, PacketError> {
        let mismatch = PacketError::LaneCount {
            expected: T::LANES,
            actual: rays.len(),
        };
        if rays.len() != T::LANES {
            return Err(mismatch);
        }
        let (first, rest) = rays.split_first().ok_or(mismatch)?;

        let mut packet: Ray<T> = Ray::splat(first);
        for (offset, ray) in rest.iter().enumerate() {
            let i = offset + 1;
            for axis in 0..3 {
                packet.origin[axis].set_lane(i, ray.origin[axis]);
                packet.direction[axis].set_lane(i, ray.direction[axis]);
                packet.inv_direction[axis].set_lane(i, ray.inv_direction[axis]);
            }
        }
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::PacketError;
    use crate::testbase::{TPoint3, TRay3, TVector3};

    #[test]
    fn scalar_packet_is_the_ray_itself() {
        let ray = TRay3::new(TPoint3::new(1.0, 2.0, 3.0), TVector3::new(0.0, 1.0, 0.0));
        let packet = TRay3::from_lanes(&[ray]).unwrap();
        assert_eq!(packet.origin, ray.origin);
        assert_eq!(packet.lane(0).direction, ray.direction);
        assert_eq!(TRay3::splat(&ray).inv_direction, ray.inv_direction);
    }

    #[test]
    fn wrong_lane_count_is_rejected() {
        let err = TRay3::from_lanes(&[]).unwrap_err();
        assert_eq!(
            err,
            PacketError::LaneCount {
                expected: 1,
                actual: 0
            }
        );
        assert_eq!(err.to_string(), "a packet holds 1 rays but 0 were given");
    }

    #[cfg(feature = "simd")]
    #[test]
    fn wide_packet_keeps_lane_order() {
        use simba::simd::WideF32x4;

        use crate::ray::Ray;

        let rays: Vec<TRay3> = (0..4)
            .map(|i| TRay3::new(TPoint3::new(i as f32, 0.0, 0.0), TVector3::new(0.0, 0.0, 1.0)))
            .collect();
        let packet = Ray::<WideF32x4>::from_lanes(&rays).unwrap();
        for (i, ray) in rays.iter().enumerate() {
            assert_eq!(packet.lane(i).origin, ray.origin);
            assert_eq!(packet.lane(i).direction, ray.direction);
        }
        assert_eq!(
            Ray::<WideF32x4>::from_lanes(&rays[..3]).unwrap_err(),
            PacketError::LaneCount {
                expected: 4,
                actual: 3
            }
        );
    }
}
