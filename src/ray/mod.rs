//! This module holds the [`Ray`] definition, the slab test against bounding boxes and the
//! conversions between single rays and ray packets.
mod packet;
mod ray_impl;

pub use self::packet::*;
pub use self::ray_impl::*;
