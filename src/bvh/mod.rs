//! This module defines a [`Bvh`], a bounding volume hierarchy which runs its own
//! mode-aware traversal when used as a primitive.
//!
//! [`Bvh`]: struct.Bvh.html
//!

mod bvh_impl;
mod bvh_node;
mod traverse;

pub use self::bvh_impl::*;
pub use self::bvh_node::BvhNode;
