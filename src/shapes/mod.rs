//! Leaf primitives with branchless intersection routines, usable with single rays and ray
//! packets alike.

mod sphere;
mod triangle;

pub use self::sphere::*;
pub use self::triangle::*;
