//! This module defines [`Bvh`] and its building procedures.
//!
//! [`Bvh`]: struct.Bvh.html
//!

use log::debug;

use crate::aabb::{Aabb, Bounded};
use crate::bounding_hierarchy::BHValue;
use crate::bvh::bvh_node::{BvhNode, BvhNodeBuildArgs};
use crate::traverse::{Hierarchy, Primitive};
use crate::utils::joint_aabb_of_shapes;

/// A bounding volume hierarchy which owns its primitives.
///
/// As a primitive it is a [`Hierarchy`]: a slice of [`Bvh`]s is traversed by letting each
/// one run its own node traversal.
///
/// [`Bvh`]: struct.Bvh.html
/// [`Hierarchy`]: ../traverse/struct.Hierarchy.html
///
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bvh<P, T: BHValue = f32> {
    primitives: Vec<P>,
    nodes: Vec<BvhNode<T>>,
    depth: usize,
}

impl<P: Bounded<T>, T: BHValue> Bvh<P, T> {
    /// Creates a new [`Bvh`] over `primitives`, one primitive per leaf.
    ///
    /// # Example
    ///
    /// ```
    /// use ray_traverse::bvh::Bvh;
    /// use ray_traverse::shapes::Sphere;
    /// use nalgebra::Point3;
    ///
    /// let spheres: Vec<_> = (0..1000u32)
    ///     .map(|i| Sphere::new(Point3::new(i as f32, i as f32, i as f32), 1.0, i))
    ///     .collect();
    /// let bvh = Bvh::build(spheres);
    ///
    /// assert_eq!(bvh.primitives().len(), 1000);
    /// assert_eq!(bvh.nodes().len(), 1999);
    /// ```
    ///
    /// [`Bvh`]: struct.Bvh.html
    ///
    pub fn build(primitives: Vec<P>) -> Bvh<P, T> {
        Self::build_with(primitives, BvhNode::build)
    }

    /// Creates a new [`Bvh`] like [`Bvh::build`], building independent subtrees in parallel.
    ///
    /// [`Bvh`]: struct.Bvh.html
    /// [`Bvh::build`]: struct.Bvh.html#method.build
    ///
    #[cfg(feature = "rayon")]
    pub fn build_par(primitives: Vec<P>) -> Bvh<P, T>
    where
        P: Sync,
    {
        Self::build_with(primitives, BvhNode::build_par)
    }

    fn build_with(
        primitives: Vec<P>,
        build: impl FnOnce(BvhNodeBuildArgs<P, T>) -> usize,
    ) -> Bvh<P, T> {
        if primitives.is_empty() {
            return Bvh {
                primitives,
                nodes: Vec::new(),
                depth: 0,
            };
        }

        let mut indices = (0..primitives.len()).collect::<Vec<usize>>();
        let mut nodes = vec![BvhNode::create_dummy(); primitives.len() * 2 - 1];
        let (aabb_bounds, centroid_bounds) = joint_aabb_of_shapes(&indices, &primitives);
        let depth = build(BvhNodeBuildArgs {
            primitives: &primitives,
            indices: &mut indices,
            nodes: &mut nodes,
            parent_index: 0,
            node_index: 0,
            depth: 0,
            aabb_bounds,
            centroid_bounds,
        });

        debug!(
            "built bvh over {} primitives: {} nodes, depth {}",
            primitives.len(),
            nodes.len(),
            depth
        );
        Bvh {
            primitives,
            nodes,
            depth,
        }
    }
}

impl<P, T: BHValue> Bvh<P, T> {
    /// The primitives, in the order they were given to the build.
    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    /// The nodes, root first.
    pub fn nodes(&self) -> &[BvhNode<T>] {
        &self.nodes
    }

    /// Number of edges from the root to the deepest leaf.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true if the [`Bvh`] holds no primitive.
    ///
    /// [`Bvh`]: struct.Bvh.html
    ///
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Returns the primitives, giving up the hierarchy.
    pub fn into_primitives(self) -> Vec<P> {
        self.primitives
    }
}

impl<P: Bounded<T>, T: BHValue> Bounded<T> for Bvh<P, T> {
    fn aabb(&self) -> Aabb<T> {
        match self.nodes.first() {
            Some(BvhNode::Node {
                child_l_aabb,
                child_r_aabb,
                ..
            }) => child_l_aabb.join(child_r_aabb),
            Some(BvhNode::Leaf {
                primitive_index, ..
            }) => self.primitives[*primitive_index].aabb(),
            None => Aabb::empty(),
        }
    }
}

impl<P, T: BHValue> Primitive for Bvh<P, T> {
    type Kind = Hierarchy;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::aabb::Bounded;
    use crate::bvh::{Bvh, BvhNode};
    use crate::shapes::Sphere;
    use crate::testbase::{generate_aligned_spheres, TPoint3};

    /// Checks the structural invariants of a built hierarchy.
    fn assert_well_formed<P>(bvh: &Bvh<P>) {
        let n = bvh.primitives().len();
        assert_eq!(bvh.nodes().len(), 2 * n - 1);

        let mut seen = HashSet::new();
        for (index, node) in bvh.nodes().iter().enumerate() {
            match *node {
                BvhNode::Leaf {
                    primitive_index, ..
                } => {
                    assert!(seen.insert(primitive_index));
                }
                BvhNode::Node {
                    child_l_index,
                    child_r_index,
                    ..
                } => {
                    assert_eq!(child_l_index, index + 1);
                    assert_eq!(bvh.nodes()[child_l_index].parent(), index);
                    assert_eq!(bvh.nodes()[child_r_index].parent(), index);
                }
            }
        }
        assert_eq!(seen.len(), n);
    }

    #[test]
    /// Tests whether the building procedure succeeds in not failing.
    fn test_build_bvh() {
        let bvh = Bvh::build(generate_aligned_spheres());
        assert_well_formed(&bvh);
        assert!(bvh.depth() >= 5);
    }

    #[test]
    fn test_build_empty_and_single() {
        let empty: Bvh<Sphere<f32>> = Bvh::build(Vec::new());
        assert!(empty.is_empty());
        assert!(empty.nodes().is_empty());

        let single = Bvh::build(vec![Sphere::new(TPoint3::new(1.0, 0.0, 0.0), 0.5, 0)]);
        assert_eq!(single.nodes().len(), 1);
        assert_eq!(single.depth(), 0);
        assert_eq!(single.aabb().min, TPoint3::new(0.5, -0.5, -0.5));
    }

    #[test]
    /// Coinciding primitives cannot be separated by the heuristic and get split in half.
    fn test_build_coinciding_primitives() {
        let spheres = (0..9)
            .map(|id| Sphere::new(TPoint3::new(1.0, 2.0, 3.0), 1.0, id))
            .collect();
        let bvh = Bvh::build(spheres);
        assert_well_formed(&bvh);
        assert_eq!(bvh.depth(), 4);
    }

    #[test]
    /// The root bounds contain every primitive.
    fn test_root_aabb_contains_all_primitives() {
        let bvh = Bvh::build(generate_aligned_spheres());
        let root = bvh.aabb();
        for sphere in bvh.primitives() {
            assert!(root.contains(&sphere.center));
        }
    }

    #[test]
    /// Building keeps the primitives in the order they were given.
    fn test_into_primitives_keeps_input_order() {
        let spheres = generate_aligned_spheres();
        let ids: Vec<u32> = spheres.iter().map(|sphere| sphere.id).collect();
        let bvh = Bvh::build(spheres);
        let back: Vec<u32> = bvh.into_primitives().iter().map(|sphere| sphere.id).collect();
        assert_eq!(back, ids);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_build_par_matches_build() {
        let spheres: Vec<_> = (0..500u32)
            .map(|i| {
                let f = i as f32;
                Sphere::new(TPoint3::new(f.sin() * 50.0, f.cos() * 30.0, f * 0.1), 0.5, i)
            })
            .collect();
        let serial = Bvh::build(spheres.clone());
        let parallel = Bvh::build_par(spheres);
        assert_well_formed(&parallel);
        assert_eq!(serial.nodes(), parallel.nodes());
        assert_eq!(serial.depth(), parallel.depth());
    }
}
