use crate::aabb::{Aabb, Bounded};
use crate::bounding_hierarchy::BHValue;
use crate::utils::{joint_aabb_of_shapes, Bucket};

const NUM_BUCKETS: usize = 6;

/// The [`BvhNode`] enum that describes a node in a [`Bvh`].
/// It's either a leaf node and references a primitive (by holding its index)
/// or a regular node that has two child nodes.
/// The non-leaf node stores the [`Aabb`]s of its children.
///
/// [`Aabb`]: ../aabb/struct.Aabb.html
/// [`Bvh`]: struct.Bvh.html
/// [`BvhNode`]: enum.BvhNode.html
///
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BvhNode<T: BHValue> {
    /// Leaf node.
    Leaf {
        /// The node's parent.
        parent_index: usize,

        /// The primitive contained in this leaf.
        primitive_index: usize,
    },
    /// Inner node.
    Node {
        /// The node's parent.
        parent_index: usize,

        /// Index of the left subtree's root node.
        child_l_index: usize,

        /// The convex hull of the primitives' [`Aabb`]s in child_l.
        child_l_aabb: Aabb<T>,

        /// Index of the right subtree's root node.
        child_r_index: usize,

        /// The convex hull of the primitives' [`Aabb`]s in child_r.
        child_r_aabb: Aabb<T>,
    },
}

/// Everything needed to build the subtree rooted at `node_index`.
///
/// `nodes` is exactly the part of the node array owned by this subtree: a subtree over
/// `n` primitives is stored in `2n - 1` consecutive nodes, its root first, so disjoint
/// subtrees can be built independently.
pub(crate) struct BvhNodeBuildArgs<'a, P, T: BHValue> {
    pub(crate) primitives: &'a [P],
    pub(crate) indices: &'a mut [usize],
    pub(crate) nodes: &'a mut [BvhNode<T>],
    pub(crate) parent_index: usize,
    pub(crate) node_index: usize,
    pub(crate) depth: usize,
    pub(crate) aabb_bounds: Aabb<T>,
    pub(crate) centroid_bounds: Aabb<T>,
}

impl<T: BHValue> BvhNode<T> {
    /// Returns the index of the parent node.
    pub fn parent(&self) -> usize {
        match *self {
            BvhNode::Node { parent_index, .. } | BvhNode::Leaf { parent_index, .. } => {
                parent_index
            }
        }
    }

    /// Returns true if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// Placeholder written before the build fills in the real node.
    pub(crate) fn create_dummy() -> BvhNode<T> {
        BvhNode::Leaf {
            parent_index: 0,
            primitive_index: 0,
        }
    }

    /// Builds a [`BvhNode`] recursively using SAH partitioning.
    /// Returns the depth of the deepest leaf.
    ///
    /// [`BvhNode`]: enum.BvhNode.html
    ///
    pub(crate) fn build<P: Bounded<T>>(args: BvhNodeBuildArgs<P, T>) -> usize {
        let depth = args.depth;
        match Self::prep_build(args) {
            Some((left, right)) => Self::build(left).max(Self::build(right)),
            None => depth,
        }
    }

    /// Builds a [`BvhNode`] recursively in parallel using SAH partitioning.
    /// Small subtrees are built on the current thread.
    ///
    /// [`BvhNode`]: enum.BvhNode.html
    ///
    #[cfg(feature = "rayon")]
    pub(crate) fn build_par<P: Bounded<T> + Sync>(args: BvhNodeBuildArgs<P, T>) -> usize {
        const PAR_THRESHOLD: usize = 64;

        let depth = args.depth;
        match Self::prep_build(args) {
            Some((left, right)) if left.indices.len() + right.indices.len() > PAR_THRESHOLD => {
                let (l_depth, r_depth) =
                    rayon::join(|| Self::build_par(left), || Self::build_par(right));
                l_depth.max(r_depth)
            }
            Some((left, right)) => Self::build(left).max(Self::build(right)),
            None => depth,
        }
    }

    /// Writes the node described by `args` and returns the build arguments of its children,
    /// or `None` for a leaf.
    fn prep_build<'a, P: Bounded<T>>(
        args: BvhNodeBuildArgs<'a, P, T>,
    ) -> Option<(BvhNodeBuildArgs<'a, P, T>, BvhNodeBuildArgs<'a, P, T>)> {
        let BvhNodeBuildArgs {
            primitives,
            indices,
            nodes,
            parent_index,
            node_index,
            depth,
            aabb_bounds,
            centroid_bounds,
        } = args;

        // If there is only one element left, don't split anymore
        if indices.len() == 1 {
            let primitive_index = indices[0];
            nodes[0] = BvhNode::Leaf {
                parent_index,
                primitive_index,
            };
            return None;
        }

        // Find the axis along which the primitives are spread the most.
        let split_axis = centroid_bounds.largest_axis();
        let split_axis_size = centroid_bounds.max[split_axis] - centroid_bounds.min[split_axis];

        let l_count = if split_axis_size < T::epsilon() {
            0
        } else {
            Self::partition_buckets(
                primitives,
                indices,
                split_axis,
                split_axis_size,
                &centroid_bounds,
                &aabb_bounds,
            )
        };

        // The primitives lie too close together to split them in a sensible way, or the
        // heuristic could not separate them. Split the list in half instead.
        let l_count = if l_count == 0 || l_count == indices.len() {
            indices.len() / 2
        } else {
            l_count
        };

        let (child_l_indices, child_r_indices) = indices.split_at_mut(l_count);
        let (child_l_aabb, child_l_centroid) = joint_aabb_of_shapes(child_l_indices, primitives);
        let (child_r_aabb, child_r_centroid) = joint_aabb_of_shapes(child_r_indices, primitives);

        let left_len = child_l_indices.len() * 2 - 1;
        let child_l_index = node_index + 1;
        let child_r_index = child_l_index + left_len;

        // Construct the actual data structure and replace the dummy node.
        nodes[0] = BvhNode::Node {
            parent_index,
            child_l_index,
            child_l_aabb,
            child_r_index,
            child_r_aabb,
        };

        let (l_nodes, r_nodes) = nodes[1..].split_at_mut(left_len);

        Some((
            BvhNodeBuildArgs {
                primitives,
                indices: child_l_indices,
                nodes: l_nodes,
                parent_index: node_index,
                node_index: child_l_index,
                depth: depth + 1,
                aabb_bounds: child_l_aabb,
                centroid_bounds: child_l_centroid,
            },
            BvhNodeBuildArgs {
                primitives,
                indices: child_r_indices,
                nodes: r_nodes,
                parent_index: node_index,
                node_index: child_r_index,
                depth: depth + 1,
                aabb_bounds: child_r_aabb,
                centroid_bounds: child_r_centroid,
            },
        ))
    }

    /// Sorts `indices` into six buckets along `split_axis` and picks the bucket boundary
    /// with the lowest surface area heuristic cost.
    /// Returns how many of the reordered indices belong to the left child.
    fn partition_buckets<P: Bounded<T>>(
        primitives: &[P],
        indices: &mut [usize],
        split_axis: usize,
        split_axis_size: T,
        centroid_bounds: &Aabb<T>,
        aabb_bounds: &Aabb<T>,
    ) -> usize {
        let bucket_scale = T::from_usize(NUM_BUCKETS).unwrap_or_else(T::one)
            - T::from_f32(0.01).unwrap_or_else(T::zero);
        let bucket_of = |index: usize| -> usize {
            let center = primitives[index].aabb().center();

            // Get the relative position of the primitive centroid `[0.0..1.0]`.
            let relative =
                (center[split_axis] - centroid_bounds.min[split_axis]) / split_axis_size;

            // Convert that to the actual `Bucket` number.
            (relative * bucket_scale)
                .to_usize()
                .unwrap_or(0)
                .min(NUM_BUCKETS - 1)
        };

        // Assign the primitives to `Bucket`s, grouping the indices by bucket.
        indices.sort_by_cached_key(|index| bucket_of(*index));
        let mut buckets = [Bucket::empty(); NUM_BUCKETS];
        for index in indices.iter() {
            buckets[bucket_of(*index)].add_aabb(&primitives[*index].aabb());
        }

        // Compute the costs for each configuration and select the best configuration.
        let mut min_bucket = 0;
        let mut min_cost = T::infinity();
        for i in 0..(NUM_BUCKETS - 1) {
            let (l_buckets, r_buckets) = buckets.split_at(i + 1);
            let child_l = l_buckets.iter().fold(Bucket::empty(), Bucket::join_bucket);
            let child_r = r_buckets.iter().fold(Bucket::empty(), Bucket::join_bucket);
            if child_l.size == 0 || child_r.size == 0 {
                continue;
            }

            let l_size = T::from_usize(child_l.size).unwrap_or_else(T::infinity);
            let r_size = T::from_usize(child_r.size).unwrap_or_else(T::infinity);
            let cost = (l_size * child_l.aabb.surface_area()
                + r_size * child_r.aabb.surface_area())
                / aabb_bounds.surface_area();
            if cost < min_cost {
                min_bucket = i;
                min_cost = cost;
            }
        }

        buckets[..=min_bucket].iter().map(|bucket| bucket.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::BvhNode;

    #[test]
    fn dummy_is_a_leaf() {
        let node = BvhNode::<f32>::create_dummy();
        assert!(node.is_leaf());
        assert_eq!(node.parent(), 0);
    }
}
