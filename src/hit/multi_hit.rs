use nalgebra::SimdPartialOrd;

use super::{blend_mask, Hit};
use crate::scalar::{Mask, RayScalar};

/// The `N` closest accepted hits of a multi-hit traversal, per lane in ascending order
/// of distance. Slots past the number of hits found hold misses.
#[derive(Debug, Clone, Copy)]
pub struct MultiHitRecord<H, const N: usize> {
    /// The hits, closest first.
    pub hits: [H; N],
}

impl<H: Hit, const N: usize> MultiHitRecord<H, N> {
    /// A record without any hit.
    pub fn empty() -> Self {
        MultiHitRecord {
            hits: [H::miss(); N],
        }
    }

    /// The slot which decides whether a candidate is still admitted: the farthest one.
    /// It is a miss in every lane which has capacity left.
    pub fn worst(&self) -> H {
        self.hits.last().copied().unwrap_or_else(H::miss)
    }

    /// Inserts `candidate` in the lanes of `mask`, keeping every lane sorted.
    ///
    /// The candidate goes in front of the first slot which is either empty or strictly
    /// farther away, so hits at equal distance keep their insertion order. Every later slot
    /// shifts back by one and the last one drops out.
    pub fn insert(&mut self, candidate: H, mask: Mask<H::Scalar>) {
        let mut carry = candidate;
        let mut pending = mask;
        let mut shifting = H::Scalar::none_mask();

        for slot in self.hits.iter_mut() {
            let closer = carry.distance().simd_lt(slot.distance());
            let write = shifting | (pending & (!slot.is_hit() | closer));
            let displaced = *slot;
            *slot = carry.blend(write, displaced);
            carry = displaced.blend(write, carry);
            shifting = write;
            pending = blend_mask(write, H::Scalar::none_mask(), pending);
        }
    }

    /// Iterates over the slots, closest first.
    pub fn iter(&self) -> core::slice::Iter<'_, H> {
        self.hits.iter()
    }
}

impl<H: Hit, const N: usize> Default for MultiHitRecord<H, N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, H, const N: usize> IntoIterator for &'a MultiHitRecord<H, N> {
    type Item = &'a H;
    type IntoIter = core::slice::Iter<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
