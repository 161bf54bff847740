//! Nearest-neighbor search over point sets.

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use log::debug;
use rayon::prelude::*;

use mc::math::Point3;
use mc::render::World;
use mc::render::bake::{NearestNeighbors, Neighbor};

/// Errors returned when building a [`KdIndex`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The point set is empty.
    #[error("cannot index an empty point set")]
    Empty,
    /// A point has a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// A k-d tree over a set of 3D points.
///
/// Queries return indices into the slice the index was built from. Points
/// at exactly the same position are indexed once, under the lowest index.
/// Batched queries are answered in parallel.
pub struct KdIndex {
    tree: ImmutableKdTree<f64, 3>,
    /// Index into the source slice of each point in the tree.
    ids: Vec<usize>,
    len: usize,
}

impl KdIndex {
    /// Builds an index of `points`.
    ///
    /// # Errors
    /// [`Error::Empty`] if `points` is empty, or [`Error::NonFinite`] if a
    /// point has a NaN or infinite coordinate.
    pub fn build(points: &[Point3<World>]) -> Result<Self, Error> {
        if points.is_empty() {
            return Err(Error::Empty);
        }
        if let Some(index) = points.iter().position(|p| !is_finite(p)) {
            return Err(Error::NonFinite { index });
        }

        let mut ids: Vec<usize> = (0..points.len()).collect();
        ids.sort_by(|&a, &b| {
            let (a, b) = (coords(&points[a]), coords(&points[b]));
            a.iter()
                .zip(&b)
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        // Stable sort keeps the lowest index first among equal positions
        ids.dedup_by(|a, b| coords(&points[*a]) == coords(&points[*b]));

        let unique: Vec<_> = ids.iter().map(|&i| coords(&points[i])).collect();
        let tree = ImmutableKdTree::new_from_slice(&unique);
        debug!(
            "built k-d tree of {} points ({} distinct)",
            points.len(),
            unique.len()
        );
        Ok(Self { tree, ids, len: points.len() })
    }

    /// Returns the number of indexed points, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the index is empty. Always false for a built index.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the indexed point nearest to `query`.
    pub fn nearest_one(&self, query: &Point3<World>) -> Neighbor {
        let nn = self.tree.nearest_one::<SquaredEuclidean>(&coords(query));
        Neighbor {
            index: self.ids[nn.item as usize],
            dist_sqr: nn.distance,
        }
    }
}

impl NearestNeighbors for KdIndex {
    type Error = core::convert::Infallible;

    fn nearest(
        &self,
        queries: &[Point3<World>],
    ) -> Result<Vec<Neighbor>, Self::Error> {
        Ok(queries.par_iter().map(|q| self.nearest_one(q)).collect())
    }
}

impl core::fmt::Debug for KdIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KdIndex")
            .field("len", &self.len)
            .field("distinct", &self.ids.len())
            .finish_non_exhaustive()
    }
}

fn coords(p: &Point3<World>) -> [f64; 3] {
    [p.x(), p.y(), p.z()]
}

fn is_finite(p: &Point3<World>) -> bool {
    coords(p).iter().all(|c| c.is_finite())
}
