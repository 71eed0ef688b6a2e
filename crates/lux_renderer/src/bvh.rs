//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Uses a binary tree over the scene's triangles for efficient ray-scene
//! intersection testing. The tree is built once, single-threaded, and only
//! read while rendering.

use std::sync::Arc;

use lux_math::{Aabb, Ray};

use crate::hittable::Hittable;
use crate::Triangle;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with triangles.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of triangles.
    Leaf {
        triangles: Vec<Arc<Triangle>>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

/// Shape of a built tree, for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
    pub triangles: usize,
}

impl BvhNode {
    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort triangles by centroid on the
    /// node box's longest axis, split in half, recurse.
    fn build(mut triangles: Vec<Arc<Triangle>>) -> Self {
        let n = triangles.len();
        if n == 0 {
            return BvhNode::Empty;
        }

        // Compute bounding box of all triangles
        let bbox = triangles.iter().fold(Aabb::EMPTY, |mut acc, t| {
            acc.expand_to_include_box(&t.bounding_box());
            acc
        });

        // Create leaf for small sets
        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf { triangles, bbox };
        }

        let axis = bbox.longest_axis();
        triangles.sort_by(|a, b| a.centroid()[axis].total_cmp(&b.centroid()[axis]));

        // Split at midpoint
        let right_triangles = triangles.split_off(n / 2);
        let left = Self::build(triangles);
        let right = Self::build(right_triangles);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Nearest triangle hit below `best`, or the caller's `(None, best)`
    /// unchanged.
    fn intersect<'a>(&'a self, ray: &Ray, best: f64) -> (Option<&'a Arc<Triangle>>, f64) {
        match self {
            BvhNode::Empty => (None, best),

            BvhNode::Leaf { triangles, bbox } => {
                if !bbox.intersect(ray) {
                    return (None, best);
                }

                let mut closest = best;
                let mut found = None;
                for triangle in triangles {
                    let t = triangle.hit(ray);
                    if t < closest {
                        closest = t;
                        found = Some(triangle);
                    }
                }
                (found, closest)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.intersect(ray) {
                    return (None, best);
                }

                let (left_hit, left_t) = left.intersect(ray, best);
                // Only check right up to closest hit
                let (right_hit, right_t) = right.intersect(ray, left_t);

                match right_hit {
                    Some(_) => (right_hit, right_t),
                    None => (left_hit, left_t),
                }
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    fn collect_stats(&self, depth: usize, stats: &mut BvhStats) {
        stats.nodes += 1;
        stats.depth = stats.depth.max(depth);
        match self {
            BvhNode::Empty => {}
            BvhNode::Leaf { triangles, .. } => {
                stats.leaves += 1;
                stats.triangles += triangles.len();
            }
            BvhNode::Branch { left, right, .. } => {
                left.collect_stats(depth + 1, stats);
                right.collect_stats(depth + 1, stats);
            }
        }
    }
}

/// A built BVH over a snapshot of triangles.
#[derive(Debug)]
pub struct Bvh {
    root: BvhNode,
    triangle_count: usize,
}

impl Bvh {
    /// Build a tree over `triangles`. The slice is cloned (cheaply, the
    /// triangles are shared) so the caller's order is left untouched.
    pub fn build(triangles: &[Arc<Triangle>]) -> Self {
        Self {
            root: BvhNode::build(triangles.to_vec()),
            triangle_count: triangles.len(),
        }
    }

    /// Nearest triangle along `ray`, or `(None, f64::INFINITY)`.
    pub fn intersect(&self, ray: &Ray) -> (Option<&Arc<Triangle>>, f64) {
        self.root.intersect(ray, f64::INFINITY)
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }

    /// Number of triangles the tree was built over.
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        self.root.collect_stats(0, &mut stats);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_vec(rng: &mut StdRng, range: f64) -> Vec3 {
        Vec3::new(
            rng.gen_range(-range..range),
            rng.gen_range(-range..range),
            rng.gen_range(-range..range),
        )
    }

    fn random_triangles(rng: &mut StdRng, count: usize) -> Vec<Arc<Triangle>> {
        (0..count)
            .map(|_| {
                let center = random_vec(rng, 50.0);
                Arc::new(Triangle::new(
                    center + random_vec(rng, 2.0),
                    center + random_vec(rng, 2.0),
                    center + random_vec(rng, 2.0),
                ))
            })
            .collect()
    }

    fn brute_force(triangles: &[Arc<Triangle>], ray: &Ray) -> f64 {
        triangles
            .iter()
            .map(|t| t.hit(ray))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = Bvh::build(&[]);
        assert!(matches!(bvh.root(), BvhNode::Empty));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let (hit, t) = bvh.intersect(&ray);
        assert!(hit.is_none());
        assert_eq!(t, f64::INFINITY);
    }

    #[test]
    fn test_bvh_single_triangle() {
        let triangle = Arc::new(Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        ));
        let bvh = Bvh::build(&[triangle.clone()]);

        // Should create a leaf
        assert!(matches!(bvh.root(), BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let (hit, t) = bvh.intersect(&ray);
        assert!(Arc::ptr_eq(hit.unwrap(), &triangle));
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bvh_picks_nearest_of_stacked_triangles() {
        // Ten triangles stacked along -Z, listed far to near
        let triangles: Vec<_> = (0..10)
            .rev()
            .map(|i| {
                let z = -(i as f64) - 1.0;
                Arc::new(Triangle::new(
                    Vec3::new(-1.0, -1.0, z),
                    Vec3::new(1.0, -1.0, z),
                    Vec3::new(0.0, 1.0, z),
                ))
            })
            .collect();
        let bvh = Bvh::build(&triangles);
        assert!(matches!(bvh.root(), BvhNode::Branch { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let (hit, t) = bvh.intersect(&ray);
        assert!(hit.is_some());
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bvh_stats() {
        let mut rng = StdRng::seed_from_u64(3);
        let triangles = random_triangles(&mut rng, 100);
        let stats = Bvh::build(&triangles).stats();

        assert_eq!(stats.triangles, 100);
        assert_eq!(stats.nodes, 2 * stats.leaves - 1);
        assert!(stats.leaves >= 100 / LEAF_MAX_SIZE);
        assert!(stats.depth >= 5);
    }

    #[test]
    fn test_bvh_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let triangles = random_triangles(&mut rng, 10_000);
        let bvh = Bvh::build(&triangles);
        assert_eq!(bvh.triangle_count(), 10_000);

        let mut hits = 0;
        for _ in 0..1_000 {
            let origin = random_vec(&mut rng, 60.0);
            let target = random_vec(&mut rng, 50.0);
            let ray = Ray::new(origin, target - origin);

            let expected = brute_force(&triangles, &ray);
            let (hit, t) = bvh.intersect(&ray);

            assert_eq!(hit.is_some(), expected.is_finite());
            if expected.is_finite() {
                hits += 1;
                assert!((t - expected).abs() < 1e-9, "bvh {t} vs brute force {expected}");
            } else {
                assert_eq!(t, f64::INFINITY);
            }
        }
        assert!(hits > 0);
    }
}
