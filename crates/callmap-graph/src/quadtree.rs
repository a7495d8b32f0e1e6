//! Barnes-Hut quadtree for the many-body force.

use crate::graph::Vec2;

/// Below this squared distance the charge is softened.
const DISTANCE_MIN2: f32 = 1.0;
/// Depth cap so coincident bodies end up sharing a leaf.
const MAX_DEPTH: usize = 24;

#[derive(Debug)]
enum QuadBody {
    Leaf(Vec<usize>),
    Branch(Vec<usize>),
}

#[derive(Debug)]
struct Quad {
    size: f32,
    center: Vec2,
    weight: f32,
    body: QuadBody,
}

#[derive(Debug)]
pub(crate) struct QuadTree {
    quads: Vec<Quad>,
    strength: f32,
}

impl QuadTree {
    /// Every body carries the same `strength`.
    pub(crate) fn build(positions: &[Vec2], strength: f32) -> Self {
        let mut tree = Self {
            quads: Vec::new(),
            strength,
        };
        if positions.is_empty() {
            return tree;
        }

        let (mut min, mut max) = (positions[0], positions[0]);
        for p in positions {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        let size = (max.x - min.x).max(max.y - min.y).max(1.0);

        tree.build_quad(positions, (0..positions.len()).collect(), min, size, 0);
        tree
    }

    fn build_quad(
        &mut self,
        positions: &[Vec2],
        indices: Vec<usize>,
        min: Vec2,
        size: f32,
        depth: usize,
    ) -> usize {
        let slot = self.quads.len();
        let sum = indices
            .iter()
            .fold(Vec2::ZERO, |acc, &i| acc + positions[i]);
        self.quads.push(Quad {
            size,
            center: sum / indices.len() as f32,
            weight: self.strength * indices.len() as f32,
            body: QuadBody::Leaf(Vec::new()),
        });

        if indices.len() == 1 || depth >= MAX_DEPTH {
            self.quads[slot].body = QuadBody::Leaf(indices);
            return slot;
        }

        let half = size / 2.0;
        let mid = min + Vec2::new(half, half);
        let mut buckets: [Vec<usize>; 4] = Default::default();
        for i in indices {
            let p = positions[i];
            let quadrant = usize::from(p.x >= mid.x) | (usize::from(p.y >= mid.y) << 1);
            buckets[quadrant].push(i);
        }

        let mut children = Vec::with_capacity(4);
        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let child_min = Vec2::new(
                if quadrant & 1 == 1 { mid.x } else { min.x },
                if quadrant & 2 == 2 { mid.y } else { min.y },
            );
            children.push(self.build_quad(positions, bucket, child_min, half, depth + 1));
        }
        self.quads[slot].body = QuadBody::Branch(children);
        slot
    }

    /// Velocity change of body `index` from every other body.
    pub(crate) fn force_on(
        &self,
        index: usize,
        positions: &[Vec2],
        alpha: f32,
        theta2: f32,
        salt: u64,
    ) -> Vec2 {
        if self.quads.is_empty() {
            return Vec2::ZERO;
        }

        let origin = positions[index];
        let mut dv = Vec2::ZERO;
        let mut stack = vec![0usize];

        while let Some(q) = stack.pop() {
            let quad = &self.quads[q];
            let delta = quad.center - origin;
            let dist2 = delta.length_sq();

            // Far enough away: treat the whole cell as one body.
            if quad.size * quad.size / theta2 < dist2 {
                dv += pull(delta, dist2, quad.weight, alpha, salt ^ q as u64);
                continue;
            }

            match &quad.body {
                QuadBody::Branch(children) => stack.extend(children.iter().copied()),
                QuadBody::Leaf(bodies) => {
                    for &other in bodies {
                        if other == index {
                            continue;
                        }
                        let delta = positions[other] - origin;
                        let seed = salt ^ ((index as u64) << 32 | other as u64);
                        dv += pull(delta, delta.length_sq(), self.strength, alpha, seed);
                    }
                }
            }
        }
        dv
    }
}

fn pull(mut delta: Vec2, mut dist2: f32, weight: f32, alpha: f32, seed: u64) -> Vec2 {
    if delta.x == 0.0 {
        delta.x = jiggle(seed);
        dist2 += delta.x * delta.x;
    }
    if delta.y == 0.0 {
        delta.y = jiggle(seed.rotate_left(17));
        dist2 += delta.y * delta.y;
    }
    if dist2 < DISTANCE_MIN2 {
        dist2 = (DISTANCE_MIN2 * dist2).sqrt();
    }
    delta * (weight * alpha / dist2)
}

/// Tiny deterministic offset used to separate coincident points.
pub(crate) fn jiggle(seed: u64) -> f32 {
    // splitmix64
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    let unit = (z >> 40) as f32 / (1u64 << 24) as f32;
    (unit - 0.5) * 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(index: usize, positions: &[Vec2], strength: f32, alpha: f32) -> Vec2 {
        let mut dv = Vec2::ZERO;
        for (j, p) in positions.iter().enumerate() {
            if j == index {
                continue;
            }
            let delta = *p - positions[index];
            dv += delta * (strength * alpha / delta.length_sq());
        }
        dv
    }

    #[test]
    fn test_tiny_theta_matches_direct_sum() {
        let positions: Vec<Vec2> = (0..40)
            .map(|i| {
                let i = i as f32;
                Vec2::new((i * 37.0) % 200.0 - 100.0, (i * 53.0) % 170.0 - 85.0)
            })
            .collect();
        let tree = QuadTree::build(&positions, -300.0);
        for index in [0, 7, 39] {
            let approx = tree.force_on(index, &positions, 1.0, 1e-9, 0);
            let exact = brute_force(index, &positions, -300.0, 1.0);
            assert!((approx - exact).length() < 1e-3 * exact.length().max(1.0));
        }
    }

    #[test]
    fn test_charge_pushes_bodies_apart() {
        let positions = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let tree = QuadTree::build(&positions, -300.0);
        let dv = tree.force_on(0, &positions, 1.0, 0.81, 0);
        assert!(dv.x < 0.0);
        let dv = tree.force_on(1, &positions, 1.0, 0.81, 0);
        assert!(dv.x > 0.0);
    }

    #[test]
    fn test_coincident_bodies_still_separate() {
        let positions = vec![Vec2::new(5.0, 5.0); 3];
        let tree = QuadTree::build(&positions, -300.0);
        let dv = tree.force_on(0, &positions, 1.0, 0.81, 3);
        assert!(dv.x.is_finite() && dv.y.is_finite());
        assert!(dv.length() > 0.0);
    }

    #[test]
    fn test_jiggle_is_tiny_and_deterministic() {
        for seed in 0..100 {
            let j = jiggle(seed);
            assert!(j.abs() <= 0.5e-6);
            assert_eq!(j, jiggle(seed));
        }
    }
}
