use crate::graph::{CodeGraph, Vec2};
use crate::quadtree::{QuadTree, jiggle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tunables for the force layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Rest length of every edge spring.
    pub link_distance: f32,
    /// Many-body strength; negative values repel.
    pub charge_strength: f32,
    /// Minimum separation radius per node.
    pub collide_radius: f32,
    /// Barnes-Hut accuracy threshold.
    pub theta: f32,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
}

impl ForceConfig {
    pub const DEFAULT_LINK_DISTANCE: f32 = 150.0;
    pub const DEFAULT_CHARGE_STRENGTH: f32 = -300.0;
    pub const DEFAULT_COLLIDE_RADIUS: f32 = 40.0;
    pub const DEFAULT_THETA: f32 = 0.9;
    pub const DEFAULT_VELOCITY_DECAY: f32 = 0.4;
    pub const DEFAULT_ALPHA_MIN: f32 = 0.001;

    /// Decay that takes alpha from 1 to `alpha_min` in roughly 300 ticks.
    pub fn default_alpha_decay(alpha_min: f32) -> f32 {
        1.0 - alpha_min.powf(1.0 / 300.0)
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            link_distance: Self::DEFAULT_LINK_DISTANCE,
            charge_strength: Self::DEFAULT_CHARGE_STRENGTH,
            collide_radius: Self::DEFAULT_COLLIDE_RADIUS,
            theta: Self::DEFAULT_THETA,
            velocity_decay: Self::DEFAULT_VELOCITY_DECAY,
            alpha_min: Self::DEFAULT_ALPHA_MIN,
            alpha_decay: Self::default_alpha_decay(Self::DEFAULT_ALPHA_MIN),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    source: usize,
    target: usize,
    strength: f32,
    /// Share of the correction applied to the target.
    bias: f32,
}

/// Velocity-Verlet force simulation over the nodes of a [`CodeGraph`].
///
/// Each tick applies, in order, link springs, many-body repulsion, the
/// centering shift and collision separation, then integrates velocities.
#[derive(Debug, Clone)]
pub struct ForceSimulation {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    links: Vec<Link>,
    config: ForceConfig,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    ticks: u64,
}

impl ForceSimulation {
    const INITIAL_RADIUS: f32 = 10.0;

    pub fn new(graph: &CodeGraph, config: ForceConfig, center: Vec2) -> Self {
        let node_count = graph.node_count();
        let positions = (0..node_count).map(Self::initial_position).collect();

        let endpoints: Vec<(usize, usize)> = graph
            .edge_indices()
            .filter_map(|e| graph.edge_endpoints(e))
            .map(|(s, t)| (s.0, t.0))
            .collect();

        let mut degree = vec![0usize; node_count];
        for &(s, t) in &endpoints {
            degree[s] += 1;
            degree[t] += 1;
        }

        let links = endpoints
            .into_iter()
            .map(|(source, target)| Link {
                source,
                target,
                strength: 1.0 / degree[source].min(degree[target]) as f32,
                bias: degree[source] as f32 / (degree[source] + degree[target]) as f32,
            })
            .collect();

        tracing::debug!(
            "Starting force simulation for {} nodes and {} links",
            node_count,
            graph.edge_count()
        );

        Self {
            positions,
            velocities: vec![Vec2::ZERO; node_count],
            links,
            config,
            center,
            alpha: 1.0,
            alpha_target: 0.0,
            ticks: 0,
        }
    }

    /// Phyllotaxis spiral, so the first ticks start from distinct points.
    fn initial_position(index: usize) -> Vec2 {
        let angle_step = std::f32::consts::PI * (3.0 - 5f32.sqrt());
        let radius = Self::INITIAL_RADIUS * (0.5 + index as f32).sqrt();
        let angle = index as f32 * angle_step;
        Vec2::new(radius * angle.cos(), radius * angle.sin())
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Alpha has cooled below `alpha_min`; further ticks change little.
    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Move the centering target. Positions are not touched until the next tick.
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;

        self.apply_links(alpha);
        self.apply_charge(alpha);
        self.apply_center();
        self.apply_collide();

        let keep = 1.0 - self.config.velocity_decay;
        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *velocity = *velocity * keep;
            *position += *velocity;
        }
        self.ticks += 1;
    }

    fn salt(&self, force: u64) -> u64 {
        self.ticks.wrapping_mul(31).wrapping_add(force) << 40
    }

    fn apply_links(&mut self, alpha: f32) {
        let salt = self.salt(1);
        for (i, link) in self.links.iter().enumerate() {
            let (s, t) = (link.source, link.target);
            let mut delta =
                (self.positions[t] + self.velocities[t]) - (self.positions[s] + self.velocities[s]);
            if delta.x == 0.0 {
                delta.x = jiggle(salt ^ i as u64);
            }
            if delta.y == 0.0 {
                delta.y = jiggle((salt ^ i as u64).rotate_left(17));
            }
            let length = delta.length();
            let k = (length - self.config.link_distance) / length * alpha * link.strength;
            let delta = delta * k;
            self.velocities[t] -= delta * link.bias;
            self.velocities[s] += delta * (1.0 - link.bias);
        }
    }

    fn apply_charge(&mut self, alpha: f32) {
        if self.config.charge_strength == 0.0 {
            return;
        }
        let tree = QuadTree::build(&self.positions, self.config.charge_strength);
        let theta2 = self.config.theta * self.config.theta;
        let salt = self.salt(2);
        let positions = &self.positions;

        let deltas: Vec<Vec2> = (0..positions.len())
            .into_par_iter()
            .map(|i| tree.force_on(i, positions, alpha, theta2, salt))
            .collect();

        for (velocity, dv) in self.velocities.iter_mut().zip(deltas) {
            *velocity += dv;
        }
    }

    fn apply_center(&mut self) {
        if self.positions.is_empty() {
            return;
        }
        let sum = self
            .positions
            .iter()
            .fold(Vec2::ZERO, |acc, &p| acc + p);
        let shift = sum / self.positions.len() as f32 - self.center;
        for position in &mut self.positions {
            *position -= shift;
        }
    }

    /// Pairwise overlap resolution on predicted positions, bucketed in a
    /// uniform grid whose cell matches the contact distance.
    fn apply_collide(&mut self) {
        let radius = self.config.collide_radius;
        if radius <= 0.0 {
            return;
        }
        let contact = radius * 2.0;
        let cell_of = |p: Vec2| ((p.x / contact).floor() as i32, (p.y / contact).floor() as i32);

        let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        for (i, (p, v)) in self.positions.iter().zip(&self.velocities).enumerate() {
            grid.entry(cell_of(*p + *v)).or_default().push(i);
        }

        let salt = self.salt(3);
        for i in 0..self.positions.len() {
            let predicted = self.positions[i] + self.velocities[i];
            let (cx, cy) = cell_of(predicted);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy)) else {
                        continue;
                    };
                    for &j in bucket {
                        if j <= i {
                            continue;
                        }
                        let mut delta = predicted - (self.positions[j] + self.velocities[j]);
                        let mut dist2 = delta.length_sq();
                        if dist2 >= contact * contact {
                            continue;
                        }
                        let seed = salt ^ ((i as u64) << 20 | j as u64);
                        if delta.x == 0.0 {
                            delta.x = jiggle(seed);
                            dist2 += delta.x * delta.x;
                        }
                        if delta.y == 0.0 {
                            delta.y = jiggle(seed.rotate_left(17));
                            dist2 += delta.y * delta.y;
                        }
                        let length = dist2.sqrt();
                        // Equal radii split the correction evenly.
                        let push = delta * ((contact - length) / length * 0.5);
                        self.velocities[i] += push;
                        self.velocities[j] -= push;
                    }
                }
            }
        }
    }
}
