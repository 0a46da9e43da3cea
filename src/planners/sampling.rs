//! Sampling-based point-to-point planners (RRT and RRT*).
//!
//! Both planners grow a tree of collision-free segments from the start
//! point by steering toward random samples drawn inside a search
//! rectangle, with a configurable bias toward sampling the goal directly.
//! Start and goal must lie inside the search rectangle; either endpoint
//! outside it is rejected at entry.
//! RRT connects each new node to its nearest neighbor; RRT* additionally
//! picks the cheapest parent within `search_radius` and rewires existing
//! nodes through the new one when that lowers their cost.
//!
//! Randomness is injectable: [`plan_with_rng`](RrtPlanner::plan_with_rng)
//! takes any seedable [`Rng`], so tests can reproduce exact tree growth.
//! The plain [`plan`](RrtPlanner::plan) uses the thread RNG and is
//! nondeterministic across runs.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionChecker;
use crate::core::{Bounds, GeoBounds, GeoPoint, LocalPoint};
use crate::error::{PlanError, Result};
use crate::transform::CoordinateTransformer;

use super::{ensure_in_range, ensure_positive, CancelToken, Path};

/// Configuration shared by RRT and RRT*.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Maximum tree-growth distance per iteration, in meters (> 0). Also
    /// the goal-connection distance.
    pub step_size: f64,
    /// Probability of sampling the goal directly, in [0, 1].
    pub goal_sample_rate: f64,
    /// Sampling budget (> 0).
    pub max_iter: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            step_size: 10.0,
            goal_sample_rate: 0.1,
            max_iter: 1000,
        }
    }
}

impl SamplingConfig {
    /// Configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the growth step.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Builder-style setter for the goal bias.
    pub fn with_goal_sample_rate(mut self, rate: f64) -> Self {
        self.goal_sample_rate = rate;
        self
    }

    /// Builder-style setter for the sampling budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Validate the parameter invariants.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("step_size", self.step_size)?;
        ensure_in_range("goal_sample_rate", self.goal_sample_rate, 0.0, 1.0)?;
        ensure_positive("max_iter", self.max_iter as f64)
    }
}

/// Tree node. Parents are indices into the node vector, never pointers,
/// so rewiring is a plain index update.
#[derive(Clone, Copy, Debug)]
struct TreeNode {
    point: LocalPoint,
    parent: Option<usize>,
    cost: f64,
}

/// Rapidly-exploring random tree planner.
#[derive(Clone, Debug)]
pub struct RrtPlanner {
    config: SamplingConfig,
    checker: CollisionChecker,
}

impl RrtPlanner {
    /// Create a planner with the given configuration and no obstacles.
    pub fn new(config: SamplingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            checker: CollisionChecker::empty(),
        })
    }

    /// Builder-style setter attaching a collision checker.
    pub fn with_collision_checker(mut self, checker: CollisionChecker) -> Self {
        self.checker = checker;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Plan with the thread RNG (nondeterministic across runs).
    pub fn plan(&self, start: GeoPoint, goal: GeoPoint, search_area: &GeoBounds) -> Result<Option<Path>> {
        self.plan_with_rng(start, goal, search_area, &mut rand::thread_rng())
    }

    /// Plan with a caller-supplied random source.
    pub fn plan_with_rng<R: Rng>(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        search_area: &GeoBounds,
        rng: &mut R,
    ) -> Result<Option<Path>> {
        self.plan_with_cancel(start, goal, search_area, rng, &CancelToken::new())
    }

    /// Plan with cooperative cancellation, checked once per iteration.
    pub fn plan_with_cancel<R: Rng>(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        search_area: &GeoBounds,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> Result<Option<Path>> {
        grow_tree(
            &self.config,
            &self.checker,
            None,
            start,
            goal,
            search_area,
            rng,
            cancel,
        )
    }
}

/// RRT* planner: RRT with cheapest-parent selection and rewiring.
#[derive(Clone, Debug)]
pub struct RrtStarPlanner {
    config: SamplingConfig,
    search_radius: f64,
    checker: CollisionChecker,
}

impl RrtStarPlanner {
    /// Create a planner with the given configuration, neighbor radius, and
    /// no obstacles.
    pub fn new(config: SamplingConfig, search_radius: f64) -> Result<Self> {
        config.validate()?;
        ensure_positive("search_radius", search_radius)?;
        Ok(Self {
            config,
            search_radius,
            checker: CollisionChecker::empty(),
        })
    }

    /// Builder-style setter attaching a collision checker.
    pub fn with_collision_checker(mut self, checker: CollisionChecker) -> Self {
        self.checker = checker;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// The neighbor radius for parent selection and rewiring, in meters.
    pub fn search_radius(&self) -> f64 {
        self.search_radius
    }

    /// Plan with the thread RNG (nondeterministic across runs).
    pub fn plan(&self, start: GeoPoint, goal: GeoPoint, search_area: &GeoBounds) -> Result<Option<Path>> {
        self.plan_with_rng(start, goal, search_area, &mut rand::thread_rng())
    }

    /// Plan with a caller-supplied random source.
    pub fn plan_with_rng<R: Rng>(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        search_area: &GeoBounds,
        rng: &mut R,
    ) -> Result<Option<Path>> {
        self.plan_with_cancel(start, goal, search_area, rng, &CancelToken::new())
    }

    /// Plan with cooperative cancellation, checked once per iteration.
    pub fn plan_with_cancel<R: Rng>(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        search_area: &GeoBounds,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> Result<Option<Path>> {
        grow_tree(
            &self.config,
            &self.checker,
            Some(self.search_radius),
            start,
            goal,
            search_area,
            rng,
            cancel,
        )
    }
}

/// Shared tree-growth loop. `rewire_radius` is `Some` for RRT*.
#[allow(clippy::too_many_arguments)]
fn grow_tree<R: Rng>(
    config: &SamplingConfig,
    checker: &CollisionChecker,
    rewire_radius: Option<f64>,
    start: GeoPoint,
    goal: GeoPoint,
    search_area: &GeoBounds,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<Option<Path>> {
    // Both endpoints must lie inside the sampling window; otherwise the
    // tree would grow toward a point it can never legally sample around.
    if !search_area.contains(&start) {
        return Err(PlanError::OutsidePlanningArea { which: "start" });
    }
    if !search_area.contains(&goal) {
        return Err(PlanError::OutsidePlanningArea { which: "goal" });
    }

    if start == goal {
        return Ok(Some(Path::new(vec![start])));
    }

    let transformer = CoordinateTransformer::new(search_area.center())?;
    let local_start = transformer.geo_to_local(start)?;
    let local_goal = transformer.geo_to_local(goal)?;
    let sw = transformer.geo_to_local(search_area.south_west)?;
    let ne = transformer.geo_to_local(search_area.north_east)?;
    let area = Bounds::new(sw, ne);

    let mut nodes = vec![TreeNode {
        point: local_start,
        parent: None,
        cost: 0.0,
    }];

    for iter in 0..config.max_iter {
        if cancel.is_cancelled() {
            debug!("[Rrt] cancelled at iteration {iter}, {} nodes", nodes.len());
            return Ok(None);
        }

        let sample = if rng.gen::<f64>() < config.goal_sample_rate {
            local_goal
        } else {
            LocalPoint::new(
                rng.gen_range(area.min.x..=area.max.x),
                rng.gen_range(area.min.y..=area.max.y),
            )
        };

        // Nearest node, earliest index on ties.
        let (nearest_idx, nearest_dist) = match nearest_node(&nodes, sample) {
            Some(found) => found,
            None => continue,
        };
        if nearest_dist < 1e-12 {
            continue;
        }

        // Steer toward the sample by at most step_size.
        let nearest_point = nodes[nearest_idx].point;
        let candidate = if nearest_dist <= config.step_size {
            sample
        } else {
            nearest_point + (sample - nearest_point) * (config.step_size / nearest_dist)
        };

        if checker.is_segment_colliding(nearest_point, candidate) {
            continue;
        }

        let new_idx = match rewire_radius {
            None => {
                let cost = nodes[nearest_idx].cost + nearest_point.distance(&candidate);
                nodes.push(TreeNode {
                    point: candidate,
                    parent: Some(nearest_idx),
                    cost,
                });
                nodes.len() - 1
            }
            Some(radius) => insert_and_rewire(&mut nodes, checker, candidate, nearest_idx, radius),
        };

        // Goal connection attempt after every successful insertion.
        let goal_dist = nodes[new_idx].point.distance(&local_goal);
        if goal_dist <= config.step_size && !checker.is_segment_colliding(nodes[new_idx].point, local_goal)
        {
            let mut locals = back_trace(&nodes, new_idx);
            if goal_dist > 1e-9 {
                locals.push(local_goal);
            } else if let Some(last) = locals.last_mut() {
                *last = local_goal;
            }
            debug!(
                "[Rrt] goal reached at iteration {iter}: {} nodes, {} waypoints",
                nodes.len(),
                locals.len()
            );
            return Ok(Some(Path::new(transformer.local_to_geo_batch(&locals))));
        }
    }

    debug!("[Rrt] budget exhausted, {} nodes, no path", nodes.len());
    Ok(None)
}

fn nearest_node(nodes: &[TreeNode], sample: LocalPoint) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, node) in nodes.iter().enumerate() {
        let d = node.point.distance(&sample);
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((idx, d));
        }
    }
    best
}

/// RRT* insertion: pick the cheapest collision-free parent among the
/// neighbors within `radius`, then rewire neighbors through the new node
/// when that strictly lowers their cost.
fn insert_and_rewire(
    nodes: &mut Vec<TreeNode>,
    checker: &CollisionChecker,
    candidate: LocalPoint,
    nearest_idx: usize,
    radius: f64,
) -> usize {
    let neighbors: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.point.distance(&candidate) <= radius)
        .map(|(i, _)| i)
        .collect();

    // The nearest node was already checked collision-free by the caller.
    let mut parent = nearest_idx;
    let mut cost = nodes[nearest_idx].cost + nodes[nearest_idx].point.distance(&candidate);
    for &idx in &neighbors {
        if idx == nearest_idx {
            continue;
        }
        let c = nodes[idx].cost + nodes[idx].point.distance(&candidate);
        if c < cost && !checker.is_segment_colliding(nodes[idx].point, candidate) {
            parent = idx;
            cost = c;
        }
    }

    nodes.push(TreeNode {
        point: candidate,
        parent: Some(parent),
        cost,
    });
    let new_idx = nodes.len() - 1;

    for &idx in &neighbors {
        if idx == parent {
            continue;
        }
        let through_new = cost + candidate.distance(&nodes[idx].point);
        if through_new + 1e-12 < nodes[idx].cost
            && !checker.is_segment_colliding(candidate, nodes[idx].point)
        {
            let delta = nodes[idx].cost - through_new;
            nodes[idx].parent = Some(new_idx);
            nodes[idx].cost = through_new;
            propagate_cost_reduction(nodes, idx, delta);
        }
    }

    new_idx
}

/// Apply a cost reduction to every descendant of `root`.
fn propagate_cost_reduction(nodes: &mut [TreeNode], root: usize, delta: f64) {
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        for idx in 0..nodes.len() {
            if nodes[idx].parent == Some(current) {
                nodes[idx].cost -= delta;
                stack.push(idx);
            }
        }
    }
}

/// Walk parent back-references from `idx` to the root, returning the point
/// sequence root-first.
fn back_trace(nodes: &[TreeNode], idx: usize) -> Vec<LocalPoint> {
    let mut locals = Vec::new();
    let mut current = Some(idx);
    while let Some(i) = current {
        locals.push(nodes[i].point);
        current = nodes[i].parent;
    }
    locals.reverse();
    locals
}
