//! A* grid search over the boundary polygon.
//!
//! The planner discretizes the boundary's bounding box into an
//! 8-connected lattice and runs weighted A* over it. Setting
//! `heuristic_weight` to zero turns the very same search into Dijkstra,
//! since `f` degenerates to `g`; there is no separate code path.
//!
//! Ties in `f` are broken by insertion order, so identical inputs always
//! produce identical paths.

use std::collections::{BinaryHeap, HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionChecker;
use crate::core::{GeoPoint, LocalPoint};
use crate::error::{PlanError, Result};
use crate::polygon;
use crate::transform::CoordinateTransformer;

use super::{ensure_boundary, ensure_in_range, ensure_positive, vertex_mean, CancelToken, Path};

/// Distance estimate used to guide the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Straight-line distance. Admissible on an 8-connected grid.
    #[default]
    Euclidean,
    /// Axis-aligned distance sum. Can overestimate across diagonals, which
    /// trades optimality for speed at weights above zero.
    Manhattan,
}

impl Heuristic {
    fn estimate(self, a: LocalPoint, b: LocalPoint) -> f64 {
        match self {
            Heuristic::Euclidean => a.distance(&b),
            Heuristic::Manhattan => (a.x - b.x).abs() + (a.y - b.y).abs(),
        }
    }
}

/// Configuration for the grid-search planner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSearchConfig {
    /// Lattice resolution in meters (> 0). Also the orthogonal edge cost.
    pub step_size: f64,
    /// Distance estimate for the heuristic term.
    pub heuristic: Heuristic,
    /// Multiplier on the heuristic term (≥ 0). Zero yields Dijkstra, one
    /// standard A*, larger values greedier (and possibly suboptimal)
    /// search.
    pub heuristic_weight: f64,
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            step_size: 5.0,
            heuristic: Heuristic::Euclidean,
            heuristic_weight: 1.0,
        }
    }
}

impl GridSearchConfig {
    /// Configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the lattice resolution.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Builder-style setter for the heuristic.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Builder-style setter for the heuristic weight.
    pub fn with_heuristic_weight(mut self, weight: f64) -> Self {
        self.heuristic_weight = weight;
        self
    }

    /// Validate the parameter invariants.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("step_size", self.step_size)?;
        ensure_in_range("heuristic_weight", self.heuristic_weight, 0.0, f64::INFINITY)
    }
}

/// Open-set entry. Ordered by lowest `f` first, then earliest insertion,
/// inverted so `BinaryHeap` pops the minimum.
#[derive(Debug)]
struct OpenEntry {
    f: f64,
    seq: u64,
    cell: (i64, i64),
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Point-to-point planner running weighted A* on an 8-connected lattice.
#[derive(Clone, Debug)]
pub struct AStarPlanner {
    config: GridSearchConfig,
    checker: CollisionChecker,
}

impl AStarPlanner {
    /// Create a planner with the given configuration and no obstacles.
    pub fn new(config: GridSearchConfig) -> Result<Self> {
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
    pub fn config(&self) -> &GridSearchConfig {
        &self.config
    }

    /// Plan a path from `start` to `goal` inside `boundary`.
    ///
    /// Returns `Ok(None)` when the open set is exhausted without reaching
    /// the goal. Start or goal outside the boundary (or inside an
    /// obstacle) is a caller error and fails fast.
    pub fn plan(&self, start: GeoPoint, goal: GeoPoint, boundary: &[GeoPoint]) -> Result<Option<Path>> {
        self.plan_with_cancel(start, goal, boundary, &CancelToken::new())
    }

    /// [`plan`](AStarPlanner::plan) with cooperative cancellation, checked
    /// once per expanded node.
    pub fn plan_with_cancel(
        &self,
        start: GeoPoint,
        goal: GeoPoint,
        boundary: &[GeoPoint],
        cancel: &CancelToken,
    ) -> Result<Option<Path>> {
        ensure_boundary(boundary)?;

        let transformer = CoordinateTransformer::new(vertex_mean(boundary))?;
        let local_boundary = transformer.geo_to_local_batch(boundary)?;
        let local_start = transformer.geo_to_local(start)?;
        let local_goal = transformer.geo_to_local(goal)?;

        self.ensure_usable(&local_boundary, local_start, "start")?;
        self.ensure_usable(&local_boundary, local_goal, "goal")?;

        let step = self.config.step_size;
        let bbox = polygon::bounding_box(&local_boundary);
        let cols = (bbox.width() / step).floor() as i64;
        let rows = (bbox.height() / step).floor() as i64;

        let cell_pos = |cell: (i64, i64)| -> LocalPoint {
            LocalPoint::new(
                bbox.min.x + cell.0 as f64 * step,
                bbox.min.y + cell.1 as f64 * step,
            )
        };
        let cell_valid = |cell: (i64, i64)| -> bool {
            cell.0 >= 0
                && cell.0 <= cols
                && cell.1 >= 0
                && cell.1 <= rows
                && {
                    let p = cell_pos(cell);
                    polygon::contains_point(&local_boundary, p) && !self.checker.is_point_colliding(p)
                }
        };

        let start_cell = match self.anchor_cell(local_start, &bbox, &cell_valid) {
            Some(cell) => cell,
            None => {
                debug!("[AStar] no valid lattice cell near start");
                return Ok(None);
            }
        };

        debug!(
            "[AStar] search: {}x{} lattice, step {:.1}m, weight {:.2}",
            cols + 1,
            rows + 1,
            step,
            self.config.heuristic_weight
        );

        let mut open = BinaryHeap::new();
        let mut g_scores: HashMap<(i64, i64), f64> = HashMap::new();
        let mut came_from: HashMap<(i64, i64), (i64, i64)> = HashMap::new();
        let mut closed: HashSet<(i64, i64)> = HashSet::new();
        let mut seq: u64 = 0;

        g_scores.insert(start_cell, 0.0);
        open.push(OpenEntry {
            f: self.config.heuristic_weight
                * self.config.heuristic.estimate(cell_pos(start_cell), local_goal),
            seq,
            cell: start_cell,
        });

        let goal_tolerance = step * 0.5;
        let mut expanded = 0usize;

        while let Some(entry) = open.pop() {
            if cancel.is_cancelled() {
                debug!("[AStar] cancelled after {expanded} expansions");
                return Ok(None);
            }
            let cell = entry.cell;
            if !closed.insert(cell) {
                continue;
            }
            expanded += 1;

            let pos = cell_pos(cell);
            if pos.distance(&local_goal) <= goal_tolerance {
                let path = self.reconstruct(
                    &transformer,
                    &came_from,
                    cell,
                    &cell_pos,
                    local_start,
                    local_goal,
                );
                debug!(
                    "[AStar] found path: {} waypoints, {} expansions",
                    path.len(),
                    expanded
                );
                return Ok(Some(path));
            }

            let g = g_scores[&cell];
            for (dx, dy) in NEIGHBOR_OFFSETS {
                let neighbor = (cell.0 + dx, cell.1 + dy);
                if closed.contains(&neighbor) || !cell_valid(neighbor) {
                    continue;
                }
                let move_cost = if dx != 0 && dy != 0 {
                    step * std::f64::consts::SQRT_2
                } else {
                    step
                };
                let tentative = g + move_cost;
                if g_scores
                    .get(&neighbor)
                    .is_some_and(|&best| tentative >= best)
                {
                    continue;
                }
                g_scores.insert(neighbor, tentative);
                came_from.insert(neighbor, cell);
                seq += 1;
                open.push(OpenEntry {
                    f: tentative
                        + self.config.heuristic_weight
                            * self.config.heuristic.estimate(cell_pos(neighbor), local_goal),
                    seq,
                    cell: neighbor,
                });
            }
        }

        debug!("[AStar] open set exhausted after {expanded} expansions");
        Ok(None)
    }

    /// Fail fast when a query endpoint is outside the boundary or inside
    /// an obstacle.
    fn ensure_usable(
        &self,
        local_boundary: &[LocalPoint],
        point: LocalPoint,
        which: &'static str,
    ) -> Result<()> {
        if !polygon::contains_point(local_boundary, point) || self.checker.is_point_colliding(point) {
            return Err(PlanError::OutsidePlanningArea { which });
        }
        Ok(())
    }

    /// Nearest valid lattice cell to `point`, checking the rounded cell
    /// first and then its 8 neighbors.
    fn anchor_cell(
        &self,
        point: LocalPoint,
        bbox: &crate::core::Bounds,
        cell_valid: &impl Fn((i64, i64)) -> bool,
    ) -> Option<(i64, i64)> {
        let step = self.config.step_size;
        let cell = (
            ((point.x - bbox.min.x) / step).round() as i64,
            ((point.y - bbox.min.y) / step).round() as i64,
        );
        if cell_valid(cell) {
            return Some(cell);
        }
        NEIGHBOR_OFFSETS
            .iter()
            .map(|(dx, dy)| (cell.0 + dx, cell.1 + dy))
            .find(|&c| cell_valid(c))
    }

    /// Walk the parent chain back to the start, then emit the exact query
    /// endpoints in place of their anchor cells.
    fn reconstruct(
        &self,
        transformer: &CoordinateTransformer,
        came_from: &HashMap<(i64, i64), (i64, i64)>,
        goal_cell: (i64, i64),
        cell_pos: &impl Fn((i64, i64)) -> LocalPoint,
        local_start: LocalPoint,
        local_goal: LocalPoint,
    ) -> Path {
        let mut cells = vec![goal_cell];
        let mut current = goal_cell;
        while let Some(&parent) = came_from.get(&current) {
            cells.push(parent);
            current = parent;
        }
        cells.reverse();

        let mut locals: Vec<LocalPoint> = cells.into_iter().map(cell_pos).collect();
        locals[0] = local_start;
        locals.push(local_goal);
        Path::new(transformer.local_to_geo_batch(&locals))
    }
}
