//! Star placement geometry

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Horizontal and bottom inset keeping the star fully on screen
pub const EDGE_MARGIN: f64 = 60.0;

/// Top inset leaving room for the title and score rows
pub const TOP_MARGIN: f64 = 120.0;

/// A point on the rendering surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(150.0, 300.0)
    }
}

/// Rectangle the star may be placed in (inclusive)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Placement area for a viewport of the given size.
    ///
    /// Applies [`EDGE_MARGIN`] to the left, right and bottom edges and [`TOP_MARGIN`]
    /// to the top edge.
    pub fn for_viewport(width: f64, height: f64) -> Self {
        Self::new(EDGE_MARGIN, width - EDGE_MARGIN, TOP_MARGIN, height - EDGE_MARGIN)
    }

    /// Whether `position` lies inside these bounds
    pub fn contains(&self, position: Position) -> bool {
        let (min_x, max_x) = ordered(self.min_x, self.max_x);
        let (min_y, max_y) = ordered(self.min_y, self.max_y);
        (min_x..=max_x).contains(&position.x) && (min_y..=max_y).contains(&position.y)
    }

    /// Uniformly random point inside the bounds.
    ///
    /// Infinite edges are clamped to the largest finite value and a NaN edge takes
    /// the value of the other edge. An axis whose range is empty or inverted
    /// collapses to its midpoint. The result is always finite.
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Position {
        Position::new(
            sample_axis(rng, self.min_x, self.max_x),
            sample_axis(rng, self.min_y, self.max_y),
        )
    }
}

fn sample_axis<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    let (min, max) = finite_edges(min, max);
    if min >= max {
        return min / 2.0 + max / 2.0;
    }

    if (max - min).is_finite() {
        rng.gen_range(min..=max)
    } else {
        // Span overflows f64; halving is exact, so sampling the halved range stays uniform
        rng.gen_range(min / 2.0..=max / 2.0) * 2.0
    }
}

fn finite_edges(min: f64, max: f64) -> (f64, f64) {
    let clamp = |v: f64| v.clamp(-f64::MAX, f64::MAX);
    match (min.is_nan(), max.is_nan()) {
        (true, true) => (0.0, 0.0),
        (true, false) => (clamp(max), clamp(max)),
        (false, true) => (clamp(min), clamp(min)),
        (false, false) => (clamp(min), clamp(max)),
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
