//! Spatial neighbor search over normalized page coordinates.
//!
//! Coordinates have their origin in the bottom-left corner of the page, so
//! "below" means a smaller `y`. Both searches are a single linear scan.

use crate::ocr::TextObservation;

/// Nearest observations to the right of and below an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors {
    pub right: Option<usize>,
    pub below: Option<usize>,
}

impl Neighbors {
    /// Right neighbor first, then the one below.
    pub fn candidates(&self) -> [Option<usize>; 2] {
        [self.right, self.below]
    }
}

/// Find both neighbors of the observation at `anchor`.
pub fn neighbors(anchor: usize, observations: &[TextObservation], tolerance: f32) -> Neighbors {
    Neighbors {
        right: closest_to_the_right(anchor, observations, tolerance),
        below: closest_below(anchor, observations, tolerance),
    }
}

/// Closest observation on the same text line, starting at or after the
/// anchor's right edge.
///
/// Line alignment compares the candidate's bottom-left `y` with the anchor's
/// bottom-right `y`. Ties keep the earliest observation.
pub fn closest_to_the_right(
    anchor: usize,
    observations: &[TextObservation],
    tolerance: f32,
) -> Option<usize> {
    let bottom_right = observations.get(anchor)?.bottom_right();

    let mut shortest = f32::INFINITY;
    let mut closest = None;

    for (index, observation) in observations.iter().enumerate() {
        if index == anchor {
            continue;
        }

        let bottom_left = observation.bottom_left();

        // Not on the same line; a NaN tolerance aligns nothing
        let on_line = (bottom_left.y - bottom_right.y).abs() <= tolerance;
        if !on_line {
            continue;
        }

        // To the left
        if bottom_left.x < bottom_right.x {
            continue;
        }

        let distance = bottom_left.x - bottom_right.x;
        if distance < shortest {
            shortest = distance;
            closest = Some(index);
        }
    }

    closest
}

/// Closest observation in the same column, at or below the anchor.
///
/// Column alignment compares bottom-left `x` coordinates. Ties keep the
/// earliest observation.
pub fn closest_below(
    anchor: usize,
    observations: &[TextObservation],
    tolerance: f32,
) -> Option<usize> {
    let anchor_bottom_left = observations.get(anchor)?.bottom_left();

    let mut shortest = f32::INFINITY;
    let mut closest = None;

    for (index, observation) in observations.iter().enumerate() {
        if index == anchor {
            continue;
        }

        let bottom_left = observation.bottom_left();

        // Not in the same column
        let in_column = (bottom_left.x - anchor_bottom_left.x).abs() <= tolerance;
        if !in_column {
            continue;
        }

        // Above
        if bottom_left.y > anchor_bottom_left.y {
            continue;
        }

        let distance = anchor_bottom_left.y - bottom_left.y;
        if distance < shortest {
            shortest = distance;
            closest = Some(index);
        }
    }

    closest
}
