use super::types::{Configuration, SquarePoint};
use super::types::SquarePoint::*;

/// Point list for each configuration, in boundary order around the active
/// region so a fan from the first point covers it.
///
/// Saddles (5, 10) use a fixed 6-point fan that links the two diagonal
/// corners through the square; there is no centre-sample disambiguation.
pub fn case_points(configuration: Configuration) -> &'static [SquarePoint] {
    match configuration.bits() {
        0 => &[],

        // 1 point:
        1 => &[CenterLeft, CenterBottom, BottomLeft],
        2 => &[BottomRight, CenterBottom, CenterRight],
        4 => &[TopRight, CenterRight, CenterTop],
        8 => &[TopLeft, CenterTop, CenterLeft],

        // 2 points:
        3 => &[CenterRight, BottomRight, BottomLeft, CenterLeft],
        6 => &[CenterTop, TopRight, BottomRight, CenterBottom],
        9 => &[TopLeft, CenterTop, CenterBottom, BottomLeft],
        12 => &[TopLeft, TopRight, CenterRight, CenterLeft],
        5 => &[CenterTop, TopRight, CenterRight, CenterBottom, BottomLeft, CenterLeft],
        10 => &[TopLeft, CenterTop, CenterRight, BottomRight, CenterBottom, CenterLeft],

        // 3 points:
        7 => &[CenterTop, TopRight, BottomRight, BottomLeft, CenterLeft],
        11 => &[TopLeft, CenterTop, CenterRight, BottomRight, BottomLeft],
        13 => &[TopLeft, TopRight, CenterRight, CenterBottom, BottomLeft],
        14 => &[TopLeft, TopRight, BottomRight, CenterBottom, CenterLeft],

        // 4 points:
        15 => &[TopLeft, TopRight, BottomRight, BottomLeft],

        _ => &[],
    }
}

/// Fan triangles over `points`: `(p0, p1, p2)`, `(p0, p2, p3)`, ...
pub fn fan_triangles<T: Copy>(points: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    (2..points.len()).map(move |i| [points[0], points[i - 1], points[i]])
}
