/*
This file is part of the Net Tracing Tool
Copyright (C) 2022 Novel-T

The Net Tracing Tool is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
use crate::geom::{Polygon, Rect};

fn collect_unique_y(poly: &Polygon) -> Vec<i32> {
    let mut ys: Vec<i32> = poly.pts.iter().map(|p| p.y).collect();
    ys.sort_unstable();
    ys.dedup();
    ys
}

// x positions where non horizontal edges cross the scan line, half open in
// y so a slab boundary is claimed by exactly one of the two slabs
fn x_crossings_at_y(poly: &Polygon, y: i32) -> Vec<i32> {
    let pts = &poly.pts;
    let n = pts.len();
    let mut xs = Vec::new();

    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        if a.y == b.y {
            continue;
        }
        let (y1, y2, x) = if a.y > b.y {
            (b.y, a.y, b.x)
        } else {
            (a.y, b.y, a.x)
        };
        if y <= y1 || y > y2 {
            continue;
        }
        xs.push(x);
    }

    xs.sort_unstable();
    xs
}

/// Decompose an orthogonal simple polygon into a disjoint cover of
/// rectangles, one horizontal slab per pair of consecutive vertex ys.
/// Degenerate input (zero width or height) yields no rectangles.
pub fn decompose_to_rects(poly: &Polygon) -> Vec<Rect> {
    let ys = collect_unique_y(poly);
    let mut rects = Vec::new();
    if ys.len() < 2 {
        return rects;
    }

    for w in ys.windows(2) {
        let (y0, y1) = (w[0], w[1]);
        let ymid = y0 + (y1 - y0) / 2;

        let xs = x_crossings_at_y(poly, ymid);
        for pair in xs.chunks_exact(2) {
            let (mut x0, mut x1) = (pair[0], pair[1]);
            if x0 > x1 {
                std::mem::swap(&mut x0, &mut x1);
            }
            if x0 == x1 {
                continue;
            }
            rects.push(Rect::new(x0, y0, x1, y1));
        }
    }

    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn total_area(rects: &[Rect]) -> i64 {
        rects
            .iter()
            .map(|r| (r.x2 as i64 - r.x1 as i64) * (r.y2 as i64 - r.y1 as i64))
            .sum()
    }

    #[test]
    fn test_decompose_square() {
        let rects = decompose_to_rects(&Polygon::rect(0, 0, 10, 10));
        assert_eq!(rects, vec![Rect::new(0, 0, 10, 10)]);
    }

    #[test]
    fn test_decompose_l_shape() {
        let l_shape = Polygon::new(vec![
            Point::new(0, 0),
            Point::new(20, 0),
            Point::new(20, 10),
            Point::new(10, 10),
            Point::new(10, 20),
            Point::new(0, 20),
        ]);
        let rects = decompose_to_rects(&l_shape);
        assert_eq!(
            rects,
            vec![Rect::new(0, 0, 20, 10), Rect::new(0, 10, 10, 20)]
        );
        assert_eq!(total_area(&rects), 300);
    }

    #[test]
    fn test_decompose_u_shape() {
        // two prongs over a common base
        let u_shape = Polygon::new(vec![
            Point::new(0, 0),
            Point::new(30, 0),
            Point::new(30, 20),
            Point::new(20, 20),
            Point::new(20, 10),
            Point::new(10, 10),
            Point::new(10, 20),
            Point::new(0, 20),
        ]);
        let rects = decompose_to_rects(&u_shape);
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 30, 10),
                Rect::new(0, 10, 10, 20),
                Rect::new(20, 10, 30, 20),
            ]
        );
        assert_eq!(total_area(&rects), 500);

        // disjoint interiors
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn test_decompose_degenerate() {
        // zero height polygon has a single slab candidate and no crossings
        let flat = Polygon::new(vec![
            Point::new(0, 5),
            Point::new(10, 5),
            Point::new(20, 5),
            Point::new(0, 5),
        ]);
        assert!(decompose_to_rects(&flat).is_empty());

        let thin = Polygon::rect(5, 0, 5, 10);
        assert!(decompose_to_rects(&thin).is_empty());
    }
}
