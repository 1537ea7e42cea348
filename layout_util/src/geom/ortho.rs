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
use crate::geom::{Point, Polygon};

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let (x, y) = (p.x as i64, p.y as i64);
    let (x1, y1) = (a.x as i64, a.y as i64);
    let (x2, y2) = (b.x as i64, b.y as i64);

    if (x2 - x1) * (y - y1) != (y2 - y1) * (x - x1) {
        return false;
    }

    x1.min(x2) <= x && x <= x1.max(x2) && y1.min(y2) <= y && y <= y1.max(y2)
}

/// True when the point is inside the polygon or on its boundary.
///
/// Boundary hits are detected with an exact colinearity test, everything else
/// by a crossing count on a +x ray. Edges count half open in y, (y1, y2], so
/// a vertex shared by two edges is counted once.
pub fn point_in_poly_inclusive(pt: Point, poly: &Polygon) -> bool {
    let pts = &poly.pts;
    let n = pts.len();

    for i in 0..n {
        if on_segment(pt, pts[i], pts[(i + 1) % n]) {
            return true;
        }
    }

    let mut inside = false;
    let (x, y) = (pt.x as i64, pt.y as i64);

    for i in 0..n {
        let mut x1 = pts[i].x as i64;
        let mut y1 = pts[i].y as i64;
        let mut x2 = pts[(i + 1) % n].x as i64;
        let mut y2 = pts[(i + 1) % n].y as i64;

        if y1 > y2 {
            std::mem::swap(&mut y1, &mut y2);
            std::mem::swap(&mut x1, &mut x2);
        }
        if y <= y1 || y > y2 {
            continue;
        }

        let dy = y2 - y1;
        let left = x1 * dy + (x2 - x1) * (y - y1);
        if left >= x * dy {
            inside = !inside;
        }
    }

    inside
}

fn seg_intersect_manhattan(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let a_vert = a1.x == a2.x;
    let a_horiz = a1.y == a2.y;
    let b_vert = b1.x == b2.x;
    let b_horiz = b1.y == b2.y;

    if (a_vert || a_horiz) && (b_vert || b_horiz) {
        if a_vert && b_horiz {
            let ax = a1.x;
            let by = b1.y;
            return b1.x.min(b2.x) <= ax
                && ax <= b1.x.max(b2.x)
                && a1.y.min(a2.y) <= by
                && by <= a1.y.max(a2.y);
        }
        if a_horiz && b_vert {
            return seg_intersect_manhattan(b1, b2, a1, a2);
        }
        if a_vert && b_vert {
            if a1.x != b1.x {
                return false;
            }
            let (alo, ahi) = (a1.y.min(a2.y), a1.y.max(a2.y));
            let (blo, bhi) = (b1.y.min(b2.y), b1.y.max(b2.y));
            return !(ahi < blo || bhi < alo);
        }
        if a_horiz && b_horiz {
            if a1.y != b1.y {
                return false;
            }
            let (alo, ahi) = (a1.x.min(a2.x), a1.x.max(a2.x));
            let (blo, bhi) = (b1.x.min(b2.x), b1.x.max(b2.x));
            return !(ahi < blo || bhi < alo);
        }
    }

    // non orthogonal edge, fall back to segment bbox overlap
    let (aminx, amaxx) = (a1.x.min(a2.x), a1.x.max(a2.x));
    let (aminy, amaxy) = (a1.y.min(a2.y), a1.y.max(a2.y));
    let (bminx, bmaxx) = (b1.x.min(b2.x), b1.x.max(b2.x));
    let (bminy, bmaxy) = (b1.y.min(b2.y), b1.y.max(b2.y));
    !(amaxx < bminx || bmaxx < aminx || amaxy < bminy || bmaxy < aminy)
}

/// True when the two polygons share at least one point, boundary included.
///
/// Bounding box reject, then every edge pair, then mutual containment of one
/// vertex to catch full nesting.
pub fn poly_intersect(a: &Polygon, b: &Polygon) -> bool {
    if !a.bbox_overlaps(b) {
        return false;
    }

    let pa = &a.pts;
    let pb = &b.pts;
    let na = pa.len();
    let nb = pb.len();

    for i in 0..na {
        let a1 = pa[i];
        let a2 = pa[(i + 1) % na];
        for j in 0..nb {
            if seg_intersect_manhattan(a1, a2, pb[j], pb[(j + 1) % nb]) {
                return true;
            }
        }
    }

    point_in_poly_inclusive(pa[0], b) || point_in_poly_inclusive(pb[0], a)
}
