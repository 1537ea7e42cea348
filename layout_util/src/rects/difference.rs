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
use crate::geom::Rect;

// Pieces of a after removing the overlap with b, emitted top, bottom,
// left, right. Degenerate pieces are not emitted.
fn subtract_one(a: Rect, b: Rect, out: &mut Vec<Rect>) {
    if !a.overlaps(&b) {
        out.push(a);
        return;
    }

    let ix1 = a.x1.max(b.x1);
    let iy1 = a.y1.max(b.y1);
    let ix2 = a.x2.min(b.x2);
    let iy2 = a.y2.min(b.y2);
    if ix1 >= ix2 || iy1 >= iy2 {
        out.push(a);
        return;
    }

    if iy2 < a.y2 {
        out.push(Rect::new(a.x1, iy2, a.x2, a.y2));
    }
    if a.y1 < iy1 {
        out.push(Rect::new(a.x1, a.y1, a.x2, iy1));
    }
    if a.x1 < ix1 {
        out.push(Rect::new(a.x1, iy1, ix1, iy2));
    }
    if ix2 < a.x2 {
        out.push(Rect::new(ix2, iy1, a.x2, iy2));
    }
}

/// Rectangle set subtraction. Every point of the result lies in some rect of
/// `a_set` and in no rect of `b_set`. The output is not merged; rects
/// originating from different members of `a_set` may overlap where the
/// inputs did.
pub fn rect_difference(a_set: &[Rect], b_set: &[Rect]) -> Vec<Rect> {
    let mut cur = a_set.to_vec();

    for b in b_set {
        let mut next = Vec::with_capacity(cur.len());
        for a in &cur {
            subtract_one(*a, *b, &mut next);
        }
        cur = next;
        if cur.is_empty() {
            break;
        }
    }

    cur.retain(|r| !r.is_degenerate());
    cur
}
