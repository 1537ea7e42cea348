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
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::geom::{Point, Rect};

// Ordered like a tuple (x1, y1, x2, y2) so the loop starting points are
// deterministic across runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Edge {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl Edge {
    fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Edge { x1, y1, x2, y2 }
    }

    fn reversed(&self) -> Edge {
        Edge::new(self.x2, self.y2, self.x1, self.y1)
    }

    // east 0, north 1, west 2, south 3
    fn dir_rank(&self) -> u8 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        if dy == 0 && dx > 0 {
            0
        } else if dx == 0 && dy > 0 {
            1
        } else if dy == 0 && dx < 0 {
            2
        } else {
            3
        }
    }
}

// Counted multiset insert: an edge meeting its reverse cancels one copy of
// the reverse instead of going in, which removes interior boundaries shared
// by two rects.
fn add_or_cancel(edges: &mut BTreeMap<Edge, u32>, e: Edge) {
    let rev = e.reversed();
    if let Some(cnt) = edges.get_mut(&rev) {
        *cnt -= 1;
        if *cnt == 0 {
            edges.remove(&rev);
        }
    } else {
        *edges.entry(e).or_insert(0) += 1;
    }
}

fn trace_loops(edges: &BTreeMap<Edge, u32>) -> Vec<Vec<Point>> {
    let mut adj: HashMap<(i32, i32), Vec<Edge>> = HashMap::with_capacity(edges.len() * 2);
    for e in edges.keys() {
        adj.entry((e.x1, e.y1)).or_default().push(*e);
    }
    for outgoing in adj.values_mut() {
        outgoing.sort_by_key(|e| e.dir_rank());
    }

    let mut used: HashSet<Edge> = HashSet::new();
    let mut polys = Vec::new();

    for e0 in edges.keys() {
        if used.contains(e0) {
            continue;
        }

        let mut poly = vec![Point::new(e0.x1, e0.y1)];
        let mut cur = *e0;
        used.insert(cur);

        loop {
            let end = Point::new(cur.x2, cur.y2);
            if end.x == e0.x1 && end.y == e0.y1 {
                break;
            }
            poly.push(end);

            let outgoing = match adj.get(&(end.x, end.y)) {
                Some(v) if !v.is_empty() => v,
                _ => break,
            };

            // prefer any edge that does not walk straight back
            let mut nxt = outgoing[0];
            for cand in outgoing {
                if !(cand.x2 == cur.x1 && cand.y2 == cur.y1) {
                    nxt = *cand;
                    break;
                }
            }

            if used.contains(&nxt) {
                break;
            }
            used.insert(nxt);
            cur = nxt;
        }

        if poly.len() >= 4 {
            polys.push(poly);
        }
    }

    polys
}

/// Rebuild boundary polygons from a bag of rectangles.
///
/// Each non degenerate rect contributes its four directed edges counter
/// clockwise; shared boundaries cancel and the surviving edges are chained
/// into loops. Holes come out as separate loops; outer vs inner polarity is
/// not classified here, consumers can infer it from the signed area.
pub fn rects_to_polygons(rects: &[Rect]) -> Vec<Vec<Point>> {
    let mut edges: BTreeMap<Edge, u32> = BTreeMap::new();

    for r in rects {
        if r.is_degenerate() {
            continue;
        }
        add_or_cancel(&mut edges, Edge::new(r.x1, r.y1, r.x2, r.y1));
        add_or_cancel(&mut edges, Edge::new(r.x2, r.y1, r.x2, r.y2));
        add_or_cancel(&mut edges, Edge::new(r.x2, r.y2, r.x1, r.y2));
        add_or_cancel(&mut edges, Edge::new(r.x1, r.y2, r.x1, r.y1));
    }

    trace_loops(&edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rect_round_trip() {
        let polys = rects_to_polygons(&[Rect::new(0, 0, 10, 10)]);
        assert_eq!(
            polys,
            vec![vec![
                Point::new(0, 0),
                Point::new(10, 0),
                Point::new(10, 10),
                Point::new(0, 10),
            ]]
        );
    }

    #[test]
    fn test_shared_edge_cancels() {
        let polys = rects_to_polygons(&[Rect::new(0, 0, 10, 10), Rect::new(10, 0, 20, 10)]);
        assert_eq!(
            polys,
            vec![vec![
                Point::new(0, 0),
                Point::new(10, 0),
                Point::new(20, 0),
                Point::new(20, 10),
                Point::new(10, 10),
                Point::new(0, 10),
            ]]
        );
        // the shared boundary at x=10 is gone; only pass-through vertices remain
    }

    #[test]
    fn test_degenerate_rects_ignored() {
        let polys = rects_to_polygons(&[
            Rect::new(0, 0, 0, 10),
            Rect::new(0, 0, 10, 0),
            Rect::new(0, 0, 10, 10),
        ]);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].len(), 4);
    }

    #[test]
    fn test_duplicate_rect_keeps_one_loop() {
        let polys = rects_to_polygons(&[Rect::new(0, 0, 10, 10), Rect::new(0, 0, 10, 10)]);
        assert_eq!(polys.len(), 1);
    }

    #[test]
    fn test_contained_rect_stays_separate_loop() {
        // a rect strictly inside another shares no exact edge, so nothing
        // cancels and both outlines come out as their own loop
        let polys = rects_to_polygons(&[Rect::new(0, 0, 100, 10), Rect::new(40, 0, 60, 10)]);
        assert_eq!(
            polys,
            vec![
                vec![
                    Point::new(0, 0),
                    Point::new(100, 0),
                    Point::new(100, 10),
                    Point::new(0, 10),
                ],
                vec![
                    Point::new(40, 0),
                    Point::new(60, 0),
                    Point::new(60, 10),
                    Point::new(40, 10),
                ],
            ]
        );
    }
}
