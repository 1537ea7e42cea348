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
use std::collections::{HashMap, VecDeque};

use bitvec::prelude::*;

use crate::geom::{point_in_poly_inclusive, poly_intersect, Point, Polygon};
use crate::index::SpatialIndex;
use crate::io::{LayoutDb, RuleFile};

/// One visited bitmap per layer present in the layout. Flags are monotone
/// within a traversal, they are set once and never cleared.
pub type VisitedByLayer = HashMap<String, BitVec>;

struct Node {
    layer: String,
    idx: usize,
}

/// Via adjacency on layer names: every consecutive pair of each via list,
/// both directions. Neighbor lists keep insertion order and may hold
/// duplicates.
pub fn build_via_adj(rule: &RuleFile) -> HashMap<String, Vec<String>> {
    let mut via_adj: HashMap<String, Vec<String>> = HashMap::new();

    for vr in &rule.via_rules {
        for pair in vr.layers.windows(2) {
            via_adj
                .entry(pair[0].clone())
                .or_default()
                .push(pair[1].clone());
            via_adj
                .entry(pair[1].clone())
                .or_default()
                .push(pair[0].clone());
        }
    }

    via_adj
}

fn poly_contains_start(p: &Polygon, s: Point) -> bool {
    if !p.bbox_contains(s) {
        return false;
    }
    point_in_poly_inclusive(s, p)
}

fn sorted_candidates(idx: &SpatialIndex, q: &Polygon, cand: &mut Vec<usize>) {
    cand.clear();
    idx.query_candidates(q, cand);
    cand.sort_unstable();
    cand.dedup();
}

/// Breadth first search over polygons. Edges are same layer intersection
/// and via adjacency between layers; every polygon containing a seed point
/// is a source. Seeds on layers absent from the layout are skipped.
///
/// Every layer the rule references gets a bitmap, zero length when the
/// layout does not carry the layer.
pub fn bfs_multi_layer(
    rule: &RuleFile,
    db: &LayoutDb,
    idxmap: &HashMap<String, SpatialIndex>,
    via_adj: &HashMap<String, Vec<String>>,
    starts: &[(String, Point)],
) -> VisitedByLayer {
    let mut visited: VisitedByLayer = db
        .layers
        .iter()
        .map(|(name, data)| (name.clone(), bitvec![0; data.polys.len()]))
        .collect();
    for name in &rule.needed_layers {
        if !visited.contains_key(name) {
            visited.insert(name.clone(), BitVec::new());
        }
    }

    let mut queue: VecDeque<Node> = VecDeque::new();

    for (layer, pt) in starts {
        let data = match db.layers.get(layer) {
            Some(d) => d,
            None => continue,
        };
        let flags = match visited.get_mut(layer) {
            Some(f) => f,
            None => continue,
        };
        for (i, p) in data.polys.iter().enumerate() {
            if poly_contains_start(p, *pt) && !flags[i] {
                flags.set(i, true);
                queue.push_back(Node {
                    layer: layer.clone(),
                    idx: i,
                });
            }
        }
    }

    let mut cand: Vec<usize> = Vec::with_capacity(2048);

    while let Some(cur) = queue.pop_front() {
        let polys = &db.layers[&cur.layer].polys;
        let pu = &polys[cur.idx];

        // same layer expansion
        sorted_candidates(&idxmap[&cur.layer], pu, &mut cand);
        if let Some(flags) = visited.get_mut(&cur.layer) {
            for &v in &cand {
                if v == cur.idx || flags[v] {
                    continue;
                }
                if poly_intersect(pu, &polys[v]) {
                    flags.set(v, true);
                    queue.push_back(Node {
                        layer: cur.layer.clone(),
                        idx: v,
                    });
                }
            }
        }

        // via hops to neighbor layers, in rule order
        let neighbors = match via_adj.get(&cur.layer) {
            Some(n) => n,
            None => continue,
        };
        for nb in neighbors {
            let polys_nb = match db.layers.get(nb) {
                Some(d) => &d.polys,
                None => continue,
            };

            sorted_candidates(&idxmap[nb], pu, &mut cand);
            if let Some(flags) = visited.get_mut(nb) {
                for &v in &cand {
                    if flags[v] {
                        continue;
                    }
                    if poly_intersect(pu, &polys_nb[v]) {
                        flags.set(v, true);
                        queue.push_back(Node {
                            layer: nb.clone(),
                            idx: v,
                        });
                    }
                }
            }
        }
    }

    visited
}
