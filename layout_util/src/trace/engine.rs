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
use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;

use crate::geom::{poly_intersect, Point, Polygon, Rect};
use crate::index::{auto_cell_size, SpatialIndex};
use crate::io::{LayoutDb, RuleFile};
use crate::rects::{decompose_to_rects, rect_difference, rects_to_polygons};
use crate::trace::{bfs_multi_layer, build_via_adj, VisitedByLayer};

/// Traced polygons grouped by layer. Layers with nothing to emit are not
/// present at all.
#[derive(Clone, Debug, Default)]
pub struct TraceResult {
    pub by_layer: HashMap<String, Vec<Vec<Point>>>,
    pub total_polygons: usize,
}

fn build_layer_indices(db: &LayoutDb) -> HashMap<String, SpatialIndex> {
    db.layers
        .par_iter()
        .map(|(name, data)| {
            let cell = auto_cell_size(&data.polys);
            debug!(
                "layer {}: {} polygons, grid cell {}",
                name,
                data.polys.len(),
                cell
            );
            (name.clone(), SpatialIndex::build(&data.polys, cell))
        })
        .collect()
}

fn emit_visited(
    db: &LayoutDb,
    vis: &VisitedByLayer,
    skip_layer: Option<&str>,
    out: &mut TraceResult,
) {
    for (layer, flags) in vis {
        if skip_layer == Some(layer.as_str()) {
            continue;
        }
        // rule-only layers carry an empty bitmap and no layout data
        let polys = match db.layers.get(layer) {
            Some(d) => &d.polys,
            None => continue,
        };
        let emitted: Vec<Vec<Point>> = flags.iter_ones().map(|i| polys[i].pts.clone()).collect();
        if !emitted.is_empty() {
            out.total_polygons += emitted.len();
            out.by_layer.insert(layer.clone(), emitted);
        }
    }
}

/// Split one active-area polygon against the poly shapes crossing it.
///
/// Coverage by polys outside the gate net ("low") is subtracted; overlap
/// with polys on the gate net ("high") is re-added as its own rectangles.
/// The combined bag goes through boundary reconstruction unmerged, so a
/// boundary shared by a cut piece and a re-added piece either survives on
/// both or cancels, per the edge direction rule.
pub fn cut_aa_by_poly(
    aa: &Polygon,
    poly_high: &[&Polygon],
    poly_low: &[&Polygon],
) -> Vec<Vec<Point>> {
    let aa_rects = decompose_to_rects(aa);

    let low_rects: Vec<Rect> = poly_low
        .iter()
        .flat_map(|p| decompose_to_rects(p))
        .collect();
    let high_rects: Vec<Rect> = poly_high
        .iter()
        .flat_map(|p| decompose_to_rects(p))
        .collect();

    let mut bag = rect_difference(&aa_rects, &low_rects);

    for ar in &aa_rects {
        for hr in &high_rects {
            if let Some(overlap) = ar.intersection(hr) {
                bag.push(overlap);
            }
        }
    }

    rects_to_polygons(&bag)
}

/// Run the trace. Single seed emits the reachable net as-is; two seeds with
/// a gate rule additionally split every reachable active-area polygon by
/// the poly layer (the gate net is the one reachable from the first seed).
pub fn run_trace(rule: &RuleFile, db: &LayoutDb, threads: usize) -> Result<TraceResult> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .context("cannot build worker pool")?;

    pool.install(|| trace_with_indices(rule, db))
}

fn trace_with_indices(rule: &RuleFile, db: &LayoutDb) -> Result<TraceResult> {
    let idxmap = build_layer_indices(db);
    let via_adj = build_via_adj(rule);

    let mut out = TraceResult::default();

    let is_gate_query = rule.starts.len() >= 2 && rule.gate.has_gate;

    if !is_gate_query {
        // extra StartPos entries without a gate are ignored by contract
        let vis = bfs_multi_layer(rule, db, &idxmap, &via_adj, &rule.starts[..1]);
        emit_visited(db, &vis, None, &mut out);
        info!(
            "traced {} polygons on {} layers",
            out.total_polygons,
            out.by_layer.len()
        );
        return Ok(out);
    }

    // phase 1: the gate net, remembered as the "high" poly set
    let vis_gate = bfs_multi_layer(rule, db, &idxmap, &via_adj, &rule.starts[..1]);
    let poly_high_set: HashSet<usize> = vis_gate
        .get(&rule.gate.poly_layer)
        .map(|flags| flags.iter_ones().collect())
        .unwrap_or_default();

    // phase 2: the net under test
    let vis = bfs_multi_layer(rule, db, &idxmap, &via_adj, &rule.starts[1..2]);
    emit_visited(db, &vis, Some(rule.gate.aa_layer.as_str()), &mut out);

    let aa_data = db.layers.get(&rule.gate.aa_layer);
    let poly_data = db.layers.get(&rule.gate.poly_layer);

    if let (Some(aa_data), Some(poly_data)) = (aa_data, poly_data) {
        let poly_index = &idxmap[&rule.gate.poly_layer];
        let aa_indices: Vec<usize> = vis[&rule.gate.aa_layer].iter_ones().collect();

        debug!(
            "gate cut: {} active-area polygons, {} high polys",
            aa_indices.len(),
            poly_high_set.len()
        );

        // independent per polygon; joined back in index order
        let groups: Vec<Vec<Vec<Point>>> = aa_indices
            .par_iter()
            .map(|&ai| {
                let aa = &aa_data.polys[ai];

                let mut cand = Vec::new();
                poly_index.query_candidates(aa, &mut cand);
                cand.sort_unstable();
                cand.dedup();

                let mut poly_high: Vec<&Polygon> = Vec::new();
                let mut poly_low: Vec<&Polygon> = Vec::new();
                for pi in cand {
                    let pp = &poly_data.polys[pi];
                    if !poly_intersect(aa, pp) {
                        continue;
                    }
                    if poly_high_set.contains(&pi) {
                        poly_high.push(pp);
                    } else {
                        poly_low.push(pp);
                    }
                }

                cut_aa_by_poly(aa, &poly_high, &poly_low)
            })
            .collect();

        let aa_out: Vec<Vec<Point>> = groups.into_iter().flatten().collect();
        if !aa_out.is_empty() {
            out.total_polygons += aa_out.len();
            out.by_layer.insert(rule.gate.aa_layer.clone(), aa_out);
        }
    }

    info!(
        "traced {} polygons on {} layers",
        out.total_polygons,
        out.by_layer.len()
    );
    Ok(out)
}
