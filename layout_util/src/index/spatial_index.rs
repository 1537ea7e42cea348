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
use std::collections::HashMap;

use crate::geom::Polygon;

const AUTO_CELL_SAMPLES: usize = 2000;
const DEFAULT_CELL: i32 = 1024;

/// Pick a grid cell size from the polygon size statistics.
///
/// Samples up to 2000 polygons at an even stride and takes 4x the larger of
/// the median width and median height, so a typical polygon touches only a
/// few cells while each cell keeps a short candidate list.
pub fn auto_cell_size(polys: &[Polygon]) -> i32 {
    if polys.is_empty() {
        return DEFAULT_CELL;
    }

    let step = (polys.len() / AUTO_CELL_SAMPLES).max(1);
    let mut ws: Vec<i64> = Vec::with_capacity(AUTO_CELL_SAMPLES);
    let mut hs: Vec<i64> = Vec::with_capacity(AUTO_CELL_SAMPLES);

    let mut i = 0;
    while i < polys.len() && ws.len() < AUTO_CELL_SAMPLES {
        ws.push((polys[i].maxx as i64 - polys[i].minx as i64).max(1));
        hs.push((polys[i].maxy as i64 - polys[i].miny as i64).max(1));
        i += step;
    }

    let med_w = {
        let mid = ws.len() / 2;
        *ws.select_nth_unstable(mid).1
    };
    let med_h = {
        let mid = hs.len() / 2;
        *hs.select_nth_unstable(mid).1
    };

    let cell = (med_w.max(med_h) * 4).max(64);
    cell.min(i32::MAX as i64) as i32
}

// Floor division on both axes; the same convention is used by build and
// query, so negative coordinates land in a well defined cell.
fn cells_for_bbox(
    minx: i32,
    miny: i32,
    maxx: i32,
    maxy: i32,
    cell: i32,
) -> (i32, i32, i32, i32) {
    (
        minx.div_euclid(cell),
        miny.div_euclid(cell),
        maxx.div_euclid(cell),
        maxy.div_euclid(cell),
    )
}

/// Uniform grid over one layer. Each cell holds the indices of every polygon
/// whose bounding box touches it.
pub struct SpatialIndex {
    cell: i32,
    grid: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialIndex {
    pub fn build(polys: &[Polygon], cell_size: i32) -> SpatialIndex {
        let cell = if cell_size > 0 { cell_size } else { DEFAULT_CELL };

        let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::with_capacity(polys.len());

        for (i, p) in polys.iter().enumerate() {
            let (gx0, gy0, gx1, gy1) = cells_for_bbox(p.minx, p.miny, p.maxx, p.maxy, cell);
            for gx in gx0..=gx1 {
                for gy in gy0..=gy1 {
                    grid.entry((gx, gy)).or_default().push(i);
                }
            }
        }

        SpatialIndex { cell, grid }
    }

    /// Append every polygon index found in the cells touched by q's bbox.
    /// The list may contain duplicates and includes q itself; callers dedup.
    pub fn query_candidates(&self, q: &Polygon, out: &mut Vec<usize>) {
        let (gx0, gy0, gx1, gy1) = cells_for_bbox(q.minx, q.miny, q.maxx, q.maxy, self.cell);

        for gx in gx0..=gx1 {
            for gy in gy0..=gy1 {
                if let Some(ids) = self.grid.get(&(gx, gy)) {
                    out.extend_from_slice(ids);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Polygon;

    #[test]
    fn test_auto_cell_size_empty() {
        assert_eq!(auto_cell_size(&[]), 1024);
    }

    #[test]
    fn test_auto_cell_size_floor() {
        // tiny polygons still get at least a 64 unit cell
        let polys = vec![Polygon::rect(0, 0, 10, 10)];
        assert_eq!(auto_cell_size(&polys), 64);
    }

    #[test]
    fn test_auto_cell_size_median() {
        let polys = vec![
            Polygon::rect(0, 0, 100, 50),
            Polygon::rect(0, 0, 100, 50),
            Polygon::rect(0, 0, 100, 50),
        ];
        // median width 100, median height 50 -> 400
        assert_eq!(auto_cell_size(&polys), 400);
    }

    #[test]
    fn test_query_finds_bbox_overlaps() {
        let polys = vec![
            Polygon::rect(0, 0, 10, 10),
            Polygon::rect(500, 500, 510, 510),
            Polygon::rect(5, 5, 200, 200),
        ];
        let idx = SpatialIndex::build(&polys, 64);

        let mut cand = Vec::new();
        idx.query_candidates(&polys[0], &mut cand);
        cand.sort_unstable();
        cand.dedup();
        // finds itself and the overlapping big polygon, not the far one
        assert!(cand.contains(&0));
        assert!(cand.contains(&2));
        assert!(!cand.contains(&1));
    }

    #[test]
    fn test_query_negative_coordinates() {
        let polys = vec![
            Polygon::rect(-100, -100, -90, -90),
            Polygon::rect(-95, -95, -80, -80),
        ];
        let idx = SpatialIndex::build(&polys, 64);

        let mut cand = Vec::new();
        idx.query_candidates(&polys[0], &mut cand);
        cand.sort_unstable();
        cand.dedup();
        assert!(cand.contains(&0));
        assert!(cand.contains(&1));
    }

    #[test]
    fn test_completeness_across_cell_sizes() {
        // every pair with overlapping bboxes must show up regardless of cell size
        let polys = vec![
            Polygon::rect(-70, -70, 70, 70),
            Polygon::rect(60, 60, 300, 300),
            Polygon::rect(-1, -1, 1, 1),
        ];
        for cell in [1, 7, 64, 1024] {
            let idx = SpatialIndex::build(&polys, cell);
            for q in 0..polys.len() {
                let mut cand = Vec::new();
                idx.query_candidates(&polys[q], &mut cand);
                for p in 0..polys.len() {
                    if polys[q].bbox_overlaps(&polys[p]) {
                        assert!(cand.contains(&p), "cell {} q {} p {}", cell, q, p);
                    }
                }
            }
        }
    }
}
