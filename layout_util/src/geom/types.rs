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

/// Layout coordinate. All products are computed in i64.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Half open axis aligned rectangle [x1,x2) x [y1,y2)
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Rect { x1, y1, x2, y2 }
    }

    pub fn is_degenerate(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }

    pub fn overlaps(&self, o: &Rect) -> bool {
        !(self.x2 <= o.x1 || o.x2 <= self.x1 || self.y2 <= o.y1 || o.y2 <= self.y1)
    }

    /// Overlap rectangle, None when it would be degenerate
    pub fn intersection(&self, o: &Rect) -> Option<Rect> {
        let x1 = self.x1.max(o.x1);
        let y1 = self.y1.max(o.y1);
        let x2 = self.x2.min(o.x2);
        let y2 = self.y2.min(o.y2);

        if x1 < x2 && y1 < y2 {
            Some(Rect { x1, y1, x2, y2 })
        } else {
            None
        }
    }
}

/// Closed orthogonal polygon, implicitly closed (last vertex connects to the first).
/// The bounding box is computed once at construction and never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon {
    pub pts: Vec<Point>,
    pub minx: i32,
    pub miny: i32,
    pub maxx: i32,
    pub maxy: i32,
}

impl Polygon {
    pub fn new(pts: Vec<Point>) -> Self {
        let mut minx = 0;
        let mut miny = 0;
        let mut maxx = 0;
        let mut maxy = 0;

        for (i, p) in pts.iter().enumerate() {
            if i == 0 {
                minx = p.x;
                maxx = p.x;
                miny = p.y;
                maxy = p.y;
            } else {
                minx = minx.min(p.x);
                maxx = maxx.max(p.x);
                miny = miny.min(p.y);
                maxy = maxy.max(p.y);
            }
        }

        Polygon {
            pts,
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    /// Axis aligned rectangle as a 4 vertex polygon, counter clockwise
    pub fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Polygon::new(vec![
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ])
    }

    pub fn bbox_overlaps(&self, o: &Polygon) -> bool {
        !(self.maxx < o.minx || o.maxx < self.minx || self.maxy < o.miny || o.maxy < self.miny)
    }

    pub fn bbox_contains(&self, p: Point) -> bool {
        self.minx <= p.x && p.x <= self.maxx && self.miny <= p.y && p.y <= self.maxy
    }
}
