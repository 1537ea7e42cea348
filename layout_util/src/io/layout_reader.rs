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
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::geom::{Point, Polygon};
use crate::io::RuleFile;

#[derive(Clone, Debug, Default)]
pub struct LayerData {
    pub polys: Vec<Polygon>,
}

/// All retained layers of one layout. Polygon identity is the index within
/// its layer; the spatial index and the traversal never hold references.
#[derive(Clone, Debug, Default)]
pub struct LayoutDb {
    pub layers: HashMap<String, LayerData>,
}

// A layer header is a line made of [A-Za-z0-9_] only
fn is_layer_line(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|c| c.is_ascii_alphanumeric() || c == b'_')
}

// "(x,y),(x,y),..." with at least 4 vertices; anything malformed rejects
// the whole line
fn parse_poly_line(line: &str) -> Option<Polygon> {
    let mut pts = Vec::new();
    let mut i = 0;

    while i < line.len() {
        let lp = match line[i..].find('(') {
            Some(p) => i + p,
            None => break,
        };
        let cm = line[lp..].find(',')? + lp;
        let rp = line[cm..].find(')')? + cm;

        let x: i64 = line[lp + 1..cm].trim().parse().ok()?;
        let y: i64 = line[cm + 1..rp].trim().parse().ok()?;
        pts.push(Point::new(x as i32, y as i32));

        i = rp + 1;
    }

    if pts.len() < 4 {
        return None;
    }
    Some(Polygon::new(pts))
}

impl LayoutDb {
    /// Load only the layers the rule needs; everything else is skipped
    /// without parsing its polygons.
    pub fn load_needed_layers(path: &Path, rule: &RuleFile) -> Result<LayoutDb> {
        let f = File::open(path).with_context(|| format!("cannot open layout file {:?}", path))?;
        Self::parse(BufReader::new(f), rule)
    }

    pub fn parse<R: BufRead>(reader: R, rule: &RuleFile) -> Result<LayoutDb> {
        let mut layers: HashMap<String, LayerData> = HashMap::new();
        let mut cur_layer: Option<String> = None;
        let mut skipped_lines = 0usize;

        for line in reader.lines() {
            let line = line.context("cannot read layout file")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if is_layer_line(line) {
                if rule.needed_layers.contains(line) {
                    // a retained layer exists even when no polygon follows
                    layers.entry(line.to_string()).or_default();
                    cur_layer = Some(line.to_string());
                } else {
                    cur_layer = None;
                }
                continue;
            }

            if let Some(layer) = &cur_layer {
                match parse_poly_line(line) {
                    Some(p) => {
                        if let Some(data) = layers.get_mut(layer) {
                            data.polys.push(p);
                        }
                    }
                    None => skipped_lines += 1,
                }
            }
        }

        if skipped_lines > 0 {
            debug!("layout: skipped {} malformed polygon lines", skipped_lines);
        }

        Ok(LayoutDb { layers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn rule_for(layers: &[&str]) -> RuleFile {
        let mut text = String::from("StartPos\n");
        text.push_str(&format!("{} (0,0)\n", layers[0]));
        if layers.len() > 1 {
            text.push_str("Via\n");
            text.push_str(&layers.join(" "));
            text.push('\n');
        }
        RuleFile::parse(Cursor::new(text)).unwrap()
    }

    #[test]
    fn test_layer_line_detection() {
        assert!(is_layer_line("M1"));
        assert!(is_layer_line("metal_2"));
        assert!(!is_layer_line("(0,0),(1,0),(1,1),(0,1)"));
        assert!(!is_layer_line("M1 extra"));
        assert!(!is_layer_line(""));
    }

    #[test]
    fn test_load_needed_layers_only() {
        let rule = rule_for(&["M1", "M2"]);
        let text = "\
M1
(0,0),(10,0),(10,10),(0,10)
OTHER
(5,5),(6,5),(6,6),(5,6)
M2
(20,20),(30,20),(30,30),(20,30)
";
        let db = LayoutDb::parse(Cursor::new(text), &rule).unwrap();
        assert_eq!(db.layers.len(), 2);
        assert_eq!(db.layers["M1"].polys.len(), 1);
        assert_eq!(db.layers["M2"].polys.len(), 1);
        assert!(!db.layers.contains_key("OTHER"));

        let p = &db.layers["M1"].polys[0];
        assert_eq!((p.minx, p.miny, p.maxx, p.maxy), (0, 0, 10, 10));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let rule = rule_for(&["M1"]);
        let text = "\
M1
(0,0),(10,0),(10,10),(0,10)
(0,0),(1,0)
(garbage
(0,0),(10,0),(10,10),(0,10),(0,5)
";
        let db = LayoutDb::parse(Cursor::new(text), &rule).unwrap();
        // the 2-vertex and unparsable lines are dropped, the 5-vertex kept
        assert_eq!(db.layers["M1"].polys.len(), 2);
    }

    #[test]
    fn test_header_without_polygons_keeps_empty_layer() {
        let rule = rule_for(&["M1", "M2"]);
        let text = "M1\nM2\n(0,0),(10,0),(10,10),(0,10)\n";
        let db = LayoutDb::parse(Cursor::new(text), &rule).unwrap();
        assert!(db.layers["M1"].polys.is_empty());
        assert_eq!(db.layers["M2"].polys.len(), 1);
    }

    #[test]
    fn test_negative_and_spaced_coordinates() {
        let rule = rule_for(&["M1"]);
        let text = "M1\n(-5, -5),(5, -5),(5, 5),(-5, 5)\n";
        let db = LayoutDb::parse(Cursor::new(text), &rule).unwrap();
        let p = &db.layers["M1"].polys[0];
        assert_eq!((p.minx, p.miny, p.maxx, p.maxy), (-5, -5, 5, 5));
    }
}
