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
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::geom::Point;

/// Ordered layer list; consecutive pairs are via-adjacent, both directions.
#[derive(Clone, Debug)]
pub struct ViaRule {
    pub layers: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct GateRule {
    pub has_gate: bool,
    pub poly_layer: String,
    pub aa_layer: String,
}

/// Parsed rule file: seed points, via adjacency lists, optional gate cut,
/// and the derived set of layers the layout loader must retain.
#[derive(Clone, Debug)]
pub struct RuleFile {
    pub starts: Vec<(String, Point)>,
    pub via_rules: Vec<ViaRule>,
    pub gate: GateRule,
    pub needed_layers: HashSet<String>,
}

#[derive(Copy, Clone, PartialEq)]
enum Section {
    None,
    Start,
    Via,
    Gate,
}

// "<layer> (<x>,<y>)"
fn parse_start_line(s: &str) -> Option<(String, Point)> {
    let sp = s.find(' ')?;
    let layer = &s[..sp];

    let lp = s[sp..].find('(')? + sp;
    let cm = s[lp..].find(',')? + lp;
    let rp = s[cm..].find(')')? + cm;

    let x: i64 = s[lp + 1..cm].trim().parse().ok()?;
    let y: i64 = s[cm + 1..rp].trim().parse().ok()?;

    Some((layer.to_string(), Point::new(x as i32, y as i32)))
}

impl RuleFile {
    pub fn load(path: &Path) -> Result<RuleFile> {
        let f = File::open(path).with_context(|| format!("cannot open rule file {:?}", path))?;
        Self::parse(BufReader::new(f))
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<RuleFile> {
        let mut starts = Vec::new();
        let mut via_rules = Vec::new();
        let mut gate = GateRule::default();

        let mut section = Section::None;

        for line in reader.lines() {
            let line = line.context("cannot read rule file")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match line {
                "StartPos" => {
                    section = Section::Start;
                    continue;
                }
                "Via" => {
                    section = Section::Via;
                    continue;
                }
                "Gate" => {
                    section = Section::Gate;
                    continue;
                }
                _ => {}
            }

            match section {
                Section::Start => {
                    if let Some(start) = parse_start_line(line) {
                        starts.push(start);
                    }
                }
                Section::Via => {
                    let layers: Vec<String> =
                        line.split_whitespace().map(str::to_string).collect();
                    if !layers.is_empty() {
                        via_rules.push(ViaRule { layers });
                    }
                }
                Section::Gate => {
                    let toks: Vec<&str> = line.split_whitespace().collect();
                    if toks.len() >= 2 {
                        gate = GateRule {
                            has_gate: true,
                            poly_layer: toks[0].to_string(),
                            aa_layer: toks[1].to_string(),
                        };
                    }
                }
                Section::None => {}
            }
        }

        if starts.is_empty() {
            bail!("rule file has no StartPos entries");
        }

        let mut needed_layers = HashSet::new();
        for (layer, _) in &starts {
            needed_layers.insert(layer.clone());
        }
        for vr in &via_rules {
            for layer in &vr.layers {
                needed_layers.insert(layer.clone());
            }
        }
        if gate.has_gate {
            needed_layers.insert(gate.poly_layer.clone());
            needed_layers.insert(gate.aa_layer.clone());
        }

        Ok(RuleFile {
            starts,
            via_rules,
            gate,
            needed_layers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_full_rule() {
        let text = "\
StartPos
M1 (5,5)
POLY (50, 0)

Via
M1 M2 M3
AA M1

Gate
POLY AA
";
        let rule = RuleFile::parse(Cursor::new(text)).unwrap();
        assert_eq!(
            rule.starts,
            vec![
                ("M1".to_string(), Point::new(5, 5)),
                ("POLY".to_string(), Point::new(50, 0)),
            ]
        );
        assert_eq!(rule.via_rules.len(), 2);
        assert_eq!(rule.via_rules[0].layers, vec!["M1", "M2", "M3"]);
        assert!(rule.gate.has_gate);
        assert_eq!(rule.gate.poly_layer, "POLY");
        assert_eq!(rule.gate.aa_layer, "AA");

        let mut needed: Vec<&str> = rule.needed_layers.iter().map(|s| s.as_str()).collect();
        needed.sort_unstable();
        assert_eq!(needed, vec!["AA", "M1", "M2", "M3", "POLY"]);
    }

    #[test]
    fn test_missing_startpos_fails() {
        let text = "Via\nM1 M2\n";
        assert!(RuleFile::parse(Cursor::new(text)).is_err());
    }

    #[test]
    fn test_no_gate_section() {
        let text = "StartPos\nM1 (0,0)\n";
        let rule = RuleFile::parse(Cursor::new(text)).unwrap();
        assert!(!rule.gate.has_gate);
        assert!(rule.via_rules.is_empty());
        assert_eq!(rule.needed_layers.len(), 1);
    }

    #[test]
    fn test_malformed_start_line_skipped() {
        let text = "StartPos\nbogus-line\nM1 (3,-4)\n";
        let rule = RuleFile::parse(Cursor::new(text)).unwrap();
        assert_eq!(rule.starts, vec![("M1".to_string(), Point::new(3, -4))]);
    }

    #[test]
    fn test_negative_coordinates() {
        let text = "StartPos\nM1 (-17,-42)\n";
        let rule = RuleFile::parse(Cursor::new(text)).unwrap();
        assert_eq!(rule.starts[0].1, Point::new(-17, -42));
    }
}
