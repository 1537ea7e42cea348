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
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::trace::TraceResult;

/// Write the traced net, layers in ascending lexicographic order, one
/// polygon per line as "(x1,y1),(x2,y2),...".
pub fn write_result(path: &Path, res: &TraceResult) -> Result<()> {
    let f = File::create(path).with_context(|| format!("cannot create output file {:?}", path))?;
    let mut out = BufWriter::new(f);
    write_result_to(&mut out, res)?;
    out.flush().context("cannot flush output file")?;
    Ok(())
}

pub fn write_result_to<W: Write>(out: &mut W, res: &TraceResult) -> Result<()> {
    for layer in res.by_layer.keys().sorted() {
        writeln!(out, "{}", layer)?;
        for poly in &res.by_layer[layer] {
            let line = poly.iter().map(|p| format!("({},{})", p.x, p.y)).join(",");
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}
