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
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use structopt::StructOpt;
use thiserror::Error;

use layout_util::io::{write_result, LayoutDb, RuleFile};
use layout_util::trace::run_trace;

#[derive(StructOpt)]
struct TraceArgs {
    #[structopt(parse(from_os_str), long, help = "Layout text file")]
    layout: PathBuf,

    #[structopt(parse(from_os_str), long, help = "Rule file (StartPos/Via/Gate)")]
    rule: PathBuf,

    #[structopt(parse(from_os_str), long, help = "Where to write the traced net")]
    output: PathBuf,

    #[structopt(long, default_value = "1", help = "Worker thread count")]
    thread: usize,

    #[structopt(long, default_value = "Warn")]
    log_level: LevelFilter,
}

// Which pipeline stage failed decides the exit code
#[derive(Error, Debug)]
enum StageError {
    #[error("rule load failed: {0:#}")]
    Rule(anyhow::Error),

    #[error("layout load failed: {0:#}")]
    Layout(anyhow::Error),

    #[error("trace failed: {0:#}")]
    Trace(anyhow::Error),

    #[error("write failed: {0:#}")]
    Write(anyhow::Error),
}

impl StageError {
    fn exit_code(&self) -> i32 {
        match self {
            StageError::Rule(_) => 2,
            StageError::Layout(_) => 3,
            StageError::Trace(_) => 4,
            StageError::Write(_) => 5,
        }
    }
}

fn run(args: &TraceArgs) -> Result<(), StageError> {
    let rule = RuleFile::load(&args.rule).map_err(StageError::Rule)?;

    let db = LayoutDb::load_needed_layers(&args.layout, &rule).map_err(StageError::Layout)?;
    info!("loaded {} layers", db.layers.len());

    let res = run_trace(&rule, &db, args.thread.max(1)).map_err(StageError::Trace)?;

    write_result(&args.output, &res).map_err(StageError::Write)?;

    eprintln!(
        "[OK] layers_out={} polys_out={}",
        res.by_layer.len(),
        res.total_polygons
    );
    Ok(())
}

fn main() {
    let args = TraceArgs::from_args();

    if let Err(e) = SimpleLogger::new().with_level(args.log_level).init() {
        eprintln!("logger init failed: {}", e);
    }

    let now = Instant::now();

    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }

    let elapsed = now.elapsed();
    info!(
        "trace finished in {}m {}s {}ms",
        elapsed.as_secs() / 60,
        elapsed.as_secs() % 60,
        elapsed.as_millis() % 1000
    );
}
