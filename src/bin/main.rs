// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use ccrm::RecordStore;
use ccrm::persistence::load_initial_data;
use ccrm::shell::{Shell, ShellPaths};
use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::io;
use std::path::PathBuf;
use std::process;

/// Campus Course & Records Manager
///
/// Loads students, instructors, courses and enrollments from CSV files and
/// starts an interactive menu for enrollment, grading, export and backup.
#[derive(Parser, Debug)]
#[command(name = "ccrm")]
#[command(about = "Campus course and records manager", long_about = None)]
struct Args {
    /// Directory holding instructors.csv, students.csv, courses.csv and enrollments.csv
    #[arg(long, value_name = "DIR", default_value = "test-data")]
    data_dir: PathBuf,

    /// Directory export files are written to
    #[arg(long, value_name = "DIR", default_value = "exports")]
    export_dir: PathBuf,

    /// Directory timestamped backups are created in
    #[arg(long, value_name = "DIR", default_value = "backups")]
    backup_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = TermLogger::init(
        log_level(args.verbose),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Error initialising logger: {}", e);
    }

    let store = RecordStore::new();

    // Missing or broken files are logged; startup continues with what loaded.
    load_initial_data(&store, &args.data_dir);

    let paths = ShellPaths {
        export_dir: args.export_dir,
        backup_dir: args.backup_dir,
    };
    let stdin = io::stdin();
    let mut shell = Shell::new(&store, paths, stdin.lock(), io::stdout());
    if let Err(e) = shell.run() {
        eprintln!("Error running shell: {}", e);
        process::exit(1);
    }
}
