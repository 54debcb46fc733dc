// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code.
//!
//! All booleans must have `#[serde(default)]` annotated, and anything that
//! isn't a boolean must be optional. This allows all arguments to be optional
//! *and* usable in an arguments file.
//!
//! Only 3 things should be public in this module: `VlaBeam`, `VlaBeam::run`,
//! and `VlaBeamError`.

#[macro_use]
mod common;
mod error;
mod pbc_map;

pub use error::VlaBeamError;

use std::path::PathBuf;

use clap::{AppSettings, Args, Parser};
use log::info;

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    about = r#"Make a primary-beam attenuation map for the Very Large Array (VLA) from a reference FITS image.
Each pixel's distance from the reference pixel is turned into a beam response at 1.4 GHz."#
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(infer_long_args = true)]
pub struct VlaBeam {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(flatten)]
    pbc_map_args: pbc_map::PbcMapArgs,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Only verify that arguments were correctly ingested and print out
    /// high-level information.
    #[clap(long)]
    dry_run: bool,

    /// Save the input arguments into a new TOML file that can be used to
    /// reproduce this run.
    #[clap(long)]
    save_toml: Option<PathBuf>,
}

impl VlaBeam {
    pub fn run(self) -> Result<(), VlaBeamError> {
        // Set up logging.
        let GlobalArgs {
            verbosity,
            dry_run,
            save_toml,
        } = self.global_opts;
        setup_logging(verbosity).map_err(|e| VlaBeamError::Generic(e.to_string()))?;

        display_build_info();

        let args = self.pbc_map_args.merge()?;
        if let Some(toml) = save_toml {
            use std::{
                fs::File,
                io::{BufWriter, Write},
            };

            let toml_str =
                toml::to_string(&args).map_err(|e| VlaBeamError::ArgFile(e.to_string()))?;
            let mut f = BufWriter::new(File::create(toml)?);
            f.write_all(toml_str.as_bytes())?;
        }
        args.run(dry_run)?;

        info!("vla_beam complete.");
        Ok(())
    }
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.try_init()
}

/// Log the version of vla_beam and how it was built.
fn display_build_info() {
    let git = match (GIT_COMMIT_HASH_SHORT, GIT_DIRTY) {
        (Some(hash), Some(true)) => format!("git {hash}, dirty"),
        (Some(hash), _) => format!("git {hash}"),
        (None, _) => "no git info".to_string(),
    };
    info!(
        "vla_beam {} ({git}), built {BUILT_TIME_UTC} with {RUSTC_VERSION}",
        env!("CARGO_PKG_VERSION")
    );
}
