// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::ARG_FILE_HELP;
use crate::{
    constants::{DEFAULT_OUTPUT_PBC_MAP, VLA_PB_MAX_FIT_RADIUS_ARCMIN},
    PrimaryBeamResponse, VlaBeamError,
};

lazy_static::lazy_static! {
    static ref OUTPUT_HELP: String =
        format!("Path to the output primary-beam map. An existing file is overwritten. Default: {DEFAULT_OUTPUT_PBC_MAP}");

    static ref MAX_RADIUS_HELP: String =
        format!("Pixels further than this many arcminutes from the reference pixel are blanked (NaN). The beam model is only fitted out to {VLA_PB_MAX_FIT_RADIUS_ARCMIN} arcminutes; pixels between that and this radius get the response at {VLA_PB_MAX_FIT_RADIUS_ARCMIN} arcminutes.");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PbcMapArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Path to the reference FITS image. Its primary HDU must hold the image
    /// with CRPIX1/2, CDELT1/2 and CUNIT1/2 in its header.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) image: Option<PathBuf>,

    #[clap(short = 'r', long, help = MAX_RADIUS_HELP.as_str(), help_heading = "BEAM")]
    pub(super) max_radius: Option<f64>,

    #[clap(short, long, help = OUTPUT_HELP.as_str(), parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

impl PbcMapArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<PbcMapArgs, VlaBeamError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let PbcMapArgs {
                args_file: _,
                image,
                max_radius,
                output,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(PbcMapArgs {
                args_file: None,
                image: cli_args.image.or(image),
                max_radius: cli_args.max_radius.or(max_radius),
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<PrimaryBeamResponse, VlaBeamError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            image,
            max_radius,
            output,
        } = self;

        let image = image.ok_or(PbcMapArgsError::NoImage)?;
        let max_radius = max_radius.ok_or(PbcMapArgsError::NoMaxRadius)?;

        let pbc = PrimaryBeamResponse::new(&image, max_radius, output)?;

        let (num_rows, num_cols) = pbc.dim();
        let (x0, y0) = pbc.reference_pixel();
        let (pix1, pix2) = pbc.pixel_scales();
        info!("Reference image: {}", image.display());
        info!("  {num_cols} x {num_rows} pixels, reference pixel (x, y) = ({x0}, {y0})");
        info!("  Pixel size: {pix1}\" x {pix2}\"");
        info!("Blanking beyond {max_radius}'");
        info!("Output map: {}", pbc.output().display());

        Ok(pbc)
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), VlaBeamError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let pbc = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        pbc.write_pbc_map()?;
        info!("Wrote {}", pbc.output().display());
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum PbcMapArgsError {
    #[error("No reference image was specified")]
    NoImage,

    #[error("No maximum radius was specified")]
    NoMaxRadius,
}
