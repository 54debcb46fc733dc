// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all vla_beam-related errors. This should be the *only*
//! error enum that is publicly visible from the command-line interface.

use thiserror::Error;

use super::pbc_map::PbcMapArgsError;
use crate::{io::fits::FitsError, pbcor::BeamResponseError};

/// The *only* publicly visible error from the `vla_beam` binary.
#[derive(Error, Debug)]
pub enum VlaBeamError {
    /// An error with the supplied arguments.
    #[error("{0}\n\nSee vla_beam --help for the available arguments.")]
    Args(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files may be toml or json, and hold the same names as the command-line arguments.")]
    ArgFile(String),

    /// An error related to the reference image's header.
    #[error("{0}\n\nThe reference image needs CRPIX1/2, CDELT1/2 and CUNIT1/2 in its primary header.")]
    Header(String),

    /// A cfitsio error. Because these are usually quite spartan, some
    /// suggestions are provided here.
    #[error("cfitsio error: {0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv).")]
    Cfitsio(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<PbcMapArgsError> for VlaBeamError {
    fn from(e: PbcMapArgsError) -> Self {
        Self::Args(e.to_string())
    }
}

impl From<BeamResponseError> for VlaBeamError {
    fn from(e: BeamResponseError) -> Self {
        let s = e.to_string();
        match e {
            BeamResponseError::ImageLoad(e) | BeamResponseError::ImageWrite(e) => match e {
                FitsError::Open { .. }
                | FitsError::Create { .. }
                | FitsError::NotImage { .. }
                | FitsError::EmptyImage { .. }
                | FitsError::Shape { .. } => Self::Generic(s),
                FitsError::Fitsio { .. } => Self::Cfitsio(s),
            },
            BeamResponseError::Header(_) | BeamResponseError::UnrecognizedUnits(_) => {
                Self::Header(s)
            }
            BeamResponseError::NotTwoDimensional { .. } => Self::Generic(s),
            BeamResponseError::InvalidMaxRadius(_) => Self::Args(s),
        }
    }
}

impl From<std::io::Error> for VlaBeamError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
