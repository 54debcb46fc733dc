// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with making primary-beam maps.

use std::path::Path;

use thiserror::Error;

use crate::{
    header::HeaderError,
    io::fits::FitsError,
    pixel_scale::UnrecognizedUnitsError,
};

#[derive(Error, Debug)]
pub enum BeamResponseError {
    /// The reference image couldn't be read.
    #[error(transparent)]
    ImageLoad(FitsError),

    /// The map couldn't be written.
    #[error(transparent)]
    ImageWrite(FitsError),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    UnrecognizedUnits(#[from] UnrecognizedUnitsError),

    #[error("{}: The image has shape {shape:?}, which can't be squeezed to 2 dimensions", .file.display())]
    NotTwoDimensional { file: Box<Path>, shape: Vec<usize> },

    #[error("The maximum radius must be a positive number of arcminutes; got {0}")]
    InvalidMaxRadius(f64),
}
