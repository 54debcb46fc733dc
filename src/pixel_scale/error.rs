// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::header::HeaderError;

/// The angular unit of an image axis isn't one we know how to convert.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{key} is '{unit}'. Make sure that CUNIT1/CUNIT2 is either in degree, arcmin or arcsec")]
pub struct UnrecognizedUnitsError {
    pub key: Box<str>,
    pub unit: Box<str>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PixelScaleError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    UnrecognizedUnits(#[from] UnrecognizedUnitsError),
}
