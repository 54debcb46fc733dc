// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to get the angular size of an image's pixels from its header.

mod error;

pub use error::{PixelScaleError, UnrecognizedUnitsError};

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};

use crate::{
    constants::{ARCSEC_PER_ARCMIN, ARCSEC_PER_DEG},
    header::FitsHeader,
};

/// The angular units a `CUNITn` value may be in. The string form of each
/// variant is the lower-case prefix that identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum AngleUnit {
    #[strum(serialize = "deg")]
    Degree,

    #[strum(serialize = "arcsec")]
    Arcsecond,

    #[strum(serialize = "arcmin")]
    Arcminute,
}

impl AngleUnit {
    /// Identify the unit from a `CUNITn` value, e.g. "DEG", "degrees",
    /// "arcsecond". Only the leading characters are checked.
    pub fn from_cunit(s: &str) -> Option<AngleUnit> {
        let s = s.to_lowercase();
        AngleUnit::iter().find(|unit| {
            let prefix: &'static str = unit.into();
            s.starts_with(prefix)
        })
    }

    /// As [`AngleUnit::from_cunit`], but an unrecognised unit is an error that
    /// names the key it came from.
    pub fn from_cunit_key(key: &str, value: &str) -> Result<AngleUnit, UnrecognizedUnitsError> {
        AngleUnit::from_cunit(value).ok_or_else(|| UnrecognizedUnitsError {
            key: key.into(),
            unit: value.into(),
        })
    }

    /// How many arcseconds are in one of this unit.
    pub fn arcsec_per_unit(self) -> f64 {
        match self {
            AngleUnit::Degree => ARCSEC_PER_DEG,
            AngleUnit::Arcminute => ARCSEC_PER_ARCMIN,
            AngleUnit::Arcsecond => 1.0,
        }
    }
}

/// Get the pixel size along an image axis [arcseconds] from a header. `cunit`
/// and `cdelt` are the keys holding the axis unit and increment, e.g. "CUNIT1"
/// and "CDELT1". The sign of the increment is ignored.
pub fn get_pixel_scale(
    header: &FitsHeader,
    cunit: &str,
    cdelt: &str,
) -> Result<f64, PixelScaleError> {
    let unit_str: String = header.get_required(cunit)?;
    let unit = AngleUnit::from_cunit_key(cunit, &unit_str)?;
    let increment: f64 = header.get_required(cdelt)?;
    Ok(increment.abs() * unit.arcsec_per_unit())
}
