// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Primary-beam attenuation maps for the Very Large Array (VLA).

Given a reference FITS image, the angular distance of every pixel from the
image's reference pixel is turned into the VLA's 1.4 GHz primary-beam response,
and the resulting map is written out as a FITS image with the reference image's
header.
 */

pub mod beam;
mod cli;
pub mod constants;
pub mod header;
pub mod io;
pub mod pbcor;
pub mod pixel_scale;

#[cfg(test)]
mod tests;

// Re-exports.
pub use beam::{vla_pbc, vla_pbc_edge};
pub use cli::{VlaBeam, VlaBeamError};
pub use header::{FitsHeader, GridKeys, HeaderCard, HeaderError};
pub use io::fits::{FitsError, FitsImage};
pub use pbcor::{BeamResponseError, PrimaryBeamResponse};
pub use pixel_scale::{get_pixel_scale, AngleUnit, PixelScaleError, UnrecognizedUnitsError};
