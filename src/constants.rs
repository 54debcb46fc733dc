// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Beam responses are calculated in
double precision and only converted to single precision when written to a
single-precision FITS image.
 */

/// Second-order coefficient of the VLA L-band primary-beam polynomial.
pub const VLA_PB_G1: f64 = -1.343e-3;

/// Fourth-order coefficient of the VLA L-band primary-beam polynomial.
pub const VLA_PB_G2: f64 = 6.579e-7;

/// Sixth-order coefficient of the VLA L-band primary-beam polynomial.
pub const VLA_PB_G3: f64 = -1.186e-10;

/// The observing frequency the polynomial is evaluated at [GHz].
pub const VLA_PB_FREQ_GHZ: f64 = 1.4;

/// The largest radius the polynomial was fitted to [arcminutes]. Beyond this,
/// the response is held at its value here rather than extrapolated.
pub const VLA_PB_MAX_FIT_RADIUS_ARCMIN: f64 = 29.8;

/// The default name of the primary-beam map written out.
pub const DEFAULT_OUTPUT_PBC_MAP: &str = "vla_pbcmap.fits";

pub(crate) const ARCSEC_PER_DEG: f64 = 3600.0;
pub(crate) const ARCSEC_PER_ARCMIN: f64 = 60.0;
