// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code for the VLA primary-beam model.
//!
//! The response is a polynomial in the (frequency-scaled) angular distance
//! from the pointing centre:
//!
//! `1 + G1 d^2 + G2 d^4 + G3 d^6`, with `d = r f`,
//!
//! where `r` is in arcminutes and `f` is in GHz. The coefficients are only
//! meaningful for `r` up to [`VLA_PB_MAX_FIT_RADIUS_ARCMIN`].


use ndarray::prelude::*;

use crate::constants::{
    VLA_PB_FREQ_GHZ, VLA_PB_G1, VLA_PB_G2, VLA_PB_G3, VLA_PB_MAX_FIT_RADIUS_ARCMIN,
};

/// Get the VLA primary-beam attenuation factor at a radius [arcminutes] from
/// the pointing centre.
pub fn vla_pbc(radius_arcmin: f64) -> f64 {
    vla_pbc_at_freq(radius_arcmin, VLA_PB_FREQ_GHZ)
}

/// As [`vla_pbc`], but with the frequency factor [GHz] supplied.
pub(crate) fn vla_pbc_at_freq(radius_arcmin: f64, freq_ghz: f64) -> f64 {
    let d2 = (radius_arcmin * freq_ghz).powi(2);
    // Horner's scheme in d^2.
    1.0 + d2 * (VLA_PB_G1 + d2 * (VLA_PB_G2 + d2 * VLA_PB_G3))
}

/// The attenuation factor at the edge of the fitted domain. Radii beyond
/// [`VLA_PB_MAX_FIT_RADIUS_ARCMIN`] get this value.
pub fn vla_pbc_edge() -> f64 {
    vla_pbc(VLA_PB_MAX_FIT_RADIUS_ARCMIN)
}

/// Evaluate [`vla_pbc`] at every radius [arcminutes] of an array.
pub fn vla_pbc_array<D: Dimension>(radii_arcmin: ArrayView<f64, D>) -> Array<f64, D> {
    radii_arcmin.mapv(vla_pbc)
}
