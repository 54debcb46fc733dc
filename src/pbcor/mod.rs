// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to make a map of the VLA primary-beam response over the pixels of a
//! reference image.
//!
//! The angular distance of each pixel from the image's reference pixel is
//! turned into an attenuation factor with [`vla_pbc`](crate::beam::vla_pbc).
//! Pixels further than the polynomial's fitted domain get the response at the
//! edge of the domain, and pixels further than a user-supplied radius are
//! blanked (NaN).

mod error;

pub use error::BeamResponseError;

use std::path::{Path, PathBuf};

use fitsio::images::ImageType;
use log::debug;
use ndarray::{prelude::*, Zip};

use crate::{
    beam::{vla_pbc_array, vla_pbc_edge},
    constants::{ARCSEC_PER_ARCMIN, DEFAULT_OUTPUT_PBC_MAP, VLA_PB_MAX_FIT_RADIUS_ARCMIN},
    header::{required_key, FitsHeader, GridKeys},
    io::fits::{read_image, write_primary_image},
    pixel_scale::AngleUnit,
};

/// Everything needed to make a primary-beam map from a reference image.
#[derive(Debug)]
pub struct PrimaryBeamResponse {
    /// The reference image, squeezed to 2D (rows, columns).
    image: Array2<f64>,

    /// The reference image's header. This is written out with the map.
    header: FitsHeader,

    /// The type of the output image data.
    image_type: ImageType,

    /// The zero-indexed column of the reference pixel.
    x0: i64,

    /// The zero-indexed row of the reference pixel.
    y0: i64,

    /// The pixel size along the first image axis [arcseconds].
    pix1: f64,

    /// The pixel size along the second image axis [arcseconds]. Not used in
    /// the radius calculation; pixels are assumed to be square.
    pix2: f64,

    /// Pixels further than this from the reference pixel are blanked
    /// [arcminutes].
    max_radius_arcmin: f64,

    output: PathBuf,
}

impl PrimaryBeamResponse {
    /// Read the reference image and its header. If the primary HDU has no
    /// data, the image and header of the first extension are used. The map
    /// will be written to `output` ("vla_pbcmap.fits" if not given) when
    /// [`PrimaryBeamResponse::write_pbc_map`] is called; nothing is written
    /// here.
    pub fn new<P: AsRef<Path>>(
        input: P,
        max_radius_arcmin: f64,
        output: Option<PathBuf>,
    ) -> Result<PrimaryBeamResponse, BeamResponseError> {
        let input = input.as_ref();
        debug!("Reading reference image {}", input.display());
        let fits_image = read_image(input).map_err(BeamResponseError::ImageLoad)?;

        let image = squeeze_to_2d(fits_image.data).map_err(|shape| {
            BeamResponseError::NotTwoDimensional {
                file: input.to_path_buf().into_boxed_path(),
                shape,
            }
        })?;
        // Keep single-precision images single precision. Anything else (e.g.
        // integer images) can't hold NaN, so use double precision.
        let image_type = match fits_image.image_type {
            ImageType::Float => ImageType::Float,
            _ => ImageType::Double,
        };

        Self::new_inner(
            image,
            fits_image.header,
            fits_image.grid,
            image_type,
            max_radius_arcmin,
            output,
        )
    }

    /// As [`PrimaryBeamResponse::new`], but with an image and header that are
    /// already in memory. The map is written in double precision.
    pub fn from_image(
        image: Array2<f64>,
        header: FitsHeader,
        max_radius_arcmin: f64,
        output: Option<PathBuf>,
    ) -> Result<PrimaryBeamResponse, BeamResponseError> {
        let grid = GridKeys::from_header(&header)?;
        Self::new_inner(
            image,
            header,
            grid,
            ImageType::Double,
            max_radius_arcmin,
            output,
        )
    }

    fn new_inner(
        image: Array2<f64>,
        header: FitsHeader,
        grid: GridKeys,
        image_type: ImageType,
        max_radius_arcmin: f64,
        output: Option<PathBuf>,
    ) -> Result<PrimaryBeamResponse, BeamResponseError> {
        if max_radius_arcmin.is_nan() || max_radius_arcmin <= 0.0 {
            return Err(BeamResponseError::InvalidMaxRadius(max_radius_arcmin));
        }

        // CRPIX may be fractional; only the integer part is used.
        let crpix1 = required_key("CRPIX1", grid.crpix1)?;
        let crpix2 = required_key("CRPIX2", grid.crpix2)?;
        let x0 = crpix1.trunc() as i64 - 1;
        let y0 = crpix2.trunc() as i64 - 1;

        let pix1 = axis_pixel_scale(1, grid.cunit1.as_deref(), grid.cdelt1)?;
        let pix2 = axis_pixel_scale(2, grid.cunit2.as_deref(), grid.cdelt2)?;
        if pix1 != pix2 {
            debug!("Pixels aren't square ({pix1}\" x {pix2}\"); only the first axis' size is used");
        }

        let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PBC_MAP));
        debug!(
            "Image shape {:?}, reference pixel (x, y) = ({x0}, {y0}), pixel size {pix1}\"",
            image.dim()
        );

        Ok(PrimaryBeamResponse {
            image,
            header,
            image_type,
            x0,
            y0,
            pix1,
            pix2,
            max_radius_arcmin,
            output,
        })
    }

    /// The shape of the (squeezed) reference image and the map (rows,
    /// columns).
    pub fn dim(&self) -> (usize, usize) {
        self.image.dim()
    }

    pub fn image(&self) -> ArrayView2<f64> {
        self.image.view()
    }

    pub fn header(&self) -> &FitsHeader {
        &self.header
    }

    /// The zero-indexed reference pixel (x, y), i.e. (column, row).
    pub fn reference_pixel(&self) -> (i64, i64) {
        (self.x0, self.y0)
    }

    /// The pixel sizes along the first and second image axes [arcseconds].
    pub fn pixel_scales(&self) -> (f64, f64) {
        (self.pix1, self.pix2)
    }

    pub fn max_radius_arcmin(&self) -> f64 {
        self.max_radius_arcmin
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Get the angular distance of every pixel from the reference pixel
    /// [arcminutes].
    pub fn radius_field(&self) -> Array2<f64> {
        let (x0, y0) = (self.x0 as f64, self.y0 as f64);
        let pix1 = self.pix1;
        Array2::from_shape_fn(self.image.dim(), |(row, col)| {
            let dx = col as f64 - x0;
            let dy = row as f64 - y0;
            dx.hypot(dy) * pix1 / ARCSEC_PER_ARCMIN
        })
    }

    /// Get the primary-beam attenuation factor for every pixel. Pixels beyond
    /// the fitted domain of the beam model are held at the edge value, and
    /// pixels beyond the maximum radius are NaN.
    pub fn pbc_map(&self) -> Array2<f64> {
        let radii = self.radius_field();
        let mut pbc = vla_pbc_array(radii.view());

        // Both masks come from the radii, not from the modified map, and
        // blanking happens last.
        let edge = vla_pbc_edge();
        let mut num_flattened = 0;
        Zip::from(&mut pbc).and(&radii).for_each(|p, &r| {
            if r > VLA_PB_MAX_FIT_RADIUS_ARCMIN {
                *p = edge;
                num_flattened += 1;
            }
        });
        let mut num_blanked = 0;
        Zip::from(&mut pbc).and(&radii).for_each(|p, &r| {
            if r > self.max_radius_arcmin {
                *p = f64::NAN;
                num_blanked += 1;
            }
        });
        debug!(
            "{num_flattened} pixels beyond {VLA_PB_MAX_FIT_RADIUS_ARCMIN}', {num_blanked} pixels beyond {}'",
            self.max_radius_arcmin
        );

        pbc
    }

    /// Make the primary-beam map and write it, along with the reference
    /// image's header, to the output file. An existing file is overwritten.
    pub fn write_pbc_map(&self) -> Result<(), BeamResponseError> {
        let pbc = self.pbc_map();
        debug!("Writing primary-beam map to {}", self.output.display());
        write_primary_image(&self.output, pbc.view(), &self.header, self.image_type)
            .map_err(BeamResponseError::ImageWrite)
    }
}

/// Get the pixel size along an image axis [arcseconds] from the values of its
/// `CUNITn` and `CDELTn` keys.
fn axis_pixel_scale(
    axis: u8,
    unit: Option<&str>,
    increment: Option<f64>,
) -> Result<f64, BeamResponseError> {
    let cunit = format!("CUNIT{axis}");
    let unit = AngleUnit::from_cunit_key(&cunit, required_key(&cunit, unit)?)?;
    let increment = required_key(&format!("CDELT{axis}"), increment)?;
    Ok(increment.abs() * unit.arcsec_per_unit())
}

/// Remove leading axes of length 1 until only two axes remain. If that isn't
/// possible, the offending shape is returned.
fn squeeze_to_2d(mut data: ArrayD<f64>) -> Result<Array2<f64>, Vec<usize>> {
    while data.ndim() > 2 && data.len_of(Axis(0)) == 1 {
        data = data.index_axis_move(Axis(0), 0);
    }
    let shape = data.shape().to_vec();
    data.into_dimensionality::<Ix2>().map_err(|_| shape)
}
