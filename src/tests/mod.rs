// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions for tests.

use std::path::{Path, PathBuf};

use fitsio::{
    hdu::FitsHdu,
    images::{ImageDescription, ImageType},
    FitsFile,
};

/// A header value to write into a test FITS file.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Key<'a> {
    Float(f64),
    Str(&'a str),
}

/// Write a FITS file with a primary image of the given shape (C order, i.e.
/// `[..., NAXIS2, NAXIS1]`) and header keys. The pixel values count up from 0.
pub(crate) fn make_fits_image(
    path: &Path,
    shape: &[usize],
    image_type: ImageType,
    keys: &[(&str, Key)],
) {
    let image_description = ImageDescription {
        data_type: image_type,
        dimensions: shape,
    };
    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&image_description)
        .open()
        .unwrap();
    let hdu = fptr.hdu(0).unwrap();
    write_keys_and_counting_data(&mut fptr, &hdu, shape, keys);
}

/// As [`make_fits_image`], but the primary HDU is empty and the image is in
/// an extension called "SCI".
pub(crate) fn make_fits_image_in_extension(
    path: &Path,
    shape: &[usize],
    image_type: ImageType,
    keys: &[(&str, Key)],
) {
    let image_description = ImageDescription {
        data_type: image_type,
        dimensions: shape,
    };
    let mut fptr = FitsFile::create(path).open().unwrap();
    let hdu = fptr.create_image("SCI", &image_description).unwrap();
    write_keys_and_counting_data(&mut fptr, &hdu, shape, keys);
}

fn write_keys_and_counting_data(
    fptr: &mut FitsFile,
    hdu: &FitsHdu,
    shape: &[usize],
    keys: &[(&str, Key)],
) {
    for (key, value) in keys {
        match value {
            Key::Float(f) => hdu.write_key(fptr, key, *f).unwrap(),
            Key::Str(s) => hdu.write_key(fptr, key, *s).unwrap(),
        }
    }
    let num_pixels = shape.iter().product::<usize>();
    let data: Vec<f64> = (0..num_pixels).map(|i| i as f64).collect();
    hdu.write_image(fptr, &data).unwrap();
}

/// The keys of a reference image with square pixels of `cdelt_deg` degrees
/// and the reference pixel (1-indexed) at `crpix`.
pub(crate) fn reference_keys(
    crpix: (f64, f64),
    cdelt_deg: f64,
) -> Vec<(&'static str, Key<'static>)> {
    vec![
        ("CRPIX1", Key::Float(crpix.0)),
        ("CRPIX2", Key::Float(crpix.1)),
        ("CDELT1", Key::Float(-cdelt_deg)),
        ("CDELT2", Key::Float(cdelt_deg)),
        ("CUNIT1", Key::Str("deg")),
        ("CUNIT2", Key::Str("deg")),
        ("CTYPE1", Key::Str("RA---SIN")),
        ("CTYPE2", Key::Str("DEC--SIN")),
        ("OBJECT", Key::Str("J1331+3030")),
    ]
}

/// Write a reference image with square pixels of `cdelt_deg` degrees and the
/// reference pixel (1-indexed) at `crpix`.
pub(crate) fn make_reference_image<T: AsRef<Path>>(
    dir: T,
    name: &str,
    shape: &[usize],
    crpix: (f64, f64),
    cdelt_deg: f64,
) -> PathBuf {
    let path = dir.as_ref().join(name);
    make_fits_image(
        &path,
        shape,
        ImageType::Float,
        &reference_keys(crpix, cdelt_deg),
    );
    path
}
