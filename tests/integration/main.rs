// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod pbc_map;

use std::path::{Path, PathBuf};
use std::process::Output;
use std::str::from_utf8;

use assert_cmd::{output::OutputError, Command};
use fitsio::{
    images::{ImageDescription, ImageType},
    FitsFile,
};

fn vla_beam() -> Command {
    Command::cargo_bin("vla_beam").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write a 2D single-precision reference image into `dir`. The reference pixel
/// (1-indexed) is at `crpix` and the pixels are `cdelt_arcsec` on a side.
fn make_reference_image<T: AsRef<Path>>(
    dir: T,
    name: &str,
    (num_rows, num_cols): (usize, usize),
    crpix: (f64, f64),
    cdelt_arcsec: f64,
    cunit: &str,
) -> PathBuf {
    let path = dir.as_ref().join(name);
    let image_description = ImageDescription {
        data_type: ImageType::Float,
        dimensions: &[num_rows, num_cols],
    };
    let mut fptr = FitsFile::create(&path)
        .with_custom_primary(&image_description)
        .open()
        .unwrap();
    let hdu = fptr.hdu(0).unwrap();
    hdu.write_key(&mut fptr, "CRPIX1", crpix.0).unwrap();
    hdu.write_key(&mut fptr, "CRPIX2", crpix.1).unwrap();
    hdu.write_key(&mut fptr, "CDELT1", -cdelt_arcsec).unwrap();
    hdu.write_key(&mut fptr, "CDELT2", cdelt_arcsec).unwrap();
    hdu.write_key(&mut fptr, "CUNIT1", cunit).unwrap();
    hdu.write_key(&mut fptr, "CUNIT2", cunit).unwrap();
    hdu.write_key(&mut fptr, "OBJECT", "J1331+3030").unwrap();
    let data = vec![1.0_f32; num_rows * num_cols];
    hdu.write_image(&mut fptr, &data).unwrap();
    path
}

/// Read the primary image of a FITS file as (shape, data).
fn read_image(path: &Path) -> (Vec<usize>, Vec<f64>) {
    let mut fptr = FitsFile::open(path).unwrap();
    let hdu = fptr.primary_hdu().unwrap();
    let shape = match &hdu.info {
        fitsio::hdu::HduInfo::ImageInfo { shape, .. } => shape.clone(),
        _ => panic!("primary HDU isn't an image"),
    };
    let data: Vec<f64> = hdu.read_image(&mut fptr).unwrap();
    (shape, data)
}
