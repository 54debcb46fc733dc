// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions for reading and writing FITS images.

mod error;

pub use error::FitsError;

use std::{
    ffi::{c_char, CStr, CString},
    fmt::Display,
    panic::Location,
    path::Path,
};

use fitsio::{
    hdu::{DescribesHdu, FitsHdu, HduInfo},
    headers::ReadsKey,
    images::{ImageDescription, ImageType, ReadImage, WriteImage},
    FitsFile,
};
use log::{debug, trace};
use ndarray::prelude::*;

use crate::header::{FitsHeader, GridKeys, CARD_LEN};

/// An image read from a FITS file, along with its header.
#[derive(Debug)]
pub struct FitsImage {
    /// The image data. The axes are in C order, i.e. the first axis is the
    /// last FITS axis (`NAXISn`) and the last axis is `NAXIS1`.
    pub data: ArrayD<f64>,

    pub header: FitsHeader,

    /// The sky-grid keys of the header, as read by cfitsio.
    pub grid: GridKeys,

    /// The type of the data as stored in the file (i.e. `BITPIX`).
    pub image_type: ImageType,
}

/// Read the image of a FITS file, as well as all of its header cards and the
/// keys that place its pixels on the sky. The image is normally in the primary
/// HDU, but if that has no data, the first extension is used instead (along
/// with its header).
#[track_caller]
pub fn read_image<P: AsRef<Path>>(file: P) -> Result<FitsImage, FitsError> {
    let caller = Location::caller();
    let mut fptr = fits_open(&file)?;
    let mut hdu = fits_open_hdu(&mut fptr, 0)?;
    let primary_is_empty = fits_get_image_info(&fptr, &hdu)?.0.is_empty();
    if primary_is_empty {
        match fptr.hdu(1) {
            Ok(ext) => {
                debug!(
                    "{}: primary HDU has no data; using HDU 2",
                    file.as_ref().display()
                );
                hdu = ext;
            }
            Err(_) => {
                return Err(FitsError::EmptyImage {
                    fits_filename: fptr.file_path().to_path_buf().into_boxed_path(),
                    hdu_num: 1,
                    source_file: caller.file(),
                    source_line: caller.line(),
                    source_column: caller.column(),
                })
            }
        }
    }

    let header = fits_get_header(&mut fptr, &hdu)?;
    trace!("Read {} header cards", header.len());
    let grid = GridKeys {
        crpix1: fits_get_optional_key(&mut fptr, &hdu, "CRPIX1")?,
        crpix2: fits_get_optional_key(&mut fptr, &hdu, "CRPIX2")?,
        cdelt1: fits_get_optional_key(&mut fptr, &hdu, "CDELT1")?,
        cdelt2: fits_get_optional_key(&mut fptr, &hdu, "CDELT2")?,
        cunit1: fits_get_optional_key(&mut fptr, &hdu, "CUNIT1")?,
        cunit2: fits_get_optional_key(&mut fptr, &hdu, "CUNIT2")?,
    };

    let (shape, image_type) = fits_get_image_info(&fptr, &hdu)?;
    let shape = shape.to_vec();
    debug!(
        "{} HDU {}: image shape {shape:?}, type {image_type:?}",
        file.as_ref().display(),
        hdu.number + 1
    );
    if shape.is_empty() {
        return Err(FitsError::EmptyImage {
            fits_filename: fptr.file_path().to_path_buf().into_boxed_path(),
            hdu_num: hdu.number + 1,
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        });
    }
    let flat: Vec<f64> = fits_get_image(&mut fptr, &hdu)?;
    let data = ArrayD::from_shape_vec(IxDyn(&shape), flat).map_err(|e| FitsError::Shape {
        shape: shape.clone(),
        shape_error: e,
        fits_filename: fptr.file_path().to_path_buf().into_boxed_path(),
        hdu_num: hdu.number + 1,
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    })?;

    Ok(FitsImage {
        data,
        header,
        grid,
        image_type,
    })
}

/// Write a 2D image as the primary HDU of a new FITS file, followed by the
/// non-structural cards of `header`. Any existing file at `file` is replaced.
#[track_caller]
pub fn write_primary_image<P: AsRef<Path>>(
    file: P,
    data: ArrayView2<f64>,
    header: &FitsHeader,
    image_type: ImageType,
) -> Result<(), FitsError> {
    let (num_rows, num_cols) = data.dim();
    let dim = [num_rows, num_cols];
    let image_description = ImageDescription {
        data_type: image_type,
        dimensions: &dim,
    };
    let mut fptr = fits_create_image(&file, &image_description)?;
    let hdu = fits_open_hdu(&mut fptr, 0)?;

    // cfitsio writes its own cards (e.g. the standard COMMENT lines) when the
    // image is created; don't double up on them.
    let existing = fits_get_header(&mut fptr, &hdu)?;
    let cards = header.non_structural_cards().filter(|c| {
        !existing
            .cards()
            .iter()
            .any(|e| e.record().trim_end() == c.record().trim_end())
    });
    fits_write_header_records(&mut fptr, &hdu, cards.map(|c| c.record()))?;

    // Row-major iteration matches the FITS layout with NAXIS1 fastest.
    let flat: Vec<f64> = data.iter().copied().collect();
    fits_write_image(&mut fptr, &hdu, &flat)?;
    debug!(
        "Wrote {num_rows}x{num_cols} image to {}",
        file.as_ref().display()
    );
    Ok(())
}

fn fitsio_error(
    fits_error: fitsio::errors::Error,
    fits_fptr: &FitsFile,
    hdu_description: impl Display,
    caller: &'static Location<'static>,
) -> FitsError {
    FitsError::Fitsio {
        fits_error: Box::new(fits_error),
        fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
        hdu_description: format!("{hdu_description}").into_boxed_str(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    }
}

/// Open a fits file.
#[track_caller]
pub(crate) fn fits_open<P: AsRef<Path>>(file: P) -> Result<FitsFile, FitsError> {
    let caller = Location::caller();
    FitsFile::open(file.as_ref()).map_err(|e| FitsError::Open {
        fits_error: Box::new(e),
        fits_filename: file.as_ref().to_path_buf().into_boxed_path(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    })
}

/// Create a new fits file whose primary HDU is an image. If the file already
/// exists, it is removed first.
#[track_caller]
pub(crate) fn fits_create_image<P: AsRef<Path>>(
    file: P,
    image_description: &ImageDescription,
) -> Result<FitsFile, FitsError> {
    let caller = Location::caller();
    let file = file.as_ref();
    let create_error = |e: fitsio::errors::Error| FitsError::Create {
        fits_error: Box::new(e),
        fits_filename: file.to_path_buf().into_boxed_path(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    };

    if file.exists() {
        trace!("Removing existing {}", file.display());
        std::fs::remove_file(file).map_err(|e| create_error(e.into()))?;
    }
    FitsFile::create(file)
        .with_custom_primary(image_description)
        .open()
        .map_err(create_error)
}

/// Open a fits file's HDU.
#[track_caller]
pub(crate) fn fits_open_hdu<T: DescribesHdu + Display + Copy>(
    fits_fptr: &mut FitsFile,
    hdu_description: T,
) -> Result<FitsHdu, FitsError> {
    let caller = Location::caller();
    fits_fptr
        .hdu(hdu_description)
        .map_err(|e| fitsio_error(e, fits_fptr, hdu_description, caller))
}

/// Given a FITS file pointer, a HDU that belongs to it, and a keyword that may
/// or may not exist, pull out the value of the keyword. cfitsio converts the
/// value into the desired type.
#[track_caller]
pub(crate) fn fits_get_optional_key<T: ReadsKey>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    keyword: &str,
) -> Result<Option<T>, FitsError> {
    let caller = Location::caller();
    match hdu.read_key(fits_fptr, keyword) {
        Ok(value) => Ok(Some(value)),
        Err(e) => match &e {
            // KEY_NO_EXIST or VALUE_UNDEFINED
            fitsio::errors::Error::Fits(fe) if matches!(fe.status, 202 | 204) => Ok(None),
            _ => Err(fitsio_error(e, fits_fptr, hdu.number + 1, caller)),
        },
    }
}

/// Get the shape and data type of the image on the supplied FITS file pointer
/// and HDU.
#[track_caller]
pub(crate) fn fits_get_image_info<'a>(
    fits_fptr: &FitsFile,
    hdu: &'a FitsHdu,
) -> Result<(&'a [usize], ImageType), FitsError> {
    match &hdu.info {
        HduInfo::ImageInfo { shape, image_type } => Ok((shape, *image_type)),
        _ => {
            let caller = Location::caller();
            Err(FitsError::NotImage {
                fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
                hdu_num: hdu.number + 1,
                source_file: caller.file(),
                source_line: caller.line(),
                source_column: caller.column(),
            })
        }
    }
}

/// Given a FITS file pointer and a HDU, read the associated image.
#[track_caller]
pub(crate) fn fits_get_image<T: ReadImage>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
) -> Result<T, FitsError> {
    let caller = Location::caller();
    fits_get_image_info(fits_fptr, hdu)?;
    hdu.read_image(fits_fptr)
        .map_err(|e| fitsio_error(e, fits_fptr, hdu.number + 1, caller))
}

/// Given a FITS file pointer and a HDU, write the image.
#[track_caller]
pub(crate) fn fits_write_image<T: WriteImage>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    data: &[T],
) -> Result<(), FitsError> {
    let caller = Location::caller();
    fits_get_image_info(fits_fptr, hdu)?;
    hdu.write_image(fits_fptr, data)
        .map_err(|e| fitsio_error(e, fits_fptr, hdu.number + 1, caller))
}

/// Move the cfitsio file pointer to the HDU so that low-level calls act on it.
#[track_caller]
fn fits_move_to_hdu(fits_fptr: &mut FitsFile, hdu: &FitsHdu) -> Result<(), FitsError> {
    let caller = Location::caller();
    let mut status = 0;
    let mut hdu_type = 0;
    unsafe {
        // ffmahd = fits_movabs_hdu
        fitsio_sys::ffmahd(
            fits_fptr.as_raw(),
            (hdu.number + 1) as _,
            &mut hdu_type,
            &mut status,
        );
    }
    fitsio::errors::check_status(status)
        .map_err(|e| fitsio_error(e, fits_fptr, hdu.number + 1, caller))
}

/// Read every card of a HDU's header (excluding END). fitsio only exposes
/// individual keys, so this uses cfitsio directly.
#[track_caller]
pub(crate) fn fits_get_header(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
) -> Result<FitsHeader, FitsError> {
    let caller = Location::caller();
    fits_move_to_hdu(fits_fptr, hdu)?;

    let mut status = 0;
    let mut num_keys = 0;
    let mut num_more_keys = 0;
    unsafe {
        // ffghsp = fits_get_hdrspace
        fitsio_sys::ffghsp(
            fits_fptr.as_raw(),
            &mut num_keys,
            &mut num_more_keys,
            &mut status,
        );
    }
    fitsio::errors::check_status(status)
        .map_err(|e| fitsio_error(e, fits_fptr, hdu.number + 1, caller))?;

    let mut records = Vec::with_capacity(num_keys.max(0) as usize);
    for i_key in 1..=num_keys {
        let mut card: [c_char; CARD_LEN + 1] = [0; CARD_LEN + 1];
        unsafe {
            // ffgrec = fits_read_record
            fitsio_sys::ffgrec(fits_fptr.as_raw(), i_key, card.as_mut_ptr(), &mut status);
        }
        fitsio::errors::check_status(status)
            .map_err(|e| fitsio_error(e, fits_fptr, hdu.number + 1, caller))?;
        let record = unsafe { CStr::from_ptr(card.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        records.push(record);
    }

    Ok(FitsHeader::from_records(records))
}

/// Append raw 80-character records to a HDU's header.
#[track_caller]
pub(crate) fn fits_write_header_records<'a, I>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    records: I,
) -> Result<(), FitsError>
where
    I: IntoIterator<Item = &'a str>,
{
    let caller = Location::caller();
    fits_move_to_hdu(fits_fptr, hdu)?;

    let mut status = 0;
    for record in records {
        // Records read from a FITS file can't contain NUL.
        let record = CString::new(record.replace('\0', "")).unwrap_or_default();
        unsafe {
            // ffprec = fits_write_record
            fitsio_sys::ffprec(fits_fptr.as_raw(), record.as_ptr(), &mut status);
        }
        fitsio::errors::check_status(status)
            .map_err(|e| fitsio_error(e, fits_fptr, hdu.number + 1, caller))?;
    }
    Ok(())
}
