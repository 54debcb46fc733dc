// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with looking up FITS header keys.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeaderError {
    /// A key that must be in the header couldn't be found.
    #[error("Couldn't find key {key} in the header")]
    MissingKey { key: Box<str> },

    /// A key's value couldn't be parsed into the desired type.
    #[error("Couldn't parse the value of {key} ('{value}')")]
    Parse { key: Box<str>, value: Box<str> },
}
