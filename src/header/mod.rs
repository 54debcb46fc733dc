// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An in-memory FITS header.
//!
//! A header is kept as its list of 80-character cards, in order, so that it
//! can be written out again exactly as it was read. Values are parsed lazily
//! when a key is looked up.

mod error;

pub use error::HeaderError;

use std::str::FromStr;

/// The number of characters in a FITS header card.
pub(crate) const CARD_LEN: usize = 80;

/// Keywords that describe the layout or encoding of a HDU's data, rather than
/// the data's meaning. These don't carry over to a new image.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "SIMPLE", "XTENSION", "BITPIX", "NAXIS", "EXTEND", "PCOUNT", "GCOUNT", "BSCALE", "BZERO",
    "BLANK", "CHECKSUM", "DATASUM", "END",
];

/// A single header card.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCard {
    keyword: String,
    /// The value of the card, if it has one. String values are unquoted.
    value: Option<String>,
    record: String,
}

impl HeaderCard {
    /// Parse a raw header record.
    pub fn parse(record: &str) -> HeaderCard {
        let record = record.trim_end_matches(['\n', '\r']);
        let keyword = record
            .get(..8)
            .unwrap_or(record)
            .trim_end()
            .to_uppercase();
        let value = match record.get(8..10) {
            Some("= ") => record.get(10..).map(parse_value),
            _ => None,
        };
        HeaderCard {
            keyword,
            value,
            record: record.to_string(),
        }
    }

    /// Make a card for a numeric (or otherwise unquoted) value.
    pub fn new_value<T: std::fmt::Display>(keyword: &str, value: T) -> HeaderCard {
        Self::parse(&format!("{:<8}= {:>20}", keyword.to_uppercase(), value))
    }

    /// Make a card for a string value.
    pub fn new_string(keyword: &str, value: &str) -> HeaderCard {
        Self::parse(&format!(
            "{:<8}= '{:<8}'",
            keyword.to_uppercase(),
            value.replace('\'', "''")
        ))
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The card as it appears in a FITS file (without trailing padding).
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Does this card describe the data layout of its HDU? `NAXISn` counts.
    pub fn is_structural(&self) -> bool {
        let kw = self.keyword.as_str();
        STRUCTURAL_KEYWORDS.contains(&kw)
            || kw
                .strip_prefix("NAXIS")
                .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false)
    }
}

/// Pull the value out of the part of a card after the value indicator.
fn parse_value(s: &str) -> String {
    let trimmed = s.trim_start();
    if let Some(quoted) = trimmed.strip_prefix('\'') {
        // A string; two consecutive quotes are an escaped quote.
        let mut value = String::new();
        let mut chars = quoted.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    value.push('\'');
                } else {
                    break;
                }
            } else {
                value.push(c);
            }
        }
        // Trailing spaces in FITS strings aren't significant.
        value.trim_end().to_string()
    } else {
        trimmed
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// The cards of a FITS header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsHeader {
    cards: Vec<HeaderCard>,
}

impl FitsHeader {
    pub fn new() -> FitsHeader {
        FitsHeader::default()
    }

    /// Build a header from raw records.
    pub fn from_records<I, S>(records: I) -> FitsHeader
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FitsHeader {
            cards: records
                .into_iter()
                .map(|r| HeaderCard::parse(r.as_ref()))
                .collect(),
        }
    }

    pub fn push(&mut self, card: HeaderCard) {
        self.cards.push(card);
    }

    /// Add a numeric value card. Builder-style.
    pub fn with_value<T: std::fmt::Display>(mut self, keyword: &str, value: T) -> FitsHeader {
        self.push(HeaderCard::new_value(keyword, value));
        self
    }

    /// Add a string value card. Builder-style.
    pub fn with_string(mut self, keyword: &str, value: &str) -> FitsHeader {
        self.push(HeaderCard::new_string(keyword, value));
        self
    }

    pub fn cards(&self) -> &[HeaderCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get the unparsed value associated with a keyword. If the keyword is
    /// repeated, the first card wins, as in cfitsio.
    pub fn get_raw(&self, keyword: &str) -> Option<&str> {
        let keyword = keyword.to_uppercase();
        self.cards
            .iter()
            .find(|c| c.keyword == keyword)
            .and_then(|c| c.value())
    }

    /// Pull out the value of a keyword that may or may not exist, parsing it
    /// into the desired type.
    pub fn get_optional<T: FromStr>(&self, keyword: &str) -> Result<Option<T>, HeaderError> {
        let unparsed_value = match self.get_raw(keyword) {
            Some(v) => v,
            None => return Ok(None),
        };

        match unparsed_value.parse() {
            Ok(v) => Ok(Some(v)),
            // FITS allows Fortran-style exponents (e.g. 1.0D-04).
            Err(_) => match unparsed_value.replace(['D', 'd'], "E").parse() {
                Ok(v) => Ok(Some(v)),
                Err(_) => Err(HeaderError::Parse {
                    key: keyword.into(),
                    value: unparsed_value.into(),
                }),
            },
        }
    }

    /// Pull out the value of a keyword, parsing it into the desired type.
    pub fn get_required<T: FromStr>(&self, keyword: &str) -> Result<T, HeaderError> {
        self.get_optional(keyword)
            .and_then(|value| required_key(keyword, value))
    }

    /// The cards that should follow the structural keywords of a new image
    /// HDU carrying this header.
    pub fn non_structural_cards(&self) -> impl Iterator<Item = &HeaderCard> {
        self.cards.iter().filter(|c| !c.is_structural())
    }
}

/// The header keys that place an image's pixels on the sky. Any of them may be
/// absent from a header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridKeys {
    pub crpix1: Option<f64>,
    pub crpix2: Option<f64>,
    pub cdelt1: Option<f64>,
    pub cdelt2: Option<f64>,
    pub cunit1: Option<String>,
    pub cunit2: Option<String>,
}

impl GridKeys {
    /// Look the keys up in an in-memory header.
    pub fn from_header(header: &FitsHeader) -> Result<GridKeys, HeaderError> {
        Ok(GridKeys {
            crpix1: header.get_optional("CRPIX1")?,
            crpix2: header.get_optional("CRPIX2")?,
            cdelt1: header.get_optional("CDELT1")?,
            cdelt2: header.get_optional("CDELT2")?,
            cunit1: header.get_optional("CUNIT1")?,
            cunit2: header.get_optional("CUNIT2")?,
        })
    }
}

/// Turn the value of a key that must exist into a result.
pub(crate) fn required_key<T>(keyword: &str, value: Option<T>) -> Result<T, HeaderError> {
    value.ok_or_else(|| HeaderError::MissingKey {
        key: keyword.into(),
    })
}
