//! Image resolution.

use folio_error::{DocumentError, DocumentErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Width and height of a requested image, written `WIDTHxHEIGHT`.
///
/// # Examples
///
/// ```
/// use folio_core::Dimensions;
///
/// let banner: Dimensions = "1792x1024".parse().unwrap();
/// assert_eq!(banner, Dimensions::LANDSCAPE);
/// assert_eq!(banner.to_string(), "1792x1024");
/// assert!("1024".parse::<Dimensions>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("{}x{}", width, height)]
#[serde(try_from = "String", into = "String")]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    /// 1024x1024
    pub const SQUARE: Dimensions = Dimensions::new(1024, 1024);
    /// 1792x1024
    pub const LANDSCAPE: Dimensions = Dimensions::new(1792, 1024);
    /// 1024x1792
    pub const PORTRAIT: Dimensions = Dimensions::new(1024, 1792);

    /// Create dimensions from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::SQUARE
    }
}

impl FromStr for Dimensions {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DocumentError::new(DocumentErrorKind::InvalidDimensions(s.to_string()));

        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self::new(width, height))
    }
}

impl TryFrom<String> for Dimensions {
    type Error = DocumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dimensions> for String {
    fn from(value: Dimensions) -> Self {
        value.to_string()
    }
}
