//! Apparel size enumeration.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Apparel sizes carried by the catalog, smallest first.
///
/// Declaration order is the canonical order everywhere sizes are listed or
/// written (facets, selectors, stock reconciliation batches). Serialized as
/// the bare uppercase token, e.g. `"XS"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
}

impl Size {
    /// Every size, canonical order.
    pub const ALL: [Size; 5] = [Size::XS, Size::S, Size::M, Size::L, Size::XL];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::XS => "XS",
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
        }
    }
}

impl core::fmt::Display for Size {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XS" => Ok(Size::XS),
            "S" => Ok(Size::S),
            "M" => Ok(Size::M),
            "L" => Ok(Size::L),
            "XL" => Ok(Size::XL),
            other => Err(DomainError::validation(
                "size",
                format!("unknown size {other:?}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_ordered_smallest_first() {
        assert!(Size::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Size::ALL[0], Size::XS);
        assert_eq!(Size::ALL[4], Size::XL);
    }

    #[test]
    fn round_trips_through_display_and_parse() {
        for size in Size::ALL {
            assert_eq!(size.as_str().parse::<Size>().unwrap(), size);
        }
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!("XXL".parse::<Size>().is_err());
        assert!("m".parse::<Size>().is_err());
    }
}
