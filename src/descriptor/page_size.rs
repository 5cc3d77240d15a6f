use serde::{Deserialize, Serialize};
use std::fmt;

/// Page size tokens understood by the external renderer.
///
/// These serialize as the renderer's exact `size` values, so a descriptor can
/// only ever carry a token the renderer recognizes.
#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub enum PageSize {
    #[serde(rename = "A3")]
    A3,
    #[serde(rename = "A4")]
    A4,
    #[serde(rename = "A5")]
    A5,
    #[serde(rename = "B4")]
    B4,
    #[serde(rename = "B5")]
    B5,
    #[serde(rename = "JIS-B4")]
    JisB4,
    #[serde(rename = "JIS-B5")]
    JisB5,
    #[serde(rename = "letter")]
    Letter,
    #[serde(rename = "legal")]
    Legal,
    #[serde(rename = "ledger")]
    Ledger,
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl PageSize {
    pub fn token(&self) -> &'static str {
        match self {
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::B4 => "B4",
            PageSize::B5 => "B5",
            PageSize::JisB4 => "JIS-B4",
            PageSize::JisB5 => "JIS-B5",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
            PageSize::Ledger => "ledger",
        }
    }

    pub fn all() -> &'static [PageSize] {
        &[
            PageSize::A5,
            PageSize::A4,
            PageSize::A3,
            PageSize::B5,
            PageSize::B4,
            PageSize::JisB5,
            PageSize::JisB4,
            PageSize::Letter,
            PageSize::Legal,
            PageSize::Ledger,
        ]
    }
}
