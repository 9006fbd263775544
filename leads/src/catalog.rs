//! Fixed option catalogs rendered by the site forms.
//!
//! DESIGN
//! ======
//! Each catalog is a closed enum whose serde representation is the exact
//! value the UI submits. The server validates against these same enums, so
//! an option added to a form without a matching variant is rejected instead
//! of silently stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A submitted value that is not part of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {catalog} option: {value}")]
pub struct UnknownOption {
    pub catalog: &'static str,
    pub value: String,
}

// =============================================================================
// REGION
// =============================================================================

/// Country/region selector on the inquiry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    MiddleEast,
    Russia,
    Asia,
    Africa,
    Europe,
    America,
    Other,
}

impl Region {
    pub const ALL: [Self; 7] =
        [Self::MiddleEast, Self::Russia, Self::Asia, Self::Africa, Self::Europe, Self::America, Self::Other];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MiddleEast => "middle-east",
            Self::Russia => "russia",
            Self::Asia => "asia",
            Self::Africa => "africa",
            Self::Europe => "europe",
            Self::America => "america",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::MiddleEast => "Middle East",
            Self::Russia => "Russia & Eastern Europe",
            Self::Asia => "South & Southeast Asia",
            Self::Africa => "Sub-Saharan Africa",
            Self::Europe => "Western Europe",
            Self::America => "Americas",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Region {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == s)
            .ok_or_else(|| UnknownOption { catalog: "region", value: s.to_owned() })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// INTEREST
// =============================================================================

/// "What are you interested in" selector on the inquiry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Samples,
    Pricing,
    Bulk,
    Partnership,
    Other,
}

impl Interest {
    pub const ALL: [Self; 5] = [Self::Samples, Self::Pricing, Self::Bulk, Self::Partnership, Self::Other];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Samples => "samples",
            Self::Pricing => "pricing",
            Self::Bulk => "bulk",
            Self::Partnership => "partnership",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Samples => "Request Samples",
            Self::Pricing => "Pricing Information",
            Self::Bulk => "Bulk Orders",
            Self::Partnership => "Partnership Opportunities",
            Self::Other => "Other Inquiries",
        }
    }
}

impl FromStr for Interest {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|interest| interest.as_str() == s)
            .ok_or_else(|| UnknownOption { catalog: "interest", value: s.to_owned() })
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TEA TYPE
// =============================================================================

/// Sample grades offered in the sample-request modal.
///
/// Variant order is catalog order; sorting a selection by `Ord` yields the
/// order the checkboxes are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeaType {
    #[serde(rename = "Black Tea (CTC) - PEKOE")]
    CtcPekoe,
    #[serde(rename = "Black Tea (CTC) - BROKEN PEKOE")]
    CtcBrokenPekoe,
    #[serde(rename = "Black Tea (CTC) - FANNINGS")]
    CtcFannings,
    #[serde(rename = "Black Tea (Orthodox) - OP")]
    OrthodoxOp,
    #[serde(rename = "Black Tea (Orthodox) - FBOP")]
    OrthodoxFbop,
    #[serde(rename = "Black Tea (Orthodox) - PEKOE")]
    OrthodoxPekoe,
    #[serde(rename = "Green Tea - GUNPOWDER")]
    GreenGunpowder,
    #[serde(rename = "Green Tea - SENCHA STYLE")]
    GreenSencha,
    #[serde(rename = "Green Tea - SPECIALTY")]
    GreenSpecialty,
}

impl TeaType {
    pub const ALL: [Self; 9] = [
        Self::CtcPekoe,
        Self::CtcBrokenPekoe,
        Self::CtcFannings,
        Self::OrthodoxOp,
        Self::OrthodoxFbop,
        Self::OrthodoxPekoe,
        Self::GreenGunpowder,
        Self::GreenSencha,
        Self::GreenSpecialty,
    ];

    /// Wire value, which doubles as the checkbox label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CtcPekoe => "Black Tea (CTC) - PEKOE",
            Self::CtcBrokenPekoe => "Black Tea (CTC) - BROKEN PEKOE",
            Self::CtcFannings => "Black Tea (CTC) - FANNINGS",
            Self::OrthodoxOp => "Black Tea (Orthodox) - OP",
            Self::OrthodoxFbop => "Black Tea (Orthodox) - FBOP",
            Self::OrthodoxPekoe => "Black Tea (Orthodox) - PEKOE",
            Self::GreenGunpowder => "Green Tea - GUNPOWDER",
            Self::GreenSencha => "Green Tea - SENCHA STYLE",
            Self::GreenSpecialty => "Green Tea - SPECIALTY",
        }
    }
}

impl FromStr for TeaType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tea| tea.as_str() == s)
            .ok_or_else(|| UnknownOption { catalog: "tea type", value: s.to_owned() })
    }
}

impl fmt::Display for TeaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
