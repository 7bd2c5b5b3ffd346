//! The fixed option catalog: every selectable choice the wizard offers,
//! with its display label and price effect.
//!
//! Options are enumerated variants rather than raw label strings, so pricing
//! never depends on substring matching. Parsing is by exact display label;
//! callers decide what an unrecognized label means (the pricing engine is
//! deliberately lenient, the wizard is strict).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeOption {
    EightByTen,
    TenByTwelve,
    TwelveBySixteen,
    TwelveByTwenty,
}

impl SizeOption {
    pub const ALL: [SizeOption; 4] =
        [Self::EightByTen, Self::TenByTwelve, Self::TwelveBySixteen, Self::TwelveByTwenty];

    pub fn label(self) -> &'static str {
        match self {
            Self::EightByTen => "8x10 ($3,500)",
            Self::TenByTwelve => "10x12 ($4,200)",
            Self::TwelveBySixteen => "12x16 ($6,500)",
            Self::TwelveByTwenty => "12x20 ($8,000)",
        }
    }

    /// Base materials cost for the footprint.
    pub fn materials_cost(self) -> Decimal {
        match self {
            Self::EightByTen => Decimal::from(1580),
            Self::TenByTwelve => Decimal::from(2150),
            Self::TwelveBySixteen => Decimal::from(2950),
            Self::TwelveByTwenty => Decimal::from(3800),
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.label() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleOption {
    AFrame,
    LoftedBarn,
    ModernSaltbox,
    Quaker,
}

impl StyleOption {
    pub const ALL: [StyleOption; 4] =
        [Self::AFrame, Self::LoftedBarn, Self::ModernSaltbox, Self::Quaker];

    pub fn label(self) -> &'static str {
        match self {
            Self::AFrame => "A-Frame",
            Self::LoftedBarn => "Lofted Barn",
            Self::ModernSaltbox => "Modern Saltbox",
            Self::Quaker => "Quaker",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.label() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SidingOption {
    SmartPanel,
    VinylDutchlap,
    Cedar,
}

impl SidingOption {
    pub const ALL: [SidingOption; 3] = [Self::SmartPanel, Self::VinylDutchlap, Self::Cedar];

    pub fn label(self) -> &'static str {
        match self {
            Self::SmartPanel => "Smart Panel T1-11 (Included)",
            Self::VinylDutchlap => "Vinyl Dutchlap (+$800)",
            Self::Cedar => "Cedar (+$1,200)",
        }
    }

    pub fn upcharge(self) -> Decimal {
        match self {
            Self::SmartPanel => Decimal::ZERO,
            Self::VinylDutchlap => Decimal::from(800),
            Self::Cedar => Decimal::from(1200),
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.label() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofOption {
    AsphaltShingles,
    MetalStandingSeam,
}

impl RoofOption {
    pub const ALL: [RoofOption; 2] = [Self::AsphaltShingles, Self::MetalStandingSeam];

    pub fn label(self) -> &'static str {
        match self {
            Self::AsphaltShingles => "Asphalt Shingles (Included)",
            Self::MetalStandingSeam => "Metal Standing Seam (+$400)",
        }
    }

    pub fn upcharge(self) -> Decimal {
        match self {
            Self::AsphaltShingles => Decimal::ZERO,
            Self::MetalStandingSeam => Decimal::from(400),
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.label() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddonOption {
    ExtraWindows,
    Skylights,
    Electrical,
}

impl AddonOption {
    pub const ALL: [AddonOption; 3] = [Self::ExtraWindows, Self::Skylights, Self::Electrical];

    pub fn label(self) -> &'static str {
        match self {
            Self::ExtraWindows => "Extra Windows (+$150)",
            Self::Skylights => "Skylights (+$300)",
            Self::Electrical => "Electrical (+$800)",
        }
    }

    /// Flat fee added once per selected add-on.
    pub fn fee(self) -> Decimal {
        match self {
            Self::ExtraWindows => Decimal::from(150),
            Self::Skylights => Decimal::from(300),
            Self::Electrical => Decimal::from(800),
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.label() == label)
    }
}
