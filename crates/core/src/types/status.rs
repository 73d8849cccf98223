//! Catalog enums: badges, platforms, availability and categories.

use serde::{Deserialize, Serialize};

/// Promotional label shown on a catalog card. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    New,
    Sale,
    Popular,
    ComingSoon,
}

impl Badge {
    /// Label text as rendered on the card.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Sale => "SALE",
            Self::Popular => "POPULAR",
            Self::ComingSoon => "COMING SOON",
        }
    }

    /// CSS modifier used by the card templates.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::New => "badge-new",
            Self::Sale => "badge-sale",
            Self::Popular => "badge-popular",
            Self::ComingSoon => "badge-coming-soon",
        }
    }
}

/// External platform a game pass is redeemed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Roblox,
    Scratch,
    Other,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Roblox => write!(f, "Roblox"),
            Self::Scratch => write!(f, "Scratch"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Availability of a game pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GamePassStatus {
    #[default]
    Active,
    Maintenance,
    Unavailable,
    ComingSoon,
}

impl GamePassStatus {
    /// Whether the storefront offers a buy / add-to-cart control.
    ///
    /// Presentation only: the cart store itself accepts any item.
    #[must_use]
    pub const fn is_purchasable(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Message shown in place of the buy control.
    #[must_use]
    pub const fn unavailable_reason(self) -> Option<&'static str> {
        match self {
            Self::Active => None,
            Self::Maintenance => Some("This item is currently under maintenance."),
            Self::Unavailable => Some("This item is currently unavailable."),
            Self::ComingSoon => Some("This item is coming soon."),
        }
    }
}

impl std::fmt::Display for GamePassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Maintenance => write!(f, "maintenance"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::ComingSoon => write!(f, "coming_soon"),
        }
    }
}

/// Game pass category (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePassCategory {
    /// Horror survival game.
    Dusk,
    /// Support tiers.
    Donation,
    Other,
    #[serde(rename = "Coming Soon")]
    ComingSoon,
}

impl GamePassCategory {
    /// Display name, also the value used in `?category=` filters.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dusk => "Dusk",
            Self::Donation => "Donation",
            Self::Other => "Other",
            Self::ComingSoon => "Coming Soon",
        }
    }
}

impl std::fmt::Display for GamePassCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for GamePassCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dusk" => Ok(Self::Dusk),
            "Donation" => Ok(Self::Donation),
            "Other" => Ok(Self::Other),
            "Coming Soon" => Ok(Self::ComingSoon),
            _ => Err(format!("invalid game pass category: {s}")),
        }
    }
}
