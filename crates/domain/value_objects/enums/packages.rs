use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Priced bundle selected for a project. Decides the image quota, the price and
/// whether a video can be generated.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Package {
    #[default]
    Starter,
    Pro,
    Unlimited,
}

impl Package {
    pub fn as_str(&self) -> &'static str {
        match self {
            Package::Starter => "starter",
            Package::Pro => "pro",
            Package::Unlimited => "unlimited",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "starter" => Some(Package::Starter),
            "pro" => Some(Package::Pro),
            "unlimited" => Some(Package::Unlimited),
            _ => None,
        }
    }

    /// Stored rows with an unknown package fall back to the starter quota.
    pub fn from_stored(value: &str) -> Self {
        Self::from_str(value).unwrap_or_default()
    }

    pub fn image_limit(&self) -> usize {
        match self {
            Package::Starter => 6,
            Package::Pro | Package::Unlimited => 30,
        }
    }

    /// Whole-euro price. `None` means the package cannot be bought through checkout.
    pub fn price_eur(&self) -> Option<i64> {
        match self {
            Package::Starter => Some(50),
            Package::Pro => Some(250),
            Package::Unlimited => None,
        }
    }

    pub fn price_minor(&self) -> Option<i64> {
        self.price_eur().map(|eur| eur * 100)
    }

    pub fn includes_video(&self) -> bool {
        !matches!(self, Package::Starter)
    }

    /// The starter package doubles as the free trial and skips the payment gate.
    pub fn is_free_trial(&self) -> bool {
        matches!(self, Package::Starter)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Package::Starter => "Starter",
            Package::Pro => "Pro",
            Package::Unlimited => "Unlimited",
        }
    }
}

impl Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
