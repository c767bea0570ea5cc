use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Canonical crypto asset.
///
/// The set is closed: every provider adapter either maps one of these to its
/// own identifier or reports the asset as unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Sol,
    Bnb,
    Xrp,
    Doge,
}

impl Asset {
    /// Every supported asset, in display order.
    pub const ALL: [Asset; 6] = [
        Asset::Btc,
        Asset::Eth,
        Asset::Sol,
        Asset::Bnb,
        Asset::Xrp,
        Asset::Doge,
    ];

    /// Canonical ticker symbol (e.g. "BTC").
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Sol => "SOL",
            Self::Bnb => "BNB",
            Self::Xrp => "XRP",
            Self::Doge => "DOGE",
        }
    }

    /// Parse a comma separated symbol list such as `"btc, ETH"`.
    pub fn parse_list(value: &str) -> Result<Vec<Asset>, MarketDataError> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Asset::from_str)
            .collect()
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Asset::ALL
            .into_iter()
            .find(|asset| asset.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MarketDataError::UnsupportedAsset(wanted.to_string()))
    }
}
