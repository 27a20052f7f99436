use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A base/quote trading pair, normalized to uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl TradingPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        TradingPair {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

impl FromStr for TradingPair {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, '-');
        let base = parts.next().filter(|p| !p.is_empty()).ok_or("missing base asset")?;
        let quote = parts.next().filter(|p| !p.is_empty()).ok_or("missing quote asset")?;
        Ok(TradingPair::new(base, quote))
    }
}
