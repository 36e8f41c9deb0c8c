//! Option chain candidates and moneyness classification

use crate::pricing::OptionType;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A listed option offered as a hedge candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Exchange instrument name (e.g. "BTC-26JUL24-30000-P")
    pub instrument: String,
    pub underlying: String,
    pub option_type: OptionType,
    pub strike: f64,
    pub expiry: DateTime<Utc>,
    /// Per-contract delta
    pub delta: f64,
    /// Best ask premium
    pub ask_price: f64,
    /// Mark premium
    pub mark_price: f64,
}

/// Strike position relative to spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Moneyness {
    Atm,
    Otm,
    Itm,
}

impl Moneyness {
    /// Classify a strike against spot for the given option type
    pub fn classify(option_type: OptionType, strike: f64, spot: f64) -> Self {
        if strike == spot {
            return Moneyness::Atm;
        }
        let strike_above = strike > spot;
        match (option_type, strike_above) {
            (OptionType::Call, true) | (OptionType::Put, false) => Moneyness::Otm,
            (OptionType::Call, false) | (OptionType::Put, true) => Moneyness::Itm,
        }
    }
}

/// Borrowed candidate paired with its moneyness at filter time
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedOption<'a> {
    pub quote: &'a OptionQuote,
    pub moneyness: Moneyness,
    /// |strike - spot|
    pub distance: f64,
}

/// Expiry lies in `(as_of, as_of + window]`.
///
/// Only the forward half of a `±window` band is used: a contract expiring at
/// or before `as_of` is never a candidate. A window reaching past the last
/// representable time leaves the upper end open.
pub(crate) fn within_expiry_window(
    quote: &OptionQuote,
    as_of: DateTime<Utc>,
    window: Duration,
) -> bool {
    quote.expiry > as_of
        && as_of
            .checked_add_signed(window)
            .map_or(true, |end| quote.expiry <= end)
}

/// Usable hedge candidates: inside the window with a non-zero finite delta
pub(crate) fn qualifying<'a>(
    chain: &'a [OptionQuote],
    spot: f64,
    as_of: DateTime<Utc>,
    window: Duration,
) -> impl Iterator<Item = ClassifiedOption<'a>> {
    chain
        .iter()
        .filter(move |q| within_expiry_window(q, as_of, window))
        .filter(|q| q.delta.is_finite() && q.delta != 0.0)
        .map(move |quote| ClassifiedOption {
            quote,
            moneyness: Moneyness::classify(quote.option_type, quote.strike, spot),
            distance: (quote.strike - spot).abs(),
        })
}
