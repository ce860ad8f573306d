//! Price quotes.
//!
//! A quote is computed independently per (problem, worker) pair and is never
//! cached: the provider is non-deterministic, so identical inputs may price
//! differently on a repeated call.

use serde::{Deserialize, Serialize};

/// One named adjustment within a quote breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub factor: String,
    /// Dollar amount; negative for discounts.
    #[serde(default)]
    pub amount: f64,
    /// Percentage change; signed.
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub rationale: String,
}

/// Itemized pricing breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceBreakdown {
    pub base_rate: f64,
    pub hours: f64,
    pub subtotal: f64,
    pub adjustments: Vec<PriceAdjustment>,
    pub travel_fee: f64,
    pub final_total: f64,
}

/// Lower/higher alternatives alongside the recommended total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuoteAlternatives {
    pub budget: Option<f64>,
    pub premium: Option<f64>,
}

/// Where a quote's figures came from. Every quote this system hands to a
/// customer is parsed out of the reasoning provider's output, and the tag
/// travels with the quote so clients can tell it apart from any manually
/// entered figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuoteSource {
    #[default]
    #[serde(rename = "claude-ai")]
    Provider,
}

/// A complete quote for one worker on one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Final price in whole dollars, rounded from the provider's figure.
    pub total: u64,
    #[serde(default)]
    pub reasoning: String,
    pub breakdown: PriceBreakdown,
    /// Provider's confidence in this pricing, 0.0-1.0.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub alternatives: QuoteAlternatives,
    /// Stamped when the quote is parsed from provider output.
    #[serde(default)]
    pub source: QuoteSource,
}

/// Outcome of pricing one matched worker.
///
/// A failure here is per-item: it never aborts the rest of the batch and is
/// never silently replaced with a guessed number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteOutcome {
    Priced(Quote),
    Failed { error: String },
}

impl QuoteOutcome {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            QuoteOutcome::Priced(quote) => Some(quote),
            QuoteOutcome::Failed { .. } => None,
        }
    }

    pub fn is_priced(&self) -> bool {
        matches!(self, QuoteOutcome::Priced(_))
    }
}

/// A ranked match together with its pricing outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedMatch {
    #[serde(flatten)]
    pub ranked: super::matching::RankedMatch,
    pub pricing: QuoteOutcome,
}

/// Market conditions fed into the pricing prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketContext {
    pub local_demand: Option<String>,
    pub weather_impact: Option<String>,
}
