//! Error types for pattern table construction

/// Errors raised while building a pattern table
///
/// Scoring itself never fails; table construction is the only fallible
/// step.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// A supplied pattern is not a valid regular expression
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidRegex {
        /// The offending pattern text
        pattern: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A pattern weight falls outside its severity tier's band
    #[error("weight {weight} outside {tier} band {low}..={high}")]
    WeightOutOfBand {
        /// Supplied weight
        weight: f64,
        /// Tier name
        tier: &'static str,
        /// Band lower bound
        low: f64,
        /// Band upper bound
        high: f64,
    },
}
