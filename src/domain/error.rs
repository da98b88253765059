//! Domain error types.

/// Top-level error type for tradefeed.
#[derive(Debug, thiserror::Error)]
pub enum TradefeedError {
    #[error("invalid market tag {market:?}: {reason}")]
    InvalidMarketTag { market: String, reason: String },

    #[error("unsupported resolution: {value}")]
    UnsupportedResolution { value: String },

    #[error("unknown normalization mode: {value}")]
    UnknownNormalizationMode { value: String },

    #[error("unknown security type: {value}")]
    UnknownSecurityType { value: String },

    #[error("unknown data kind: {value}")]
    UnknownDataKind { value: String },

    #[error("invalid currency code {code:?}: cash symbols must be exactly 3 letters")]
    InvalidCurrencyCode { code: String },

    #[error("invalid conversion rate for {symbol}: {rate}")]
    InvalidConversionRate { symbol: String, rate: String },

    #[error("invalid price scale factor: {value}")]
    InvalidScaleFactor { value: String },

    #[error(
        "unable to add cash in {currency} when no subscriptions are present, add subscriptions during setup"
    )]
    NoSubscriptionsPresent { currency: String },

    #[error(
        "in order to maintain cash in {currency} a subscription for forex pair {direct} or {inverted} is required"
    )]
    UnsupportedCurrencyPair {
        currency: String,
        direct: String,
        inverted: String,
    },

    #[error("subscription index {index} is already in use")]
    DuplicateSubscriptionIndex { index: usize },

    #[error("security {symbol} is already registered")]
    DuplicateSecurity { symbol: String },

    #[error("no exchange hours for {symbol} ({security_type}) on market {market}")]
    UnknownExchangeHours {
        market: String,
        symbol: String,
        security_type: String,
    },

    #[error("unknown currency: {symbol}")]
    UnknownCurrency { symbol: String },

    #[error("conversion rate for {symbol} is zero")]
    ZeroConversionRate { symbol: String },

    #[error("converting {from} to {to} overflows")]
    ConversionOverflow { from: String, to: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data parse error in {source_name}: {reason}")]
    DataParse { source_name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradefeedError> for std::process::ExitCode {
    fn from(err: &TradefeedError) -> Self {
        let code: u8 = match err {
            TradefeedError::Io(_) => 1,
            TradefeedError::ConfigParse { .. }
            | TradefeedError::ConfigMissing { .. }
            | TradefeedError::ConfigInvalid { .. } => 2,
            TradefeedError::InvalidMarketTag { .. }
            | TradefeedError::UnsupportedResolution { .. }
            | TradefeedError::UnknownNormalizationMode { .. }
            | TradefeedError::UnknownSecurityType { .. }
            | TradefeedError::UnknownDataKind { .. }
            | TradefeedError::InvalidScaleFactor { .. }
            | TradefeedError::DuplicateSubscriptionIndex { .. } => 3,
            TradefeedError::InvalidCurrencyCode { .. }
            | TradefeedError::InvalidConversionRate { .. }
            | TradefeedError::NoSubscriptionsPresent { .. }
            | TradefeedError::UnsupportedCurrencyPair { .. }
            | TradefeedError::UnknownCurrency { .. }
            | TradefeedError::ZeroConversionRate { .. }
            | TradefeedError::ConversionOverflow { .. } => 4,
            TradefeedError::DuplicateSecurity { .. }
            | TradefeedError::UnknownExchangeHours { .. } => 5,
            TradefeedError::DataParse { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
