//! Common error types for Data Heist components.

use thiserror::Error;

/// Errors raised by game operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeistError {
    /// Not enough credits for a purchase
    #[error("Not enough credits for {item} (cost {cost}).")]
    InsufficientCredits { item: &'static str, cost: u64 },

    /// Sell amount is zero or negative
    #[error("Enter a valid amount.")]
    InvalidAmount,

    /// Sell amount exceeds the stolen data on hand
    #[error("Not enough intel to sell.")]
    InsufficientIntel,

    /// Sell amount does not fill a single credit group
    #[error("You need at least {0} GB to get 1 credit.")]
    BelowExchangeRate(u64),

    /// Defense boost was already spent during this detection cycle
    #[error("Increase Defense already used this detection.")]
    BoostUnavailable,

    /// Cancelling detection requires a full detection bar
    #[error("Detection is not full. Nothing to cancel.")]
    DetectionNotFull,

    /// Unknown defense or wrong password
    #[error("Invalid defense or password.")]
    InvalidCredentials,

    /// Defender action attempted without a signed-in defense
    #[error("Choose a defense and sign in first.")]
    NotSignedIn,

    /// Unrecognised form action
    #[error("Unknown action.")]
    UnknownAction,
}
