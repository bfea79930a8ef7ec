use thiserror::Error;

/// Errors surfaced by storefront operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Gateway(#[from] grocer_gateway::GatewayError),

    #[error(transparent)]
    Store(#[from] grocer_store::StoreError),

    /// The operation requires a signed-in session.
    #[error("Not signed in")]
    NotAuthenticated,

    /// A cart line id was missing or empty; nothing was sent to the
    /// gateway.
    #[error("Cart item id is required")]
    MissingItemId,

    /// Checkout requires a non-empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// No delivery address was selected.
    #[error("Please select a delivery address")]
    MissingAddress,

    /// A recurring order was requested without any delivery days.
    #[error("Please select at least one delivery day")]
    NoDeliveryDays,

    /// A recurring order's end date does not come after its start date.
    #[error("End date must be after start date")]
    EndBeforeStart,

    /// The state mutex was poisoned by a panicking thread.
    #[error("State lock poisoned")]
    StatePoisoned,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
