use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("State management error: {0}")]
    StateError(#[from] roon_transport_state::StateError),

    #[error("API error: {0}")]
    ApiError(#[from] roon_transport_api::ApiError),

    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    #[error("No zones subscription is open")]
    NotSubscribed,
}
