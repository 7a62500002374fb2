//! External API clients and their error type

pub mod error;
pub mod providers;

pub use error::ApiError;
pub use providers::{AssetApi, AssetClient, Credentials, ServiceDeskApi, ServiceDeskClient};
