pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use client::TadoClient;
pub use error::{Error, Result};
pub use models::{Device, Home, Me, MobileDevice, Zone};
