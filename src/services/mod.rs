//! Services for server access and pagination

pub mod client;
pub mod loader;

pub use client::ApiClient;
pub use loader::{Delivery, FetchTicket, LoaderState, PageLoader};
