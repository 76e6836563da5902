//! Google Distance Matrix client and the per-batch fetcher built on it.

pub mod client;
pub mod error;
pub mod fetch;
pub mod types;

pub use client::DistanceMatrixClient;
pub use error::MatrixError;
pub use fetch::{fetch_batch, interpret_response, BatchRequest};
pub use types::{DistanceMatrixResponse, MatrixElement, MatrixRow, TextValue};
