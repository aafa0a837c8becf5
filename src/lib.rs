// Client for the DeuceLeague admin backend.
//
// Responses are reshaped by `normalizer` into one envelope before they
// reach application code, whatever layout the endpoint answered with.

pub mod client;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod interceptor;
pub mod normalizer;
pub mod resources;

#[cfg(test)]
mod test_support;

pub use client::{ApiClient, ApiRequest, ApiResponse};
pub use config::Config;
pub use envelope::{Envelope, ErrorBody, Pagination};
pub use error::{ClientError, Result};
pub use interceptor::Interceptor;
pub use normalizer::{normalize_error, normalize_success, ResponseShape};
pub use resources::{ListQuery, Resource};
