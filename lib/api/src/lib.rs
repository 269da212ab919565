//! # metricrec API
//!
//! The HTTP surface of the recommendation engine, served with actix-web.

pub mod context;
pub mod rest;

pub use context::{ClassificationResponse, EngineConfig, EngineContext, HealthStatus, RecommendRequest};
pub use rest::RestApi;
