//! # metricrec Storage
//!
//! Reads a model directory of JSON artifacts into ready-to-serve engines.

pub mod documents;
pub mod store;

pub use documents::{CorpusDocument, ReducedDocument};
pub use store::{LoadedModels, ModelStore};
