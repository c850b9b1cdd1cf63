//! Request pipeline and response normalization.

pub mod envelope;
pub mod normalizer;
pub mod pipeline;
pub mod request;
