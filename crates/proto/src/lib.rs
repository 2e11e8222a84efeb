#![doc = include_str!("../README.md")]

/// Types generated from the schemas in `proto/`.
pub mod protos;

pub use protos::relayer;
pub use protos::resolver;
