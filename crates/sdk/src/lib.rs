#![doc = include_str!("../README.md")]
pub mod client;
pub mod crypto;
pub mod error;
pub mod logging;
mod negotiation;
mod pending;
pub mod prelude;
pub mod registry;
pub mod signaling;
#[cfg(test)]
mod tests;
pub mod types;
