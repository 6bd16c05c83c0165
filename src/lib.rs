pub mod config;
pub mod content;
pub mod engine;
pub mod market;
pub mod model;
pub mod store;
pub mod strategy;

#[cfg(feature = "full")]
pub mod logging;
#[cfg(feature = "wasm")]
pub mod wasm;
