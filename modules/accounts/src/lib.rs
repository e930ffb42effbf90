// === PUBLIC CONTRACT ===
// Only the contract module is meant for other crates to consume.
pub mod contract;

pub use contract::model;

// === INTERNAL MODULES ===
// Exposed for wiring in the server binary and for integration tests; the
// stable surface is `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
