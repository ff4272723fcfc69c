//! Shared types for wallet connectors.
//!
//! This crate defines the contract between a dApp-connection framework and
//! the connectors it drives: the [`Connector`] lifecycle trait, the
//! notifications a connector emits, construction options and the error
//! taxonomy.

pub mod chain;
pub mod connector;
pub mod errors;
pub mod options;

pub use chain::ChainId;
pub use connector::*;
pub use errors::*;
pub use options::ConnectorOptions;
