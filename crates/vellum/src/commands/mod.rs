//! CLI command implementations.

pub(crate) mod enhance;

pub(crate) use enhance::EnhanceArgs;
