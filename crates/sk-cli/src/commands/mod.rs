//! CLI command implementations

pub(crate) mod cache;
pub(crate) mod columns;
pub(crate) mod common;
pub(crate) mod describe;
pub(crate) mod keys;
pub(crate) mod queries;
pub(crate) mod tables;
