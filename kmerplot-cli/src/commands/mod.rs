//! Command implementations for the kmerplot CLI

pub mod config;
pub mod plot;
pub mod split;
