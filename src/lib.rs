pub mod artifact;
pub mod builder;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod graphql;
pub mod keys;
pub mod prompt;
pub mod resolver;
pub mod signer;
