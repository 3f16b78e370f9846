pub mod analyzer;
pub mod aws;
pub mod config;
pub mod proxy;
pub mod queue;
pub mod resolver;
pub mod store;
