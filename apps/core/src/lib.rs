pub mod action_executor;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod icons;
pub mod index;
pub mod loader;
pub mod logging;
pub mod model;
pub mod profile;
pub mod runtime;
pub mod search;
pub mod session;
pub mod snapshot;
pub mod transport;
