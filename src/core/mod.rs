pub mod config;
pub mod constants;
pub mod events;
pub mod geo;
pub mod history;
pub mod map;
pub mod metrics;
pub mod viewport;
