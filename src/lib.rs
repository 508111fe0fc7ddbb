pub mod board;
pub mod client;
pub mod config;
pub mod model;
pub mod render;
pub mod router;
