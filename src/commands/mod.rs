pub mod config;
pub mod objectives;
pub mod render;
