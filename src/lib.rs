pub mod cli;
pub mod graph;
pub mod manifest;
pub mod model;
pub mod resolver;

mod api;
mod config;

pub use api::{Moddep, ModdepBuilder};
