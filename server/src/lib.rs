#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub use config::Config;
pub use runner::Runner;
pub use server::{router, start};

mod config;
mod errors;
mod helpers;
pub mod model;
mod preprocess;
mod routes;
pub mod runner;
mod server;
mod shutdown;
