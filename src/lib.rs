pub mod config;
pub mod error;
pub mod extract;
pub mod games;
pub mod model;
pub mod query;
pub mod server;
pub mod service;
pub mod wiki;

pub use config::Config;
pub use error::{Result, WikiError};
pub use games::{GameParams, GameRegistry};
pub use service::WikiService;
