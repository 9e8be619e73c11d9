pub mod http;

pub use http::{cors_layer, router, HttpServer};
