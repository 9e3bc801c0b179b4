pub mod handlers;
pub mod merge;
pub mod middleware;
pub mod probe;
pub mod routes;

pub use routes::{create_probe_router, create_router};
