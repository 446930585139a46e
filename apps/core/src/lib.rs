pub mod config;
pub mod contract;
pub mod logging;
pub mod route_service;
pub mod router;
pub mod runtime;
pub mod scene;
pub mod session;
pub mod shared_store;
pub mod signal;
pub mod surface;
pub mod transport;
