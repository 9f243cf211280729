pub mod contract;
pub mod extract;
pub mod handler;
pub mod middleware;
pub mod server;
