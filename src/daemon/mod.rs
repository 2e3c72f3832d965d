pub mod listener;
pub mod server;
