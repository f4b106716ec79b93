pub mod app;
pub mod config;
pub mod remote;
pub mod sync;
