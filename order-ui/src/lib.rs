pub mod app;
pub mod config;
pub mod console;
pub mod csv_loader;
pub mod logging;
