pub mod app;
pub mod config;
pub mod launch;
pub mod logging;
pub mod pgpass;
pub mod ui;
