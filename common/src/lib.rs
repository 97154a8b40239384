pub mod config;
pub mod cpe;
pub mod time;
