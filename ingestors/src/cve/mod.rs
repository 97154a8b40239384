pub mod configurations;
pub mod feed;
pub mod loader;

pub use loader::CveLoader;
