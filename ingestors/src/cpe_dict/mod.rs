pub mod feed;
pub mod loader;

pub use loader::CpeDictionaryLoader;
