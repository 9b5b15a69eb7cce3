pub mod constants;
pub mod config;
pub mod geometry;
pub mod streaming;
pub mod navigation;
pub mod sensor;
pub mod plugin;

#[cfg(test)]
mod testing;
