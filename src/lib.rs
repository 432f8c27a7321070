pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gpu_surface;
pub mod opengl;
pub mod renderer;
pub mod state;
pub mod window;

pub use config::AppConfig;
pub use error::{Error, Result};
