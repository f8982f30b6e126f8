pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod scene;
pub mod shader;
pub mod traits;

pub use camera::{CameraMovement, FreeCamera};
pub use error::{AssetLoadError, ContextError, ShaderError};
pub use shader::{ShaderProgram, ShaderStage, UniformValue};
pub use traits::ShaderBackend;
