pub mod clock;
pub mod controller;
pub mod gl_backend;
pub mod gl_context;
pub mod input_adapter;
pub mod mesh;
pub mod texture;
