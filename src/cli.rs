// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "gl-sandbox")]
#[command(about = "OpenGL sandbox with a free-fly camera", long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Disable vertical sync
    #[arg(long = "no-vsync", default_value = "false")]
    pub no_vsync: bool,

    /// Directory holding default.vert and default.frag
    #[arg(long = "shader-dir")]
    pub shader_dir: Option<PathBuf>,

    /// Leave the cursor free instead of grabbing it for mouse look
    #[arg(long = "no-capture", default_value = "false")]
    pub no_capture: bool,
}
