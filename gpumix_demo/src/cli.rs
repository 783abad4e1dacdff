/// Command line of the demo

use clap::{Args, Parser, Subcommand};
use gpumix_engine::gpumix::render::{Config, DeviceType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gpumix", version, about = "Textured quad rendered with Vulkan, offscreen or in a window")]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Render one frame offscreen and write the raw pixels to disk
    Offscreen {
        #[command(flatten)]
        common: CommonArgs,
        /// Directory receiving `{texW}x{texH}_{rtW}x{rtH}.rgb`
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Open a window and redraw continuously
    Onscreen {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Texture image (PNG or JPEG); a checkerboard is used when omitted
    #[arg(long)]
    pub texture: Option<PathBuf>,
    /// Compiled vertex shader
    #[arg(long, default_value = "gpumix_demo/shaders/quad.vert.spv")]
    pub vertex_shader: PathBuf,
    /// Compiled fragment shader
    #[arg(long, default_value = "gpumix_demo/shaders/quad.frag.spv")]
    pub fragment_shader: PathBuf,
    /// Enable the Khronos validation layer when available
    #[arg(long)]
    pub validation: bool,
    /// Write the log to a file instead of the console
    #[arg(long, num_args = 0..=1, default_missing_value = "gpumix.log")]
    pub log_file: Option<PathBuf>,
    /// Prefer a discrete GPU over an integrated one
    #[arg(long)]
    pub prefer_discrete: bool,
}

impl CommonArgs {
    /// Renderer configuration for these options
    pub fn config(&self) -> Config {
        Config {
            app_name: "gpumix_demo".to_string(),
            enable_validation: self.validation,
            preferred_device_type: if self.prefer_discrete {
                DeviceType::DiscreteGpu
            } else {
                DeviceType::IntegratedGpu
            },
            ..Config::default()
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
