/*!
# GpuMix demo

Renders the textured quad either once offscreen (writing the raw readback to
disk) or continuously into a window.

```text
gpumix offscreen --texture texture.png --out-dir out
gpumix onscreen --validation
```
*/

mod app;
mod assets;
mod cli;

use clap::Parser;
use gpumix_engine::gpumix::{Engine, Result};
use gpumix_engine::gpumix::log::{FileLogger, LogSeverity};
use gpumix_engine::gpumix::render::{Extent2D, TextureData, TextureFormat, Vertex};
use gpumix_engine::{engine_error, engine_info};
use gpumix_engine_renderer_vulkan::gpumix::{print_validation_stats_report, OffscreenRenderer, ShaderCode};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use cli::{Cli, CommonArgs, Mode};

fn load_inputs(common: &CommonArgs) -> Result<(ShaderCode, TextureData)> {
    if let Some(path) = &common.log_file {
        Engine::set_logger(FileLogger::new(path, LogSeverity::Info)?);
    }

    let shaders = ShaderCode::from_files(&common.vertex_shader, &common.fragment_shader)?;
    let texture = match &common.texture {
        Some(path) => assets::load_texture(path)?,
        None => assets::checkerboard(256, 32)?,
    };
    Ok((shaders, texture))
}

fn run_offscreen(common: &CommonArgs, out_dir: &Path) -> Result<()> {
    let (shaders, texture) = load_inputs(common)?;
    let config = common.config();
    let target = config.render_target_extent;

    let mut renderer = OffscreenRenderer::new(config, &shaders)?;
    renderer.create_texture(texture.width(), texture.height(), TextureFormat::R8G8B8A8_UNORM)?;
    renderer.create_vertex_buffer(Vertex::STRIDE as u64 * Vertex::QUAD.len() as u64)?;
    renderer.update_vertex_data(&Vertex::QUAD)?;

    let start = Instant::now();
    renderer.copy_texture_data(&texture)?;
    renderer.draw()?;
    let mut pixels = vec![0u8; renderer.readback_size()];
    let len = renderer.read_pixels(&mut pixels)?;

    let file_name = assets::readback_file_name(Extent2D::new(texture.width(), texture.height()), target);
    let path = out_dir.join(file_name);
    std::fs::write(&path, &pixels[..len]).map_err(|e| {
        gpumix_engine::gpumix::Error::BackendError(format!("Failed to write '{}': {}", path.display(), e))
    })?;

    let elapsed = start.elapsed();
    engine_info!("gpumix::demo", "Wrote {} bytes to '{}'", len, path.display());
    println!("use: {} ms", elapsed.as_millis());
    Ok(())
}

fn run_onscreen(common: &CommonArgs) -> Result<()> {
    let (shaders, texture) = load_inputs(common)?;
    app::run(common.config(), shaders, texture)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (result, validation) = match &cli.mode {
        Mode::Offscreen { common, out_dir } => (run_offscreen(common, out_dir), common.validation),
        Mode::Onscreen { common } => (run_onscreen(common), common.validation),
    };

    if validation {
        print_validation_stats_report();
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            engine_error!("gpumix::demo", "{}", e);
            eprintln!("gpumix: {}", e);
            ExitCode::FAILURE
        }
    }
}
