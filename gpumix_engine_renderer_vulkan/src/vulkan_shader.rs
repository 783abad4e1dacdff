/// Shader - SPIR-V loading, validation and VkShaderModule ownership
///
/// Both stages use the entry point `main`. The fragment stage must read the quad
/// texture through a combined image sampler at set 0, binding 0.

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::{engine_bail_warn, engine_error, engine_info, engine_warn};
use ash::vk;
use std::path::Path;
use std::sync::Arc;

use crate::vulkan_context::DeviceContext;

/// SPIR-V magic number (first word of every module)
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Entry point name of both fixed stages
pub const ENTRY_POINT: &std::ffi::CStr = c"main";

/// Pipeline stage a module is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn to_vk(self) -> vk::ShaderStageFlags {
        match self {
            ShaderStage::Vertex => vk::ShaderStageFlags::VERTEX,
            ShaderStage::Fragment => vk::ShaderStageFlags::FRAGMENT,
        }
    }

    /// Name of the SPIR-V execution model for this stage
    fn execution_model_name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Fragment => "Fragment",
        }
    }
}

/// Compiled bytecode of the two fixed stages
#[derive(Debug, Clone)]
pub struct ShaderCode {
    pub vertex: Vec<u8>,
    pub fragment: Vec<u8>,
}

impl ShaderCode {
    /// Read both blobs from disk
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(vertex: P, fragment: Q) -> Result<Self> {
        Ok(Self {
            vertex: read_file(vertex.as_ref())?,
            fragment: read_file(fragment.as_ref())?,
        })
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        Error::InvalidResource(format!("Failed to read shader '{}': {}", path.display(), e))
    })
}

/// Convert little-endian SPIR-V bytes into words
///
/// Rejects empty input, lengths that are not a multiple of 4 and a wrong magic number.
pub fn spirv_words(code: &[u8]) -> Result<Vec<u32>> {
    if code.is_empty() || code.len() % 4 != 0 {
        engine_bail_warn!("gpumix::vulkan",
            "Shader code not 4-byte aligned (size: {} bytes)", code.len());
    }

    let words: Vec<u32> = code
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    if words[0] != SPIRV_MAGIC {
        engine_bail_warn!("gpumix::vulkan",
            "Shader code does not start with the SPIR-V magic number (found {:#010x})", words[0]);
    }

    Ok(words)
}

/// Check with spirq that the module has the expected entry point and bindings
fn reflect_check(words: &[u32], stage: ShaderStage) -> Result<()> {
    let entry_points = spirq::ReflectConfig::new()
        .spv(words)
        .ref_all_rscs(true)
        .reflect()
        .map_err(|e| Error::InvalidResource(format!("SPIR-V reflection failed: {:?}", e)))?;

    let entry_point = entry_points
        .iter()
        .find(|ep| ep.name == "main" && format!("{:?}", ep.exec_model) == stage.execution_model_name())
        .ok_or_else(|| Error::InvalidResource(format!(
            "No {} entry point named 'main' (found: {:?})",
            stage.execution_model_name(),
            entry_points.iter().map(|ep| (ep.name.clone(), format!("{:?}", ep.exec_model))).collect::<Vec<_>>()
        )))?;

    if stage == ShaderStage::Fragment {
        let has_texture = entry_point.vars.iter().any(|var| matches!(
            var,
            spirq::var::Variable::Descriptor { desc_bind, desc_ty: spirq::ty::DescriptorType::CombinedImageSampler(), .. }
                if desc_bind.set() == 0 && desc_bind.bind() == 0
        ));
        if !has_texture {
            return Err(Error::InvalidResource(
                "Fragment shader must declare a combined image sampler at set 0, binding 0".to_string(),
            ));
        }
    }

    Ok(())
}

/// Owned VkShaderModule
pub struct ShaderModule {
    ctx: Arc<DeviceContext>,
    pub(crate) module: vk::ShaderModule,
    stage: ShaderStage,
}

impl ShaderModule {
    /// Validate `code` and create the module
    ///
    /// # Errors
    ///
    /// `InvalidResource` for malformed bytecode or a missing entry point/binding,
    /// `InitializationFailed` when the driver rejects the module.
    pub fn from_bytes(ctx: Arc<DeviceContext>, code: &[u8], stage: ShaderStage) -> Result<Self> {
        let words = spirv_words(code)?;
        reflect_check(&words, stage).map_err(|e| {
            engine_warn!("gpumix::vulkan", "Invalid {:?} shader: {}", stage, e);
            e
        })?;

        let create_info = vk::ShaderModuleCreateInfo::default().code(&words);
        let module = unsafe { ctx.device.create_shader_module(&create_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create shader module: {:?}", e);
                Error::InitializationFailed(format!("Failed to create shader module: {:?}", e))
            })?;

        engine_info!("gpumix::vulkan", "{:?} shader module created ({} words)", stage, words.len());
        Ok(Self { ctx, module, stage })
    }

    /// Stage description for pipeline creation
    pub(crate) fn stage_info(&self) -> vk::PipelineShaderStageCreateInfo<'static> {
        vk::PipelineShaderStageCreateInfo::default()
            .stage(self.stage.to_vk())
            .module(self.module)
            .name(ENTRY_POINT)
    }
}

impl Drop for ShaderModule {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_shader_module(self.module, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_shader_tests.rs"]
mod tests;
