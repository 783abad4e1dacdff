/// QuadPipeline - The one fixed graphics pipeline of the renderer
///
/// Owns the descriptor set layout (binding 0: combined image sampler, fragment
/// stage), a descriptor pool sized for exactly one set, that set, the pipeline
/// layout and the pipeline itself.
///
/// Fixed state: triangle strip, dynamic viewport and scissor, fill mode with back
/// face culling (counter-clockwise front), single sample, no depth test, blending
/// disabled with all four channels written.

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::gpumix::render::Vertex;
use gpumix_engine::{engine_error, engine_debug};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::DeviceContext;
use crate::vulkan_format::format_to_vk;
use crate::vulkan_render_pass::RenderPass;
use crate::vulkan_shader::ShaderModule;

/// Binding of the quad texture in set 0
pub const TEXTURE_BINDING: u32 = 0;

/// Number of vertices drawn per frame
pub const QUAD_VERTEX_COUNT: u32 = 4;

/// Vertex buffer binding: one interleaved buffer, per-vertex rate
pub fn vertex_binding_descriptions() -> [vk::VertexInputBindingDescription; 1] {
    [vk::VertexInputBindingDescription {
        binding: 0,
        stride: Vertex::STRIDE,
        input_rate: vk::VertexInputRate::VERTEX,
    }]
}

/// Position at location 0, texture coordinate at location 1
pub fn vertex_attribute_descriptions() -> [vk::VertexInputAttributeDescription; 2] {
    Vertex::attributes().map(|attribute| vk::VertexInputAttributeDescription {
        location: attribute.location,
        binding: 0,
        format: format_to_vk(attribute.format),
        offset: attribute.offset,
    })
}

/// Opaque blend state writing R, G, B and A
pub fn color_blend_attachment() -> vk::PipelineColorBlendAttachmentState {
    vk::PipelineColorBlendAttachmentState::default()
        .blend_enable(false)
        .src_color_blend_factor(vk::BlendFactor::ONE)
        .dst_color_blend_factor(vk::BlendFactor::ZERO)
        .color_blend_op(vk::BlendOp::ADD)
        .src_alpha_blend_factor(vk::BlendFactor::ONE)
        .dst_alpha_blend_factor(vk::BlendFactor::ZERO)
        .alpha_blend_op(vk::BlendOp::ADD)
        .color_write_mask(vk::ColorComponentFlags::RGBA)
}

pub fn rasterization_state() -> vk::PipelineRasterizationStateCreateInfo<'static> {
    vk::PipelineRasterizationStateCreateInfo::default()
        .depth_clamp_enable(false)
        .rasterizer_discard_enable(false)
        .polygon_mode(vk::PolygonMode::FILL)
        .cull_mode(vk::CullModeFlags::BACK)
        .front_face(vk::FrontFace::COUNTER_CLOCKWISE)
        .depth_bias_enable(false)
        .line_width(1.0)
}

pub fn texture_layout_binding() -> vk::DescriptorSetLayoutBinding<'static> {
    vk::DescriptorSetLayoutBinding::default()
        .binding(TEXTURE_BINDING)
        .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
        .descriptor_count(1)
        .stage_flags(vk::ShaderStageFlags::FRAGMENT)
}

pub struct QuadPipeline {
    ctx: Arc<DeviceContext>,
    descriptor_set_layout: vk::DescriptorSetLayout,
    descriptor_pool: vk::DescriptorPool,
    pub(crate) descriptor_set: vk::DescriptorSet,
    pub(crate) pipeline_layout: vk::PipelineLayout,
    pub(crate) pipeline: vk::Pipeline,
}

impl QuadPipeline {
    /// Build every object of the pipeline
    ///
    /// Handles start out null and are filled one by one, so an early return
    /// destroys exactly what has been created so far.
    pub fn new(
        ctx: Arc<DeviceContext>,
        render_pass: &RenderPass,
        vertex: &ShaderModule,
        fragment: &ShaderModule,
    ) -> Result<Self> {
        let mut quad = Self {
            ctx: Arc::clone(&ctx),
            descriptor_set_layout: vk::DescriptorSetLayout::null(),
            descriptor_pool: vk::DescriptorPool::null(),
            descriptor_set: vk::DescriptorSet::null(),
            pipeline_layout: vk::PipelineLayout::null(),
            pipeline: vk::Pipeline::null(),
        };
        let device = &ctx.device;

        // Descriptor set layout
        let bindings = [texture_layout_binding()];
        let layout_info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&bindings);
        quad.descriptor_set_layout = unsafe { device.create_descriptor_set_layout(&layout_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create descriptor set layout: {:?}", e);
                Error::InitializationFailed(format!("Failed to create descriptor set layout: {:?}", e))
            })?;

        // Pool for exactly one set
        let pool_sizes = [vk::DescriptorPoolSize {
            ty: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
            descriptor_count: 1,
        }];
        let pool_info = vk::DescriptorPoolCreateInfo::default()
            .pool_sizes(&pool_sizes)
            .max_sets(1);
        quad.descriptor_pool = unsafe { device.create_descriptor_pool(&pool_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create descriptor pool: {:?}", e);
                Error::InitializationFailed(format!("Failed to create descriptor pool: {:?}", e))
            })?;

        let set_layouts = [quad.descriptor_set_layout];
        let allocate_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(quad.descriptor_pool)
            .set_layouts(&set_layouts);
        quad.descriptor_set = unsafe { device.allocate_descriptor_sets(&allocate_info) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to allocate descriptor set: {:?}", e);
                Error::InitializationFailed(format!("Failed to allocate descriptor set: {:?}", e))
            })?
            .into_iter()
            .next()
            .ok_or_else(|| Error::InitializationFailed("Driver returned no descriptor set".to_string()))?;

        // Pipeline layout
        let pipeline_layout_info = vk::PipelineLayoutCreateInfo::default().set_layouts(&set_layouts);
        quad.pipeline_layout = unsafe { device.create_pipeline_layout(&pipeline_layout_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create pipeline layout: {:?}", e);
                Error::InitializationFailed(format!("Failed to create pipeline layout: {:?}", e))
            })?;

        // Fixed function state
        let shader_stages = [vertex.stage_info(), fragment.stage_info()];

        let vertex_bindings = vertex_binding_descriptions();
        let vertex_attributes = vertex_attribute_descriptions();
        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(&vertex_bindings)
            .vertex_attribute_descriptions(&vertex_attributes);

        let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(vk::PrimitiveTopology::TRIANGLE_STRIP)
            .primitive_restart_enable(false);

        // Viewport and scissor are set per frame
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewport_count(1)
            .scissor_count(1);

        let rasterization_state = rasterization_state();

        let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
            .sample_shading_enable(false)
            .rasterization_samples(vk::SampleCountFlags::TYPE_1)
            .min_sample_shading(1.0)
            .alpha_to_coverage_enable(false)
            .alpha_to_one_enable(false);

        let blend_attachments = [color_blend_attachment()];
        let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op_enable(false)
            .logic_op(vk::LogicOp::COPY)
            .attachments(&blend_attachments)
            .blend_constants([0.0; 4]);

        let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        let dynamic_state = vk::PipelineDynamicStateCreateInfo::default()
            .dynamic_states(&dynamic_states);

        let pipeline_info = vk::GraphicsPipelineCreateInfo::default()
            .stages(&shader_stages)
            .vertex_input_state(&vertex_input_state)
            .input_assembly_state(&input_assembly_state)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization_state)
            .multisample_state(&multisample_state)
            .color_blend_state(&color_blend_state)
            .dynamic_state(&dynamic_state)
            .layout(quad.pipeline_layout)
            .render_pass(render_pass.handle())
            .subpass(0);

        quad.pipeline = unsafe {
            device.create_graphics_pipelines(vk::PipelineCache::null(), &[pipeline_info], None)
        }
        .map_err(|(_, e)| {
            engine_error!("gpumix::vulkan", "Failed to create graphics pipeline: {:?}", e);
            Error::InitializationFailed(format!("Failed to create graphics pipeline: {:?}", e))
        })?
        .into_iter()
        .next()
        .ok_or_else(|| Error::InitializationFailed("Driver returned no pipeline".to_string()))?;

        engine_debug!("gpumix::vulkan", "Quad pipeline created for {:?}", render_pass.format());
        Ok(quad)
    }

    /// Point the descriptor set at a texture view and sampler
    pub fn update_descriptor_set(&self, view: vk::ImageView, sampler: vk::Sampler) {
        let image_infos = [vk::DescriptorImageInfo::default()
            .sampler(sampler)
            .image_view(view)
            .image_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)];

        let writes = [vk::WriteDescriptorSet::default()
            .dst_set(self.descriptor_set)
            .dst_binding(TEXTURE_BINDING)
            .dst_array_element(0)
            .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
            .image_info(&image_infos)];

        unsafe {
            self.ctx.device.update_descriptor_sets(&writes, &[]);
        }
    }

    /// Bind the pipeline and its descriptor set
    pub(crate) fn bind(&self, command_buffer: vk::CommandBuffer) {
        let device = &self.ctx.device;
        unsafe {
            device.cmd_bind_pipeline(command_buffer, vk::PipelineBindPoint::GRAPHICS, self.pipeline);
            device.cmd_bind_descriptor_sets(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                self.pipeline_layout,
                0,
                &[self.descriptor_set],
                &[],
            );
        }
    }
}

impl Drop for QuadPipeline {
    fn drop(&mut self) {
        // Null handles are ignored by the destroy calls
        unsafe {
            let device = &self.ctx.device;
            device.destroy_pipeline(self.pipeline, None);
            device.destroy_pipeline_layout(self.pipeline_layout, None);
            // Frees the descriptor set as well
            device.destroy_descriptor_pool(self.descriptor_pool, None);
            device.destroy_descriptor_set_layout(self.descriptor_set_layout, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_pipeline_tests.rs"]
mod tests;
