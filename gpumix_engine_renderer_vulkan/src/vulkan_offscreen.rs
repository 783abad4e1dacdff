/// OffscreenRenderer - Textured quad rendered into an offscreen target
///
/// Setup order: device context, command pool, staging buffer, render pass,
/// pipeline, render target, then the frame ring (`create_rendering_resources`).
/// The texture and the vertex buffer are created and filled by the caller.
///
/// The onscreen renderer wraps one of these and adds acquire, blit and present.

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::gpumix::render::{Config, TextureData, TextureFormat, Vertex};
use gpumix_engine::{engine_debug, engine_error, engine_info, engine_warn};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_barrier::{color_subresource_layers, vertex_upload_barrier, ImageTransition};
use crate::vulkan_buffer::Buffer;
use crate::vulkan_command_list::{begin_command_buffer, end_command_buffer, signal_fence, submit, CommandPool};
use crate::vulkan_context::{DeviceContext, DeviceRequest};
use crate::vulkan_format::{extent_to_vk, format_to_vk};
use crate::vulkan_frame::{FrameRing, FrameSlot};
use crate::vulkan_frame_buffer::Framebuffer;
use crate::vulkan_instance::VulkanInstance;
use crate::vulkan_pipeline::{QuadPipeline, QUAD_VERTEX_COUNT};
use crate::vulkan_render_pass::RenderPass;
use crate::vulkan_render_target::RenderTarget;
use crate::vulkan_select::QueueRequirement;
use crate::vulkan_shader::{ShaderCode, ShaderModule, ShaderStage};
use crate::vulkan_staging::StagingBuffer;
use crate::vulkan_texture::{Image, ImageDesc};

/// Check that `data` can be uploaded into a texture of `extent`
pub fn check_texture_upload(extent: vk::Extent2D, data: &TextureData) -> Result<()> {
    if data.width() != extent.width || data.height() != extent.height {
        return Err(Error::InvalidResource(format!(
            "Texture is {}x{}, data is {}x{}",
            extent.width, extent.height, data.width(), data.height()
        )));
    }
    Ok(())
}

/// Check that `count` vertices fit a vertex buffer of `capacity` bytes
pub fn check_vertex_upload(capacity: u64, count: usize) -> Result<()> {
    let needed = count as u64 * Vertex::STRIDE as u64;
    if count == 0 || needed > capacity {
        return Err(Error::InvalidResource(format!(
            "{} vertices ({} bytes) do not fit a {} byte vertex buffer",
            count, needed, capacity
        )));
    }
    Ok(())
}

/// Copy region for a tightly packed upload of the whole texture
pub fn texture_upload_region(extent: vk::Extent2D) -> vk::BufferImageCopy {
    vk::BufferImageCopy::default()
        .buffer_offset(0)
        .buffer_row_length(0)
        .buffer_image_height(0)
        .image_subresource(color_subresource_layers())
        .image_offset(vk::Offset3D { x: 0, y: 0, z: 0 })
        .image_extent(vk::Extent3D { width: extent.width, height: extent.height, depth: 1 })
}

/// Sampled texture plus whether it has received data yet
struct QuadTexture {
    image: Image,
    initialized: bool,
}

/// Vertex buffer plus the number of vertices last uploaded
struct QuadVertices {
    buffer: Buffer,
    count: u32,
}

pub struct OffscreenRenderer {
    // Fields drop in declaration order, after Drop::drop has waited for the device
    frames: Option<FrameRing>,
    vertices: Option<QuadVertices>,
    texture: Option<QuadTexture>,
    framebuffer: Framebuffer,
    target: RenderTarget,
    pipeline: QuadPipeline,
    render_pass: RenderPass,
    staging: StagingBuffer,
    command_pool: CommandPool,
    config: Config,
    ctx: Arc<DeviceContext>,
}

impl OffscreenRenderer {
    /// Create an instance, pick a graphics-capable device and build every
    /// rendering object, including a ring of `config.frames_in_flight` slots
    pub fn new(config: Config, shaders: &ShaderCode) -> Result<Self> {
        config.validate()?;

        let instance = Arc::new(VulkanInstance::new(&config, &[])?);
        let ctx = DeviceContext::new(instance, DeviceRequest {
            requirement: QueueRequirement::GraphicsOnly,
            extensions: &[],
            surface: None,
            preferred: config.preferred_device_type,
        })?;

        let format = format_to_vk(config.render_target_format);
        let ring_size = config.frames_in_flight;
        let mut renderer = Self::from_device(ctx, config, format, shaders)?;
        renderer.create_rendering_resources(ring_size)?;
        Ok(renderer)
    }

    /// Build the rendering objects on an existing device
    ///
    /// The render target uses `format` (the swap chain format when onscreen).
    /// The frame ring is not created yet.
    pub fn from_device(
        ctx: Arc<DeviceContext>,
        config: Config,
        format: vk::Format,
        shaders: &ShaderCode,
    ) -> Result<Self> {
        config.validate()?;

        let command_pool = CommandPool::new(
            Arc::clone(&ctx),
            vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER,
        )?;
        let staging = StagingBuffer::new(Arc::clone(&ctx), &command_pool, config.staging_buffer_size)?;

        let render_pass = RenderPass::new(Arc::clone(&ctx), format)?;
        let vertex = ShaderModule::from_bytes(Arc::clone(&ctx), &shaders.vertex, ShaderStage::Vertex)?;
        let fragment = ShaderModule::from_bytes(Arc::clone(&ctx), &shaders.fragment, ShaderStage::Fragment)?;
        let pipeline = QuadPipeline::new(Arc::clone(&ctx), &render_pass, &vertex, &fragment)?;

        let extent = extent_to_vk(config.render_target_extent);
        let target = RenderTarget::new(Arc::clone(&ctx), &command_pool, extent, format, config.frame_timeout_ns)?;
        let framebuffer = Framebuffer::new(Arc::clone(&ctx), &render_pass, target.image().view(), extent)?;

        engine_info!("gpumix::vulkan", "Offscreen renderer ready on {} ({}x{} {:?})",
            ctx.device_name(), extent.width, extent.height, format);

        Ok(Self {
            frames: None,
            vertices: None,
            texture: None,
            framebuffer,
            target,
            pipeline,
            render_pass,
            staging,
            command_pool,
            config,
            ctx,
        })
    }

    /// Create the frame ring with `count` slots
    ///
    /// Calling it again once the ring exists does nothing.
    pub fn create_rendering_resources(&mut self, count: u32) -> Result<()> {
        if let Some(frames) = &self.frames {
            engine_debug!("gpumix::vulkan", "Rendering resources already created ({} slots)", frames.len());
            return Ok(());
        }
        if count == 0 {
            return Err(Error::InitializationFailed("Frame ring needs at least one slot".to_string()));
        }

        self.frames = Some(FrameRing::new(Arc::clone(&self.ctx), &self.command_pool, count)?);
        Ok(())
    }

    /// Number of ring slots, 0 before `create_rendering_resources`
    pub fn frames_in_flight(&self) -> usize {
        self.frames.as_ref().map_or(0, FrameRing::len)
    }

    /// Create the device-local texture and point the descriptor set at it
    ///
    /// Replaces any previous texture.
    pub fn create_texture(&mut self, width: u32, height: u32, format: TextureFormat) -> Result<()> {
        if !format.is_color() {
            engine_warn!("gpumix::vulkan", "{:?} cannot back a texture", format);
            return Err(Error::InvalidResource(format!("{:?} is not a texture format", format)));
        }

        // The old texture may still be referenced by a frame in flight
        if self.texture.is_some() {
            self.ctx.wait_idle()?;
        }

        let image = Image::new_2d(Arc::clone(&self.ctx), ImageDesc {
            extent: vk::Extent2D { width, height },
            format: format_to_vk(format),
            tiling: vk::ImageTiling::OPTIMAL,
            usage: vk::ImageUsageFlags::TRANSFER_DST | vk::ImageUsageFlags::SAMPLED,
            memory_flags: vk::MemoryPropertyFlags::DEVICE_LOCAL,
            with_sampler: true,
        })?;

        let sampler = image.sampler().ok_or_else(|| {
            engine_error!("gpumix::vulkan", "Texture created without a sampler");
            Error::InitializationFailed("Texture has no sampler".to_string())
        })?;
        self.pipeline.update_descriptor_set(image.view(), sampler);
        self.texture = Some(QuadTexture { image, initialized: false });

        engine_debug!("gpumix::vulkan", "Texture {}x{} {:?} created", width, height, format);
        Ok(())
    }

    /// Upload pixels into the texture through the staging buffer
    ///
    /// Blocks until the copy has completed. The texture ends in
    /// SHADER_READ_ONLY_OPTIMAL.
    pub fn copy_texture_data(&mut self, data: &TextureData) -> Result<()> {
        let texture = self.texture.as_mut().ok_or_else(|| {
            Error::InvalidResource("copy_texture_data called before create_texture".to_string())
        })?;
        let extent = texture.image.extent();
        check_texture_upload(extent, data)?;

        let image = texture.image.handle();
        let transition = if texture.initialized {
            ImageTransition::TEXTURE_REUPLOAD
        } else {
            ImageTransition::TEXTURE_FIRST_UPLOAD
        };

        self.staging.upload(&self.ctx.device, data.pixels(), self.config.upload_timeout_ns,
            |device, command_buffer, staging| unsafe {
                transition.record(device, command_buffer, image);
                device.cmd_copy_buffer_to_image(
                    command_buffer,
                    staging,
                    image,
                    vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                    &[texture_upload_region(extent)],
                );
                ImageTransition::TEXTURE_READY.record(device, command_buffer, image);
            })?;

        texture.initialized = true;
        Ok(())
    }

    /// Create a device-local vertex buffer of `size` bytes
    pub fn create_vertex_buffer(&mut self, size: u64) -> Result<()> {
        if self.vertices.is_some() {
            self.ctx.wait_idle()?;
        }

        let buffer = Buffer::new(
            Arc::clone(&self.ctx),
            vk::BufferUsageFlags::VERTEX_BUFFER | vk::BufferUsageFlags::TRANSFER_DST,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            size,
        )?;
        self.vertices = Some(QuadVertices { buffer, count: 0 });
        Ok(())
    }

    /// Upload vertices through the staging buffer
    ///
    /// Uses the staging command buffer and fence, not a frame slot.
    pub fn update_vertex_data(&mut self, vertices: &[Vertex]) -> Result<()> {
        let target = self.vertices.as_mut().ok_or_else(|| {
            Error::InvalidResource("update_vertex_data called before create_vertex_buffer".to_string())
        })?;
        check_vertex_upload(target.buffer.size(), vertices.len())?;

        let bytes = Vertex::as_bytes(vertices);
        let destination = target.buffer.handle();
        let size = bytes.len() as u64;

        self.staging.upload(&self.ctx.device, bytes, self.config.upload_timeout_ns,
            |device, command_buffer, staging| unsafe {
                let region = vk::BufferCopy { src_offset: 0, dst_offset: 0, size };
                device.cmd_copy_buffer(command_buffer, staging, destination, &[region]);
                device.cmd_pipeline_barrier(
                    command_buffer,
                    vk::PipelineStageFlags::TRANSFER,
                    vk::PipelineStageFlags::VERTEX_INPUT,
                    vk::DependencyFlags::empty(),
                    &[],
                    &[vertex_upload_barrier(destination)],
                    &[],
                );
            })?;

        target.count = vertices.len() as u32;
        Ok(())
    }

    /// Vertex buffer to draw, once a texture and a full quad have been uploaded
    fn scene_vertices(&self) -> Result<&QuadVertices> {
        match (&self.texture, &self.vertices) {
            (Some(texture), Some(vertices)) if texture.initialized && vertices.count >= QUAD_VERTEX_COUNT => Ok(vertices),
            _ => {
                engine_warn!("gpumix::vulkan", "Draw requested before texture and vertex data were uploaded");
                Err(Error::InvalidResource(
                    "Texture and at least 4 vertices must be uploaded before drawing".to_string(),
                ))
            }
        }
    }

    /// Record the render pass into `command_buffer`
    ///
    /// The render target goes UNDEFINED -> COLOR_ATTACHMENT before the pass and
    /// COLOR_ATTACHMENT -> TRANSFER_SRC after it.
    pub(crate) fn record_scene(&self, command_buffer: vk::CommandBuffer) -> Result<()> {
        let vertices = self.scene_vertices()?;

        let device = &self.ctx.device;
        let extent = self.target.extent();
        let target = self.target.image().handle();

        ImageTransition::TARGET_BEGIN_FRAME.record(device, command_buffer, target);

        let clear_values = [vk::ClearValue {
            color: vk::ClearColorValue { float32: self.config.clear_color },
        }];
        let render_area = vk::Rect2D { offset: vk::Offset2D { x: 0, y: 0 }, extent };
        let begin_info = vk::RenderPassBeginInfo::default()
            .render_pass(self.render_pass.handle())
            .framebuffer(self.framebuffer.handle())
            .render_area(render_area)
            .clear_values(&clear_values);

        let viewport = vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        };

        unsafe {
            device.cmd_begin_render_pass(command_buffer, &begin_info, vk::SubpassContents::INLINE);
            self.pipeline.bind(command_buffer);
            device.cmd_set_viewport(command_buffer, 0, &[viewport]);
            device.cmd_set_scissor(command_buffer, 0, &[render_area]);
            device.cmd_bind_vertex_buffers(command_buffer, 0, &[vertices.buffer.handle()], &[0]);
            device.cmd_draw(command_buffer, QUAD_VERTEX_COUNT, 1, 0, 0);
            device.cmd_end_render_pass(command_buffer);
        }

        ImageTransition::TARGET_END_FRAME.record(device, command_buffer, target);
        Ok(())
    }

    /// Wait for the next ring slot and hand it out with its fence reset
    ///
    /// Fails without touching the ring when there is nothing to draw yet.
    pub(crate) fn next_frame_slot(&mut self) -> Result<FrameSlot> {
        self.scene_vertices()?;
        let timeout = self.config.frame_timeout_ns;
        let frames = self.frames.as_mut().ok_or_else(|| {
            Error::InvalidResource("draw called before create_rendering_resources".to_string())
        })?;
        frames.next_slot(timeout)
    }

    /// Render one frame into the render target
    ///
    /// Does not wait for the frame to finish; `read_pixels` does.
    pub fn draw(&mut self) -> Result<()> {
        let slot = self.next_frame_slot()?;
        let device = &self.ctx.device;
        let queue = self.ctx.graphics.handle;

        let recorded = begin_command_buffer(device, slot.command_buffer, vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)
            .and_then(|()| self.record_scene(slot.command_buffer))
            .and_then(|()| end_command_buffer(device, slot.command_buffer));
        if let Err(e) = recorded {
            signal_fence(device, queue, slot.fence);
            return Err(e);
        }

        submit(device, queue, slot.command_buffer, &[], &[], slot.fence)
    }

    /// Copy the whole render target into `out`, returning the bytes written
    ///
    /// Rows are RGBA8 (BGRA8 for a BGRA render target), tightly packed.
    pub fn read_pixels(&self, out: &mut [u8]) -> Result<usize> {
        self.target.read_pixels(out)
    }

    /// Size in bytes of a full readback
    pub fn readback_size(&self) -> usize {
        self.target.readback_size()
    }

    pub fn render_target_extent(&self) -> vk::Extent2D {
        self.target.extent()
    }

    pub(crate) fn render_target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn context(&self) -> &Arc<DeviceContext> {
        &self.ctx
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for OffscreenRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.ctx.wait_idle() {
            engine_warn!("gpumix::vulkan", "Offscreen renderer teardown without idle device: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_offscreen_tests.rs"]
mod tests;
