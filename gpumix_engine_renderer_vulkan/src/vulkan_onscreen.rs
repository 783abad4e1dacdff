/// OnscreenRenderer - Offscreen renderer plus a swap chain
///
/// Each frame renders the quad into the shared render target, blits the target
/// into the acquired swap chain image and presents it. Suboptimal and out of
/// date results are logged and returned; recreation only happens through
/// `recreate_swapchain`, which the window's resize handler calls.

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::gpumix::render::{Config, TextureData, TextureFormat, Vertex};
use gpumix_engine::{engine_info, engine_warn};
use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;

use crate::vulkan_barrier::{color_subresource_layers, ImageTransition};
use crate::vulkan_command_list::{begin_command_buffer, end_command_buffer, signal_fence, submit};
use crate::vulkan_context::{DeviceContext, DeviceRequest};
use crate::vulkan_instance::VulkanInstance;
use crate::vulkan_offscreen::OffscreenRenderer;
use crate::vulkan_select::QueueRequirement;
use crate::vulkan_shader::ShaderCode;
use crate::vulkan_surface::{required_surface_extensions, Surface};
use crate::vulkan_swapchain::{Swapchain, SwapchainStatus};

/// Acquire and present results of one `draw`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStatus {
    pub acquire: SwapchainStatus,
    pub present: SwapchainStatus,
}

impl FrameStatus {
    /// True when either step reported that the swap chain no longer matches
    pub fn needs_recreation(&self) -> bool {
        !self.acquire.is_optimal() || !self.present.is_optimal()
    }
}

/// Blit region stretching the whole source over the whole destination
pub fn blit_region(src: vk::Extent2D, dst: vk::Extent2D) -> vk::ImageBlit {
    vk::ImageBlit {
        src_subresource: color_subresource_layers(),
        src_offsets: [
            vk::Offset3D { x: 0, y: 0, z: 0 },
            vk::Offset3D { x: src.width as i32, y: src.height as i32, z: 1 },
        ],
        dst_subresource: color_subresource_layers(),
        dst_offsets: [
            vk::Offset3D { x: 0, y: 0, z: 0 },
            vk::Offset3D { x: dst.width as i32, y: dst.height as i32, z: 1 },
        ],
    }
}

pub struct OnscreenRenderer {
    core: OffscreenRenderer,
    swapchain: Swapchain,
    surface: Surface,
}

impl OnscreenRenderer {
    /// Create every Vulkan object needed to render into `window`
    ///
    /// The window must outlive the renderer. The frame ring gets one slot per
    /// swap chain image.
    pub fn new<W>(window: &W, config: Config, shaders: &ShaderCode) -> Result<Self>
    where
        W: HasDisplayHandle + HasWindowHandle,
    {
        config.validate()?;

        let extensions = required_surface_extensions(window)?;
        let instance = Arc::new(VulkanInstance::new(&config, &extensions)?);
        let surface = Surface::new(Arc::clone(&instance), window)?;

        let device_extensions = [ash::khr::swapchain::NAME];
        let ctx = DeviceContext::new(instance, DeviceRequest {
            requirement: QueueRequirement::GraphicsAndPresent,
            extensions: &device_extensions,
            surface: Some(&surface),
            preferred: config.preferred_device_type,
        })?;

        let swapchain = Swapchain::new(Arc::clone(&ctx), &surface, config.default_swapchain_extent, None)?;
        let mut core = OffscreenRenderer::from_device(ctx, config, swapchain.format(), shaders)?;
        core.create_rendering_resources(swapchain.image_count() as u32)?;

        engine_info!("gpumix::vulkan", "Onscreen renderer ready: {} swap chain images, {:?}",
            swapchain.image_count(), swapchain.present_mode());
        Ok(Self { core, swapchain, surface })
    }

    /// Replace the swap chain after a resize
    ///
    /// Pipeline, render target and frame ring are kept. The old swap chain is
    /// passed to the new one and destroyed only once the new one exists.
    pub fn recreate_swapchain(&mut self) -> Result<()> {
        let ctx = Arc::clone(self.core.context());
        ctx.wait_idle()?;

        let swapchain = Swapchain::new(
            ctx,
            &self.surface,
            self.core.config().default_swapchain_extent,
            Some(&self.swapchain),
        )?;
        self.swapchain = swapchain;

        let extent = self.swapchain.extent();
        engine_info!("gpumix::vulkan", "Swap chain recreated: {} images, {}x{}, {:?}",
            self.swapchain.image_count(), extent.width, extent.height, self.swapchain.present_mode());
        Ok(())
    }

    pub fn swapchain_image_count(&self) -> usize {
        self.swapchain.image_count()
    }

    pub fn swapchain_extent(&self) -> vk::Extent2D {
        self.swapchain.extent()
    }

    pub fn swapchain_format(&self) -> vk::Format {
        self.swapchain.format()
    }

    /// Blit the render target (TRANSFER_SRC) into `image` and leave it presentable
    fn record_blit(&self, command_buffer: vk::CommandBuffer, image: vk::Image) {
        let device = &self.core.context().device;
        let target = self.core.render_target();

        ImageTransition::SWAPCHAIN_BLIT_DST.record(device, command_buffer, image);
        unsafe {
            device.cmd_blit_image(
                command_buffer,
                target.image().handle(),
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                image,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                &[blit_region(target.extent(), self.swapchain.extent())],
                vk::Filter::NEAREST,
            );
        }
        ImageTransition::SWAPCHAIN_PRESENT.record(device, command_buffer, image);
    }

    /// Render, blit and present one frame
    ///
    /// When the acquire reports out of date the scene is still rendered and the
    /// slot's fence still signaled, but nothing is presented.
    pub fn draw(&mut self) -> Result<FrameStatus> {
        let slot = self.core.next_frame_slot()?;
        let ctx = Arc::clone(self.core.context());
        let device = &ctx.device;
        let graphics = ctx.graphics.handle;

        let (image_index, acquire) = match self.swapchain.acquire(slot.image_available) {
            Ok(acquired) => acquired,
            Err(e) => {
                signal_fence(device, graphics, slot.fence);
                return Err(e);
            }
        };
        if !acquire.is_optimal() {
            engine_info!("gpumix::vulkan", "Swap chain acquire reported {:?}", acquire);
        }
        let image = match image_index {
            Some(index) => match self.swapchain.image(index) {
                Some(image) => Some((index, image)),
                None => {
                    signal_fence(device, graphics, slot.fence);
                    return Err(Error::BackendError(format!("Acquired image index {} out of range", index)));
                }
            },
            None => None,
        };

        let recorded = begin_command_buffer(device, slot.command_buffer, vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)
            .and_then(|()| self.core.record_scene(slot.command_buffer))
            .and_then(|()| {
                if let Some((_, image)) = image {
                    self.record_blit(slot.command_buffer, image);
                }
                end_command_buffer(device, slot.command_buffer)
            });
        if let Err(e) = recorded {
            signal_fence(device, graphics, slot.fence);
            return Err(e);
        }

        let present = match image {
            Some((index, _)) => {
                submit(
                    device,
                    graphics,
                    slot.command_buffer,
                    &[(slot.image_available, vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)],
                    &[slot.render_finished],
                    slot.fence,
                )?;
                let queue = ctx.present.map_or(graphics, |present| present.handle);
                self.swapchain.present(queue, index, slot.render_finished)?
            }
            None => {
                submit(device, graphics, slot.command_buffer, &[], &[], slot.fence)?;
                SwapchainStatus::OutOfDate
            }
        };
        if !present.is_optimal() {
            engine_info!("gpumix::vulkan", "Swap chain present reported {:?}", present);
        }

        Ok(FrameStatus { acquire, present })
    }

    // ===== Shared rendering operations =====

    pub fn create_texture(&mut self, width: u32, height: u32, format: TextureFormat) -> Result<()> {
        self.core.create_texture(width, height, format)
    }

    pub fn copy_texture_data(&mut self, data: &TextureData) -> Result<()> {
        self.core.copy_texture_data(data)
    }

    pub fn create_vertex_buffer(&mut self, size: u64) -> Result<()> {
        self.core.create_vertex_buffer(size)
    }

    pub fn update_vertex_data(&mut self, vertices: &[Vertex]) -> Result<()> {
        self.core.update_vertex_data(vertices)
    }

    pub fn read_pixels(&self, out: &mut [u8]) -> Result<usize> {
        self.core.read_pixels(out)
    }

    pub fn readback_size(&self) -> usize {
        self.core.readback_size()
    }

    pub fn context(&self) -> &Arc<DeviceContext> {
        self.core.context()
    }
}

impl Drop for OnscreenRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.core.context().wait_idle() {
            engine_warn!("gpumix::vulkan", "Onscreen renderer teardown without idle device: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_onscreen_tests.rs"]
mod tests;
