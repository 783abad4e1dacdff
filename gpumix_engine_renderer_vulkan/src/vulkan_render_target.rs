/// RenderTarget - Offscreen color image plus its readback path
///
/// The image rests in TRANSFER_SRC_OPTIMAL between frames. Readback replays a
/// command buffer recorded once at creation: copy the whole image into a
/// host-visible buffer, then make the write visible to the host.

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::{engine_debug, engine_warn};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_barrier::{color_subresource_layers, readback_barrier, ImageTransition};
use crate::vulkan_buffer::Buffer;
use crate::vulkan_command_list::{begin_command_buffer, end_command_buffer, CommandPool, SubmitSlot};
use crate::vulkan_context::DeviceContext;
use crate::vulkan_format::readback_texel_size;
use crate::vulkan_texture::{Image, ImageDesc};

/// Copy region covering the full image, tightly packed in the buffer
pub fn readback_region(extent: vk::Extent2D) -> vk::BufferImageCopy {
    vk::BufferImageCopy::default()
        .buffer_offset(0)
        .buffer_row_length(extent.width)
        .buffer_image_height(extent.height)
        .image_subresource(color_subresource_layers())
        .image_offset(vk::Offset3D { x: 0, y: 0, z: 0 })
        .image_extent(vk::Extent3D { width: extent.width, height: extent.height, depth: 1 })
}

pub struct RenderTarget {
    // Field order is drop order: the slot's fence before the images it guarded
    readback_slot: SubmitSlot,
    readback: Buffer,
    image: Image,
    timeout_ns: u64,
}

impl RenderTarget {
    /// Create the image, the readback buffer and the readback command buffer
    ///
    /// The image is moved to TRANSFER_SRC_OPTIMAL right away so a readback before
    /// the first frame is well defined.
    ///
    /// # Errors
    ///
    /// `Unsupported` when `format` is not an 8-bit RGBA/BGRA format.
    pub fn new(
        ctx: Arc<DeviceContext>,
        pool: &CommandPool,
        extent: vk::Extent2D,
        format: vk::Format,
        timeout_ns: u64,
    ) -> Result<Self> {
        let texel_size = readback_texel_size(format)?;
        let image = Image::new_2d(Arc::clone(&ctx), ImageDesc {
            extent,
            format,
            tiling: vk::ImageTiling::OPTIMAL,
            usage: vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_SRC,
            memory_flags: vk::MemoryPropertyFlags::DEVICE_LOCAL,
            with_sampler: true,
        })?;

        let size = extent.width as u64 * extent.height as u64 * texel_size as u64;
        let readback = Buffer::new(
            Arc::clone(&ctx),
            vk::BufferUsageFlags::TRANSFER_DST,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
            size,
        )?;
        let readback_slot = SubmitSlot::new(Arc::clone(&ctx), pool, false)?;
        let device = &ctx.device;
        let command_buffer = readback_slot.command_buffer();

        // Initial layout
        begin_command_buffer(device, command_buffer, vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)?;
        ImageTransition::TARGET_INITIAL.record(device, command_buffer, image.handle());
        end_command_buffer(device, command_buffer)?;
        readback_slot.submit_and_wait(timeout_ns, "render target initialization")?;

        // Readback, replayed on every read_pixels
        begin_command_buffer(device, command_buffer, vk::CommandBufferUsageFlags::empty())?;
        unsafe {
            device.cmd_copy_image_to_buffer(
                command_buffer,
                image.handle(),
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                readback.handle(),
                &[readback_region(extent)],
            );
            device.cmd_pipeline_barrier(
                command_buffer,
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::HOST,
                vk::DependencyFlags::empty(),
                &[],
                &[readback_barrier(readback.handle())],
                &[],
            );
        }
        end_command_buffer(device, command_buffer)?;

        engine_debug!("gpumix::vulkan", "Render target {}x{} {:?} created", extent.width, extent.height, format);
        Ok(Self { readback_slot, readback, image, timeout_ns })
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.image.extent()
    }

    /// Bytes produced by one readback (RGBA8, rows tightly packed)
    pub fn readback_size(&self) -> usize {
        self.readback.size() as usize
    }

    /// Copy the whole render target into `out`
    ///
    /// Returns the number of bytes written, always `readback_size()`.
    ///
    /// # Errors
    ///
    /// `InvalidResource` when `out` is shorter than `readback_size()`.
    pub fn read_pixels(&self, out: &mut [u8]) -> Result<usize> {
        let size = self.readback_size();
        if out.len() < size {
            engine_warn!("gpumix::vulkan", "Readback buffer of {} bytes is smaller than {} bytes", out.len(), size);
            return Err(Error::InvalidResource(format!(
                "Readback needs {} bytes, caller supplied {}", size, out.len()
            )));
        }

        self.readback_slot.submit_and_wait(self.timeout_ns, "pixel readback")?;
        self.readback.read(0, &mut out[..size])?;
        Ok(size)
    }
}

#[cfg(test)]
#[path = "vulkan_render_target_tests.rs"]
mod tests;
