/// StagingBuffer - Host-visible bridge for texture and vertex uploads
///
/// At most one upload is in flight: `upload` returns only after the copy has
/// completed and the fence has been reset.

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::{engine_debug, engine_warn};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_buffer::Buffer;
use crate::vulkan_command_list::{begin_command_buffer, end_command_buffer, CommandPool, SubmitSlot};
use crate::vulkan_context::DeviceContext;

pub struct StagingBuffer {
    buffer: Buffer,
    slot: SubmitSlot,
}

impl StagingBuffer {
    /// Create a HOST_VISIBLE | HOST_COHERENT transfer source of `size` bytes
    pub fn new(ctx: Arc<DeviceContext>, pool: &CommandPool, size: u64) -> Result<Self> {
        let buffer = Buffer::new(
            Arc::clone(&ctx),
            vk::BufferUsageFlags::TRANSFER_SRC,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
            size,
        )?;
        let slot = SubmitSlot::new(ctx, pool, false)?;

        engine_debug!("gpumix::vulkan", "Staging buffer created ({} bytes)", size);
        Ok(Self { buffer, slot })
    }

    /// Copy `data` into the staging memory and run `record` as a one-shot submission
    ///
    /// `record` receives the device, the command buffer (already begun) and the
    /// staging buffer handle to copy from.
    ///
    /// # Errors
    ///
    /// `InvalidResource` when `data` does not fit, `Timeout` when the upload does
    /// not complete within `timeout_ns`.
    pub fn upload<F>(&self, device: &ash::Device, data: &[u8], timeout_ns: u64, record: F) -> Result<()>
    where
        F: FnOnce(&ash::Device, vk::CommandBuffer, vk::Buffer),
    {
        if data.len() as u64 > self.buffer.size() {
            engine_warn!("gpumix::vulkan", "Upload of {} bytes exceeds staging buffer ({} bytes)",
                data.len(), self.buffer.size());
            return Err(Error::InvalidResource(format!(
                "Payload of {} bytes does not fit the {} byte staging buffer",
                data.len(), self.buffer.size()
            )));
        }

        self.buffer.write(0, data)?;

        let command_buffer = self.slot.command_buffer();
        begin_command_buffer(device, command_buffer, vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)?;
        record(device, command_buffer, self.buffer.handle());
        end_command_buffer(device, command_buffer)?;

        self.slot.submit_and_wait(timeout_ns, "staging upload")
    }
}
