/// Per-frame rendering resources
///
/// A fixed ring of slots, each with a command buffer, an "image available" and a
/// "render finished" semaphore and a fence created signaled. The ring index is
/// advanced once per draw and is unrelated to the swap chain image index.

use gpumix_engine::gpumix::Result;
use gpumix_engine::engine_debug;
use ash::vk;
use std::sync::Arc;

use crate::vulkan_command_list::{create_fence, create_semaphore, reset_fence, wait_for_fence, CommandPool};
use crate::vulkan_context::DeviceContext;

/// Round-robin position in a ring of `len` slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingCursor {
    index: usize,
    len: usize,
}

impl RingCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len: len.max(1) }
    }

    /// Return the current index and move to the next one
    pub fn advance(&mut self) -> usize {
        let index = self.index;
        self.index = (self.index + 1) % self.len;
        index
    }
}

/// One ring slot
#[derive(Debug, Clone, Copy)]
pub struct FrameSlot {
    pub command_buffer: vk::CommandBuffer,
    pub image_available: vk::Semaphore,
    pub render_finished: vk::Semaphore,
    pub fence: vk::Fence,
}

pub struct FrameRing {
    ctx: Arc<DeviceContext>,
    slots: Vec<FrameSlot>,
    cursor: RingCursor,
}

impl FrameRing {
    pub fn new(ctx: Arc<DeviceContext>, pool: &CommandPool, count: u32) -> Result<Self> {
        let command_buffers = pool.allocate(count)?;
        let mut ring = Self {
            ctx: Arc::clone(&ctx),
            slots: Vec::with_capacity(command_buffers.len()),
            cursor: RingCursor::new(command_buffers.len()),
        };

        // Slots pushed so far are destroyed by Drop if a later creation fails
        for command_buffer in command_buffers {
            let image_available = create_semaphore(&ctx.device)?;
            let render_finished = match create_semaphore(&ctx.device) {
                Ok(semaphore) => semaphore,
                Err(e) => {
                    unsafe { ctx.device.destroy_semaphore(image_available, None) };
                    return Err(e);
                }
            };
            let fence = match create_fence(&ctx.device, true) {
                Ok(fence) => fence,
                Err(e) => {
                    unsafe {
                        ctx.device.destroy_semaphore(image_available, None);
                        ctx.device.destroy_semaphore(render_finished, None);
                    }
                    return Err(e);
                }
            };
            ring.slots.push(FrameSlot { command_buffer, image_available, render_finished, fence });
        }

        engine_debug!("gpumix::vulkan", "Frame ring created with {} slots", ring.slots.len());
        Ok(ring)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Take the next slot for recording
    ///
    /// Waits until the slot's previous submission has completed (bounded by
    /// `timeout_ns`) and resets its fence. A slot is never handed out before that.
    pub fn next_slot(&mut self, timeout_ns: u64) -> Result<FrameSlot> {
        let index = self.cursor.advance();
        let slot = self.slots[index];
        let device = &self.ctx.device;

        wait_for_fence(device, slot.fence, timeout_ns, "frame slot")?;
        reset_fence(device, slot.fence)?;
        Ok(slot)
    }
}

impl Drop for FrameRing {
    fn drop(&mut self) {
        // Command buffers are freed with their pool
        unsafe {
            for slot in &self.slots {
                self.ctx.device.destroy_semaphore(slot.image_available, None);
                self.ctx.device.destroy_semaphore(slot.render_finished, None);
                self.ctx.device.destroy_fence(slot.fence, None);
            }
        }
    }
}

#[cfg(test)]
#[path = "vulkan_frame_tests.rs"]
mod tests;
