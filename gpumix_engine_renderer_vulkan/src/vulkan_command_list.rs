/// Command pools, fences, semaphores and queue submission
///
/// `SubmitSlot` pairs one command buffer with its fence. `FenceResetGuard` resets
/// the fence when it goes out of scope, so a slot is reusable even when the wait
/// in between fails.

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::{engine_error, engine_warn};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::DeviceContext;

/// Owned VkCommandPool bound to the graphics queue family
pub struct CommandPool {
    ctx: Arc<DeviceContext>,
    pool: vk::CommandPool,
}

impl CommandPool {
    pub fn new(ctx: Arc<DeviceContext>, flags: vk::CommandPoolCreateFlags) -> Result<Self> {
        let create_info = vk::CommandPoolCreateInfo::default()
            .queue_family_index(ctx.graphics.family)
            .flags(flags);

        let pool = unsafe { ctx.device.create_command_pool(&create_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create command pool: {:?}", e);
                Error::InitializationFailed(format!("Failed to create command pool: {:?}", e))
            })?;

        Ok(Self { ctx, pool })
    }

    /// Allocate `count` primary command buffers
    pub fn allocate(&self, count: u32) -> Result<Vec<vk::CommandBuffer>> {
        let allocate_info = vk::CommandBufferAllocateInfo::default()
            .command_pool(self.pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(count);

        unsafe { self.ctx.device.allocate_command_buffers(&allocate_info) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to allocate {} command buffers: {:?}", count, e);
                Error::InitializationFailed(format!("Failed to allocate command buffers: {:?}", e))
            })
    }
}

impl Drop for CommandPool {
    fn drop(&mut self) {
        // Frees every command buffer allocated from the pool
        unsafe {
            self.ctx.device.destroy_command_pool(self.pool, None);
        }
    }
}

pub(crate) fn create_fence(device: &ash::Device, signaled: bool) -> Result<vk::Fence> {
    let flags = if signaled { vk::FenceCreateFlags::SIGNALED } else { vk::FenceCreateFlags::empty() };
    let create_info = vk::FenceCreateInfo::default().flags(flags);

    unsafe { device.create_fence(&create_info, None) }
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to create fence: {:?}", e);
            Error::InitializationFailed(format!("Failed to create fence: {:?}", e))
        })
}

pub(crate) fn create_semaphore(device: &ash::Device) -> Result<vk::Semaphore> {
    let create_info = vk::SemaphoreCreateInfo::default();

    unsafe { device.create_semaphore(&create_info, None) }
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to create semaphore: {:?}", e);
            Error::InitializationFailed(format!("Failed to create semaphore: {:?}", e))
        })
}

/// Wait on one fence for at most `timeout_ns`
///
/// `what` names the operation in the log and in the returned error.
pub(crate) fn wait_for_fence(device: &ash::Device, fence: vk::Fence, timeout_ns: u64, what: &str) -> Result<()> {
    match unsafe { device.wait_for_fences(&[fence], true, timeout_ns) } {
        Ok(()) => Ok(()),
        Err(vk::Result::TIMEOUT) => {
            engine_error!("gpumix::vulkan", "Fence wait for {} timed out after {} ns", what, timeout_ns);
            Err(Error::Timeout(format!("{} did not complete within {} ns", what, timeout_ns)))
        }
        Err(e) => {
            engine_error!("gpumix::vulkan", "Fence wait for {} failed: {:?}", what, e);
            Err(Error::BackendError(format!("Fence wait for {} failed: {:?}", what, e)))
        }
    }
}

pub(crate) fn reset_fence(device: &ash::Device, fence: vk::Fence) -> Result<()> {
    unsafe { device.reset_fences(&[fence]) }
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to reset fence: {:?}", e);
            Error::BackendError(format!("Failed to reset fence: {:?}", e))
        })
}

pub(crate) fn begin_command_buffer(
    device: &ash::Device,
    command_buffer: vk::CommandBuffer,
    flags: vk::CommandBufferUsageFlags,
) -> Result<()> {
    let begin_info = vk::CommandBufferBeginInfo::default().flags(flags);

    unsafe { device.begin_command_buffer(command_buffer, &begin_info) }
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to begin command buffer: {:?}", e);
            Error::BackendError(format!("Failed to begin command buffer: {:?}", e))
        })
}

pub(crate) fn end_command_buffer(device: &ash::Device, command_buffer: vk::CommandBuffer) -> Result<()> {
    unsafe { device.end_command_buffer(command_buffer) }
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to end command buffer: {:?}", e);
            Error::BackendError(format!("Failed to end command buffer: {:?}", e))
        })
}

/// Submit one command buffer
///
/// # Arguments
///
/// * `waits` - Semaphores to wait on, each with the stage that waits
/// * `signals` - Semaphores signaled on completion
/// * `fence` - Fence signaled on completion (may be null)
pub(crate) fn submit(
    device: &ash::Device,
    queue: vk::Queue,
    command_buffer: vk::CommandBuffer,
    waits: &[(vk::Semaphore, vk::PipelineStageFlags)],
    signals: &[vk::Semaphore],
    fence: vk::Fence,
) -> Result<()> {
    let wait_semaphores: Vec<vk::Semaphore> = waits.iter().map(|(semaphore, _)| *semaphore).collect();
    let wait_stages: Vec<vk::PipelineStageFlags> = waits.iter().map(|(_, stage)| *stage).collect();
    let command_buffers = [command_buffer];

    let submit_info = vk::SubmitInfo::default()
        .wait_semaphores(&wait_semaphores)
        .wait_dst_stage_mask(&wait_stages)
        .command_buffers(&command_buffers)
        .signal_semaphores(signals);

    unsafe { device.queue_submit(queue, &[submit_info], fence) }
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to submit command buffer: {:?}", e);
            Error::BackendError(format!("Failed to submit command buffer: {:?}", e))
        })
}

/// Signal `fence` through an empty submission
///
/// Gives back a ring slot whose fence was reset but whose frame was abandoned.
pub(crate) fn signal_fence(device: &ash::Device, queue: vk::Queue, fence: vk::Fence) {
    if let Err(e) = unsafe { device.queue_submit(queue, &[], fence) } {
        engine_warn!("gpumix::vulkan", "Failed to signal abandoned frame fence: {:?}", e);
    }
}

/// Resets a fence when dropped
pub(crate) struct FenceResetGuard<'a> {
    device: &'a ash::Device,
    fence: vk::Fence,
}

impl<'a> FenceResetGuard<'a> {
    pub(crate) fn new(device: &'a ash::Device, fence: vk::Fence) -> Self {
        Self { device, fence }
    }
}

impl Drop for FenceResetGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = unsafe { self.device.reset_fences(&[self.fence]) } {
            engine_warn!("gpumix::vulkan", "Failed to reset fence on scope exit: {:?}", e);
        }
    }
}

/// One command buffer plus the fence that tracks its submission
///
/// Used for the staging upload path and for pixel readback, both of which are
/// synchronous: the caller returns only after the GPU has finished.
pub struct SubmitSlot {
    ctx: Arc<DeviceContext>,
    pub(crate) command_buffer: vk::CommandBuffer,
    fence: vk::Fence,
}

impl SubmitSlot {
    /// Allocate the command buffer from `pool` and create the fence
    pub fn new(ctx: Arc<DeviceContext>, pool: &CommandPool, signaled: bool) -> Result<Self> {
        let command_buffer = pool
            .allocate(1)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::InitializationFailed("Driver returned no command buffer".to_string()))?;
        let fence = create_fence(&ctx.device, signaled)?;

        Ok(Self { ctx, command_buffer, fence })
    }

    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    /// Submit the recorded command buffer to the graphics queue and block until it completes
    ///
    /// Waits for device idle, then for the fence (bounded by `timeout_ns`). The
    /// fence is reset on return whether or not the wait succeeded.
    pub fn submit_and_wait(&self, timeout_ns: u64, what: &str) -> Result<()> {
        let device = &self.ctx.device;
        submit(device, self.ctx.graphics.handle, self.command_buffer, &[], &[], self.fence)?;

        let _reset = FenceResetGuard::new(device, self.fence);
        self.ctx.wait_idle()?;
        wait_for_fence(device, self.fence, timeout_ns, what)
    }
}

impl Drop for SubmitSlot {
    fn drop(&mut self) {
        // The command buffer goes away with its pool
        unsafe {
            self.ctx.device.destroy_fence(self.fence, None);
        }
    }
}
