/// Buffer - Memory-backed VkBuffer

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::{engine_error, engine_err};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::DeviceContext;

/// Vulkan buffer with its own dedicated memory allocation
pub struct Buffer {
    /// Shared GPU context
    ctx: Arc<DeviceContext>,
    /// Vulkan buffer
    pub(crate) buffer: vk::Buffer,
    /// Bound device memory
    memory: vk::DeviceMemory,
    /// Buffer size in bytes
    size: u64,
    /// Property flags requested at creation
    memory_flags: vk::MemoryPropertyFlags,
}

impl Buffer {
    /// Create a buffer and bind freshly allocated memory to it
    ///
    /// # Arguments
    ///
    /// * `ctx` - Device context
    /// * `usage` - Buffer usage flags
    /// * `memory_flags` - Required memory properties (e.g. DEVICE_LOCAL or HOST_VISIBLE)
    /// * `size` - Size in bytes
    pub fn new(
        ctx: Arc<DeviceContext>,
        usage: vk::BufferUsageFlags,
        memory_flags: vk::MemoryPropertyFlags,
        size: u64,
    ) -> Result<Self> {
        if size == 0 {
            engine_error!("gpumix::vulkan", "Refusing to create a zero-sized buffer");
            return Err(Error::InvalidResource("Buffer size must be non-zero".to_string()));
        }

        let buffer_info = vk::BufferCreateInfo::default()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe { ctx.device.create_buffer(&buffer_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create buffer: {:?}", e);
                Error::InitializationFailed(format!("Failed to create buffer: {:?}", e))
            })?;

        let requirements = unsafe { ctx.device.get_buffer_memory_requirements(buffer) };
        let memory = match ctx.allocate_memory(requirements, memory_flags) {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { ctx.device.destroy_buffer(buffer, None) };
                return Err(e);
            }
        };

        if let Err(e) = unsafe { ctx.device.bind_buffer_memory(buffer, memory, 0) } {
            unsafe {
                ctx.device.destroy_buffer(buffer, None);
                ctx.device.free_memory(memory, None);
            }
            engine_error!("gpumix::vulkan", "Failed to bind buffer memory: {:?}", e);
            return Err(Error::InitializationFailed(format!("Failed to bind buffer memory: {:?}", e)));
        }

        Ok(Self { ctx, buffer, memory, size, memory_flags })
    }

    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_host_visible(&self) -> bool {
        self.memory_flags.contains(vk::MemoryPropertyFlags::HOST_VISIBLE)
    }

    fn check_range(&self, offset: u64, len: usize) -> Result<()> {
        if !self.is_host_visible() {
            return Err(Error::InvalidResource("Buffer memory is not host visible".to_string()));
        }
        let end = offset.checked_add(len as u64);
        if end.map_or(true, |end| end > self.size) {
            return Err(Error::InvalidResource(format!(
                "Range {}..+{} exceeds buffer size {}", offset, len, self.size
            )));
        }
        Ok(())
    }

    fn mapped_range(&self) -> vk::MappedMemoryRange<'static> {
        vk::MappedMemoryRange::default()
            .memory(self.memory)
            .offset(0)
            .size(vk::WHOLE_SIZE)
    }

    /// Copy `data` into the buffer at `offset`
    ///
    /// Maps, copies, flushes (for non-coherent memory) and unmaps.
    pub fn write(&self, offset: u64, data: &[u8]) -> Result<()> {
        self.check_range(offset, data.len())?;

        unsafe {
            let mapped = self.ctx.device
                .map_memory(self.memory, 0, vk::WHOLE_SIZE, vk::MemoryMapFlags::empty())
                .map_err(|e| engine_err!("gpumix::vulkan", "Failed to map buffer memory: {:?}", e))?
                as *mut u8;

            std::ptr::copy_nonoverlapping(data.as_ptr(), mapped.add(offset as usize), data.len());

            let flushed = self.ctx.device.flush_mapped_memory_ranges(&[self.mapped_range()]);
            self.ctx.device.unmap_memory(self.memory);
            flushed.map_err(|e| engine_err!("gpumix::vulkan", "Failed to flush buffer memory: {:?}", e))
        }
    }

    /// Copy `out.len()` bytes starting at `offset` out of the buffer
    ///
    /// Maps, invalidates (for non-coherent memory), copies and unmaps.
    pub fn read(&self, offset: u64, out: &mut [u8]) -> Result<()> {
        self.check_range(offset, out.len())?;

        unsafe {
            let mapped = self.ctx.device
                .map_memory(self.memory, 0, vk::WHOLE_SIZE, vk::MemoryMapFlags::empty())
                .map_err(|e| engine_err!("gpumix::vulkan", "Failed to map buffer memory: {:?}", e))?
                as *const u8;

            if let Err(e) = self.ctx.device.invalidate_mapped_memory_ranges(&[self.mapped_range()]) {
                self.ctx.device.unmap_memory(self.memory);
                return Err(engine_err!("gpumix::vulkan", "Failed to invalidate buffer memory: {:?}", e));
            }

            std::ptr::copy_nonoverlapping(mapped.add(offset as usize), out.as_mut_ptr(), out.len());
            self.ctx.device.unmap_memory(self.memory);
        }
        Ok(())
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_buffer(self.buffer, None);
            self.ctx.device.free_memory(self.memory, None);
        }
    }
}
