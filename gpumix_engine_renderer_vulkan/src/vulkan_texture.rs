/// Image - Memory-backed 2D VkImage with its view and optional sampler

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::engine_error;
use ash::vk;
use std::sync::Arc;

use crate::vulkan_barrier::color_subresource_range;
use crate::vulkan_context::DeviceContext;
use crate::vulkan_sampler::create_sampler;

/// Create a 2D color view with identity swizzle over mip 0 / layer 0
pub(crate) fn create_image_view(device: &ash::Device, image: vk::Image, format: vk::Format) -> Result<vk::ImageView> {
    let create_info = vk::ImageViewCreateInfo::default()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .components(vk::ComponentMapping {
            r: vk::ComponentSwizzle::IDENTITY,
            g: vk::ComponentSwizzle::IDENTITY,
            b: vk::ComponentSwizzle::IDENTITY,
            a: vk::ComponentSwizzle::IDENTITY,
        })
        .subresource_range(color_subresource_range());

    unsafe { device.create_image_view(&create_info, None) }
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to create image view: {:?}", e);
            Error::InitializationFailed(format!("Failed to create image view: {:?}", e))
        })
}

/// Parameters of a 2D image
#[derive(Debug, Clone, Copy)]
pub struct ImageDesc {
    pub extent: vk::Extent2D,
    pub format: vk::Format,
    pub tiling: vk::ImageTiling,
    pub usage: vk::ImageUsageFlags,
    pub memory_flags: vk::MemoryPropertyFlags,
    /// Also create the fixed linear/clamp sampler
    pub with_sampler: bool,
}

/// Vulkan image, its dedicated memory, a view and optionally a sampler
///
/// Destroyed in the order sampler, view, image, memory.
pub struct Image {
    ctx: Arc<DeviceContext>,
    pub(crate) image: vk::Image,
    memory: vk::DeviceMemory,
    pub(crate) view: vk::ImageView,
    pub(crate) sampler: Option<vk::Sampler>,
    extent: vk::Extent2D,
}

impl Image {
    /// Create a single-mip, single-layer 2D image with bound memory and a view
    pub fn new_2d(ctx: Arc<DeviceContext>, desc: ImageDesc) -> Result<Self> {
        if desc.extent.width == 0 || desc.extent.height == 0 {
            engine_error!("gpumix::vulkan", "Refusing to create a {}x{} image", desc.extent.width, desc.extent.height);
            return Err(Error::InvalidResource("Image extent must be non-zero".to_string()));
        }

        let image_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(desc.format)
            .extent(vk::Extent3D { width: desc.extent.width, height: desc.extent.height, depth: 1 })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(desc.tiling)
            .usage(desc.usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        let image = unsafe { ctx.device.create_image(&image_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create image: {:?}", e);
                Error::InitializationFailed(format!("Failed to create image: {:?}", e))
            })?;

        let requirements = unsafe { ctx.device.get_image_memory_requirements(image) };
        let memory = match ctx.allocate_memory(requirements, desc.memory_flags) {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { ctx.device.destroy_image(image, None) };
                return Err(e);
            }
        };

        // From here on partially built state is released by Drop
        let mut result = Self {
            ctx,
            image,
            memory,
            view: vk::ImageView::null(),
            sampler: None,
            extent: desc.extent,
        };

        unsafe { result.ctx.device.bind_image_memory(image, memory, 0) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to bind image memory: {:?}", e);
                Error::InitializationFailed(format!("Failed to bind image memory: {:?}", e))
            })?;

        result.view = create_image_view(&result.ctx.device, image, desc.format)?;
        if desc.with_sampler {
            result.sampler = Some(create_sampler(&result.ctx.device)?);
        }

        Ok(result)
    }

    pub fn handle(&self) -> vk::Image {
        self.image
    }

    pub fn view(&self) -> vk::ImageView {
        self.view
    }

    pub fn sampler(&self) -> Option<vk::Sampler> {
        self.sampler
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        unsafe {
            if let Some(sampler) = self.sampler.take() {
                self.ctx.device.destroy_sampler(sampler, None);
            }
            if self.view != vk::ImageView::null() {
                self.ctx.device.destroy_image_view(self.view, None);
            }
            self.ctx.device.destroy_image(self.image, None);
            self.ctx.device.free_memory(self.memory, None);
        }
    }
}
