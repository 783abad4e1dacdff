/// Swapchain - Presentable images of a surface
///
/// Images are only ever blit targets. When graphics and present queues come from
/// different families the images are shared concurrently between both, so no
/// ownership transfer is recorded.

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::gpumix::render::Extent2D;
use gpumix_engine::{engine_error, engine_info};
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::DeviceContext;
use crate::vulkan_format::readback_texel_size;
use crate::vulkan_query::query_swapchain_support;
use crate::vulkan_select::{
    choose_image_count, choose_image_usage, choose_pre_transform, choose_present_mode,
    choose_surface_format, choose_swap_extent,
};
use crate::vulkan_surface::Surface;
use crate::vulkan_texture::create_image_view;

/// Outcome of an acquire or present call that did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapchainStatus {
    Optimal,
    /// Still usable, but no longer matches the surface exactly
    Suboptimal,
    /// Must be recreated before it can present again
    OutOfDate,
}

impl SwapchainStatus {
    pub fn is_optimal(&self) -> bool {
        *self == SwapchainStatus::Optimal
    }
}

/// Sharing mode and family list for the swap chain images
pub fn image_sharing(graphics_family: u32, present_family: u32) -> (vk::SharingMode, Vec<u32>) {
    if graphics_family == present_family {
        (vk::SharingMode::EXCLUSIVE, Vec::new())
    } else {
        (vk::SharingMode::CONCURRENT, vec![graphics_family, present_family])
    }
}

/// Chosen present mode, or FIFO when the surface does not list it
pub fn supported_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    let chosen = choose_present_mode(modes);
    if modes.contains(&chosen) {
        chosen
    } else {
        engine_info!("gpumix::vulkan", "Present mode {:?} not offered by the surface, using FIFO", chosen);
        vk::PresentModeKHR::FIFO
    }
}

pub struct Swapchain {
    ctx: Arc<DeviceContext>,
    loader: ash::khr::swapchain::Device,
    swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    views: Vec<vk::ImageView>,
    format: vk::SurfaceFormatKHR,
    extent: vk::Extent2D,
    present_mode: vk::PresentModeKHR,
}

impl Swapchain {
    /// Create a swap chain for `surface`
    ///
    /// # Arguments
    ///
    /// * `default_extent` - Size used when the surface leaves the extent to the application
    /// * `old` - Swap chain being replaced, if any. It is not destroyed here.
    pub fn new(
        ctx: Arc<DeviceContext>,
        surface: &Surface,
        default_extent: Extent2D,
        old: Option<&Swapchain>,
    ) -> Result<Self> {
        let present = ctx.present.ok_or_else(|| {
            engine_error!("gpumix::vulkan", "Swap chain requested on a device without a present queue");
            Error::InitializationFailed("Device has no present queue".to_string())
        })?;

        let support = query_swapchain_support(&surface.loader, ctx.physical_device, surface.handle)?;
        let format = choose_surface_format(&support.formats).ok_or_else(|| {
            engine_error!("gpumix::vulkan", "Surface reports no formats");
            Error::InitializationFailed("Surface reports no formats".to_string())
        })?;
        // The render target shares this format and is read back 4 bytes per pixel
        readback_texel_size(format.format).map_err(|e| {
            engine_error!("gpumix::vulkan", "Surface format {:?} cannot back the render target", format.format);
            e
        })?;
        let usage = choose_image_usage(&support.capabilities).ok_or_else(|| {
            Error::Unsupported("Swap chain images cannot be used as blit destination".to_string())
        })?;
        let present_mode = supported_present_mode(&support.present_modes);
        let extent = choose_swap_extent(&support.capabilities, default_extent);
        let image_count = choose_image_count(&support.capabilities);
        let (sharing_mode, families) = image_sharing(ctx.graphics.family, present.family);

        let create_info = vk::SwapchainCreateInfoKHR::default()
            .surface(surface.handle)
            .min_image_count(image_count)
            .image_format(format.format)
            .image_color_space(format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(usage)
            .image_sharing_mode(sharing_mode)
            .queue_family_indices(&families)
            .pre_transform(choose_pre_transform(&support.capabilities))
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(old.map_or(vk::SwapchainKHR::null(), |old| old.swapchain));

        let loader = ash::khr::swapchain::Device::new(ctx.instance().handle(), &ctx.device);
        let swapchain = unsafe { loader.create_swapchain(&create_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create swap chain: {:?}", e);
                Error::InitializationFailed(format!("Failed to create swap chain: {:?}", e))
            })?;

        let mut result = Self {
            ctx,
            loader,
            swapchain,
            images: Vec::new(),
            views: Vec::new(),
            format,
            extent,
            present_mode,
        };

        result.images = unsafe { result.loader.get_swapchain_images(swapchain) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to get swap chain images: {:?}", e);
                Error::InitializationFailed(format!("Failed to get swap chain images: {:?}", e))
            })?;
        for &image in &result.images {
            let view = create_image_view(&result.ctx.device, image, format.format)?;
            result.views.push(view);
        }

        engine_info!("gpumix::vulkan", "Swap chain created: {} images, {}x{}, {:?}, {:?}, {:?}",
            result.images.len(), extent.width, extent.height, format.format, present_mode, sharing_mode);
        Ok(result)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn image(&self, index: u32) -> Option<vk::Image> {
        self.images.get(index as usize).copied()
    }

    pub fn format(&self) -> vk::Format {
        self.format.format
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    pub fn present_mode(&self) -> vk::PresentModeKHR {
        self.present_mode
    }

    /// Acquire the next image, signaling `semaphore` when it is ready
    ///
    /// Returns `None` as index when the swap chain is out of date; nothing is
    /// signaled in that case.
    pub fn acquire(&self, semaphore: vk::Semaphore) -> Result<(Option<u32>, SwapchainStatus)> {
        match unsafe { self.loader.acquire_next_image(self.swapchain, u64::MAX, semaphore, vk::Fence::null()) } {
            Ok((index, false)) => Ok((Some(index), SwapchainStatus::Optimal)),
            Ok((index, true)) => Ok((Some(index), SwapchainStatus::Suboptimal)),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok((None, SwapchainStatus::OutOfDate)),
            Err(e) => {
                engine_error!("gpumix::vulkan", "Failed to acquire swap chain image: {:?}", e);
                Err(Error::BackendError(format!("Failed to acquire swap chain image: {:?}", e)))
            }
        }
    }

    /// Queue image `index` for presentation once `wait` is signaled
    pub fn present(&self, queue: vk::Queue, index: u32, wait: vk::Semaphore) -> Result<SwapchainStatus> {
        let wait_semaphores = [wait];
        let swapchains = [self.swapchain];
        let indices = [index];
        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&indices);

        match unsafe { self.loader.queue_present(queue, &present_info) } {
            Ok(false) => Ok(SwapchainStatus::Optimal),
            Ok(true) => Ok(SwapchainStatus::Suboptimal),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(SwapchainStatus::OutOfDate),
            Err(e) => {
                engine_error!("gpumix::vulkan", "Failed to present: {:?}", e);
                Err(Error::BackendError(format!("Failed to present: {:?}", e)))
            }
        }
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            for &view in &self.views {
                self.ctx.device.destroy_image_view(view, None);
            }
            self.loader.destroy_swapchain(self.swapchain, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_swapchain_tests.rs"]
mod tests;
