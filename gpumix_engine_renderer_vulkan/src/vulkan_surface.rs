/// Surface - Presentation surface created from a caller-owned window

use ash::vk;
use gpumix_engine::gpumix::{Error, Result};
use gpumix_engine::engine_error;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::ffi::CStr;
use std::sync::Arc;

use crate::vulkan_instance::VulkanInstance;

/// Instance extensions needed to present to `window`
pub fn required_surface_extensions(window: &impl HasDisplayHandle) -> Result<Vec<&'static CStr>> {
    let display_handle = window.display_handle()
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to get display handle: {}", e);
            Error::InitializationFailed(format!("Failed to get display handle: {}", e))
        })?;
    let names = ash_window::enumerate_required_extensions(display_handle.as_raw())
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to get required extensions: {}", e);
            Error::InitializationFailed(format!("Failed to get required extensions: {}", e))
        })?;
    // ash_window hands out pointers to static extension name constants
    Ok(names.iter().map(|&ptr| unsafe { CStr::from_ptr(ptr) }).collect())
}

/// Owned VkSurfaceKHR
///
/// The window and its event loop stay with the caller; the window must outlive
/// this surface.
pub struct Surface {
    pub(crate) handle: vk::SurfaceKHR,
    pub(crate) loader: ash::khr::surface::Instance,
    _instance: Arc<VulkanInstance>,
}

impl Surface {
    pub fn new<W>(instance: Arc<VulkanInstance>, window: &W) -> Result<Self>
    where
        W: HasDisplayHandle + HasWindowHandle,
    {
        let display_handle = window.display_handle()
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to get display handle: {}", e);
                Error::InitializationFailed(format!("Failed to get display handle: {}", e))
            })?;
        let window_handle = window.window_handle()
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to get window handle: {}", e);
                Error::InitializationFailed(format!("Failed to get window handle: {}", e))
            })?;

        let handle = unsafe {
            ash_window::create_surface(
                &instance.entry,
                &instance.instance,
                display_handle.as_raw(),
                window_handle.as_raw(),
                None,
            )
        }
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to create surface: {:?}", e);
            Error::InitializationFailed(format!("Failed to create surface: {:?}", e))
        })?;

        let loader = ash::khr::surface::Instance::new(&instance.entry, &instance.instance);

        Ok(Self { handle, loader, _instance: instance })
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_surface(self.handle, None);
        }
    }
}
