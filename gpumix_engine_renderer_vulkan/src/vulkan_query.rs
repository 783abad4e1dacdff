/// Capability queries
///
/// Thin wrappers over the enumeration entry points, returning owned data.

use ash::vk;
use gpumix_engine::gpumix::Result;
use gpumix_engine::{engine_err, engine_info};
use std::ffi::{CStr, CString};

/// Surface capabilities, formats and present modes for one device/surface pair
#[derive(Debug, Clone, Default)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    /// At least one format and one present mode
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

pub fn instance_layer_names(entry: &ash::Entry) -> Result<Vec<CString>> {
    let layers = unsafe { entry.enumerate_instance_layer_properties() }
        .map_err(|e| engine_err!("gpumix::vulkan", "Failed to enumerate instance layers: {:?}", e))?;
    Ok(layers
        .iter()
        .filter_map(|layer| layer.layer_name_as_c_str().ok())
        .map(CStr::to_owned)
        .collect())
}

pub fn instance_extension_names(entry: &ash::Entry) -> Result<Vec<CString>> {
    let extensions = unsafe { entry.enumerate_instance_extension_properties(None) }
        .map_err(|e| engine_err!("gpumix::vulkan", "Failed to enumerate instance extensions: {:?}", e))?;
    Ok(extensions
        .iter()
        .filter_map(|ext| ext.extension_name_as_c_str().ok())
        .map(CStr::to_owned)
        .collect())
}

pub fn device_extension_names(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> Result<Vec<CString>> {
    let extensions = unsafe { instance.enumerate_device_extension_properties(physical_device) }
        .map_err(|e| engine_err!("gpumix::vulkan", "Failed to enumerate device extensions: {:?}", e))?;
    Ok(extensions
        .iter()
        .filter_map(|ext| ext.extension_name_as_c_str().ok())
        .map(CStr::to_owned)
        .collect())
}

pub fn queue_family_properties(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
    unsafe { instance.get_physical_device_queue_family_properties(physical_device) }
}

/// First family with at least one queue that can present to `surface`
pub fn find_present_family(
    surface_loader: &ash::khr::surface::Instance,
    physical_device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
    families: &[vk::QueueFamilyProperties],
) -> Option<u32> {
    (0..families.len() as u32).find(|&index| {
        families[index as usize].queue_count > 0
            && unsafe {
                surface_loader
                    .get_physical_device_surface_support(physical_device, index, surface)
                    .unwrap_or(false)
            }
    })
}

pub fn query_swapchain_support(
    surface_loader: &ash::khr::surface::Instance,
    physical_device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> Result<SwapchainSupport> {
    unsafe {
        let capabilities = surface_loader
            .get_physical_device_surface_capabilities(physical_device, surface)
            .map_err(|e| engine_err!("gpumix::vulkan", "Failed to get surface capabilities: {:?}", e))?;
        let formats = surface_loader
            .get_physical_device_surface_formats(physical_device, surface)
            .map_err(|e| engine_err!("gpumix::vulkan", "Failed to query surface formats: {:?}", e))?;
        let present_modes = surface_loader
            .get_physical_device_surface_present_modes(physical_device, surface)
            .map_err(|e| engine_err!("gpumix::vulkan", "Failed to query present modes: {:?}", e))?;

        Ok(SwapchainSupport { capabilities, formats, present_modes })
    }
}

/// Human-readable device name
pub fn device_name(properties: &vk::PhysicalDeviceProperties) -> String {
    properties
        .device_name_as_c_str()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "<unnamed device>".to_string())
}

/// Info log of every enumerated device with its type and API version
pub fn log_physical_devices(instance: &ash::Instance, physical_devices: &[vk::PhysicalDevice]) {
    engine_info!("gpumix::vulkan", "Found {} physical device(s)", physical_devices.len());
    for (index, &physical_device) in physical_devices.iter().enumerate() {
        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        engine_info!("gpumix::vulkan", "  [{}] {} ({:?}, Vulkan {}.{}.{})",
            index,
            device_name(&properties),
            properties.device_type,
            vk::api_version_major(properties.api_version),
            vk::api_version_minor(properties.api_version),
            vk::api_version_patch(properties.api_version));
    }
}
