/// DeviceContext - Selected physical device, logical device and queues
///
/// Shared (via `Arc`) by every GPU resource. Resources hold their own clone, so
/// the logical device is destroyed only after the last of them is gone.

use ash::vk;
use gpumix_engine::gpumix::{Error, Result};
use gpumix_engine::gpumix::render::DeviceType;
use gpumix_engine::{engine_error, engine_info, engine_warn};
use std::ffi::{c_char, CStr};
use std::sync::Arc;

use crate::vulkan_format::device_type_to_vk;
use crate::vulkan_instance::VulkanInstance;
use crate::vulkan_query::{
    device_extension_names, device_name, find_present_family, log_physical_devices,
    query_swapchain_support, queue_family_properties,
};
use crate::vulkan_select::{
    find_memory_type_index, find_queue_family, missing_extensions, select_physical_device,
    DeviceCandidate, QueueFamilies, QueueRequirement,
};
use crate::vulkan_surface::Surface;

/// A queue handle tagged with its family index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueInfo {
    pub handle: vk::Queue,
    pub family: u32,
}

/// What the caller needs from the device
pub struct DeviceRequest<'a> {
    /// Offscreen (graphics only) or onscreen (graphics + present)
    pub requirement: QueueRequirement,
    /// Device extensions that must be supported and enabled
    pub extensions: &'a [&'a CStr],
    /// Surface to check presentation against (onscreen only)
    pub surface: Option<&'a Surface>,
    /// Preferred adapter type
    pub preferred: DeviceType,
}

/// Shared GPU context for all Vulkan resources
pub struct DeviceContext {
    /// Vulkan logical device
    pub device: ash::Device,
    pub physical_device: vk::PhysicalDevice,
    pub properties: vk::PhysicalDeviceProperties,
    pub memory_properties: vk::PhysicalDeviceMemoryProperties,
    /// Graphics queue (also used for uploads and readback)
    pub graphics: QueueInfo,
    /// Present queue (onscreen only, may share the graphics family)
    pub present: Option<QueueInfo>,
    instance: Arc<VulkanInstance>,
}

impl DeviceContext {
    /// Select a physical device and create the logical device
    ///
    /// Devices are examined in enumeration order and the search stops at the first
    /// one that qualifies and matches the preferred type.
    pub fn new(instance: Arc<VulkanInstance>, request: DeviceRequest<'_>) -> Result<Arc<Self>> {
        let vk_instance = &instance.instance;

        let physical_devices = unsafe { vk_instance.enumerate_physical_devices() }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to enumerate physical devices: {:?}", e);
                Error::InitializationFailed(format!("Failed to enumerate physical devices: {:?}", e))
            })?;
        log_physical_devices(vk_instance, &physical_devices);

        let candidates = physical_devices
            .iter()
            .map(|&physical_device| Self::describe(&instance, physical_device, &request));

        let (index, families) = select_physical_device(
            candidates,
            request.requirement,
            device_type_to_vk(request.preferred),
        )
        .ok_or_else(|| {
            engine_error!("gpumix::vulkan", "No physical device satisfies {:?}", request.requirement);
            Error::InitializationFailed(format!("No suitable GPU found for {:?}", request.requirement))
        })?;

        let physical_device = physical_devices[index];
        let (properties, memory_properties) = unsafe {
            (
                vk_instance.get_physical_device_properties(physical_device),
                vk_instance.get_physical_device_memory_properties(physical_device),
            )
        };
        engine_info!("gpumix::vulkan", "Selected device [{}] {} ({:?}), graphics family {}, present family {:?}",
            index, device_name(&properties), properties.device_type, families.graphics, families.present);

        let device = Self::create_logical_device(&instance, physical_device, families, request.extensions)?;

        let graphics = QueueInfo {
            handle: unsafe { device.get_device_queue(families.graphics, 0) },
            family: families.graphics,
        };
        let present = families.present.map(|family| QueueInfo {
            handle: unsafe { device.get_device_queue(family, 0) },
            family,
        });

        Ok(Arc::new(Self {
            device,
            physical_device,
            properties,
            memory_properties,
            graphics,
            present,
            instance,
        }))
    }

    /// Gather the facts selection needs about one device
    ///
    /// Query failures count as "not supported" so one broken adapter does not
    /// prevent using another.
    fn describe(
        instance: &VulkanInstance,
        physical_device: vk::PhysicalDevice,
        request: &DeviceRequest<'_>,
    ) -> DeviceCandidate {
        let vk_instance = &instance.instance;
        let properties = unsafe { vk_instance.get_physical_device_properties(physical_device) };

        let extensions_supported = match device_extension_names(vk_instance, physical_device) {
            Ok(names) => {
                let available: Vec<&CStr> = names.iter().map(|n| n.as_c_str()).collect();
                let missing = missing_extensions(&available, request.extensions);
                if !missing.is_empty() {
                    engine_info!("gpumix::vulkan", "{} lacks device extensions {:?}",
                        device_name(&properties), missing);
                }
                missing.is_empty()
            }
            Err(_) => false,
        };

        let families = queue_family_properties(vk_instance, physical_device);
        let graphics_family = find_queue_family(&families, vk::QueueFlags::GRAPHICS);

        let (present_family, has_surface_formats, has_present_modes) = match request.surface {
            Some(surface) => {
                let present = find_present_family(&surface.loader, physical_device, surface.handle, &families);
                match query_swapchain_support(&surface.loader, physical_device, surface.handle) {
                    Ok(support) => (present, !support.formats.is_empty(), !support.present_modes.is_empty()),
                    Err(_) => (present, false, false),
                }
            }
            None => (None, false, false),
        };

        DeviceCandidate {
            device_type: properties.device_type,
            extensions_supported,
            graphics_family,
            present_family,
            has_surface_formats,
            has_present_modes,
        }
    }

    fn create_logical_device(
        instance: &VulkanInstance,
        physical_device: vk::PhysicalDevice,
        families: QueueFamilies,
        extensions: &[&CStr],
    ) -> Result<ash::Device> {
        let queue_priorities = [1.0];
        let queue_create_infos: Vec<vk::DeviceQueueCreateInfo> = families
            .unique()
            .into_iter()
            .map(|family| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(family)
                    .queue_priorities(&queue_priorities)
            })
            .collect();

        let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|name| name.as_ptr()).collect();
        let layer_ptrs: Vec<*const c_char> = instance.enabled_layers().iter().map(|name| name.as_ptr()).collect();
        let device_features = vk::PhysicalDeviceFeatures::default();

        // Device layers are deprecated but still honoured by older loaders
        #[allow(deprecated)]
        let device_create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs)
            .enabled_features(&device_features);

        unsafe { instance.instance.create_device(physical_device, &device_create_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create logical device: {:?}", e);
                Error::InitializationFailed(format!("Failed to create device: {:?}", e))
            })
    }

    /// Allocate memory for `requirements` from the first compatible memory type
    ///
    /// # Errors
    ///
    /// `InitializationFailed` when no type satisfies both the requirement bits and
    /// `flags`. An incompatible type is never substituted.
    pub fn allocate_memory(
        &self,
        requirements: vk::MemoryRequirements,
        flags: vk::MemoryPropertyFlags,
    ) -> Result<vk::DeviceMemory> {
        let memory_type_index = find_memory_type_index(&self.memory_properties, requirements.memory_type_bits, flags)
            .ok_or_else(|| {
                engine_error!("gpumix::vulkan", "No memory type matches bits {:#b} with {:?}",
                    requirements.memory_type_bits, flags);
                Error::InitializationFailed(format!("No compatible memory type for {:?}", flags))
            })?;

        let allocate_info = vk::MemoryAllocateInfo::default()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type_index);

        unsafe { self.device.allocate_memory(&allocate_info, None) }
            .map_err(|e| match e {
                vk::Result::ERROR_OUT_OF_DEVICE_MEMORY | vk::Result::ERROR_OUT_OF_HOST_MEMORY => {
                    engine_error!("gpumix::vulkan", "Out of memory allocating {} bytes: {:?}", requirements.size, e);
                    Error::OutOfMemory
                }
                _ => {
                    engine_error!("gpumix::vulkan", "Failed to allocate memory: {:?}", e);
                    Error::InitializationFailed(format!("Failed to allocate memory: {:?}", e))
                }
            })
    }

    /// Block until the device is idle
    pub fn wait_idle(&self) -> Result<()> {
        unsafe { self.device.device_wait_idle() }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to wait for device idle: {:?}", e);
                Error::BackendError(format!("Failed to wait for device idle: {:?}", e))
            })
    }

    pub fn instance(&self) -> &Arc<VulkanInstance> {
        &self.instance
    }

    pub fn device_name(&self) -> String {
        device_name(&self.properties)
    }
}

impl Drop for DeviceContext {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = self.device.device_wait_idle() {
                engine_warn!("gpumix::vulkan", "device_wait_idle failed during teardown: {:?}", e);
            }
            self.device.destroy_device(None);
        }
    }
}
