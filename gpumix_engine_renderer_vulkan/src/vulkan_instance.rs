/// VulkanInstance - Loader entry, instance and validation messenger
///
/// Validation is best effort: a missing Khronos layer is logged and dropped,
/// while a missing instance extension is fatal.

use ash::vk;
use gpumix_engine::gpumix::{Error, Result};
use gpumix_engine::gpumix::render::Config;
use gpumix_engine::{engine_error, engine_info, engine_warn};
use std::ffi::{c_char, CStr};

use crate::debug;
use crate::vulkan_query::{instance_extension_names, instance_layer_names};
use crate::vulkan_select::missing_extensions;

const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Owns the Vulkan entry, instance and (optional) debug messenger
pub struct VulkanInstance {
    pub(crate) entry: ash::Entry,
    pub(crate) instance: ash::Instance,
    debug_utils: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
    enabled_layers: Vec<&'static CStr>,
}

impl VulkanInstance {
    /// Create the instance
    ///
    /// # Arguments
    ///
    /// * `config` - Application name/version and validation settings
    /// * `required_extensions` - Instance extensions the caller needs (presentation
    ///   extensions for a window, nothing for offscreen work)
    pub fn new(config: &Config, required_extensions: &[&CStr]) -> Result<Self> {
        let entry = unsafe { ash::Entry::load() }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to load Vulkan library: {:?}", e);
                Error::InitializationFailed(format!("Failed to load Vulkan library: {:?}", e))
            })?;

        let validation = Self::resolve_validation(&entry, config)?;

        // Extensions
        let mut extensions: Vec<&CStr> = required_extensions.to_vec();
        if validation {
            extensions.push(ash::ext::debug_utils::NAME);
        }
        let available = instance_extension_names(&entry)?;
        let available: Vec<&CStr> = available.iter().map(|name| name.as_c_str()).collect();
        let missing = missing_extensions(&available, &extensions);
        if !missing.is_empty() {
            engine_error!("gpumix::vulkan", "Missing instance extensions: {:?}", missing);
            return Err(Error::Unsupported(format!("Missing instance extensions: {:?}", missing)));
        }

        let enabled_layers: Vec<&'static CStr> = if validation { vec![VALIDATION_LAYER] } else { Vec::new() };
        let layer_ptrs: Vec<*const c_char> = enabled_layers.iter().map(|name| name.as_ptr()).collect();
        let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|name| name.as_ptr()).collect();

        let app_name = std::ffi::CString::new(config.app_name.as_str())
            .map_err(|_| Error::InitializationFailed("Application name contains a NUL byte".to_string()))?;
        let (major, minor, patch) = config.app_version;
        let app_info = vk::ApplicationInfo::default()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, major, minor, patch))
            .engine_name(c"GpuMix")
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_1);

        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_layer_names(&layer_ptrs)
            .enabled_extension_names(&extension_ptrs);

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create Vulkan instance: {:?}", e);
                Error::InitializationFailed(format!("Failed to create instance: {:?}", e))
            })?;

        let debug_utils = if validation {
            match Self::create_debug_messenger(&entry, &instance, config) {
                Ok(pair) => Some(pair),
                Err(e) => {
                    unsafe { instance.destroy_instance(None) };
                    return Err(e);
                }
            }
        } else {
            None
        };

        engine_info!("gpumix::vulkan", "Vulkan instance created (validation: {})", validation);

        Ok(Self { entry, instance, debug_utils, enabled_layers })
    }

    /// Decide whether validation is active for this run
    fn resolve_validation(entry: &ash::Entry, config: &Config) -> Result<bool> {
        if !config.enable_validation {
            return Ok(false);
        }
        if !cfg!(feature = "vulkan-validation") {
            engine_warn!("gpumix::vulkan",
                "Validation requested but the crate was built without the vulkan-validation feature");
            return Ok(false);
        }
        let layers = instance_layer_names(entry)?;
        if layers.iter().any(|layer| layer.as_c_str() == VALIDATION_LAYER) {
            Ok(true)
        } else {
            engine_info!("gpumix::vulkan",
                "{:?} not available, continuing without validation", VALIDATION_LAYER);
            Ok(false)
        }
    }

    fn create_debug_messenger(
        entry: &ash::Entry,
        instance: &ash::Instance,
        config: &Config,
    ) -> Result<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
        let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);

        debug::init_debug_config(debug::Config {
            severity: config.debug_severity,
            output: config.debug_output.clone(),
            message_filter: config.debug_message_filter,
            break_on_error: config.break_on_validation_error,
            enable_stats: config.enable_validation_stats,
        });

        let debug_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(debug::severity_flags(config.debug_severity))
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
            )
            .pfn_user_callback(Some(debug::vulkan_debug_callback));

        let messenger = unsafe { debug_utils.create_debug_utils_messenger(&debug_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create debug messenger: {:?}", e);
                Error::InitializationFailed(format!("Failed to create debug messenger: {:?}", e))
            })?;

        Ok((debug_utils, messenger))
    }

    /// Layers enabled on the instance, repeated on the logical device
    pub fn enabled_layers(&self) -> &[&'static CStr] {
        &self.enabled_layers
    }

    pub fn validation_enabled(&self) -> bool {
        self.debug_utils.is_some()
    }

    pub fn handle(&self) -> &ash::Instance {
        &self.instance
    }

    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            if let Some((loader, messenger)) = self.debug_utils.take() {
                loader.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}
