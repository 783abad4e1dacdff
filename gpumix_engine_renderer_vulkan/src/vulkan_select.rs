/// Pure selection helpers
///
/// Everything here works on plain Vulkan structs already queried from the driver,
/// so it can be exercised without a GPU.

use ash::vk;
use gpumix_engine::engine_info;
use gpumix_engine::gpumix::render::Extent2D;
use std::ffi::CStr;

// ===== SWAP CHAIN PARAMETERS =====

/// Pick the surface format
///
/// A single UNDEFINED entry means the surface accepts anything, in which case
/// B8G8R8A8_UNORM / SRGB_NONLINEAR is used. Otherwise that pair is preferred when
/// listed, falling back to the first enumerated format. Returns None for an empty list.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    let preferred = vk::SurfaceFormatKHR {
        format: vk::Format::B8G8R8A8_UNORM,
        color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
    };

    if formats.len() == 1 && formats[0].format == vk::Format::UNDEFINED {
        return Some(preferred);
    }

    formats
        .iter()
        .find(|f| f.format == preferred.format && f.color_space == preferred.color_space)
        .or_else(|| formats.first())
        .copied()
}

/// MAILBOX when available, IMMEDIATE otherwise
///
/// FIFO is never returned even when it is the only listed mode.
pub fn choose_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    if modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::IMMEDIATE
    }
}

/// Swap chain extent
///
/// A current width of `u32::MAX` means the application decides: the default size is
/// clamped to the surface limits. Otherwise the current extent is used as is.
pub fn choose_swap_extent(capabilities: &vk::SurfaceCapabilitiesKHR, default: Extent2D) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        return capabilities.current_extent;
    }

    let min = capabilities.min_image_extent;
    let max = capabilities.max_image_extent;
    vk::Extent2D {
        width: default.width.clamp(min.width, max.width.max(min.width)),
        height: default.height.clamp(min.height, max.height.max(min.height)),
    }
}

/// Usage required for the blit target: COLOR_ATTACHMENT | TRANSFER_DST
pub fn choose_image_usage(capabilities: &vk::SurfaceCapabilitiesKHR) -> Option<vk::ImageUsageFlags> {
    let wanted = vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_DST;
    if capabilities.supported_usage_flags.contains(wanted) {
        Some(wanted)
    } else {
        engine_info!("gpumix::vulkan",
            "Swap chain images do not support COLOR_ATTACHMENT | TRANSFER_DST, supported usage: {:?}",
            capabilities.supported_usage_flags);
        None
    }
}

pub fn choose_pre_transform(capabilities: &vk::SurfaceCapabilitiesKHR) -> vk::SurfaceTransformFlagsKHR {
    if capabilities.supported_transforms.contains(vk::SurfaceTransformFlagsKHR::IDENTITY) {
        vk::SurfaceTransformFlagsKHR::IDENTITY
    } else {
        capabilities.current_transform
    }
}

/// `min + 1`, clamped to `max` when the surface declares one (`max > 0`)
pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 && count > capabilities.max_image_count {
        capabilities.max_image_count
    } else {
        count
    }
}

// ===== QUEUES AND EXTENSIONS =====

/// First family with at least one queue and all of `flags`
pub fn find_queue_family(families: &[vk::QueueFamilyProperties], flags: vk::QueueFlags) -> Option<u32> {
    families
        .iter()
        .position(|family| family.queue_count > 0 && family.queue_flags.contains(flags))
        .map(|index| index as u32)
}

/// Required names absent from `available`, in request order
pub fn missing_extensions<'a>(available: &[&CStr], required: &[&'a CStr]) -> Vec<&'a CStr> {
    required
        .iter()
        .filter(|name| !available.iter().any(|have| *have == **name))
        .copied()
        .collect()
}

// ===== MEMORY TYPES =====

/// First memory type allowed by `type_bits` whose properties include all of `flags`
pub fn find_memory_type_index(
    memory_properties: &vk::PhysicalDeviceMemoryProperties,
    type_bits: u32,
    flags: vk::MemoryPropertyFlags,
) -> Option<u32> {
    memory_properties.memory_types[..memory_properties.memory_type_count as usize]
        .iter()
        .enumerate()
        .find(|(index, memory_type)| {
            type_bits & (1 << index) != 0 && memory_type.property_flags.contains(flags)
        })
        .map(|(index, _)| index as u32)
}

/// Best achievable combination of `must` and `optional` property flags
///
/// Returns `must | optional` if one memory type intersects both sets, `must` if some
/// type intersects `must`, and empty flags if none does.
pub fn best_memory_property_flags(
    must: vk::MemoryPropertyFlags,
    optional: vk::MemoryPropertyFlags,
    memory_properties: &vk::PhysicalDeviceMemoryProperties,
) -> vk::MemoryPropertyFlags {
    let types = &memory_properties.memory_types[..memory_properties.memory_type_count as usize];

    if types.iter().any(|t| t.property_flags.intersects(must) && t.property_flags.intersects(optional)) {
        must | optional
    } else if types.iter().any(|t| t.property_flags.intersects(must)) {
        must
    } else {
        vk::MemoryPropertyFlags::empty()
    }
}

// ===== PHYSICAL DEVICE SELECTION =====

/// What a device must offer beyond a graphics queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueRequirement {
    /// Offscreen rendering
    GraphicsOnly,
    /// Onscreen rendering: a present-capable family plus non-empty surface formats and modes
    GraphicsAndPresent,
}

/// Queue families resolved during selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub present: Option<u32>,
}

impl QueueFamilies {
    /// Distinct family indices, graphics first
    pub fn unique(&self) -> Vec<u32> {
        match self.present {
            Some(present) if present != self.graphics => vec![self.graphics, present],
            _ => vec![self.graphics],
        }
    }
}

/// Facts queried from one physical device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCandidate {
    pub device_type: vk::PhysicalDeviceType,
    pub extensions_supported: bool,
    pub graphics_family: Option<u32>,
    pub present_family: Option<u32>,
    pub has_surface_formats: bool,
    pub has_present_modes: bool,
}

impl DeviceCandidate {
    /// Queue families when the candidate meets the requirement
    pub fn qualifies(&self, requirement: QueueRequirement) -> Option<QueueFamilies> {
        if !self.extensions_supported {
            return None;
        }
        let graphics = self.graphics_family?;
        match requirement {
            QueueRequirement::GraphicsOnly => Some(QueueFamilies { graphics, present: None }),
            QueueRequirement::GraphicsAndPresent => {
                let present = self.present_family?;
                if self.has_surface_formats && self.has_present_modes {
                    Some(QueueFamilies { graphics, present: Some(present) })
                } else {
                    None
                }
            }
        }
    }
}

/// Single pass over candidates in enumeration order
///
/// Stops at the first qualifying candidate of the preferred type; otherwise returns
/// the first qualifying candidate. Candidates are pulled lazily, so devices after an
/// early match are never queried.
pub fn select_physical_device<I>(
    candidates: I,
    requirement: QueueRequirement,
    preferred: vk::PhysicalDeviceType,
) -> Option<(usize, QueueFamilies)>
where
    I: IntoIterator<Item = DeviceCandidate>,
{
    let mut fallback = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        if let Some(families) = candidate.qualifies(requirement) {
            if candidate.device_type == preferred {
                return Some((index, families));
            }
            if fallback.is_none() {
                fallback = Some((index, families));
            }
        }
    }
    fallback
}

#[cfg(test)]
#[path = "vulkan_select_tests.rs"]
mod tests;
