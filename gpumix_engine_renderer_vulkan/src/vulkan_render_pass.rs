/// RenderPass - Single color attachment, clear on load, store on finish
///
/// The attachment is already in COLOR_ATTACHMENT_OPTIMAL when the pass begins
/// (an explicit barrier puts it there) and stays in that layout at the end.

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::engine_error;
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::DeviceContext;

/// Description of the only attachment of the pass
pub fn color_attachment_description(format: vk::Format) -> vk::AttachmentDescription {
    vk::AttachmentDescription::default()
        .format(format)
        .samples(vk::SampleCountFlags::TYPE_1)
        .load_op(vk::AttachmentLoadOp::CLEAR)
        .store_op(vk::AttachmentStoreOp::STORE)
        .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
        .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
        .initial_layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)
        .final_layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)
}

/// Owned VkRenderPass
pub struct RenderPass {
    ctx: Arc<DeviceContext>,
    pub(crate) render_pass: vk::RenderPass,
    format: vk::Format,
}

impl RenderPass {
    pub fn new(ctx: Arc<DeviceContext>, format: vk::Format) -> Result<Self> {
        let attachments = [color_attachment_description(format)];
        let color_refs = [vk::AttachmentReference::default()
            .attachment(0)
            .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)];
        let subpasses = [vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_refs)];

        let create_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(&subpasses);

        let render_pass = unsafe { ctx.device.create_render_pass(&create_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create render pass: {:?}", e);
                Error::InitializationFailed(format!("Failed to create render pass: {:?}", e))
            })?;

        Ok(Self { ctx, render_pass, format })
    }

    pub fn handle(&self) -> vk::RenderPass {
        self.render_pass
    }

    pub fn format(&self) -> vk::Format {
        self.format
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_render_pass(self.render_pass, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_render_pass_tests.rs"]
mod tests;
