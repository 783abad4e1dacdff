/// Framebuffer - Binds the render target view to the render pass

use gpumix_engine::gpumix::{Result, Error};
use gpumix_engine::engine_error;
use ash::vk;
use std::sync::Arc;

use crate::vulkan_context::DeviceContext;
use crate::vulkan_render_pass::RenderPass;

/// Owned VkFramebuffer with a single color attachment
pub struct Framebuffer {
    ctx: Arc<DeviceContext>,
    pub(crate) framebuffer: vk::Framebuffer,
}

impl Framebuffer {
    pub fn new(
        ctx: Arc<DeviceContext>,
        render_pass: &RenderPass,
        view: vk::ImageView,
        extent: vk::Extent2D,
    ) -> Result<Self> {
        let attachments = [view];
        let create_info = vk::FramebufferCreateInfo::default()
            .render_pass(render_pass.handle())
            .attachments(&attachments)
            .width(extent.width)
            .height(extent.height)
            .layers(1);

        let framebuffer = unsafe { ctx.device.create_framebuffer(&create_info, None) }
            .map_err(|e| {
                engine_error!("gpumix::vulkan", "Failed to create framebuffer: {:?}", e);
                Error::InitializationFailed(format!("Failed to create framebuffer: {:?}", e))
            })?;

        Ok(Self { ctx, framebuffer })
    }

    pub fn handle(&self) -> vk::Framebuffer {
        self.framebuffer
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_framebuffer(self.framebuffer, None);
        }
    }
}
