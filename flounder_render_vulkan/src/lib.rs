/*!
# Flounder Render - Vulkan Backend

Vulkan implementation of the flounder `GraphicsDevice` trait, using the Ash
library for Vulkan bindings.

The backend does not own the Vulkan instance or logical device: the
application creates them and hands the device over.

## Example

```no_run
use std::sync::{Arc, Mutex};
use flounder_render::flounder::GraphicsDevice;
use flounder_render_vulkan::VulkanGraphicsDevice;

fn wrap(device: ash::Device) -> Arc<Mutex<dyn GraphicsDevice>> {
    Arc::new(Mutex::new(VulkanGraphicsDevice::new(device)))
}
```
*/

mod vulkan;
mod vulkan_format;

pub use vulkan::VulkanGraphicsDevice;
