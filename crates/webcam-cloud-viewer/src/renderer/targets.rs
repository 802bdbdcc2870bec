//! Depth target for the point pass; colour goes straight to the swapchain.

pub struct Targets {
    // Keep the texture alive for the lifetime of the view.
    _depth_tex: wgpu::Texture,

    pub depth: wgpu::TextureView,
    pub depth_fmt: wgpu::TextureFormat,
}

impl Targets {
    pub fn new(device: &wgpu::Device, size: winit::dpi::PhysicalSize<u32>) -> Self {
        let depth_fmt = wgpu::TextureFormat::Depth32Float;

        let depth_tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Point Cloud Depth Target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: depth_fmt,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Self {
            depth: depth_tex.create_view(&wgpu::TextureViewDescriptor::default()),
            _depth_tex: depth_tex,
            depth_fmt,
        }
    }

    /// Recreate the depth target at the new window size.
    pub fn resize(&mut self, device: &wgpu::Device, size: winit::dpi::PhysicalSize<u32>) {
        *self = Self::new(device, size);
    }
}
