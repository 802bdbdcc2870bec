use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use winit::{dpi::PhysicalSize, window::Window};

/// Device, queue and the window surface the point cloud is presented to.
pub struct GfxContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
}

impl GfxContext {
    /// Fails when no adapter can present to the window; there is no software fallback.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        // `Arc<Window>` lets the surface be `'static`.
        let surface = instance
            .create_surface(window)
            .context("Failed to create a render surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No GPU adapter can present to this window"))?;

        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Point Cloud Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("Failed to open the GPU device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps.formats)?;
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::Opaque)
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::debug!("Surface format {:?}, alpha {:?}", format, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// Reconfigures the surface; zero-sized (minimised) windows are ignored.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn viewport_size(&self) -> [f32; 2] {
        [self.config.width as f32, self.config.height as f32]
    }
}

/// Camera colours are already display-encoded, so a non-sRGB target keeps
/// them from being encoded a second time.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Result<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
        .ok_or_else(|| anyhow!("Surface reports no supported formats"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn prefers_linear_surface_format() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(pick_surface_format(&formats).unwrap(), TextureFormat::Bgra8Unorm);
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            pick_surface_format(&formats).unwrap(),
            TextureFormat::Rgba8UnormSrgb
        );
        assert!(pick_surface_format(&[]).is_err());
    }
}
