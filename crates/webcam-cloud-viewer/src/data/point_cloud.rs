use crate::data::types::{CloudGpu, PointUniformStd140};
use pixcloud::FramePacket;
use wgpu::util::DeviceExt;

/// Brings the GPU copy of the point buffers in line with `packet`.
///
/// A new generation means the CPU buffers were replaced wholesale, so the GPU
/// buffers are recreated at the new size. Otherwise the existing buffers are
/// overwritten in place when the geometry changed this frame.
pub fn sync_cloud(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    current: &mut Option<CloudGpu>,
    packet: &FramePacket<'_>,
) {
    match current {
        Some(cloud) if cloud.generation == packet.generation => {
            if packet.geometry_updated {
                queue.write_buffer(&cloud.positions, 0, bytemuck::cast_slice(packet.positions));
                queue.write_buffer(&cloud.colors, 0, bytemuck::cast_slice(packet.colors));
            }
        }
        _ => {
            log::debug!(
                "Uploading point cloud generation {} ({} points at {})",
                packet.generation,
                packet.point_count(),
                packet.resolution
            );
            // Dropping the previous `CloudGpu` releases its buffers.
            *current = Some(upload_cloud(device, packet));
        }
    }
}

fn upload_cloud(device: &wgpu::Device, packet: &FramePacket<'_>) -> CloudGpu {
    let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Point Positions"),
        contents: bytemuck::cast_slice(packet.positions),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });

    let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Point Colors"),
        contents: bytemuck::cast_slice(packet.colors),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });

    CloudGpu {
        generation: packet.generation,
        instances_len: packet.point_count() as u32,
        positions,
        colors,
    }
}

/// Builds the per-frame uniform block.
pub fn make_uniform(packet: &FramePacket<'_>, viewport_size: [f32; 2]) -> PointUniformStd140 {
    PointUniformStd140 {
        view_proj: packet.view_proj,
        model: packet.model,
        viewport_size,
        point_size_px: packet.point_size,
        _pad0: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use pixcloud::Resolution;

    #[test]
    fn uniform_bytes_follow_shader_layout() {
        let view_proj = Mat4::perspective_rh(0.9, 1.5, 1.0, 10_000.0)
            * Mat4::look_at_rh(Vec3::new(0.0, 0.0, 1000.0), Vec3::ZERO, Vec3::Y);
        let model = Mat4::from_rotation_y(0.4);
        let packet = FramePacket {
            positions: &[],
            colors: &[],
            generation: 3,
            resolution: Resolution::default(),
            geometry_updated: false,
            point_size: 4.0,
            model,
            view_proj,
        };

        let uniform = make_uniform(&packet, [1280.0, 720.0]);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniform));

        assert_eq!(floats.len(), 36);
        assert_eq!(&floats[..16], &view_proj.to_cols_array());
        assert_eq!(&floats[16..32], &model.to_cols_array());
        assert_eq!(&floats[32..], &[1280.0, 720.0, 4.0, 0.0]);
    }
}
