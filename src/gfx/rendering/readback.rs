//! Copies an RGBA8 render target back into a CPU image

use futures::channel::oneshot;
use image::RgbaImage;

use crate::error::RenderError;

/// Rounds a row size up to the copy alignment wgpu requires
pub fn padded_bytes_per_row(tight: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    tight.div_ceil(align) * align
}

/// Drops the per-row padding from a mapped copy buffer
pub fn depad_rows(data: &[u8], tight_bpr: usize, padded_bpr: usize, height: usize) -> Vec<u8> {
    let mut tight = Vec::with_capacity(tight_bpr * height);
    for row in 0..height {
        let start = row * padded_bpr;
        tight.extend_from_slice(&data[start..start + tight_bpr]);
    }
    tight
}

/// Blocks until the texture contents are available and returns them as an image
pub fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
) -> Result<RgbaImage, RenderError> {
    let format = texture.format();
    if !matches!(
        format,
        wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb
    ) {
        return Err(RenderError::UnsupportedFormat(format));
    }

    let width = texture.width();
    let height = texture.height();
    let tight_bpr = width * 4;
    let padded_bpr = padded_bytes_per_row(tight_bpr);

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Staging"),
        size: padded_bpr as wgpu::BufferAddress * height as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bpr),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (sender, receiver) = oneshot::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device
        .poll(wgpu::PollType::Wait)
        .map_err(|e| RenderError::Readback(e.to_string()))?;

    pollster::block_on(receiver)
        .map_err(|_| RenderError::Readback("map callback dropped".into()))?
        .map_err(|e| RenderError::Readback(e.to_string()))?;

    let pixels = {
        let data = slice.get_mapped_range();
        depad_rows(&data, tight_bpr as usize, padded_bpr as usize, height as usize)
    };
    staging.unmap();

    RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| RenderError::Readback("pixel buffer size mismatch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_rows_are_aligned() {
        assert_eq!(padded_bytes_per_row(4), 256);
        assert_eq!(padded_bytes_per_row(256), 256);
        assert_eq!(padded_bytes_per_row(1280 * 4), 5120);
        assert_eq!(padded_bytes_per_row(257), 512);
    }

    #[test]
    fn test_depad_keeps_row_prefixes() {
        let mut padded = vec![0u8; 2 * 8];
        padded[..4].copy_from_slice(&[1, 2, 3, 4]);
        padded[8..12].copy_from_slice(&[5, 6, 7, 8]);
        assert_eq!(depad_rows(&padded, 4, 8, 2), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
