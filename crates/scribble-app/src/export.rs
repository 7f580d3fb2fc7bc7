//! PNG export: GPU readback, encoding and saving.

#[cfg(not(target_arch = "wasm32"))]
use scribble_render::PngRenderResult;
use scribble_render::{RendererError, render_scene_to_view};
#[cfg(target_arch = "wasm32")]
use std::sync::Arc;
use thiserror::Error;
use vello::Scene;

/// Errors raised while exporting the drawing.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export image has zero size")]
    EmptyImage,
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("could not write file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("GPU readback failed: {0}")]
    Readback(String),
    #[error("browser download failed: {0}")]
    Browser(String),
}

/// Bytes per row of a readback buffer; wgpu requires rows aligned to 256.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    (width * 4).next_multiple_of(256)
}

/// Drop the alignment padding at the end of every row.
pub fn strip_row_padding(data: &[u8], width: u32, height: u32, bytes_per_row: u32) -> Vec<u8> {
    let row_len = (width * 4) as usize;
    let mut rgba_data = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let row_start = row * bytes_per_row as usize;
        rgba_data.extend_from_slice(&data[row_start..row_start + row_len]);
    }
    rgba_data
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage);
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
        writer.finish()?;
    }
    Ok(png_data)
}

fn create_export_texture(
    device: &vello::wgpu::Device,
    width: u32,
    height: u32,
) -> vello::wgpu::Texture {
    device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some("png export texture"),
        size: vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    })
}

/// Render `scene` into a fresh texture and queue a copy into a mappable
/// buffer. Returns the buffer and its row pitch.
fn render_and_copy(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    width: u32,
    height: u32,
) -> Result<(vello::wgpu::Buffer, u32), ExportError> {
    let texture = create_export_texture(device, width, height);
    let texture_view = texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    // Transparent base: only the drawables end up in the file.
    let params = vello::RenderParams {
        base_color: peniko::Color::TRANSPARENT,
        width,
        height,
        antialiasing_method: vello::AaConfig::Area,
    };
    render_scene_to_view(vello_renderer, device, queue, scene, &texture_view, &params)?;

    let bytes_per_row = padded_bytes_per_row(width);
    let readback_buffer = device.create_buffer(&vello::wgpu::BufferDescriptor {
        label: Some("png readback buffer"),
        size: (bytes_per_row * height) as u64,
        usage: vello::wgpu::BufferUsages::COPY_DST | vello::wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
        label: Some("png copy encoder"),
    });
    encoder.copy_texture_to_buffer(
        vello::wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: vello::wgpu::Origin3d::ZERO,
            aspect: vello::wgpu::TextureAspect::All,
        },
        vello::wgpu::TexelCopyBufferInfo {
            buffer: &readback_buffer,
            layout: vello::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    Ok((readback_buffer, bytes_per_row))
}

/// Render the export scene and read the pixels back (blocking, native only).
#[cfg(not(target_arch = "wasm32"))]
pub fn render_scene_to_png(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    width: u32,
    height: u32,
) -> Result<PngRenderResult, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage);
    }

    let (readback_buffer, bytes_per_row) =
        render_and_copy(device, queue, vello_renderer, scene, width, height)?;

    let buffer_slice = readback_buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    buffer_slice.map_async(vello::wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });

    // Wait for GPU to finish (blocking - native only)
    let _ = device.poll(vello::wgpu::PollType::wait_indefinitely());

    match rx.recv() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(ExportError::Readback(format!("{e:?}"))),
        Err(_) => return Err(ExportError::Readback("map callback dropped".into())),
    }

    let data = buffer_slice.get_mapped_range();
    let rgba_data = strip_row_padding(&data, width, height, bytes_per_row);
    drop(data);
    readback_buffer.unmap();

    Ok(PngRenderResult {
        rgba_data,
        width,
        height,
    })
}

/// Render, encode and save in one go (native).
#[cfg(not(target_arch = "wasm32"))]
pub fn export_scene(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    width: u32,
    height: u32,
    name: &str,
) -> Result<(), ExportError> {
    let result = render_scene_to_png(device, queue, vello_renderer, scene, width, height)?;
    let png_data = encode_png(&result.rgba_data, result.width, result.height)?;
    match file_ops::export_png(&png_data, name)? {
        Some(path) => log::info!("Exported PNG to: {path:?}"),
        None => log::info!("PNG export cancelled"),
    }
    Ok(())
}

/// Async PNG export for WASM - renders the scene and triggers a download
/// once the readback buffer is mapped.
#[cfg(target_arch = "wasm32")]
pub fn spawn_png_export_async(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    width: u32,
    height: u32,
    name: String,
) -> Result<(), ExportError> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use wasm_bindgen::prelude::*;

    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage);
    }

    log::info!("Starting async PNG export: {}x{}", width, height);

    let (readback_buffer, bytes_per_row) =
        render_and_copy(device, queue, vello_renderer, scene, width, height)?;

    let mapped = Arc::new(AtomicBool::new(false));
    let mapped_clone = mapped.clone();
    readback_buffer
        .slice(..)
        .map_async(vello::wgpu::MapMode::Read, move |result| match result {
            Ok(()) => mapped_clone.store(true, Ordering::SeqCst),
            Err(e) => log::error!("Buffer mapping failed: {:?}", e),
        });

    wasm_bindgen_futures::spawn_local(async move {
        const MAX_FRAMES: u32 = 600; // ~10 seconds at 60fps

        let mut frames = 0u32;
        while !mapped.load(Ordering::SeqCst) {
            frames += 1;
            if frames >= MAX_FRAMES {
                log::error!("Timeout waiting for buffer mapping after {} frames", frames);
                return;
            }

            // WebGPU callbacks only run once control returns to the browser's
            // task queue, so wait a frame rather than a microtask.
            let promise = js_sys::Promise::new(&mut |resolve, _reject| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let closure = wasm_bindgen::closure::Closure::once_into_js(move || {
                    let _ = resolve.call0(&JsValue::NULL);
                });
                let _ = window.request_animation_frame(closure.unchecked_ref());
            });
            let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
        }

        let buffer_slice = readback_buffer.slice(..);
        let data = buffer_slice.get_mapped_range();
        let rgba_data = strip_row_padding(&data, width, height, bytes_per_row);
        drop(data);
        readback_buffer.unmap();

        let result = encode_png(&rgba_data, width, height)
            .and_then(|png_data| file_ops::export_png(&png_data, &name).map(|_| png_data.len()));
        match result {
            Ok(len) => log::info!("PNG export complete: {} bytes", len),
            Err(e) => log::error!("PNG export failed: {e}"),
        }
    });

    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
mod file_ops {
    use super::ExportError;
    use std::path::PathBuf;

    /// Ask where to save, then write. `None` if the dialog was cancelled.
    pub fn export_png(png_data: &[u8], name: &str) -> Result<Option<PathBuf>, ExportError> {
        let dialog = rfd::FileDialog::new()
            .set_title("Export PNG")
            .set_file_name(format!("{name}.png"))
            .add_filter("PNG Image", &["png"]);

        let Some(path) = dialog.save_file() else {
            return Ok(None);
        };
        std::fs::write(&path, png_data)?;
        Ok(Some(path))
    }
}

#[cfg(target_arch = "wasm32")]
mod file_ops {
    use super::ExportError;
    use wasm_bindgen::JsCast;

    /// Export PNG (triggers browser download).
    pub fn export_png(png_data: &[u8], name: &str) -> Result<(), ExportError> {
        download_binary_file(&format!("{name}.png"), png_data, "image/png")
    }

    fn js_err(e: wasm_bindgen::JsValue) -> ExportError {
        ExportError::Browser(format!("{e:?}"))
    }

    fn download_binary_file(filename: &str, data: &[u8], mime_type: &str) -> Result<(), ExportError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ExportError::Browser("no document".into()))?;

        let uint8_array = js_sys::Uint8Array::from(data);
        let blob_parts = js_sys::Array::new();
        blob_parts.push(&uint8_array);

        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime_type);

        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&blob_parts, &options)
            .map_err(js_err)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

        let a = document
            .create_element("a")
            .map_err(js_err)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| ExportError::Browser("not an anchor element".into()))?;
        a.set_href(&url);
        a.set_download(filename);
        a.click();

        web_sys::Url::revoke_object_url(&url).ok();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_padding() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1024), 4096);
    }

    #[test]
    fn test_strip_row_padding() {
        // 2x2 image, rows padded to 12 bytes
        let data = [
            1, 1, 1, 1, 2, 2, 2, 2, 0, 0, 0, 0, //
            3, 3, 3, 3, 4, 4, 4, 4, 0, 0, 0, 0,
        ];
        let rgba = strip_row_padding(&data, 2, 2, 12);
        assert_eq!(rgba, [1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4]);
    }

    #[test]
    fn test_encode_png_header() {
        let rgba = vec![0u8; 4 * 4 * 4];
        let png_data = encode_png(&rgba, 4, 4).unwrap();

        let decoder = png::Decoder::new(png_data.as_slice());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (4, 4));
        assert_eq!(info.color_type, png::ColorType::Rgba);
    }

    #[test]
    fn test_render_failure_converts() {
        let err: ExportError = RendererError::RenderFailed("lost device".into()).into();
        assert!(matches!(err, ExportError::Render(_)));
        assert_eq!(err.to_string(), "Render failed: lost device");
    }

    #[test]
    fn test_encode_empty_image_fails() {
        assert!(matches!(encode_png(&[], 0, 10), Err(ExportError::EmptyImage)));
    }
}
