//! Reading and writing frame sequences as image files.
//!
//! A sequence is either a single image file or a directory of images, taken
//! in file-name order. Images load as RGB (or RGBA when the file has alpha),
//! masks load as luma. Everything is normalized to `[0.0, 1.0]`.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use vace_common::{VaceError, VaceResult};
use vace_frame_model::{FrameBuffer, FrameShape};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "tga", "webp"];

/// Image files making up a sequence, sorted by file name.
pub fn list_frames(path: &Path) -> VaceResult<Vec<PathBuf>> {
    if !path.exists() {
        return Err(VaceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_image_extension(p))
        .collect();
    files.sort();
    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn open(path: &Path) -> VaceResult<DynamicImage> {
    image::open(path).map_err(|e| VaceError::image(path, e.to_string()))
}

/// Load an image sequence.
pub fn load_images(path: &Path) -> VaceResult<FrameBuffer> {
    load_sequence(path, |img| {
        if img.color().has_alpha() {
            (4, img.to_rgba32f().into_raw())
        } else {
            (3, img.to_rgb32f().into_raw())
        }
    })
}

/// Load a mask sequence.
pub fn load_masks(path: &Path) -> VaceResult<FrameBuffer> {
    load_sequence(path, |img| (1, img.to_luma32f().into_raw()))
}

fn load_sequence(
    path: &Path,
    decode: impl Fn(&DynamicImage) -> (usize, Vec<f32>),
) -> VaceResult<FrameBuffer> {
    let files = list_frames(path)?;
    let mut shape: Option<FrameShape> = None;
    let mut data = Vec::new();

    for file in &files {
        let img = open(file)?;
        let (channels, pixels) = decode(&img);
        let frame_shape = FrameShape::new(img.height() as usize, img.width() as usize, channels);
        match shape {
            None => shape = Some(frame_shape),
            Some(expected) if expected != frame_shape => {
                return Err(VaceError::image(
                    file,
                    format!("frame is {frame_shape}, expected {expected} like the first frame"),
                ));
            }
            Some(_) => {}
        }
        data.extend(pixels);
    }

    let shape = shape.ok_or_else(|| {
        VaceError::image(path, "no image files found in sequence".to_string())
    })?;
    tracing::debug!(path = %path.display(), frames = files.len(), %shape, "Loaded sequence");
    FrameBuffer::from_vec(files.len(), shape, data).map_err(|e| VaceError::image(path, e.to_string()))
}

fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Write every frame of `buffer` as `00000.png`, `00001.png`, ... under `dir`.
///
/// Returns the number of files written.
pub fn write_sequence(dir: &Path, buffer: &FrameBuffer) -> VaceResult<usize> {
    std::fs::create_dir_all(dir)?;
    let shape = buffer.shape();
    let (width, height) = (shape.width as u32, shape.height as u32);

    for (index, frame) in buffer.frames().enumerate() {
        let path = dir.join(format!("{index:05}.png"));
        let bytes: Vec<u8> = frame.iter().map(|&v| quantize(v)).collect();
        let encoded = match shape.channels {
            1 => GrayImage::from_raw(width, height, bytes).map(DynamicImage::ImageLuma8),
            3 => RgbImage::from_raw(width, height, bytes).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(width, height, bytes).map(DynamicImage::ImageRgba8),
            n => {
                return Err(VaceError::image(
                    &path,
                    format!("cannot encode {n}-channel frames"),
                ))
            }
        }
        .ok_or_else(|| VaceError::image(&path, "frame data does not fill the image".to_string()))?;

        encoded
            .save(&path)
            .map_err(|e| VaceError::image(&path, e.to_string()))?;
    }

    tracing::info!(dir = %dir.display(), frames = buffer.len(), "Wrote sequence");
    Ok(buffer.len())
}
