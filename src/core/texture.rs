use std::path::Path;

use glow::{HasContext, PixelUnpackData};
use image::DynamicImage;
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::AssetLoadError;

/// Channel layout of the uploaded pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    #[default]
    Rgb,
    Rgba,
}

impl ChannelLayout {
    fn gl_format(self) -> u32 {
        match self {
            Self::Rgb => glow::RGB,
            Self::Rgba => glow::RGBA,
        }
    }
}

/// Tightly packed, bottom-up pixel rows ready for `glTexImage2D`
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub layout: ChannelLayout,
    pub pixels: Vec<u8>,
}

/// Decode an image file and flip it so the first row is the bottom one,
/// matching GL texture coordinates.
pub fn decode_image(path: impl AsRef<Path>, layout: ChannelLayout) -> Result<DecodedImage, AssetLoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|e| AssetLoadError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(pack(image.flipv(), layout))
}

fn pack(image: DynamicImage, layout: ChannelLayout) -> DecodedImage {
    let (width, height) = (image.width(), image.height());
    let pixels = match layout {
        ChannelLayout::Rgb => image.into_rgb8().into_raw(),
        ChannelLayout::Rgba => image.into_rgba8().into_raw(),
    };
    DecodedImage {
        width,
        height,
        layout,
        pixels,
    }
}

/// A 2D texture. One whose file failed to load has no GL object; binding it
/// unbinds the unit and sampling gives undefined (usually black) results.
#[derive(Debug)]
pub struct Texture {
    handle: Option<glow::Texture>,
}

impl Texture {
    /// Load and upload `path`. Failures are logged and leave the texture
    /// unloaded rather than aborting.
    pub fn load(gl: &glow::Context, path: impl AsRef<Path>, layout: ChannelLayout) -> Self {
        match Self::try_load(gl, path.as_ref(), layout) {
            Ok(texture) => texture,
            Err(e) => {
                error!("{}", e);
                Self { handle: None }
            }
        }
    }

    pub fn try_load(gl: &glow::Context, path: &Path, layout: ChannelLayout) -> Result<Self, AssetLoadError> {
        let image = decode_image(path, layout)?;
        let handle = unsafe { upload(gl, &image) }.map_err(|reason| AssetLoadError::Upload {
            path: path.to_path_buf(),
            reason,
        })?;
        info!(
            "Loaded texture {:?} ({}x{}, {:?})",
            path, image.width, image.height, layout
        );
        Ok(Self {
            handle: Some(handle),
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    pub fn bind(&self, gl: &glow::Context, unit: u32) {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, self.handle);
        }
    }

    pub fn destroy(self, gl: &glow::Context) {
        if let Some(handle) = self.handle {
            unsafe { gl.delete_texture(handle) };
        }
    }
}

unsafe fn upload(gl: &glow::Context, image: &DecodedImage) -> Result<glow::Texture, String> {
    let texture = gl.create_texture()?;
    gl.bind_texture(glow::TEXTURE_2D, Some(texture));

    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
    gl.tex_parameter_i32(
        glow::TEXTURE_2D,
        glow::TEXTURE_MIN_FILTER,
        glow::LINEAR_MIPMAP_NEAREST as i32,
    );
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);

    // RGB rows are not 4-byte aligned in general
    gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
    gl.tex_image_2d(
        glow::TEXTURE_2D,
        0,
        image.layout.gl_format() as i32,
        image.width as i32,
        image.height as i32,
        0,
        image.layout.gl_format(),
        glow::UNSIGNED_BYTE,
        PixelUnpackData::Slice(Some(&image.pixels)),
    );
    gl.generate_mipmap(glow::TEXTURE_2D);
    gl.bind_texture(glow::TEXTURE_2D, None);

    Ok(texture)
}
