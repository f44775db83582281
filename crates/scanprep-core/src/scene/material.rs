//! Materials and images owned by a scene.

use serde::{Deserialize, Serialize};

/// Handle to a material in a [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub(crate) u32);

/// Handle to an image in a [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub(crate) u32);

impl MaterialId {
    /// Rebuild a handle from [`MaterialId::index`]; lookups stay bounds-checked
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl ImageId {
    /// Rebuild a handle from [`ImageId::index`]; lookups stay bounds-checked
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Node-based surface material, reduced to the links the bake workflow uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Image wired into the shader's base color input
    pub base_color: Option<ImageId>,
    /// Image texture node that receives bake output
    pub active_image: Option<ImageId>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: None,
            active_image: None,
        }
    }
}

/// RGBA8 image buffer.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub alpha: bool,
    pub pixels: Vec<[u8; 4]>,
}

impl Image {
    /// Blank image; opaque black unless `alpha` is set.
    pub fn new(name: impl Into<String>, width: u32, height: u32, alpha: bool) -> Self {
        let fill = if alpha { [0, 0, 0, 0] } else { [0, 0, 0, 255] };
        Self {
            name: name.into(),
            width,
            height,
            alpha,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Row-major offset of `(x, y)`, or `None` outside the image
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.offset(x, y)
            .and_then(|offset| self.pixels.get(offset))
            .copied()
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> bool {
        let Some(offset) = self.offset(x, y) else {
            return false;
        };
        match self.pixels.get_mut(offset) {
            Some(pixel) => {
                *pixel = rgba;
                true
            }
            None => false,
        }
    }
}

// Pixel data is too large to print
impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}
