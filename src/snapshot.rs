use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::io::Cursor;
use std::sync::Arc;

use crate::error::{Result, WhiteboardError};
use crate::surface::RasterSurface;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A full encoded copy of one sheet's pixels, stored as a PNG data URL.
///
/// The background pattern is part of the pixels. Clones share the
/// underlying string, so snapshots can live in both the history and the
/// document without copying.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterSnapshot(Arc<str>);

impl RasterSnapshot {
    /// Encode the surface's current pixels
    pub fn capture(surface: &RasterSurface) -> Result<Self> {
        let mut png = Cursor::new(Vec::new());
        surface
            .pixels()
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| WhiteboardError::EncodeFailure(e.to_string()))?;

        let mut url = String::from(PNG_DATA_URL_PREFIX);
        STANDARD.encode_string(png.get_ref(), &mut url);
        Ok(Self(url.into()))
    }

    /// Wrap an already encoded data URL without validating it
    pub fn from_data_url(url: impl Into<Arc<str>>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode back into pixels. Any image format the `image` crate
    /// recognises is accepted as the payload.
    pub fn decode(&self) -> Result<RgbaImage> {
        let payload = self
            .0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, data)| data)
            .ok_or_else(|| WhiteboardError::DecodeFailure("not a base64 data URL".to_owned()))?;

        let bytes = STANDARD.decode(payload.trim())?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

impl std::fmt::Debug for RasterSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RasterSnapshot")
            .field(&format_args!("{} bytes", self.0.len()))
            .finish()
    }
}

impl Serialize for RasterSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RasterSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from_data_url)
    }
}
