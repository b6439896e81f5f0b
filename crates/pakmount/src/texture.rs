//! Texture extraction on top of asset resolution

use crate::decoder::{Decoder, Package};
use crate::error::{PakError, Result};
use crate::resolve::AssetResolver;

/// Decodes textures, refusing assets whose first export is not a texture
pub struct TextureExtractor<'a, D: Decoder> {
    resolver: AssetResolver<'a, D>,
    texture_export_type: &'a str,
}

impl<'a, D: Decoder> TextureExtractor<'a, D> {
    pub(crate) fn new(resolver: AssetResolver<'a, D>, texture_export_type: &'a str) -> Self {
        Self {
            resolver,
            texture_export_type,
        }
    }

    /// Resolve `name` and decode the first object's texture
    pub fn extract_texture(&self, name: &str) -> Result<Vec<u8>> {
        if name.is_empty() {
            return Err(PakError::MissingArgument("name"));
        }

        let resolved = self.resolver.resolve(name)?;
        let first = resolved
            .first()
            .ok_or_else(|| PakError::AssetNotFound(name.to_string()))?;

        if first.data.export_type() != Some(self.texture_export_type) {
            return Err(PakError::NotTextureable(name.to_string()));
        }

        first
            .package
            .decode_texture()
            .map_err(|source| PakError::DecodeFailure {
                name: name.to_string(),
                source,
            })
    }
}
