use crate::{
    entities::rendition::{AspectRatio, CropStrategy, Gravity, RenditionShape, RenditionSpec},
    errors::AppError,
};

pub const THUMBNAIL: &str = "thumbnail";
pub const SCRUB_PREVIEW: &str = "scrub-preview";

/// Seconds of video looped by the scrub preview.
const PREVIEW_SECONDS: u32 = 15;

/// Fixed table of named renditions, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct RenditionCatalog {
    specs: Vec<RenditionSpec>,
}

impl RenditionCatalog {
    /// Builds a catalog from an explicit table. Later duplicates of a name are dropped.
    pub fn new(specs: Vec<RenditionSpec>) -> Self {
        let mut unique: Vec<RenditionSpec> = Vec::with_capacity(specs.len());
        for spec in specs {
            if unique.iter().any(|s| s.name == spec.name) {
                tracing::warn!(name = %spec.name, "Duplicate rendition name ignored");
                continue;
            }
            unique.push(spec);
        }
        RenditionCatalog { specs: unique }
    }

    /// Social crops plus the card thumbnail and hover preview.
    pub fn standard() -> Self {
        Self::new(vec![
            RenditionSpec::crop("Instagram Square (1:1)", 1080, 1080, AspectRatio::new(1, 1)),
            RenditionSpec::crop("Instagram Portrait (4:5)", 1080, 1350, AspectRatio::new(4, 5)),
            RenditionSpec::crop("Twitter Post (16:9)", 1200, 675, AspectRatio::new(16, 9)),
            RenditionSpec::crop("Twitter Header (3:1)", 1500, 500, AspectRatio::new(3, 1)),
            RenditionSpec::new(THUMBNAIL, RenditionShape::ThumbnailStill {
                width: 400,
                height: 225,
                crop: CropStrategy::Fill,
                gravity: Gravity::Auto,
                offset_seconds: 0,
            }),
            RenditionSpec::new(SCRUB_PREVIEW, RenditionShape::PreviewWindow {
                width: 400,
                height: 225,
                crop: CropStrategy::Fill,
                gravity: Gravity::Auto,
                seconds: PREVIEW_SECONDS,
            }),
        ])
    }

    pub fn lookup(&self, name: &str) -> Result<&RenditionSpec, AppError> {
        self.specs
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| AppError::UnknownRendition(name.to_string()))
    }

    pub fn specs(&self) -> &[RenditionSpec] {
        &self.specs
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for RenditionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
