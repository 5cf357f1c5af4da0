use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::entities::asset::Asset;

/// Read-path state as seen by a caller.
///
/// `Loading` is what a caller holds before its fetch completes; a finished
/// fetch is always `Empty` or `Ready`, and a failed one is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AssetListing {
    #[default]
    Loading,
    Empty,
    Ready(Vec<Asset>),
}

impl AssetListing {
    pub fn from_assets(assets: Vec<Asset>) -> Self {
        if assets.is_empty() {
            AssetListing::Empty
        } else {
            AssetListing::Ready(assets)
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            AssetListing::Loading => "loading",
            AssetListing::Empty => "empty",
            AssetListing::Ready(_) => "ready",
        }
    }

    pub fn assets(&self) -> &[Asset] {
        match self {
            AssetListing::Ready(assets) => assets,
            AssetListing::Loading | AssetListing::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AssetListing::Empty)
    }
}

impl Serialize for AssetListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AssetListing", 2)?;
        state.serialize_field("status", self.status())?;
        state.serialize_field("assets", self.assets())?;
        state.end()
    }
}
