// Cat module
// The user's virtual cat and its cosmetic slots

use serde::{Deserialize, Serialize};

pub const DEFAULT_CAT_ASSET: &str = "/cats/defaultCat.png";

/// Skin images bundled with the client
pub const CAT_SKIN_ASSETS: [&str; 4] = [
    "/cats/tabbyCat.png",
    "/cats/cowCat.png",
    "/cats/orangeTabbyCat.png",
    DEFAULT_CAT_ASSET,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shirt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessory: Option<String>,
    pub skin: String,
    pub background: String,
    pub user_id: String,
}

impl Cat {
    /// Bundled image for this cat's skin. Unknown skins show the default cat.
    pub fn skin_asset(&self) -> &'static str {
        CAT_SKIN_ASSETS
            .iter()
            .copied()
            .find(|asset| *asset == self.skin)
            .unwrap_or(DEFAULT_CAT_ASSET)
    }

    /// Cosmetic items currently worn, in draw order
    pub fn worn_items(&self) -> Vec<&str> {
        [&self.hat, &self.shirt, &self.accessory]
            .into_iter()
            .filter_map(|item| item.as_deref())
            .filter(|item| !item.is_empty())
            .collect()
    }
}
