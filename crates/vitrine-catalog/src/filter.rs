//! Catalog list filters and search.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::record::{present, ProductRecord};

/// Completeness filter over the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    NoVideoMl,
    NoVideoShopee,
    NoEan,
    NoNcm,
    NoPhotos,
    NoThumbnail,
}

impl Filter {
    pub const ALL: [Filter; 7] = [
        Filter::All,
        Filter::NoVideoMl,
        Filter::NoVideoShopee,
        Filter::NoEan,
        Filter::NoNcm,
        Filter::NoPhotos,
        Filter::NoThumbnail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::NoVideoMl => "no_video_ml",
            Self::NoVideoShopee => "no_video_shopee",
            Self::NoEan => "no_ean",
            Self::NoNcm => "no_ncm",
            Self::NoPhotos => "no_photos",
            Self::NoThumbnail => "no_thumbnail",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "Todos",
            Self::NoVideoMl => "Sem Vídeo ML",
            Self::NoVideoShopee => "Sem Vídeo Shopee",
            Self::NoEan => "Sem EAN",
            Self::NoNcm => "Sem NCM",
            Self::NoPhotos => "Sem Fotos",
            Self::NoThumbnail => "Sem Thumbnail",
        }
    }

    pub fn matches(&self, record: &ProductRecord) -> bool {
        let f = &record.fields;
        let missing = |value: &Option<String>| present(value.as_deref()).is_none();
        match self {
            Self::All => true,
            Self::NoVideoMl => missing(&f.video_ml),
            Self::NoVideoShopee => missing(&f.video_shopee),
            Self::NoEan => missing(&f.ean),
            Self::NoNcm => missing(&f.ncm),
            Self::NoPhotos => missing(&f.photos_url),
            Self::NoThumbnail => missing(&f.thumbnail),
        }
    }

    pub fn apply(&self, records: Vec<ProductRecord>) -> Vec<ProductRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "" | "all" => Ok(Self::All),
            "no_video_ml" => Ok(Self::NoVideoMl),
            "no_video_shopee" => Ok(Self::NoVideoShopee),
            "no_ean" => Ok(Self::NoEan),
            "no_ncm" => Ok(Self::NoNcm),
            "no_photos" | "no_fotos" => Ok(Self::NoPhotos),
            "no_thumbnail" => Ok(Self::NoThumbnail),
            other => Err(CatalogError::Invalid {
                message: format!("unknown filter: {other}"),
            }),
        }
    }
}

/// Keep records whose name or SKU contains `query` (case-insensitive) or
/// whose EAN or NCM contains it verbatim. A blank query keeps everything.
pub fn search(records: Vec<ProductRecord>, query: &str) -> Vec<ProductRecord> {
    if query.trim().is_empty() {
        return records;
    }
    let needle = query.to_lowercase();

    records
        .into_iter()
        .filter(|r| {
            let f = &r.fields;
            let folded = |v: &Option<String>| {
                v.as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            };
            let exact = |v: &Option<String>| v.as_deref().is_some_and(|v| v.contains(&needle));

            f.name.to_lowercase().contains(&needle)
                || folded(&f.sku)
                || exact(&f.ean)
                || exact(&f.ncm)
        })
        .collect()
}
