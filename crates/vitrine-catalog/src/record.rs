//! Product records as kept in the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vitrine_gs1::types::DEFAULT_ORIGIN;
use vitrine_gs1::RegistrationRequest;

use crate::error::{CatalogError, CatalogResult};

/// Editable product attributes.
///
/// Optional text fields are `None` when blank; see [`ProductPatch::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Mercosur tax code (8 digits, dotted or not).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ncm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cest: Option<String>,

    /// Product identifier (GTIN).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,

    /// Unit cost, kept as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,

    /// Shared folder or file link with product photos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_ml: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_shopee: Option<String>,

    /// GPC brick code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpc_code: Option<String>,

    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_weight: Option<String>,

    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_weight: Option<String>,

    /// Quantity with unit, e.g. "500 ml".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_content: Option<String>,

    /// ISO 3166 numeric country of origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl ProductFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sku: None,
            ncm: None,
            cest: None,
            ean: None,
            cost: None,
            photos_url: None,
            thumbnail: None,
            video_ml: None,
            video_shopee: None,
            gpc_code: None,
            gross_weight: None,
            net_weight: None,
            net_content: None,
            origin: Some(DEFAULT_ORIGIN.to_string()),
        }
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Invalid {
                message: "product name is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Partial update. `Some("")` clears a field; `None` leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub ncm: Option<String>,
    pub cest: Option<String>,
    pub ean: Option<String>,
    pub cost: Option<String>,
    pub photos_url: Option<String>,
    pub thumbnail: Option<String>,
    pub video_ml: Option<String>,
    pub video_shopee: Option<String>,
    pub gpc_code: Option<String>,
    pub gross_weight: Option<String>,
    pub net_weight: Option<String>,
    pub net_content: Option<String>,
    pub origin: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply onto `fields`. A blank name is rejected and nothing is changed.
    pub fn apply(&self, fields: &mut ProductFields) -> CatalogResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    message: "product name cannot be blank".to_string(),
                });
            }
            fields.name = name.trim().to_string();
        }

        let pairs = [
            (&self.sku, &mut fields.sku),
            (&self.ncm, &mut fields.ncm),
            (&self.cest, &mut fields.cest),
            (&self.ean, &mut fields.ean),
            (&self.cost, &mut fields.cost),
            (&self.photos_url, &mut fields.photos_url),
            (&self.thumbnail, &mut fields.thumbnail),
            (&self.video_ml, &mut fields.video_ml),
            (&self.video_shopee, &mut fields.video_shopee),
            (&self.gpc_code, &mut fields.gpc_code),
            (&self.gross_weight, &mut fields.gross_weight),
            (&self.net_weight, &mut fields.net_weight),
            (&self.net_content, &mut fields.net_content),
            (&self.origin, &mut fields.origin),
        ];
        for (patch, slot) in pairs {
            if let Some(value) = patch {
                *slot = present(Some(value.as_str())).map(str::to_string);
            }
        }
        Ok(())
    }
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: Uuid,

    #[serde(flatten)]
    pub fields: ProductFields,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    pub(crate) fn new(fields: ProductFields, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Registration input for this product.
    ///
    /// Brand falls back to SKU then name; the thumbnail doubles as the
    /// product image. An empty EAN asks the registry to assign one.
    pub fn to_registration_request(&self) -> RegistrationRequest {
        let f = &self.fields;
        let mut request = RegistrationRequest::new(f.name.trim());

        if let Some(ean) = present(f.ean.as_deref()) {
            request = request.with_gtin(ean);
        }
        if let Some(sku) = present(f.sku.as_deref()) {
            request = request.with_sku(sku);
        }
        if let Some(ncm) = present(f.ncm.as_deref()) {
            request = request.with_ncm(ncm);
        }
        if let Some(cest) = present(f.cest.as_deref()) {
            request = request.with_cest(cest);
        }
        if let Some(url) = present(f.thumbnail.as_deref()) {
            request = request.with_image_url(url);
        }
        if let Some(gpc) = present(f.gpc_code.as_deref()) {
            request = request.with_gpc_code(gpc);
        }
        if let Some(content) = present(f.net_content.as_deref()) {
            request = request.with_net_content(content);
        }
        if let Some(origin) = present(f.origin.as_deref()) {
            request = request.with_origin(origin);
        }
        request.with_weights(
            present(f.gross_weight.as_deref()).map(str::to_string),
            present(f.net_weight.as_deref()).map(str::to_string),
        )
    }
}

/// Trimmed value, or `None` when missing or blank.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
