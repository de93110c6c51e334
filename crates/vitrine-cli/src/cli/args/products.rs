use clap::{Args, Subcommand};
use uuid::Uuid;
use vitrine_catalog::ProductPatch;

#[derive(Args, Debug, Clone)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub cmd: ProductsCmd,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProductsCmd {
    /// List records, newest first
    List(ListArgs),
    /// Add a record
    Add(FieldArgs),
    /// Change fields of a record ("" clears a field)
    Update(UpdateArgs),
    /// Delete a record
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// all, no_video_ml, no_video_shopee, no_ean, no_ncm, no_photos, no_thumbnail
    #[arg(long, default_value = "all")]
    pub filter: String,

    /// Match name or SKU (case-insensitive), EAN or NCM
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    pub id: Uuid,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    pub id: Uuid,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub sku: Option<String>,
    #[arg(long)]
    pub ncm: Option<String>,
    #[arg(long)]
    pub cest: Option<String>,
    #[arg(long)]
    pub ean: Option<String>,
    #[arg(long)]
    pub cost: Option<String>,
    /// Drive link to the photo folder or file
    #[arg(long)]
    pub photos_url: Option<String>,
    #[arg(long)]
    pub thumbnail: Option<String>,
    #[arg(long)]
    pub video_ml: Option<String>,
    #[arg(long)]
    pub video_shopee: Option<String>,
    #[arg(long)]
    pub gpc_code: Option<String>,
    #[arg(long)]
    pub gross_weight: Option<String>,
    #[arg(long)]
    pub net_weight: Option<String>,
    #[arg(long)]
    pub net_content: Option<String>,
    #[arg(long)]
    pub origin: Option<String>,
}

impl FieldArgs {
    pub fn to_patch(&self) -> ProductPatch {
        ProductPatch {
            name: self.name.clone(),
            sku: self.sku.clone(),
            ncm: self.ncm.clone(),
            cest: self.cest.clone(),
            ean: self.ean.clone(),
            cost: self.cost.clone(),
            photos_url: self.photos_url.clone(),
            thumbnail: self.thumbnail.clone(),
            video_ml: self.video_ml.clone(),
            video_shopee: self.video_shopee.clone(),
            gpc_code: self.gpc_code.clone(),
            gross_weight: self.gross_weight.clone(),
            net_weight: self.net_weight.clone(),
            net_content: self.net_content.clone(),
            origin: self.origin.clone(),
        }
    }
}
