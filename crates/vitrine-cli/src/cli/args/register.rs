use clap::Args;
use uuid::Uuid;
use vitrine_gs1::RegistrationRequest;

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Register an existing catalog record; an assigned GTIN is written back
    #[arg(long, conflicts_with = "description", required_unless_present = "description")]
    pub record: Option<Uuid>,

    /// Product description
    #[arg(long)]
    pub description: Option<String>,

    /// GTIN to register (omit to let the registry assign one)
    #[arg(long)]
    pub gtin: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub sku: Option<String>,

    #[arg(long)]
    pub ncm: Option<String>,

    #[arg(long)]
    pub cest: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    /// GPC brick code
    #[arg(long)]
    pub gpc_code: Option<String>,

    /// Gross weight in kg
    #[arg(long)]
    pub gross_weight: Option<String>,

    /// Net weight in kg
    #[arg(long)]
    pub net_weight: Option<String>,

    /// Net content with unit, e.g. "500 ml"
    #[arg(long)]
    pub net_content: Option<String>,

    /// Country of origin (ISO 3166 numeric)
    #[arg(long)]
    pub origin: Option<String>,
}

impl RegisterArgs {
    /// Request from the command-line fields, or `None` when `--record` is used.
    pub fn to_request(&self) -> Option<RegistrationRequest> {
        let mut request = RegistrationRequest::new(self.description.clone()?);
        request.gtin = self.gtin.clone();
        request.brand = self.brand.clone();
        request.sku = self.sku.clone();
        request.ncm = self.ncm.clone();
        request.cest = self.cest.clone();
        request.image_url = self.image_url.clone();
        request.gpc_code = self.gpc_code.clone();
        request.net_content = self.net_content.clone();
        request.origin = self.origin.clone();
        Some(request.with_weights(self.gross_weight.clone(), self.net_weight.clone()))
    }
}
