//! `vitrine verify` - look up an identifier in the registry.

use anyhow::Result;
use serde_json::Value;
use vitrine_gs1::RegistrationClient;

use super::super::args::VerifyArgs;
use super::Output;
use crate::exit_codes::{NEGATIVE, SUCCESS};

/// Exit 0 when found, 1 when the registry does not know the identifier.
pub async fn run(args: &VerifyArgs, out: Output) -> Result<i32> {
    let client = RegistrationClient::from_env()?;
    let verification = client.verify(&args.identifier).await?;

    if out.is_json() {
        out.json(&verification)?;
    } else if verification.found {
        let brand = verification
            .product
            .as_ref()
            .and_then(brand_name)
            .map(|b| format!(" - {b}"))
            .unwrap_or_default();
        println!(
            "{} found ({}){}",
            args.identifier.trim(),
            verification.source,
            brand
        );
    } else {
        println!("{} not found", args.identifier.trim());
    }

    Ok(if verification.found { SUCCESS } else { NEGATIVE })
}

fn brand_name(product: &Value) -> Option<&str> {
    product
        .get("brandName")
        .or_else(|| product.pointer("/brandNameInformationLang/0/brandName"))
        .or_else(|| product.get("marca"))
        .and_then(Value::as_str)
}
