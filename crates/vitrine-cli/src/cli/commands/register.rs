//! `vitrine register` - register a product with GS1 Brasil.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use vitrine_catalog::{CatalogError, JsonFileStore, ProductPatch, RecordStore};
use vitrine_gs1::{RegistrationClient, RegistrationOutcome};

use super::super::args::RegisterArgs;
use super::Output;
use crate::exit_codes::SUCCESS;

pub async fn run(args: &RegisterArgs, store_path: &Path, out: Output) -> Result<i32> {
    let client = RegistrationClient::from_env()?;

    let Some(id) = args.record else {
        let request = args
            .to_request()
            .context("either --record or --description is required")?;
        let outcome = client.register(&request).await?;
        print_outcome(&outcome, out)?;
        return Ok(SUCCESS);
    };

    let store = JsonFileStore::new(store_path);
    let record = store
        .get(id)?
        .ok_or(CatalogError::NotFound { id })
        .with_context(|| format!("reading {}", store_path.display()))?;

    let outcome = client.register(&record.to_registration_request()).await?;
    print_outcome(&outcome, out)?;

    // Fill the EAN the registry assigned, as the catalog form does.
    if record.fields.ean.as_deref().is_none_or(|e| e.trim().is_empty()) {
        if let Some(gtin) = &outcome.gtin {
            let patch = ProductPatch {
                ean: Some(gtin.clone()),
                ..Default::default()
            };
            store.update(id, &patch).with_context(|| {
                format!("registered {gtin}, but saving it to {} failed", store_path.display())
            })?;
            info!(id = %id, gtin = %gtin, "assigned GTIN saved to catalog");
        }
    }

    Ok(SUCCESS)
}

fn print_outcome(outcome: &RegistrationOutcome, out: Output) -> Result<()> {
    if out.is_json() {
        return out.json(outcome);
    }
    match (&outcome.gtin, &outcome.status) {
        (Some(gtin), Some(status)) => println!("registered {gtin} ({status})"),
        (Some(gtin), None) => println!("registered {gtin}"),
        (None, _) => println!("registered (registry returned no GTIN)"),
    }
    Ok(())
}
