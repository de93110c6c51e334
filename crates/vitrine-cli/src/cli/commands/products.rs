//! `vitrine products` - catalog records.

use std::path::Path;

use anyhow::{Context, Result};
use vitrine_catalog::{
    drive_thumbnail_url, format_ncm, search, CatalogError, Filter, JsonFileStore, ProductFields,
    ProductRecord, RecordStore,
};

use super::super::args::{FieldArgs, ListArgs, ProductsCmd};
use super::Output;
use crate::exit_codes::SUCCESS;

pub fn run(cmd: ProductsCmd, store_path: &Path, out: Output) -> Result<i32> {
    let store = JsonFileStore::new(store_path);
    match cmd {
        ProductsCmd::List(args) => list(&store, &args, out),
        ProductsCmd::Add(fields) => add(&store, &fields, out),
        ProductsCmd::Update(args) => {
            let mut patch = args.fields.to_patch();
            if patch.is_empty() {
                anyhow::bail!("nothing to update: pass at least one field flag");
            }
            if patch.thumbnail.is_none() {
                let current = store.get(args.id)?.ok_or(CatalogError::NotFound { id: args.id })?;
                if present(&current.fields.thumbnail).is_none() {
                    patch.thumbnail = patch.photos_url.as_deref().and_then(drive_thumbnail_url);
                }
            }
            let record = store.update(args.id, &patch)?;
            show(&record, out)
        }
        ProductsCmd::Delete(args) => {
            store.delete(args.id)?;
            if out.is_json() {
                out.json(&serde_json::json!({ "deleted": args.id }))?;
            } else {
                println!("deleted {}", args.id);
            }
            Ok(SUCCESS)
        }
    }
}

fn list(store: &JsonFileStore, args: &ListArgs, out: Output) -> Result<i32> {
    let filter: Filter = args.filter.parse()?;
    let records = store
        .list()
        .with_context(|| format!("reading {}", store.path().display()))?;
    let records = search(filter.apply(records), args.search.as_deref().unwrap_or(""));

    if out.is_json() {
        out.json(&records)?;
        return Ok(SUCCESS);
    }

    for r in &records {
        let f = &r.fields;
        println!(
            "{}  {}  sku={}  ean={}  ncm={}",
            r.id,
            f.name,
            present(&f.sku).unwrap_or("-"),
            present(&f.ean).unwrap_or("-"),
            format_ncm(f.ncm.as_deref()),
        );
    }
    println!("{} product(s) [{}]", records.len(), filter.label());
    Ok(SUCCESS)
}

fn add(store: &JsonFileStore, args: &FieldArgs, out: Output) -> Result<i32> {
    let name = args
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .context("--name is required")?;

    let mut fields = ProductFields::new(name.trim());
    args.to_patch().apply(&mut fields)?;
    if fields.thumbnail.is_none() {
        fields.thumbnail = fields.photos_url.as_deref().and_then(drive_thumbnail_url);
    }

    let record = store.create(fields)?;
    show(&record, out)
}

fn show(record: &ProductRecord, out: Output) -> Result<i32> {
    if out.is_json() {
        out.json(record)?;
    } else {
        println!("{}  {}", record.id, record.fields.name);
    }
    Ok(SUCCESS)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
