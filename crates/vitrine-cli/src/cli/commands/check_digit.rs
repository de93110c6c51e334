//! `vitrine check-digit` - complete an identifier body.

use anyhow::Result;
use serde_json::json;
use vitrine_gs1::checksum::{self, digits_only};
use vitrine_gs1::Gs1Error;

use super::super::args::CheckDigitArgs;
use super::Output;
use crate::exit_codes::SUCCESS;

pub fn run(args: &CheckDigitArgs, out: Output) -> Result<i32> {
    let body = digits_only(&args.body);
    let full = checksum::complete(&body).ok_or_else(|| {
        Gs1Error::validation(format!(
            "body must have 7, 11, 12 or 13 digits (got {})",
            body.len()
        ))
    })?;

    if out.is_json() {
        let check_digit = full.chars().last().and_then(|c| c.to_digit(10));
        out.json(&json!({ "body": body, "check_digit": check_digit, "gtin": full }))?;
    } else {
        println!("{full}");
    }
    Ok(SUCCESS)
}
