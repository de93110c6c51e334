//! `vitrine check` - validate GTIN check digits offline.

use serde::Serialize;
use vitrine_gs1::checksum::{self, ChecksumReason, ChecksumResult};

use super::super::args::CheckArgs;
use super::Output;
use crate::exit_codes::{CONFIG_ERROR, NEGATIVE, SUCCESS};

#[derive(Serialize)]
struct Checked<'a> {
    input: &'a str,
    #[serde(flatten)]
    result: ChecksumResult,
}

/// Exit 0 when every identifier is valid, 1 otherwise.
pub fn run(args: &CheckArgs, out: Output) -> i32 {
    let checked: Vec<Checked<'_>> = args
        .identifiers
        .iter()
        .map(|input| Checked {
            input,
            result: checksum::validate(input),
        })
        .collect();

    if out.is_json() {
        if let Err(e) = out.json(&checked) {
            eprintln!("error: {e:#}");
            return CONFIG_ERROR;
        }
    } else {
        for c in &checked {
            println!("{}\t{}", c.input, describe(&c.result));
        }
    }

    if checked.iter().all(|c| c.result.valid) {
        SUCCESS
    } else {
        NEGATIVE
    }
}

fn describe(result: &ChecksumResult) -> String {
    match (result.reason, result.expected, result.got) {
        (ChecksumReason::Ok, _, _) => format!("valid (GTIN-{})", result.length),
        (ChecksumReason::CheckDigit, Some(expected), Some(got)) => {
            format!("invalid: expected check digit {expected}, got {got}")
        }
        _ => format!(
            "invalid: {} digits (expected 8, 12, 13 or 14)",
            result.length
        ),
    }
}
