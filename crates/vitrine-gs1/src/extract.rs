//! Table-driven extraction of fields from registry responses.
//!
//! Registry deployments answer with different shapes. Each rule is a JSON
//! pointer; rules are tried in order and the first hit wins.

use serde_json::Value;

/// A single extraction rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub pointer: &'static str,
}

const fn rule(name: &'static str, pointer: &'static str) -> Rule {
    Rule { name, pointer }
}

/// Where an assigned or confirmed identifier may live, in priority order.
pub const GTIN_RULES: &[Rule] = &[
    rule("top-level", "/gtin"),
    rule("data envelope", "/data/gtin"),
    rule("product envelope", "/product/gtin"),
    rule("trade item key", "/gs1TradeItemIdentificationKey/gtin"),
    rule(
        "product trade item key",
        "/product/gs1TradeItemIdentificationKey/gtin",
    ),
    rule(
        "data trade item key",
        "/data/gs1TradeItemIdentificationKey/gtin",
    ),
    rule("result envelope", "/result/gtin"),
    rule("first item", "/items/0/gtin"),
];

/// Where the registry status token may live.
pub const STATUS_RULES: &[Rule] = &[
    rule("top-level code", "/gtinStatusCode"),
    rule("top-level status", "/status"),
    rule("product code", "/product/gtinStatusCode"),
    rule("data code", "/data/gtinStatusCode"),
];

/// Apply `rules` to `body`, returning the first non-empty scalar as a string.
///
/// Numbers are rendered from their JSON text, so large identifiers keep all
/// their digits.
pub fn first_match(body: &Value, rules: &[Rule]) -> Option<String> {
    rules.iter().find_map(|r| {
        let value = scalar(body.pointer(r.pointer)?)?;
        tracing::trace!(rule = r.name, "extraction rule matched");
        Some(value)
    })
}

pub fn gtin(body: &Value) -> Option<String> {
    first_match(body, GTIN_RULES)
}

pub fn status(body: &Value) -> Option<String> {
    first_match(body, STATUS_RULES)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Human message from a registry error body, if one of the known fields is set.
pub fn error_message(body: &Value) -> Option<String> {
    const MESSAGE_RULES: &[Rule] = &[
        rule("message", "/message"),
        rule("oauth description", "/error_description"),
        rule("error string", "/error"),
        rule("first error", "/errors/0/message"),
        rule("detail", "/detail"),
    ];
    first_match(body, MESSAGE_RULES)
}
