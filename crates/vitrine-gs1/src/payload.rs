//! Registry payload builders.
//!
//! Tax codes travel digits-only. Optional attributes are omitted rather than
//! sent empty so the registry applies its own defaults.

use serde_json::{json, Map, Value};

use crate::checksum::digits_only;
use crate::types::{non_blank, Gtin, RegistrationRequest, DEFAULT_ORIGIN};

const LANGUAGE: &str = "pt-BR";

/// Flat payload of the v1 products API.
pub fn flat_payload(req: &RegistrationRequest, gtin: &Gtin, cad: Option<&str>) -> Value {
    json!({
        "gtin": gtin.as_str(),
        "descricao": req.description.trim(),
        "sku": non_blank(req.sku.as_deref()).unwrap_or_default(),
        "ncm": non_blank(req.ncm.as_deref()).map(digits_only).unwrap_or_default(),
        "cad": cad.unwrap_or_default(),
        "tipo": "PRODUTO_COMERCIALIZADO",
        "marca": req.brand_or_fallback(),
        "unidadeMedida": "UN",
    })
}

/// Nested trade-item payload of the v2 products API.
///
/// `gtin` is `None` when the registry should assign the identifier.
pub fn trade_item_payload(req: &RegistrationRequest, gtin: Option<&Gtin>, cad: Option<&str>) -> Value {
    let mut item = Map::new();

    item.insert("company".into(), json!({ "cad": cad.unwrap_or_default() }));
    item.insert("gtinStatusCode".into(), json!("ACTIVE"));

    if let Some(gtin) = gtin {
        let gtin14 = gtin.to_gtin14();
        // Key code follows the entered length; the value is always padded.
        let key_code = match gtin.len() {
            8 => "GTIN_8",
            12 => "GTIN_12",
            13 => "GTIN_13",
            _ => "GTIN_14",
        };
        item.insert(
            "gs1TradeItemIdentificationKey".into(),
            json!({
                "gs1TradeItemIdentificationKeyCode": key_code,
                "gtin": gtin14,
            }),
        );
    }

    item.insert(
        "tradeItemDescriptionInformationLang".into(),
        json!([{
            "tradeItemDescription": req.description.trim(),
            "languageCode": LANGUAGE,
            "default": true,
        }]),
    );
    item.insert(
        "brandNameInformationLang".into(),
        json!([{
            "brandName": req.brand_or_fallback(),
            "languageCode": LANGUAGE,
            "default": true,
        }]),
    );

    let classifications: Vec<Value> = [("NCM", req.ncm.as_deref()), ("CEST", req.cest.as_deref())]
        .into_iter()
        .filter_map(|(system, code)| {
            let code = digits_only(non_blank(code)?);
            (!code.is_empty()).then(|| {
                json!({
                    "additionalTradeItemClassificationSystemCode": system,
                    "additionalTradeItemClassificationCodeValue": code,
                })
            })
        })
        .collect();
    if !classifications.is_empty() {
        item.insert(
            "tradeItemClassification".into(),
            json!({ "additionalTradeItemClassifications": classifications }),
        );
    }

    if let Some(gpc) = non_blank(req.gpc_code.as_deref()) {
        item.insert("gpcCategoryCode".into(), json!(digits_only(gpc)));
    }

    if let Some(url) = non_blank(req.image_url.as_deref()) {
        item.insert(
            "referencedFileInformations".into(),
            json!([{
                "uniformResourceIdentifier": url,
                "referencedFileTypeCode": "PRODUCT_IMAGE",
                "isPrimaryFile": true,
                "languageCode": LANGUAGE,
            }]),
        );
    }

    let measurements = measurements(req);
    if !measurements.is_empty() {
        item.insert("tradeItemMeasurements".into(), Value::Object(measurements));
    }

    let origin = non_blank(req.origin.as_deref()).unwrap_or(DEFAULT_ORIGIN);
    item.insert(
        "tradeItemCountryOfOrigin".into(),
        json!([{ "countryCode": origin }]),
    );

    item.insert("shareDataIndicator".into(), json!(true));
    Value::Object(item)
}

fn measurements(req: &RegistrationRequest) -> Map<String, Value> {
    let mut out = Map::new();

    for (field, raw) in [
        ("grossWeight", req.gross_weight.as_deref()),
        ("netWeight", req.net_weight.as_deref()),
    ] {
        if let Some(value) = non_blank(raw).and_then(parse_decimal) {
            out.insert(
                field.into(),
                json!({ "value": value, "measurementUnitCode": "KGM" }),
            );
        }
    }

    if let Some((value, unit)) = non_blank(req.net_content.as_deref()).and_then(parse_quantity) {
        out.insert(
            "netContent".into(),
            json!([{ "value": value, "measurementUnitCode": unit }]),
        );
    }

    out
}

/// Accepts "1,5" and "1.5"; returns the dot form.
fn parse_decimal(raw: &str) -> Option<String> {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().ok().map(|_| normalized)
}

/// "500 ml" -> ("500", "MLT"). A bare number counts as units.
fn parse_quantity(raw: &str) -> Option<(String, &'static str)> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);
    let value = parse_decimal(number)?;

    let code = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "un" | "und" | "unid" | "pc" | "pç" => "H87",
        "ml" => "MLT",
        "l" | "lt" => "LTR",
        "g" | "gr" => "GRM",
        "kg" => "KGM",
        "mg" => "MGM",
        "m" => "MTR",
        "cm" => "CMT",
        _ => return None,
    };
    Some((value, code))
}

/// Product object sent through the relay, keyed the way the relay script reads it.
pub fn relay_product(req: &RegistrationRequest) -> Value {
    let mut product = Map::new();
    product.insert("nome".into(), json!(req.description.trim()));
    product.insert("marca".into(), json!(req.brand_or_fallback()));

    let optional = [
        ("sku", req.sku.as_deref()),
        ("ncm", req.ncm.as_deref()),
        ("cest", req.cest.as_deref()),
        ("gtin", req.gtin.as_deref()),
        ("imagemURL", req.image_url.as_deref()),
        ("gpc", req.gpc_code.as_deref()),
        ("pesoBruto", req.gross_weight.as_deref()),
        ("pesoLiquido", req.net_weight.as_deref()),
        ("conteudoLiquido", req.net_content.as_deref()),
        ("origem", req.origin.as_deref()),
    ];
    for (key, value) in optional {
        if let Some(value) = non_blank(value) {
            let value = match key {
                "ncm" | "cest" | "gtin" => digits_only(value),
                _ => value.to_string(),
            };
            product.insert(key.into(), json!(value));
        }
    }

    Value::Object(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RegistrationRequest {
        RegistrationRequest::new("Caneca Cerâmica 350ml")
            .with_sku("CAN-350")
            .with_ncm("6912.00.00")
            .with_gtin("7891234567895")
    }

    #[test]
    fn test_flat_payload() {
        let req = sample();
        let gtin = Gtin::parse("7891234567895").unwrap();
        let payload = flat_payload(&req, &gtin, Some("12345"));

        assert_eq!(payload["gtin"], "7891234567895");
        assert_eq!(payload["descricao"], "Caneca Cerâmica 350ml");
        assert_eq!(payload["ncm"], "69120000");
        assert_eq!(payload["marca"], "CAN-350");
        assert_eq!(payload["cad"], "12345");
        assert_eq!(payload["tipo"], "PRODUTO_COMERCIALIZADO");
        assert_eq!(payload["unidadeMedida"], "UN");
    }

    #[test]
    fn test_trade_item_payload_core_fields() {
        let req = sample().with_cest("01.001.00");
        let gtin = Gtin::parse("7891234567895").unwrap();
        let payload = trade_item_payload(&req, Some(&gtin), None);

        let key = &payload["gs1TradeItemIdentificationKey"];
        assert_eq!(key["gtin"], "07891234567895");
        assert_eq!(key["gs1TradeItemIdentificationKeyCode"], "GTIN_13");
        assert_eq!(payload["company"]["cad"], "");
        assert_eq!(
            payload["tradeItemDescriptionInformationLang"][0]["tradeItemDescription"],
            "Caneca Cerâmica 350ml"
        );

        let classes = payload["tradeItemClassification"]["additionalTradeItemClassifications"]
            .as_array()
            .unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0]["additionalTradeItemClassificationCodeValue"], "69120000");
        assert_eq!(classes[1]["additionalTradeItemClassificationSystemCode"], "CEST");
        assert_eq!(payload["tradeItemCountryOfOrigin"][0]["countryCode"], "076");
        assert_eq!(payload["shareDataIndicator"], true);
    }

    #[test]
    fn test_trade_item_payload_gtin14_and_omissions() {
        let req = RegistrationRequest::new("Caixa");
        let gtin = Gtin::parse("17891234567892").unwrap();
        let payload = trade_item_payload(&req, Some(&gtin), None);

        assert_eq!(
            payload["gs1TradeItemIdentificationKey"]["gs1TradeItemIdentificationKeyCode"],
            "GTIN_14"
        );
        assert!(payload.get("tradeItemClassification").is_none());
        assert!(payload.get("referencedFileInformations").is_none());
        assert!(payload.get("tradeItemMeasurements").is_none());
    }

    #[test]
    fn test_trade_item_key_code_follows_length() {
        let req = RegistrationRequest::new("Bala");
        for (input, code, padded) in [
            ("96385074", "GTIN_8", "00000096385074"),
            ("036000291452", "GTIN_12", "00036000291452"),
        ] {
            let gtin = Gtin::parse(input).unwrap();
            let key = &trade_item_payload(&req, Some(&gtin), None)["gs1TradeItemIdentificationKey"];
            assert_eq!(key["gs1TradeItemIdentificationKeyCode"], code);
            assert_eq!(key["gtin"], padded);
        }
    }

    #[test]
    fn test_trade_item_payload_without_gtin() {
        let payload = trade_item_payload(&RegistrationRequest::new("Novo"), None, Some("9"));
        assert!(payload.get("gs1TradeItemIdentificationKey").is_none());
    }

    #[test]
    fn test_optional_attributes() {
        let req = RegistrationRequest::new("Suco")
            .with_image_url("https://img.example/suco.jpg")
            .with_gpc_code("10000205")
            .with_weights(Some("1,2".into()), Some("1.0".into()))
            .with_net_content("1 l")
            .with_origin("032");
        let payload = trade_item_payload(&req, None, None);

        assert_eq!(
            payload["referencedFileInformations"][0]["uniformResourceIdentifier"],
            "https://img.example/suco.jpg"
        );
        assert_eq!(payload["gpcCategoryCode"], "10000205");
        let m = &payload["tradeItemMeasurements"];
        assert_eq!(m["grossWeight"]["value"], "1.2");
        assert_eq!(m["netWeight"]["value"], "1.0");
        assert_eq!(m["netContent"][0]["measurementUnitCode"], "LTR");
        assert_eq!(payload["tradeItemCountryOfOrigin"][0]["countryCode"], "032");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("500 ml"), Some(("500".into(), "MLT")));
        assert_eq!(parse_quantity("1,5kg"), Some(("1.5".into(), "KGM")));
        assert_eq!(parse_quantity("12"), Some(("12".into(), "H87")));
        assert_eq!(parse_quantity("alguns"), None);
        assert_eq!(parse_quantity("3 barris"), None);
    }

    #[test]
    fn test_relay_product() {
        let req = RegistrationRequest::new("Caneca")
            .with_ncm("6912.00.00")
            .with_image_url("https://img.example/c.jpg");
        let product = relay_product(&req);

        assert_eq!(product["nome"], "Caneca");
        assert_eq!(product["marca"], "Caneca");
        assert_eq!(product["ncm"], "69120000");
        assert_eq!(product["imagemURL"], "https://img.example/c.jpg");
        assert!(product.get("gtin").is_none());
        assert!(product.get("sku").is_none());
    }
}
