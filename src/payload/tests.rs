use std::collections::{BTreeMap, HashSet};

use super::*;

fn payload_config() -> PayloadConfig {
    PayloadConfig {
        unique_field: "email".to_owned(),
        template: "user_{{unique}}@example.com".to_owned(),
        suffix_len: DEFAULT_SUFFIX_LEN,
        fixed_fields: BTreeMap::from([
            ("nit".to_owned(), "901234567".to_owned()),
            ("password".to_owned(), "Secret12*".to_owned()),
        ]),
    }
}

fn token_parts(request: &TrialRequest) -> Result<(String, String, String), String> {
    let token = request
        .unique_field
        .strip_prefix("user_")
        .and_then(|rest| rest.strip_suffix("@example.com"))
        .ok_or_else(|| format!("Unexpected unique field: {}", request.unique_field))?;
    let mut parts = token.splitn(3, '_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(ts), Some(suffix), Some(index)) => {
            Ok((ts.to_owned(), suffix.to_owned(), index.to_owned()))
        }
        _ => Err(format!("Malformed token: {}", token)),
    }
}

#[test]
fn make_payload_embeds_timestamp_suffix_and_index() -> Result<(), String> {
    let factory = PayloadFactory::new(payload_config());
    let request = factory.make_payload(7);
    if request.index != 7 {
        return Err(format!("Unexpected index: {}", request.index));
    }

    let (timestamp, suffix, index) = token_parts(&request)?;
    if timestamp.parse::<u128>().map_err(|err| err.to_string())? == 0 {
        return Err("Expected a non-zero timestamp".to_owned());
    }
    if suffix.len() != DEFAULT_SUFFIX_LEN {
        return Err(format!("Unexpected suffix length: {}", suffix));
    }
    if !suffix
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
    {
        return Err(format!("Suffix outside [a-z0-9]: {}", suffix));
    }
    if index != "7" {
        return Err(format!("Unexpected index segment: {}", index));
    }
    Ok(())
}

#[test]
fn unique_fields_differ_within_a_batch() -> Result<(), String> {
    let factory = PayloadFactory::new(payload_config());
    let batch = factory.make_batch(2_000);
    let unique: HashSet<&str> = batch
        .iter()
        .map(|request| request.unique_field.as_str())
        .collect();
    if unique.len() != batch.len() {
        return Err(format!(
            "Expected {} distinct fields, got {}",
            batch.len(),
            unique.len()
        ));
    }
    Ok(())
}

#[test]
fn same_index_across_runs_still_differs() -> Result<(), String> {
    // Only the random suffix separates these when the clock has not ticked.
    let factory = PayloadFactory::new(payload_config());
    let seen: HashSet<String> = (0..500)
        .map(|_| factory.make_payload(1).unique_field)
        .collect();
    if seen.len() < 499 {
        return Err(format!("Too many suffix collisions: {} distinct", seen.len()));
    }
    Ok(())
}

#[test]
fn make_batch_indices_start_at_one() -> Result<(), String> {
    let factory = PayloadFactory::new(payload_config());
    let indices: Vec<usize> = factory
        .make_batch(4)
        .iter()
        .map(|request| request.index)
        .collect();
    if indices != vec![1, 2, 3, 4] {
        return Err(format!("Unexpected indices: {:?}", indices));
    }
    Ok(())
}

#[test]
fn body_merges_fixed_fields_and_unique_key() -> Result<(), String> {
    let mut config = payload_config();
    config
        .fixed_fields
        .insert("email".to_owned(), "static@example.com".to_owned());
    let request = PayloadFactory::new(config).make_payload(3);
    let body = request.body();

    if body.get("nit").and_then(|value| value.as_str()) != Some("901234567") {
        return Err(format!("Missing fixed field: {}", body));
    }
    if body.get("email").and_then(|value| value.as_str()) != Some(request.unique_field.as_str())
    {
        return Err(format!("Unique key should override fixed field: {}", body));
    }
    if body.as_object().map(serde_json::Map::len) != Some(3) {
        return Err(format!("Unexpected field count: {}", body));
    }
    Ok(())
}

#[test]
fn render_template_substitutes_known_keys() -> Result<(), String> {
    let vars = BTreeMap::from([("unique", "abc".to_owned()), ("index", "2".to_owned())]);
    let rendered = render_template("u_{{ unique }}-{{index}}-{{missing}}", &vars);
    if rendered != "u_abc-2-{{missing}}" {
        return Err(format!("Unexpected render: {}", rendered));
    }
    Ok(())
}

#[test]
fn render_template_keeps_unterminated_placeholder() -> Result<(), String> {
    let vars = BTreeMap::from([("unique", "abc".to_owned())]);
    let rendered = render_template("{{unique}}@{{unique", &vars);
    if rendered != "abc@{{unique" {
        return Err(format!("Unexpected render: {}", rendered));
    }
    Ok(())
}

#[test]
fn placeholder_keys_lists_trimmed_names() -> Result<(), String> {
    let keys = placeholder_keys("a{{ unique }}b{{index}}c{{open");
    if keys != vec!["unique", "index"] {
        return Err(format!("Unexpected keys: {:?}", keys));
    }
    Ok(())
}
