use std::collections::BTreeMap;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replaces `{{key}}` placeholders with values from `vars`. Unknown keys and
/// unterminated placeholders are left in the output as written.
pub(crate) fn render_template(input: &str, vars: &BTreeMap<&str, String>) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find(OPEN) {
        let (literal, tail) = rest.split_at(open);
        output.push_str(literal);
        let inner = tail.strip_prefix(OPEN).unwrap_or(tail);
        let Some(close) = inner.find(CLOSE) else {
            output.push_str(tail);
            return output;
        };
        let (key, after) = inner.split_at(close);
        match vars.get(key.trim()) {
            Some(value) => output.push_str(value),
            None => {
                output.push_str(OPEN);
                output.push_str(key);
                output.push_str(CLOSE);
            }
        }
        rest = after.strip_prefix(CLOSE).unwrap_or(after);
    }

    output.push_str(rest);
    output
}

/// Trimmed keys of every complete placeholder in `input`.
pub(crate) fn placeholder_keys(input: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    let mut rest = input;
    while let Some(open) = rest.find(OPEN) {
        let inner = rest
            .get(open.saturating_add(OPEN.len())..)
            .unwrap_or_default();
        let Some(close) = inner.find(CLOSE) else {
            break;
        };
        if let Some(key) = inner.get(..close) {
            keys.push(key.trim());
        }
        rest = inner
            .get(close.saturating_add(CLOSE.len())..)
            .unwrap_or_default();
    }
    keys
}
