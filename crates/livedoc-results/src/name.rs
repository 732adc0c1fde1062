//! Test-case name normalization
//!
//! Runners decorate scenario names differently: generated method names,
//! namespace-qualified fixture classes, argument lists for outline examples.
//! Adapters peel that decoration off with the helpers here, and every key
//! ends up in [`normalize_name`] form so the correlator can compare exactly.

/// Lower-case, collapse whitespace runs to one space, trim.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Turn a generated identifier back into words.
///
/// `TransferFunds_BetweenAccounts` becomes `Transfer Funds Between Accounts`,
/// `HTTPServerStarts` becomes `HTTP Server Starts`.
pub fn humanize_identifier(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            out.push(' ');
            continue;
        }
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop a trailing argument list: `AddTwoNumbers("1","2",null)` -> `AddTwoNumbers`.
///
/// Parentheses inside quoted arguments are ignored.
pub fn strip_parameters(name: &str) -> &str {
    let trimmed = name.trim_end();
    if !trimmed.ends_with(')') {
        return trimmed;
    }

    let mut depth = 0usize;
    let mut in_quotes = false;
    for (idx, c) in trimmed.char_indices().rev() {
        match c {
            '"' => in_quotes = !in_quotes,
            ')' if !in_quotes => depth += 1,
            '(' if !in_quotes => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return trimmed[..idx].trim_end();
                }
            }
            _ => {}
        }
    }
    trimmed
}

/// Drop a trailing `Feature` from a generated fixture class name.
pub fn strip_feature_suffix(class_name: &str) -> &str {
    match class_name.strip_suffix("Feature") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => class_name,
    }
}

/// Last segment of a dotted member path, ignoring any assembly qualifier:
/// `Acme.Specs.TransferFeature, Acme.Specs` -> `TransferFeature`.
pub fn last_segment(qualified: &str) -> &str {
    let without_assembly = qualified.split(',').next().unwrap_or(qualified).trim();
    without_assembly
        .rsplit(|c| c == '.' || c == '+')
        .next()
        .unwrap_or(without_assembly)
}

/// Feature title recovered from a fixture class name.
pub fn feature_from_class(qualified: &str) -> String {
    humanize_identifier(strip_feature_suffix(last_segment(qualified)))
}

/// Scenario title recovered from a test method name.
pub fn scenario_from_method(method: &str) -> String {
    humanize_identifier(last_segment(strip_parameters(method)))
}
