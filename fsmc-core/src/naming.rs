//! Identifier case conversion.

/// Converts a mixed or camel case label to `UPPER_SNAKE_CASE`.
///
/// Labels without lowercase letters are already symbols and come back unchanged.
pub fn to_upper_snake(label: &str) -> String {
    if !label.chars().any(char::is_lowercase) {
        return label.to_string();
    }
    snake(label).to_uppercase()
}

/// Converts a camel case identifier to `lower_snake_case`.
pub fn camel_to_snake(name: &str) -> String {
    snake(name).to_lowercase()
}

fn snake(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            {
                out.push('_');
            }
        }
        out.push(c);
    }

    out
}
