//! `${placeholder}` template expansion for launch arguments.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Expand every `${name}` placeholder in `template` against `context`.
///
/// Placeholders whose name is absent from the context pass through
/// verbatim; that is how a patch chain leaves arguments for a later
/// consumer to fill in. A `${` with no closing `}` before end of input is
/// a format error. Single pass, left to right, no nested braces.
pub fn format_string(template: &str, context: &HashMap<String, String>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some((_, '{')) => {
                chars.next();
                let mut name = String::new();
                let mut terminated = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        terminated = true;
                        break;
                    }
                    name.push(c);
                }
                if !terminated {
                    return Err(Error::Format(template[start..].to_string()));
                }
                match context.get(&name) {
                    Some(value) => result.push_str(value),
                    None => {
                        result.push_str("${");
                        result.push_str(&name);
                        result.push('}');
                    }
                }
            }
            // A lone `$` is just a literal.
            _ => result.push(c),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_known_and_passes_through_unknown() {
        let ctx = context(&[("a", "x")]);
        assert_eq!(format_string("${a}-${b}", &ctx).unwrap(), "x-${b}");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(
            format_string("--username Player", &HashMap::new()).unwrap(),
            "--username Player"
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        assert!(matches!(
            format_string("${unterminated", &HashMap::new()),
            Err(Error::Format(_))
        ));
        assert!(format_string("ok ${a} then ${broken", &context(&[("a", "1")])).is_err());
    }

    #[test]
    fn lone_dollar_is_literal() {
        assert_eq!(format_string("cost: $5", &HashMap::new()).unwrap(), "cost: $5");
        assert_eq!(format_string("end$", &HashMap::new()).unwrap(), "end$");
    }

    #[test]
    fn empty_value_still_substitutes() {
        // Presence decides, not truthiness of the value.
        let ctx = context(&[("empty", "")]);
        assert_eq!(format_string("[${empty}]", &ctx).unwrap(), "[]");
    }

    #[test]
    fn adjacent_placeholders() {
        let ctx = context(&[("a", "1"), ("b", "2")]);
        assert_eq!(format_string("${a}${b}", &ctx).unwrap(), "12");
    }
}
