//! Delimited-list parsing shared by validation and payload construction.
//!
//! The form collects contributors and work scopes as comma-delimited free
//! text. Both the duplicate checks in [`crate::validate`] and the payload
//! builder in [`crate::metadata`] parse through here so they agree on
//! trimming, casing, and ordering.

/// How tokens are case-normalized while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lowercase {
    /// Leave every token as typed.
    #[default]
    None,
    /// Lowercase every token.
    All,
    /// Lowercase only address-like tokens, leaving human names as typed.
    Addresses,
}

/// Options for [`parse_list_from_string`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub lowercase: Lowercase,
    /// Remove repeated tokens, keeping first-seen order.
    pub deduplicate: bool,
}

/// True when the token looks like an address (`0x` followed by hex digits).
pub fn is_address(token: &str) -> bool {
    let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) else {
        return false;
    };
    !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Split a comma-delimited string into trimmed, non-empty tokens.
///
/// Casing and deduplication behavior follow `options`; order is always the
/// order of first appearance in the input.
pub fn parse_list_from_string(input: &str, options: &ListOptions) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in input.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }
        let token = match options.lowercase {
            Lowercase::None => token.to_string(),
            Lowercase::All => token.to_lowercase(),
            Lowercase::Addresses => {
                if is_address(token) {
                    token.to_lowercase()
                } else {
                    token.to_string()
                }
            }
        };
        if options.deduplicate && out.contains(&token) {
            continue;
        }
        out.push(token);
    }
    out
}

/// True when the case-normalized list contains repeated tokens.
pub fn has_duplicates(input: &str) -> bool {
    let items = parse_list_from_string(
        input,
        &ListOptions {
            lowercase: Lowercase::All,
            deduplicate: false,
        },
    );
    let dedup = parse_list_from_string(
        input,
        &ListOptions {
            lowercase: Lowercase::All,
            deduplicate: true,
        },
    );
    items != dedup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_drops_empty_tokens() {
        let items = parse_list_from_string(" a ,, b ,  ", &ListOptions::default());
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_lowercase_all() {
        let items = parse_list_from_string(
            "Alice, BOB",
            &ListOptions {
                lowercase: Lowercase::All,
                deduplicate: false,
            },
        );
        assert_eq!(items, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_lowercase_addresses_only() {
        let addr = "0xE6a97a2F3d68d1dFCf1d7B4b201a99bd30f4d7d3";
        let items = parse_list_from_string(
            &format!("Alice, {addr}, alice"),
            &ListOptions {
                lowercase: Lowercase::Addresses,
                deduplicate: false,
            },
        );
        assert_eq!(
            items,
            vec![
                "Alice".to_string(),
                addr.to_lowercase(),
                "alice".to_string()
            ]
        );
    }

    #[test]
    fn test_address_mode_leaves_names_as_typed() {
        let items = parse_list_from_string(
            "Alice, 0xABC123, alice",
            &ListOptions {
                lowercase: Lowercase::Addresses,
                deduplicate: false,
            },
        );
        assert_eq!(
            items,
            vec![
                "Alice".to_string(),
                "0xabc123".to_string(),
                "alice".to_string()
            ]
        );
    }

    #[test]
    fn test_deduplicate_preserves_first_seen_order() {
        let items = parse_list_from_string(
            "b, a, b, c, a",
            &ListOptions {
                lowercase: Lowercase::None,
                deduplicate: true,
            },
        );
        assert_eq!(items, vec!["b".to_string(), "a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_has_duplicates() {
        assert!(has_duplicates("a, b, a"));
        assert!(!has_duplicates("a, b, c"));
        // Case-insensitive: "Alice" and "alice" collide after normalization
        assert!(has_duplicates("Alice, alice"));
    }

    #[test]
    fn test_is_address() {
        assert!(is_address("0xE6a97a2F3d68d1dFCf1d7B4b201a99bd30f4d7d3"));
        assert!(is_address("0xABC123"));
        assert!(!is_address("0x"));
        assert!(!is_address("Alice"));
        assert!(!is_address("0xZZa97a2F3d68d1dFCf1d7B4b201a99bd30f4d7d3"));
    }
}
