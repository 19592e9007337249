//! Identity grammar - `platform:id` lists embedded in console text
//!
//! The console prints a player's online identities in several shapes depending on the
//! message:
//!
//! ```text
//! [Online IDs:steam:76561198000000000]
//! [Online IDs=eos:0002abcd]
//! Creator Online IDs: EOS: 0002abcd steam: 76561198000000000
//! ```
//!
//! Parsing is best-effort: every well-formed `platform:id` pair is extracted and anything
//! else is skipped, so one odd token never costs the surrounding event.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::IdentitySet;

static IDENTITY_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^\s:,\[\]|()]+)\s*:\s*([^\s,\[\]|()]+)").expect("identity pattern is valid")
});

/// Parse every `platform:id` pair in `fragment`.
///
/// Pairs may be separated by whitespace or commas. Unknown platforms are kept; a
/// repeated platform keeps its first id.
///
/// # Examples
///
/// ```
/// use squad_rcon_core::identity::parse_identities;
///
/// let ids = parse_identities("EOS: 0002abcd steam: 76561198000000000");
/// assert_eq!(ids.get("eos"), Some("0002abcd"));
/// assert_eq!(ids.get("steam"), Some("76561198000000000"));
///
/// assert!(parse_identities("").is_empty());
/// ```
pub fn parse_identities(fragment: &str) -> IdentitySet {
    let mut ids = IdentitySet::new();
    for caps in IDENTITY_PAIR.captures_iter(fragment) {
        ids.insert(&caps[1], &caps[2]);
    }
    ids
}

/// Render an identity set back into console form (`platform:id platform:id`).
pub fn format_identities(ids: &IdentitySet) -> String {
    ids.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MergeConvention;

    #[test]
    fn test_compact_form() {
        let ids = parse_identities("steam:123456789012345");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids.get("steam"), Some("123456789012345"));
    }

    #[test]
    fn test_spaced_form_with_several_platforms() {
        let ids = parse_identities(" EOS: 00021111aaaa steam: 76561198000000001 ");
        assert_eq!(ids.get("eos"), Some("00021111aaaa"));
        assert_eq!(ids.get("steam"), Some("76561198000000001"));
    }

    #[test]
    fn test_comma_separated_and_unknown_platform() {
        let ids = parse_identities("steam:1,epic:abc, xbox:9");
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.get("xbox"), Some("9"));
    }

    #[test]
    fn test_malformed_tokens_are_skipped() {
        let ids = parse_identities("garbage steam:1 :nothing alsobad:");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids.get("steam"), Some("1"));
    }

    #[test]
    fn test_duplicate_platform_keeps_first() {
        let ids = parse_identities("steam:1 STEAM:2");
        assert_eq!(ids.get("steam"), Some("1"));
    }

    #[test]
    fn test_parse_then_flat_merge_reproduces_pairs() {
        let pairs = [("steam", "76561198000000000"), ("eos", "0002abcd"), ("epic", "e-1")];
        let text = pairs
            .iter()
            .rev()
            .map(|(p, id)| format!("{p}:{id}"))
            .collect::<Vec<_>>()
            .join(" ");

        let merged = parse_identities(&text).merged(MergeConvention::Flat);
        assert_eq!(merged.len(), pairs.len());
        for (platform, id) in pairs {
            assert_eq!(merged[&format!("{platform}id")], id);
        }
    }

    #[test]
    fn test_format_round_trips() {
        let ids = parse_identities("steam:1 eos:abc");
        assert_eq!(parse_identities(&format_identities(&ids)), ids);
    }
}
