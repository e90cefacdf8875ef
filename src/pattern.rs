//! Structural name pattern for cluster-eligible proxy nodes
//!
//! A proxy node joins a cluster only when its name carries the fixed
//! two-part structure: a two-uppercase-letter region code, a hyphen, an
//! alphabetic family name, and a decimal ordinal suffix, e.g. `US-Node3`
//! or `HK-Relay12`. Matching is case-sensitive and uses the first match
//! in the name only; anything else passes through clustering untouched.

use regex::Regex;
use std::sync::OnceLock;

/// `([A-Z]{2}-[A-Za-z]+)(\d+)`: region-family prefix plus ordinal suffix
fn node_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([A-Z]{2}-[A-Za-z]+)(\d+)").expect("node pattern is a valid regex")
    })
}

/// First structural match in a node name: the cluster-family prefix and
/// the ordinal suffix it currently carries.
///
/// Both slices borrow from the input name. `suffix` keeps its original
/// digits verbatim (including leading zeros) so that renaming can replace
/// the exact `prefix + suffix` substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterName<'a> {
    /// Region-family prefix, e.g. `US-Node`
    pub prefix: &'a str,
    /// Ordinal suffix digits as written, e.g. `3` or `07`
    pub suffix: &'a str,
}

/// Extract the first structural match from a node name.
///
/// Returns `None` for names that carry no cluster structure; such nodes
/// are never clustered.
pub fn parse_cluster_name(name: &str) -> Option<ClusterName<'_>> {
    let caps = node_pattern().captures(name)?;
    Some(ClusterName {
        prefix: caps.get(1)?.as_str(),
        suffix: caps.get(2)?.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_name() {
        let parsed = parse_cluster_name("US-Node3").unwrap();
        assert_eq!(parsed.prefix, "US-Node");
        assert_eq!(parsed.suffix, "3");
    }

    #[test]
    fn test_parse_multi_digit_suffix() {
        let parsed = parse_cluster_name("HK-Relay12").unwrap();
        assert_eq!(parsed.prefix, "HK-Relay");
        assert_eq!(parsed.suffix, "12");
    }

    #[test]
    fn test_parse_keeps_leading_zeros() {
        let parsed = parse_cluster_name("JP-Edge07").unwrap();
        assert_eq!(parsed.prefix, "JP-Edge");
        assert_eq!(parsed.suffix, "07");
    }

    #[test]
    fn test_parse_is_not_anchored() {
        // Decorated names still cluster as long as the structure appears
        let parsed = parse_cluster_name("[premium] US-Node2").unwrap();
        assert_eq!(parsed.prefix, "US-Node");
        assert_eq!(parsed.suffix, "2");
    }

    #[test]
    fn test_parse_first_match_only() {
        let parsed = parse_cluster_name("US-Node1 via HK-Relay9").unwrap();
        assert_eq!(parsed.prefix, "US-Node");
        assert_eq!(parsed.suffix, "1");
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(parse_cluster_name("us-node1").is_none());
        assert!(parse_cluster_name("Us-Node1").is_none());
    }

    #[test]
    fn test_parse_rejects_unstructured_names() {
        assert!(parse_cluster_name("Fallback").is_none());
        assert!(parse_cluster_name("US-Node").is_none()); // no ordinal
        assert!(parse_cluster_name("U1-Node2").is_none()); // digit in region
        assert!(parse_cluster_name("DIRECT").is_none());
        assert!(parse_cluster_name("").is_none());
    }

    #[test]
    fn test_parse_unanchored_region_overmatch() {
        // A three-letter region still matches through its last two letters;
        // the match window slides, it does not anchor at a word boundary
        let parsed = parse_cluster_name("USA-Node1").unwrap();
        assert_eq!(parsed.prefix, "SA-Node");
        assert_eq!(parsed.suffix, "1");
    }
}
