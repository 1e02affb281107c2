//! Blocklist text normalization.
//!
//! Parses heterogeneous blocklist formats (hosts files, Adblock/uBlock rule
//! syntax, plain domain lists) into a canonical, deduplicated domain set.
//! Malformed lines are dropped, never reported: the inputs are untrusted
//! text aggregated from the public internet and partial garbage is the
//! normal case, not an error.

use std::collections::HashSet;

/// Extract the canonical domain set from a raw blocklist corpus.
///
/// Each non-empty, non-comment line is stripped of its rule syntax,
/// lowercased, and validated. First-seen order is preserved; later
/// duplicates are dropped.
#[must_use]
pub fn extract_domains(corpus: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut domains = Vec::new();

    for line in corpus.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let candidate = strip_rule_prefix(line).trim().to_lowercase();
        if !is_valid_domain(&candidate) && !is_ipv4_literal(&candidate) {
            continue;
        }
        if seen.insert(candidate.clone()) {
            domains.push(candidate);
        }
    }

    domains
}

/// Compute the final domain set: block corpus minus allow corpus.
///
/// An empty block corpus yields an empty set; the caller decides whether
/// that means "nothing to do".
#[must_use]
pub fn normalize(block_corpus: &str, allow_corpus: &str) -> Vec<String> {
    let allowed: HashSet<String> = extract_domains(allow_corpus).into_iter().collect();

    extract_domains(block_corpus)
        .into_iter()
        .filter(|domain| !allowed.contains(domain))
        .collect()
}

/// Strip a hosts-file mapping prefix or an Adblock marker from the line
/// start. The hosts-file prefix is checked first; at most one rule is
/// stripped.
fn strip_rule_prefix(line: &str) -> &str {
    if let Some(rest) = strip_host_mapping(line) {
        return rest;
    }

    for marker in ["@@||", "||", "*.", "*"] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest;
        }
    }

    line
}

/// Strip a leading `<ipv4-or-ipv6> <whitespace>` hosts-file mapping.
///
/// The address token is matched loosely, as the original format does:
/// either digits-and-dots, or hex-digits-colons-and-dots.
fn strip_host_mapping(line: &str) -> Option<&str> {
    let token_end = line.find(char::is_whitespace)?;
    let (token, rest) = line.split_at(token_end);

    let ipv4_like = !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || c == '.');
    let ipv6_like = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.');

    if ipv4_like || ipv6_like {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Validate against the domain grammar: dot-separated alphanumeric-and-hyphen
/// labels, no leading or trailing hyphen per label.
#[must_use]
pub fn is_valid_domain(candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }

    candidate.split('.').all(|label| {
        !label.is_empty()
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}

/// Validate against the dotted-IPv4 grammar: four groups of one to three
/// digits. Octet range is deliberately not checked, matching the grammar
/// hosts files actually use in the wild.
#[must_use]
pub fn is_ipv4_literal(candidate: &str) -> bool {
    let groups: Vec<&str> = candidate.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.chars().all(|c| c.is_ascii_digit()))
}
