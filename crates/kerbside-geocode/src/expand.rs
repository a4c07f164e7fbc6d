//! Query expansion for generic grocery searches.
//!
//! "market" or "grocery store" alone geocodes poorly, so generic terms fan
//! out into the original query, two category terms, and the named regional
//! chains. Specific queries ("Tim Hortons on Princess St") pass through
//! untouched.

/// Terms that, after case/whitespace folding, count as a generic grocery
/// search on their own.
const GENERIC_GROCERY_TERMS: &[&str] = &[
    "market",
    "super market",
    "supermarket",
    "grocery",
    "groceries",
    "grocery store",
    "food store",
];

/// Substrings that mark a longer query as generic.
const GENERIC_SUBSTRINGS: &[&str] = &["supermarket", "grocery", "super market"];

/// Named regional chains appended to generic expansions, in rank order.
const CHAIN_QUERIES: &[&str] = &[
    "Metro Kingston",
    "Food Basics Kingston",
    "No Frills Kingston",
    "FreshCo Kingston",
    "Loblaws Kingston",
    "Walmart Kingston",
    "Costco Kingston",
];

/// Expand a place query into the ordered list of queries to geocode.
///
/// Non-generic queries return as a single-element list. Generic grocery
/// queries return [original, category terms, chains], whitespace-normalized
/// and deduplicated case-insensitively with first-seen order kept.
#[must_use]
pub fn expanded_place_queries(query: &str) -> Vec<String> {
    let base = query.trim();
    if base.is_empty() {
        return Vec::new();
    }

    let norm = fold_whitespace(&base.to_lowercase());
    let is_generic = GENERIC_GROCERY_TERMS.contains(&norm.as_str())
        || GENERIC_SUBSTRINGS.iter().any(|t| norm.contains(t));
    if !is_generic {
        return vec![base.to_owned()];
    }

    let mut expansions: Vec<String> = vec![
        base.to_owned(),
        "supermarket".to_owned(),
        "grocery store".to_owned(),
    ];
    expansions.extend(CHAIN_QUERIES.iter().map(|s| (*s).to_owned()));

    let mut seen = std::collections::HashSet::new();
    expansions
        .into_iter()
        .map(|s| fold_whitespace(&s))
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

fn fold_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_queries_are_not_expanded() {
        assert_eq!(
            expanded_place_queries("Tim Hortons on Princess St"),
            vec!["Tim Hortons on Princess St".to_owned()]
        );
    }

    #[test]
    fn supermarket_expands_to_chains() {
        let queries = expanded_place_queries("supermarket");
        assert_eq!(queries[0], "supermarket");
        assert!(queries.contains(&"grocery store".to_owned()));
        assert!(
            queries.iter().any(|q| q == "Metro Kingston"),
            "expected a named regional chain, got {queries:?}"
        );
        // "supermarket" appears once even though it is both the original
        // query and a category term.
        assert_eq!(queries.iter().filter(|q| *q == "supermarket").count(), 1);
    }

    #[test]
    fn market_is_generic_by_exact_term() {
        let queries = expanded_place_queries("market");
        assert!(queries.len() > 1);
        assert_eq!(queries[0], "market");
    }

    #[test]
    fn embedded_grocery_marks_a_query_generic() {
        let queries = expanded_place_queries("grocery near the waterfront");
        assert_eq!(queries[0], "grocery near the waterfront");
        assert!(queries.contains(&"Costco Kingston".to_owned()));
    }

    #[test]
    fn folding_handles_case_and_whitespace() {
        let queries = expanded_place_queries("  SUPER   Market ");
        assert_eq!(queries[0], "SUPER Market");
        assert!(queries.len() > 1);
    }

    #[test]
    fn empty_query_expands_to_nothing() {
        assert!(expanded_place_queries("   ").is_empty());
    }

    #[test]
    fn expansion_keeps_rank_order() {
        let queries = expanded_place_queries("grocery");
        let metro = queries.iter().position(|q| q == "Metro Kingston");
        let costco = queries.iter().position(|q| q == "Costco Kingston");
        assert!(metro < costco, "chain order must be preserved: {queries:?}");
    }
}
