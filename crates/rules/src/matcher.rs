//! Match-policy resolver: maps a combinator name to a boolean reducer.

/// Every predicate must hold (vacuously true for an empty sequence).
pub const MATCH_ALL: &str = "all";
/// At least one predicate must hold (false for an empty sequence).
pub const MATCH_ANY: &str = "any";
/// No predicate may hold (true for an empty sequence).
pub const MATCH_NONE: &str = "none";

/// Valid match-policy names, for validation suggestions.
pub const VALID_MATCHES: &[&str] = &[MATCH_ALL, MATCH_ANY, MATCH_NONE];

/// A pure boolean combinator over a sequence of predicate results.
pub type MatchFn = fn(&[bool]) -> bool;

fn match_all(results: &[bool]) -> bool {
    results.iter().all(|r| *r)
}

fn match_any(results: &[bool]) -> bool {
    results.iter().any(|r| *r)
}

fn match_none(results: &[bool]) -> bool {
    !match_any(results)
}

/// Resolve a match-policy name. Unknown names resolve to `None`; the caller
/// decides how to surface that.
pub fn get_match_function(name: &str) -> Option<MatchFn> {
    match name {
        MATCH_ALL => Some(match_all),
        MATCH_ANY => Some(match_any),
        MATCH_NONE => Some(match_none),
        _ => None,
    }
}

// ── Tests ───────────────────────────────────────────────────────────
