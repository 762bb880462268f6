//! Natural, case-insensitive ordering of mod names.
//!
//! Every place that iterates mod names (resolver seeds, dependency edges, load
//! order ties) sorts with [`natural_cmp`] so results never depend on map
//! iteration order.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compare two names the way a human would sort them.
///
/// - Letters are compared case-insensitively (`"Alpha" < "beta"`).
/// - Runs of ASCII digits are compared by numeric value (`"mod2" < "mod10"`).
/// - Names that are equal under those rules fall back to plain byte order, so the
///   ordering is total and `natural_cmp(a, b) == Equal` only if `a == b`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    compare_folded(&a.to_lowercase(), &b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Sort names in place by [`natural_cmp`].
pub fn sort_natural<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

fn compare_folded(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let left_run = take_digits(&mut left);
                let right_run = take_digits(&mut right);
                let ordering = compare_digit_runs(&left_run, &right_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_numeric_runs() {
        assert_eq!(natural_cmp("mod2", "mod10"), Ordering::Less);
        assert_eq!(natural_cmp("mod10", "mod2"), Ordering::Greater);
        assert_eq!(natural_cmp("a1b2", "a1b10"), Ordering::Less);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(natural_cmp("Alpha", "beta"), Ordering::Less);
        assert_eq!(natural_cmp("alpha", "Beta"), Ordering::Less);
    }

    #[test]
    fn test_total_order_on_case_only_difference() {
        assert_ne!(natural_cmp("Mod", "mod"), Ordering::Equal);
        assert_eq!(natural_cmp("Mod", "mod"), natural_cmp("mod", "Mod").reverse());
        assert_eq!(natural_cmp("mod", "mod"), Ordering::Equal);
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(natural_cmp("v007", "v8"), Ordering::Less);
        assert_ne!(natural_cmp("v007", "v7"), Ordering::Equal);
    }

    #[test]
    fn test_sort_natural() {
        let mut names = vec!["mod10", "Mod1", "base", "mod2"];
        sort_natural(&mut names);
        assert_eq!(names, vec!["base", "Mod1", "mod2", "mod10"]);
    }

    proptest! {
        #[test]
        fn test_antisymmetric(a in "[a-zA-Z0-9_-]{0,12}", b in "[a-zA-Z0-9_-]{0,12}") {
            prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
        }

        #[test]
        fn test_equal_only_when_identical(a in "[a-zA-Z0-9]{0,8}", b in "[a-zA-Z0-9]{0,8}") {
            prop_assert_eq!(natural_cmp(&a, &b) == Ordering::Equal, a == b);
        }
    }
}
