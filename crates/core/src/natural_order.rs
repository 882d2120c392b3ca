//! Human-friendly ordering of names with embedded numbers
//!
//! `"Chapter 2"` sorts before `"Chapter 10"`. Names are split into alternating
//! runs of ASCII digits and everything else; digit runs compare by value and
//! other runs compare character by character.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn runs(s: &str) -> Vec<Run<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(make_run(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }

    if let Some(prev) = in_digits {
        out.push(make_run(&s[start..], prev));
    }
    out
}

fn make_run(s: &str, digits: bool) -> Run<'_> {
    if digits {
        Run::Digits(s)
    } else {
        Run::Text(s)
    }
}

/// Compares two digit strings by numeric value without parsing,
/// so arbitrarily long runs never overflow.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
}

/// Compares two names in natural order.
///
/// Numeric runs with equal value but different leading zeros rank equal;
/// if nothing else differs, the shorter representation sorts first.
pub fn compare(a: &str, b: &str) -> Ordering {
    let a_runs = runs(a);
    let b_runs = runs(b);
    let mut tiebreak = Ordering::Equal;

    for (ra, rb) in a_runs.iter().zip(b_runs.iter()) {
        let ord = match (ra, rb) {
            (Run::Digits(x), Run::Digits(y)) => {
                let ord = compare_numeric(x, y);
                if ord == Ordering::Equal && tiebreak == Ordering::Equal {
                    tiebreak = x.len().cmp(&y.len());
                }
                ord
            }
            (Run::Text(x), Run::Text(y)) => x.cmp(y),
            // digits sort before text, the same as their character codes do
            (Run::Digits(_), Run::Text(_)) => Ordering::Less,
            (Run::Text(_), Run::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    a_runs.len().cmp(&b_runs.len()).then(tiebreak)
}

/// Sorts a slice in natural order of the given key
pub fn sort_naturally<T, F>(items: &mut [T], mut key: F)
where
    F: FnMut(&T) -> &str,
{
    items.sort_by(|a, b| compare(key(a), key(b)));
}
