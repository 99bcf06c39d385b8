//! Natural (digit-run aware) string ordering.
//!
//! `Ethernet2` sorts before `Ethernet10`, and `100` before `1000`. Runs of
//! ASCII digits compare by numeric value, everything else compares
//! character by character. A digit run sorts before a non-digit run.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits: Option<bool> = None;

    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != digit => {
                out.push(make_chunk(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }
    if let Some(prev) = in_digits {
        out.push(make_chunk(&s[start..], prev));
    }
    out
}

fn make_chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(s)
    } else {
        Chunk::Text(s)
    }
}

/// Compares two digit runs by value without parsing, so arbitrarily long
/// runs never overflow.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');

    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Natural ordering of two strings.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_chunks = chunks(a);
    let b_chunks = chunks(b);

    for (x, y) in a_chunks.iter().zip(b_chunks.iter()) {
        let ord = match (x, y) {
            (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    a_chunks.len().cmp(&b_chunks.len())
}

/// Sorts a slice of strings in natural order.
pub fn natural_sort<T: AsRef<str>>(items: &mut [T]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_digit_runs_compare_numerically() {
        assert_eq!(natural_cmp("2", "10"), Ordering::Less);
        assert_eq!(natural_cmp("Ethernet2", "Ethernet10"), Ordering::Less);
        assert_eq!(natural_cmp("Ethernet10", "Ethernet10"), Ordering::Equal);
        assert_eq!(natural_cmp("PortChannel0010", "PortChannel2"), Ordering::Greater);
    }

    #[test]
    fn test_text_and_prefix() {
        assert_eq!(natural_cmp("Ethernet0", "PortChannel0"), Ordering::Less);
        assert_eq!(natural_cmp("Ethernet0", "Ethernet0.100"), Ordering::Less);
        assert_eq!(natural_cmp("Ethernet0.20", "Ethernet0.100"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn test_natural_sort() {
        let mut speeds = vec!["1000", "100", "10000", "25000"];
        natural_sort(&mut speeds);
        assert_eq!(speeds, vec!["100", "1000", "10000", "25000"]);

        let mut ports = vec!["Ethernet8", "Ethernet64", "Ethernet0", "Ethernet16"];
        natural_sort(&mut ports);
        assert_eq!(ports, vec!["Ethernet0", "Ethernet8", "Ethernet16", "Ethernet64"]);
    }

    #[test]
    fn test_long_digit_runs() {
        assert_eq!(
            natural_cmp("99999999999999999999999", "100000000000000000000000"),
            Ordering::Less
        );
    }
}
