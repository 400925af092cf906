/// Normalize text for comparison: lowercase, collapse runs of whitespace,
/// trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity ratio in `[0.0, 1.0]` based on the longest common subsequence
/// of the normalized character sequences: `2 * LCS / (len(a) + len(b))`.
///
/// Symmetric in its arguments. Two empty strings are identical (1.0); an
/// empty string against a non-empty one scores 0.0.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * lcs_len(&a, &b) as f64 / total as f64
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    // Iterate over the longer sequence so the rows stay short.
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if inner.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; inner.len() + 1];
    let mut curr = vec![0usize; inner.len() + 1];

    for &x in outer {
        for (j, &y) in inner.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[inner.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Great   STORY \n"), "great story");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_identical_is_one() {
        assert_eq!(ratio("great story", "great story"), 1.0);
        assert_eq!(ratio(" Great story", "great   story"), 1.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("", "something"), 0.0);
        assert_eq!(ratio("something", "   "), 0.0);
    }

    #[test]
    fn test_disjoint_is_zero() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_known_value() {
        // LCS("abcd", "acbd") = 3 -> 2*3/8
        assert!((ratio("abcd", "acbd") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("we never gave up", "and we never, ever gave up on it"),
            ("hello", "yellow fellow"),
            ("a", "aaaa"),
        ];
        for (a, b) in pairs {
            assert_eq!(ratio(a, b), ratio(b, a), "ratio({a:?}, {b:?})");
        }
    }

    #[test]
    fn test_paraphrase_scores_high() {
        let quote = "we never gave up on this team";
        let segment = " And we never gave up on this team, ever.";
        assert!(ratio(quote, segment) >= 0.6);
    }

    #[test]
    fn test_range() {
        let r = ratio("the quick brown fox", "a lazy dog sleeps");
        assert!((0.0..=1.0).contains(&r));
    }
}
