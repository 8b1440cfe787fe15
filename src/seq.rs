//! Small, independent sequence helpers.

/// Compares two slices as multisets: same elements, same cardinality, any
/// order.
pub fn compare<T: PartialEq>(left: &[T], right: &[T]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter().all(|elem| {
        let in_left = left.iter().filter(|e| *e == elem).count();
        let in_right = right.iter().filter(|e| *e == elem).count();
        in_left == in_right
    })
}

/// Joins segments with `.`, preserving empty segments.
pub fn flatten<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}

/// Splits a dot-joined chain back into its segments, preserving empty ones.
pub fn unflatten(chain: &str) -> Vec<String> {
    chain.split('.').map(String::from).collect()
}

/// Locates the element coupled to `primary` in a list of couples.
///
/// Any `[n]` indications are removed from the probe before the lookup, so a
/// chain grown inside a list still couples to its declared counterpart.
pub fn find_coupled<'a>(pairs: &'a [(String, String)], primary: &str) -> Option<&'a str> {
    let mut probe = primary.to_string();
    while let Some(open) = probe.find('[') {
        let Some(close) = probe[open..].find(']') else {
            break;
        };
        probe.replace_range(open..open + close + 1, "");
    }
    pairs
        .iter()
        .find(|(first, _)| *first == probe)
        .map(|(_, coupled)| coupled.as_str())
}

/// Returns the first element prefixed by `prefix`, with or without the
/// prefix and its following separator character.
pub fn elem_starting_with<'a, S: AsRef<str>>(
    items: &'a [S],
    prefix: &str,
    keep_prefix: bool,
) -> Option<&'a str> {
    items
        .iter()
        .map(|s| s.as_ref())
        .find(|elem| elem.starts_with(prefix))
        .map(|elem| {
            if keep_prefix {
                elem
            } else {
                elem.get(prefix.len() + 1..).unwrap_or("")
            }
        })
}

/// Removes duplicate elements in place, keeping the first occurrence.
pub fn prune_duplicates<T: PartialEq>(items: &mut Vec<T>) {
    let mut inx = 0;
    while inx < items.len() {
        if items[..inx].contains(&items[inx]) {
            items.remove(inx);
        } else {
            inx += 1;
        }
    }
}

/// Removes every element also present in `reference`, in place.
pub fn prune_in<T: PartialEq>(items: &mut Vec<T>, reference: &[T]) {
    items.retain(|item| !reference.contains(item));
}

/// Removes every element not present in `reference`, in place.
pub fn prune_not_in<T: PartialEq>(items: &mut Vec<T>, reference: &[T]) {
    items.retain(|item| reference.contains(item));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_ignores_order_but_not_cardinality() {
        assert!(compare(&[1, 2, 2, 3], &[3, 2, 1, 2]));
        assert!(!compare(&[1, 2, 2], &[1, 2, 3]));
        assert!(!compare(&[1, 2], &[1, 2, 2]));
        assert!(compare::<i32>(&[], &[]));
    }

    #[test]
    fn flatten_and_unflatten_preserve_empty_segments() {
        assert_eq!(flatten(&["1", "2", ""]), "1.2.");
        assert_eq!(unflatten("1.2."), vec!["1", "2", ""]);
        assert_eq!(unflatten(".a.b"), vec!["", "a", "b"]);
        assert_eq!(unflatten("x...y"), vec!["x", "", "", "y"]);
        assert_eq!(unflatten("z"), vec!["z"]);
    }

    #[test]
    fn find_coupled_strips_index_indications() {
        let pairs = vec![
            ("a.b".to_string(), "x.y".to_string()),
            ("a.c".to_string(), "x.z".to_string()),
        ];
        assert_eq!(find_coupled(&pairs, "a.b"), Some("x.y"));
        assert_eq!(find_coupled(&pairs, "a[0].c"), Some("x.z"));
        assert_eq!(find_coupled(&pairs, "a[0].b[12]"), Some("x.y"));
        assert_eq!(find_coupled(&pairs, "a.d"), None);
    }

    #[test]
    fn elem_starting_with_optionally_drops_prefix() {
        let items = vec!["FOO_alpha".to_string(), "BAR_beta".to_string()];
        assert_eq!(elem_starting_with(&items, "BAR", true), Some("BAR_beta"));
        assert_eq!(elem_starting_with(&items, "BAR", false), Some("beta"));
        assert_eq!(elem_starting_with(&items, "BAZ", true), None);
    }

    #[test]
    fn prune_family_preserves_order() {
        let mut items = vec![3, 1, 3, 2, 1];
        prune_duplicates(&mut items);
        assert_eq!(items, vec![3, 1, 2]);

        let mut items = vec![1, 2, 3, 4];
        prune_in(&mut items, &[2, 4]);
        assert_eq!(items, vec![1, 3]);

        let mut items = vec![1, 2, 3, 4];
        prune_not_in(&mut items, &[2, 4, 5]);
        assert_eq!(items, vec![2, 4]);
    }
}
