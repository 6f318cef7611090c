//! Reconciliation of persisted filename lists against the files on disk.

use std::collections::HashSet;

/// Keep only names present in `on_disk`, dropping repeats after the first.
pub fn prune_missing(list: &[String], on_disk: &[String]) -> Vec<String> {
    let present: HashSet<&str> = on_disk.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    list.iter()
        .filter(|name| present.contains(name.as_str()))
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Build the display list: ordered names that exist, then any file on disk
/// the order list does not mention, sorted by name.
pub fn display_order(order: &[String], on_disk: &[String]) -> Vec<String> {
    let mut result = prune_missing(order, on_disk);
    let listed: HashSet<&str> = result.iter().map(String::as_str).collect();

    let mut rest: Vec<String> = on_disk
        .iter()
        .filter(|name| !listed.contains(name.as_str()))
        .cloned()
        .collect();
    rest.sort();
    rest.dedup();

    result.extend(rest);
    result
}

/// Append `name` unless it is already present. Returns whether it was added.
pub fn append_unique(list: &mut Vec<String>, name: &str) -> bool {
    if list.iter().any(|n| n == name) {
        return false;
    }
    list.push(name.to_string());
    true
}

/// Remove every occurrence of `name`. Returns whether anything was removed.
pub fn remove_all(list: &mut Vec<String>, name: &str) -> bool {
    let before = list.len();
    list.retain(|n| n != name);
    list.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prune_drops_stale_and_duplicate_entries() {
        let order = names(&["b.png", "gone.png", "a.png", "b.png"]);
        let disk = names(&["a.png", "b.png"]);
        assert_eq!(prune_missing(&order, &disk), names(&["b.png", "a.png"]));
    }

    #[test]
    fn display_order_appends_unordered_files_sorted() {
        let order = names(&["c.png", "a.png"]);
        let disk = names(&["z.png", "a.png", "b.png", "c.png"]);
        assert_eq!(
            display_order(&order, &disk),
            names(&["c.png", "a.png", "b.png", "z.png"])
        );
    }

    #[test]
    fn display_order_with_empty_order_is_sorted_disk() {
        let disk = names(&["b.png", "a.png"]);
        assert_eq!(display_order(&[], &disk), names(&["a.png", "b.png"]));
    }

    #[test]
    fn append_unique_is_idempotent() {
        let mut list = names(&["a.png"]);
        assert!(append_unique(&mut list, "b.png"));
        assert!(!append_unique(&mut list, "b.png"));
        assert_eq!(list, names(&["a.png", "b.png"]));
    }

    #[test]
    fn remove_all_reports_absence() {
        let mut list = names(&["a.png", "b.png", "a.png"]);
        assert!(remove_all(&mut list, "a.png"));
        assert!(!remove_all(&mut list, "a.png"));
        assert_eq!(list, names(&["b.png"]));
    }
}
