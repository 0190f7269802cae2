//! Instrumented sorting algorithms and the static table that names them.
//!
//! Every algorithm sorts a `u32` slice in place and reports each comparison,
//! move and milestone to an [`EventSink`]. A halt returned by the sink is
//! propagated immediately, leaving the slice in whatever state it was in.

mod bubble;
mod heap;
mod insertion;
mod merge;
mod quick;
mod radix;
mod selection;
mod shell;

use std::fmt;

pub use bubble::bubble_sort;
pub use heap::heap_sort;
pub use insertion::insertion_sort;
pub use merge::merge_sort;
pub use quick::quick_sort;
pub use radix::radix_sort;
pub use selection::selection_sort;
pub use shell::shell_sort;

use crate::{
    event::{EventSink, Step},
    Result, VisualiserError,
};

/// Entry point shared by every algorithm.
pub type SortFn = fn(&mut [u32], &mut dyn EventSink) -> Step;

/// Algorithm picked when the user does not ask for one.
pub const DEFAULT_ALGORITHM: &str = "merge_sort";

/// Registry entry: identifier, complexity notes and the sort itself.
#[derive(Clone, Copy)]
pub struct Algorithm {
    pub id: &'static str,
    pub average: &'static str,
    pub best: &'static str,
    pub worst: Option<&'static str>,
    /// Menu ordering, lower is listed first.
    pub rank: u8,
    pub sort: SortFn,
}

pub static ALGORITHMS: [Algorithm; 8] = [
    Algorithm {
        id: "bubble_sort",
        average: "O(n^2)",
        best: "O(n)",
        worst: None,
        rank: 4,
        sort: bubble_sort,
    },
    Algorithm {
        id: "heap_sort",
        average: "O(n log n)",
        best: "O(n log n)",
        worst: None,
        rank: 2,
        sort: heap_sort,
    },
    Algorithm {
        id: "insertion_sort",
        average: "O(n^2)",
        best: "O(n)",
        worst: None,
        rank: 4,
        sort: insertion_sort,
    },
    Algorithm {
        id: "merge_sort",
        average: "O(n log n)",
        best: "O(n log n)",
        worst: None,
        rank: 2,
        sort: merge_sort,
    },
    Algorithm {
        id: "quick_sort",
        average: "O(n log n)",
        best: "O(n log n)",
        worst: Some("O(n^2)"),
        rank: 2,
        sort: quick_sort,
    },
    Algorithm {
        id: "radix_sort",
        average: "O(nk)",
        best: "O(nk)",
        worst: None,
        rank: 1,
        sort: radix_sort,
    },
    Algorithm {
        id: "selection_sort",
        average: "O(n^2)",
        best: "O(n^2)",
        worst: None,
        rank: 4,
        sort: selection_sort,
    },
    Algorithm {
        id: "shell_sort",
        average: "~O(n log^2 n)",
        best: "O(n log n)",
        worst: None,
        rank: 3,
        sort: shell_sort,
    },
];

impl Algorithm {
    /// Finds an algorithm by id. Case, `-`/space separators and a missing
    /// `_sort` suffix are all tolerated, so `Merge`, `merge-sort` and
    /// `merge_sort` resolve to the same entry.
    pub fn lookup(name: &str) -> Result<&'static Algorithm> {
        let mut key = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if !key.ends_with("_sort") {
            key.push_str("_sort");
        }

        ALGORITHMS
            .iter()
            .find(|algorithm| algorithm.id == key)
            .ok_or_else(|| VisualiserError::UnknownAlgorithm(name.to_string()))
    }

    /// Title-cased name, e.g. `Merge Sort`.
    pub fn display_name(&self) -> String {
        self.id
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn run(&self, array: &mut [u32], sink: &mut dyn EventSink) -> Step {
        (self.sort)(array, sink)
    }
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm")
            .field("id", &self.id)
            .field("average", &self.average)
            .field("best", &self.best)
            .field("worst", &self.worst)
            .field("rank", &self.rank)
            .finish()
    }
}

/// Registry in menu order: by rank, then alphabetically.
pub fn menu_order() -> Vec<&'static Algorithm> {
    let mut entries: Vec<_> = ALGORITHMS.iter().collect();
    entries.sort_by_key(|algorithm| (algorithm.rank, algorithm.id));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_accepts_loose_names() {
        for name in ["merge_sort", "merge-sort", "Merge Sort", "merge", " MERGE "] {
            assert_eq!(Algorithm::lookup(name).unwrap().id, "merge_sort");
        }
    }

    #[test]
    fn lookup_rejects_unknown_names() {
        let err = Algorithm::lookup("bogo").unwrap_err();
        assert!(format!("{err}").contains("bogo"));
    }

    #[test]
    fn display_names_are_title_cased() {
        let quick = Algorithm::lookup("quick_sort").unwrap();
        assert_eq!(quick.display_name(), "Quick Sort");
    }

    #[test]
    fn menu_lists_radix_first_and_selection_last() {
        let order: Vec<_> = menu_order().iter().map(|algorithm| algorithm.id).collect();
        assert_eq!(
            order,
            vec![
                "radix_sort",
                "heap_sort",
                "merge_sort",
                "quick_sort",
                "shell_sort",
                "bubble_sort",
                "insertion_sort",
                "selection_sort",
            ]
        );
    }

    #[test]
    fn default_algorithm_is_registered() {
        assert!(Algorithm::lookup(DEFAULT_ALGORITHM).is_ok());
    }
}
