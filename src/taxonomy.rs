//! Two-level folder taxonomy: every solution lives under `<category>/<subcategory>/`.
//!
//! Both levels are closed enumerations. A subcategory is only accepted under a
//! category that lists it; the one deliberate fallback is the shared `other`
//! bucket, which every category accepts.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{Result, SyncError};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Category {
    Arrays,
    Hashmap,
    Stack,
    Queue,
    LinkedList,
    Tree,
    Graph,
    Dp,
    Backtracking,
    BinarySearchTree,
    Heap,
    Trie,
    String,
    Math,
    BitManipulation,
    Greedy,
    DivideAndConquer,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Subcategory {
    BinarySearch,
    SlidingWindow,
    TwoPointers,
    PrefixSum,
    Kadane,
    Counting,
    Grouping,
    Frequency,
    Monotonic,
    Parentheses,
    Bfs,
    Deque,
    PriorityQueue,
    Reversal,
    FastSlow,
    Traversal,
    Bst,
    Construction,
    Dfs,
    ShortestPath,
    TopologicalSort,
    Linear,
    #[serde(rename = "2d")]
    #[strum(serialize = "2d")]
    TwoD,
    Knapsack,
    Subsequence,
    Permutations,
    Combinations,
    Subsets,
    Validation,
    MinHeap,
    MaxHeap,
    #[serde(rename = "k-elements")]
    #[strum(serialize = "k-elements")]
    KElements,
    PrefixTree,
    WordSearch,
    Autocomplete,
    PatternMatching,
    Palindrome,
    Substring,
    NumberTheory,
    Geometry,
    Combinatorics,
    BitwiseOperations,
    BitMasking,
    Intervals,
    Scheduling,
    Optimization,
    Sorting,
    Searching,
    Merge,
    Other,
}

impl Category {
    /// Subcategories accepted under this category, `Other` always last.
    pub fn subcategories(self) -> &'static [Subcategory] {
        use Subcategory::*;
        match self {
            Self::Arrays => &[
                BinarySearch,
                SlidingWindow,
                TwoPointers,
                PrefixSum,
                Kadane,
                Other,
            ],
            Self::Hashmap => &[Counting, Grouping, Frequency, Other],
            Self::Stack => &[Monotonic, Parentheses, Other],
            Self::Queue => &[Bfs, Deque, PriorityQueue, Other],
            Self::LinkedList => &[Reversal, TwoPointers, FastSlow, Other],
            Self::Tree => &[Traversal, Bst, Construction, Other],
            Self::Graph => &[Bfs, Dfs, ShortestPath, TopologicalSort, Other],
            Self::Dp => &[Linear, TwoD, Knapsack, Subsequence, Other],
            Self::Backtracking => &[Permutations, Combinations, Subsets, Other],
            Self::BinarySearchTree => &[Validation, Traversal, Construction, Other],
            Self::Heap => &[MinHeap, MaxHeap, KElements, Other],
            Self::Trie => &[PrefixTree, WordSearch, Autocomplete, Other],
            Self::String => &[PatternMatching, Palindrome, Substring, Other],
            Self::Math => &[NumberTheory, Geometry, Combinatorics, Other],
            Self::BitManipulation => &[BitwiseOperations, BitMasking, Other],
            Self::Greedy => &[Intervals, Scheduling, Optimization, Other],
            Self::DivideAndConquer => &[Sorting, Searching, Merge, Other],
        }
    }

    pub fn accepts(self, subcategory: Subcategory) -> bool {
        self.subcategories().contains(&subcategory)
    }
}

/// A validated `(category, subcategory)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub category: Category,
    pub subcategory: Subcategory,
}

impl Placement {
    pub fn new(category: Category, subcategory: Subcategory) -> Result<Self> {
        if !category.accepts(subcategory) {
            return Err(SyncError::validation(format!(
                "subcategory `{}` is not valid for category `{}`",
                subcategory, category
            )));
        }
        Ok(Self {
            category,
            subcategory,
        })
    }

    /// Parses a raw pair. An empty subcategory falls back to `other`; any other
    /// unknown value is rejected.
    pub fn parse(category: &str, subcategory: &str) -> Result<Self> {
        let category: Category = category
            .trim()
            .parse()
            .map_err(|_| SyncError::validation(format!("unknown category `{}`", category)))?;
        let subcategory = match subcategory.trim() {
            "" => Subcategory::Other,
            raw => raw.parse().map_err(|_| {
                SyncError::validation(format!("unknown subcategory `{}`", raw))
            })?,
        };
        Self::new(category, subcategory)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn subcategory_names_should_round_trip() {
        assert_eq!(Subcategory::TwoD.to_string(), "2d");
        assert_eq!(Subcategory::KElements.to_string(), "k-elements");
        assert_eq!(
            "topological-sort".parse::<Subcategory>().unwrap(),
            Subcategory::TopologicalSort
        );
        assert_eq!(Category::DivideAndConquer.to_string(), "divide-and-conquer");
    }

    #[test]
    fn every_category_should_accept_other() {
        for category in Category::iter() {
            assert!(category.accepts(Subcategory::Other), "{}", category);
        }
    }

    #[test]
    fn placement_should_reject_foreign_subcategory() {
        let err = Placement::new(Category::Stack, Subcategory::Kadane).unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));
        assert!(Placement::new(Category::Graph, Subcategory::Bfs).is_ok());
        assert!(Placement::new(Category::Queue, Subcategory::Bfs).is_ok());
    }

    #[test]
    fn placement_parse_should_fall_back_to_other_only_when_empty() {
        let placement = Placement::parse("arrays", "").unwrap();
        assert_eq!(placement.subcategory, Subcategory::Other);

        assert!(Placement::parse("arrays", "bogus").is_err());
        assert!(Placement::parse("nope", "other").is_err());
    }
}
