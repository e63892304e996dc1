//! Candidate search for requirement nodes.

use crate::core::model::{CobieEntity, CobieObject};
use crate::core::types::CategoryKey;
use crate::matching::index::CategoryIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How submission nodes qualify as candidates for a requirement node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Nodes sharing at least one category.
    #[default]
    Category,
    /// Nodes sharing a category; when there are none, nodes with an
    /// equivalent name.
    CategoryOrName,
    /// Nodes with an equivalent name, ranked by shared categories; when there
    /// are none, nodes sharing a category.
    NameThenCategory,
}

/// One candidate for a requirement node.
pub struct CandidateMatch<'a, T> {
    /// Position of the node in the pool.
    pub index: usize,
    /// The candidate node.
    pub node: &'a T,
    /// Number of requirement categories the node also carries.
    pub shared_category_count: usize,
    /// Whether the node's name is equivalent to the requirement's.
    pub name_match: bool,
}

impl<T> Clone for CandidateMatch<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CandidateMatch<'_, T> {}

impl<T: CobieEntity> fmt::Debug for CandidateMatch<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateMatch")
            .field("index", &self.index)
            .field("node", &self.node.object().name)
            .field("shared_category_count", &self.shared_category_count)
            .field("name_match", &self.name_match)
            .finish()
    }
}

/// Ranked candidate search over one submission pool.
///
/// Candidates are ordered by descending shared-category count; ties keep pool
/// order. The matcher is read-only and can be shared across threads.
#[derive(Debug)]
pub struct CandidateMatcher<'a, T> {
    index: CategoryIndex<'a, T>,
    strategy: MatchStrategy,
}

impl<'a, T: CobieEntity> CandidateMatcher<'a, T> {
    /// Index `pool` for searching with `strategy`.
    pub fn new(pool: &'a [T], strategy: MatchStrategy) -> Self {
        Self {
            index: CategoryIndex::build(pool),
            strategy,
        }
    }

    /// The underlying index.
    pub fn index(&self) -> &CategoryIndex<'a, T> {
        &self.index
    }

    /// The search strategy.
    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// All candidates for `requirement`, best first.
    pub fn candidates(&self, requirement: &CobieObject) -> Vec<CandidateMatch<'a, T>> {
        self.candidates_excluding(requirement, &[])
    }

    /// Candidates for `requirement`, best first, leaving out category-only
    /// candidates at the `excluded` pool positions.
    ///
    /// Name-equivalent candidates are never excluded.
    pub fn candidates_excluding(&self, requirement: &CobieObject, excluded: &[usize]) -> Vec<CandidateMatch<'a, T>> {
        let keys: Vec<CategoryKey> = requirement
            .matching_categories()
            .into_iter()
            .map(|c| c.key())
            .collect();
        let name = requirement.name.as_str();

        let mut ranked = match self.strategy {
            MatchStrategy::Category => self.by_category(&keys, name),
            MatchStrategy::CategoryOrName => {
                let found = self.by_category(&keys, name);
                if found.is_empty() {
                    self.by_name(&keys, name)
                } else {
                    found
                }
            }
            MatchStrategy::NameThenCategory => {
                let found = self.by_name(&keys, name);
                if found.is_empty() {
                    self.by_category(&keys, name)
                } else {
                    found
                }
            }
        };

        ranked.retain(|c| c.name_match || !excluded.contains(&c.index));
        ranked.sort_by(|a, b| {
            b.shared_category_count
                .cmp(&a.shared_category_count)
                .then(a.index.cmp(&b.index))
        });
        ranked
    }

    /// The best candidate for `requirement`, if any.
    pub fn best(&self, requirement: &CobieObject) -> Option<CandidateMatch<'a, T>> {
        self.candidates(requirement).into_iter().next()
    }

    /// The best candidate for `requirement` outside the `excluded` positions.
    pub fn best_excluding(&self, requirement: &CobieObject, excluded: &[usize]) -> Option<CandidateMatch<'a, T>> {
        self.candidates_excluding(requirement, excluded).into_iter().next()
    }

    fn by_category(&self, keys: &[CategoryKey], name: &str) -> Vec<CandidateMatch<'a, T>> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for key in keys {
            for &position in self.index.lookup(key) {
                *counts.entry(position).or_insert(0) += 1;
            }
        }

        let name_matches = self.index.lookup_name(name);
        counts
            .into_iter()
            .map(|(index, shared_category_count)| CandidateMatch {
                index,
                node: &self.index.pool()[index],
                shared_category_count,
                name_match: name_matches.contains(&index),
            })
            .collect()
    }

    fn by_name(&self, keys: &[CategoryKey], name: &str) -> Vec<CandidateMatch<'a, T>> {
        if name.trim().is_empty() {
            return Vec::new();
        }

        // Both sides classified but with nothing in common: not the same node.
        self.index
            .lookup_name(name)
            .iter()
            .filter_map(|&index| {
                let node = &self.index.pool()[index];
                let shared_category_count = shared_categories(keys, node.object());
                let classified = !node.object().matching_categories().is_empty();
                if !keys.is_empty() && classified && shared_category_count == 0 {
                    return None;
                }
                Some(CandidateMatch {
                    index,
                    node,
                    shared_category_count,
                    name_match: true,
                })
            })
            .collect()
    }
}

fn shared_categories(keys: &[CategoryKey], object: &CobieObject) -> usize {
    let own: Vec<CategoryKey> = object
        .matching_categories()
        .into_iter()
        .map(|c| c.key())
        .collect();
    keys.iter().filter(|k| own.contains(k)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Category;

    fn uniclass(code: &str) -> Category {
        Category::new("Uniclass2015", code)
    }

    #[test]
    fn test_no_shared_category_is_empty() {
        let pool = vec![CobieObject::new("Door").with_category(uniclass("Pr_30_59"))];
        let matcher = CandidateMatcher::new(&pool, MatchStrategy::Category);
        let requirement = CobieObject::new("Brick Wall").with_category(uniclass("Ss_25_10"));
        assert!(matcher.candidates(&requirement).is_empty());
        assert!(matcher.best(&requirement).is_none());
    }

    #[test]
    fn test_ranking_by_shared_count_then_order() {
        let pool = vec![
            CobieObject::new("one").with_category(uniclass("A")),
            CobieObject::new("two")
                .with_category(uniclass("A"))
                .with_category(uniclass("B")),
            CobieObject::new("three").with_category(uniclass("B")),
            CobieObject::new("four")
                .with_category(uniclass("B"))
                .with_category(uniclass("A")),
        ];
        let matcher = CandidateMatcher::new(&pool, MatchStrategy::Category);
        let requirement = CobieObject::new("req")
            .with_category(uniclass("A"))
            .with_category(uniclass("B"));

        let order: Vec<usize> = matcher.candidates(&requirement).iter().map(|c| c.index).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_duplicate_requirement_categories_count_once() {
        let pool = vec![CobieObject::new("wall").with_category(uniclass("A"))];
        let matcher = CandidateMatcher::new(&pool, MatchStrategy::Category);
        let requirement = CobieObject::new("req")
            .with_category(uniclass("A"))
            .with_category(uniclass("a"));
        assert_eq!(matcher.candidates(&requirement)[0].shared_category_count, 1);
    }

    #[test]
    fn test_uncategorized_only_by_name_fallback() {
        let pool = vec![CobieObject::new("Brick Wall")];
        let requirement = CobieObject::new("brick wall").with_category(uniclass("Ss_25_10"));

        let strict = CandidateMatcher::new(&pool, MatchStrategy::Category);
        assert!(strict.candidates(&requirement).is_empty());

        let fallback = CandidateMatcher::new(&pool, MatchStrategy::CategoryOrName);
        let found = fallback.candidates(&requirement);
        assert_eq!(found.len(), 1);
        assert!(found[0].name_match);
        assert_eq!(found[0].shared_category_count, 0);
    }

    #[test]
    fn test_name_then_category() {
        let pool = vec![
            CobieObject::new("A001").with_category(uniclass("Sp")),
            CobieObject::new("A002"),
            CobieObject::new("A001"),
        ];
        let matcher = CandidateMatcher::new(&pool, MatchStrategy::NameThenCategory);
        let requirement = CobieObject::new("A001").with_category(uniclass("Sp"));

        let found = matcher.candidates(&requirement);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].index, 0);
        assert_eq!(found[1].index, 2);

        assert!(matcher.candidates(&CobieObject::new("A003")).is_empty());
        assert!(matcher.candidates(&CobieObject::new("  ")).is_empty());
    }

    #[test]
    fn test_name_then_category_falls_back_to_category() {
        let pool = vec![
            CobieObject::new("D-001").with_category(uniclass("Pr_30_59_24")),
            CobieObject::new("D-002").with_category(uniclass("Pr_30_59_24")),
        ];
        let matcher = CandidateMatcher::new(&pool, MatchStrategy::NameThenCategory);
        let requirement = CobieObject::new("Door 1").with_category(uniclass("Pr_30_59_24"));

        let found = matcher.candidates(&requirement);
        assert_eq!(found.len(), 2);
        assert!(!found[0].name_match);
        assert_eq!(found[0].index, 0);

        let rest = matcher.best_excluding(&requirement, &[0]).unwrap();
        assert_eq!(rest.index, 1);
        assert!(matcher.best_excluding(&requirement, &[0, 1]).is_none());
    }

    #[test]
    fn test_name_match_with_disjoint_categories_rejected() {
        let pool = vec![CobieObject::new("A001").with_category(uniclass("Pr_99_99"))];
        let matcher = CandidateMatcher::new(&pool, MatchStrategy::NameThenCategory);

        let classified = CobieObject::new("A001").with_category(uniclass("SL_20_15"));
        assert!(matcher.candidates(&classified).is_empty());

        let unclassified = CobieObject::new("A001");
        assert_eq!(matcher.candidates(&unclassified).len(), 1);
    }

    #[test]
    fn test_exclusion_keeps_name_matches() {
        let pool = vec![CobieObject::new("A001").with_category(uniclass("SL_20_15"))];
        let matcher = CandidateMatcher::new(&pool, MatchStrategy::NameThenCategory);
        let requirement = CobieObject::new("A001").with_category(uniclass("SL_20_15"));
        assert_eq!(matcher.best_excluding(&requirement, &[0]).unwrap().index, 0);
    }
}
