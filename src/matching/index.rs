//! Classification index over a submission pool.

use crate::core::model::CobieEntity;
use crate::core::types::CategoryKey;
use std::collections::HashMap;

/// Index from `(classification, code)` to positions in a submission pool.
///
/// Built once per pool and shared read-only; positions within every bucket
/// are ascending, i.e. in pool insertion order.
#[derive(Debug)]
pub struct CategoryIndex<'a, T> {
    pool: &'a [T],
    by_category: HashMap<CategoryKey, Vec<usize>>,
    by_name: HashMap<String, Vec<usize>>,
    uncategorized: Vec<usize>,
}

impl<'a, T: CobieEntity> CategoryIndex<'a, T> {
    /// Index every node of `pool`.
    ///
    /// Requirement-marker categories are not indexed; a node is counted as
    /// uncategorized when it has no other category.
    pub fn build(pool: &'a [T]) -> Self {
        let mut by_category: HashMap<CategoryKey, Vec<usize>> = HashMap::new();
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut uncategorized = Vec::new();

        for (position, node) in pool.iter().enumerate() {
            let object = node.object();
            let categories = object.matching_categories();
            if categories.is_empty() {
                uncategorized.push(position);
            }
            for category in categories {
                by_category.entry(category.key()).or_default().push(position);
            }

            let name = normalize_name(&object.name);
            if !name.is_empty() {
                by_name.entry(name).or_default().push(position);
            }
        }

        Self {
            pool,
            by_category,
            by_name,
            uncategorized,
        }
    }

    /// Positions of nodes carrying the category.
    pub fn lookup(&self, key: &CategoryKey) -> &[usize] {
        self.by_category.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positions of nodes with an equivalent name.
    pub fn lookup_name(&self, name: &str) -> &[usize] {
        self.by_name
            .get(&normalize_name(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positions of nodes without any matching category.
    pub fn uncategorized(&self) -> &[usize] {
        &self.uncategorized
    }

    /// The indexed pool.
    pub fn pool(&self) -> &'a [T] {
        self.pool
    }

    /// Number of distinct categories indexed.
    pub fn category_count(&self) -> usize {
        self.by_category.len()
    }

    /// Number of nodes in the pool.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CobieObject;
    use crate::core::types::Category;

    fn pool() -> Vec<CobieObject> {
        vec![
            CobieObject::new("Wall A").with_category(Category::new("Uniclass2015", "Ss_25_10")),
            CobieObject::new("Door").with_category(Category::new("Uniclass2015", "Pr_30_59")),
            CobieObject::new("Wall B")
                .with_category(Category::new("uniclass2015", "SS_25_10"))
                .with_category(Category::new("DPoW", "required")),
            CobieObject::new("Loose"),
        ]
    }

    #[test]
    fn test_lookup_preserves_order() {
        let pool = pool();
        let index = CategoryIndex::build(&pool);
        let key = Category::new("Uniclass2015", "Ss_25_10").key();
        assert_eq!(index.lookup(&key), &[0, 2]);
        assert_eq!(index.category_count(), 2);
    }

    #[test]
    fn test_markers_not_indexed() {
        let pool = pool();
        let index = CategoryIndex::build(&pool);
        assert!(index.lookup(&Category::new("DPoW", "required").key()).is_empty());
        assert_eq!(index.uncategorized(), &[3]);
    }

    #[test]
    fn test_lookup_name() {
        let pool = pool();
        let index = CategoryIndex::build(&pool);
        assert_eq!(index.lookup_name(" wall a"), &[0]);
        assert!(index.lookup_name("Window").is_empty());
    }
}
