//! The catalog store: the authoritative, immutable set of hills.

use std::collections::HashMap;

use tracing::warn;

use crate::catalog::model::{Hill, HillId};
use crate::error::HribiError;

/// The complete, read-only collection of hills, built once at startup.
///
/// Construct it explicitly and hand it to consumers; there is no global
/// instance. Lookup by id is O(1) via an index built at construction.
#[derive(Debug)]
pub struct Catalog {
    hills: Vec<Hill>,
    by_id: HashMap<HillId, usize>,
    ranges: Vec<String>,
}

impl Catalog {
    /// Build a catalog from hills in declaration order.
    ///
    /// Duplicate ids violate the catalog invariant; the first declaration
    /// wins and later ones are dropped with a warning.
    #[must_use]
    pub fn new(hills: Vec<Hill>) -> Self {
        let mut kept: Vec<Hill> = Vec::with_capacity(hills.len());
        let mut by_id: HashMap<HillId, usize> = HashMap::with_capacity(hills.len());

        for hill in hills {
            if by_id.contains_key(&hill.id) {
                warn!(id = hill.id, name = %hill.name, "duplicate hill id, dropping");
                continue;
            }
            by_id.insert(hill.id, kept.len());
            kept.push(hill);
        }

        let mut ranges: Vec<String> = kept.iter().map(|h| h.mountain_range.clone()).collect();
        ranges.sort();
        ranges.dedup();

        Catalog {
            hills: kept,
            by_id,
            ranges,
        }
    }

    /// Full catalog in declaration order. The order is a stable default
    /// display order and carries no ranking semantics.
    #[must_use]
    pub fn all(&self) -> &[Hill] {
        &self.hills
    }

    /// Look up one hill by id.
    ///
    /// Absence is an expected outcome (stale deep links and the like) and is
    /// reported as [`HribiError::NotFound`], never a panic.
    pub fn get(&self, id: HillId) -> crate::Result<&Hill> {
        self.by_id
            .get(&id)
            .map(|&idx| &self.hills[idx])
            .ok_or_else(|| HribiError::not_found(format!("hill {id}")))
    }

    /// Distinct mountain range labels, lexicographically sorted.
    ///
    /// Computed once at construction; the catalog is immutable so there is
    /// nothing to invalidate.
    #[must_use]
    pub fn distinct_mountain_ranges(&self) -> &[String] {
        &self.ranges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hill> {
        self.hills.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::tests::test_hill;
    use crate::catalog::model::Difficulty;

    fn fixture() -> Catalog {
        let mut a = test_hill(vec![Difficulty::Hard]);
        a.id = 1;
        a.name = "Triglav".to_string();
        a.mountain_range = "Julian Alps".to_string();
        let mut b = test_hill(vec![Difficulty::Easy]);
        b.id = 2;
        b.name = "Stol".to_string();
        b.mountain_range = "Karavanke Alps".to_string();
        let mut c = test_hill(vec![]);
        c.id = 3;
        c.name = "Boč".to_string();
        c.mountain_range = "Julian Alps".to_string();
        Catalog::new(vec![a, b, c])
    }

    #[test]
    fn test_identity_lookup_round_trips() {
        let catalog = fixture();
        for hill in catalog.all() {
            let found = catalog.get(hill.id).unwrap();
            assert_eq!(found.id, hill.id);
            assert_eq!(found.name, hill.name);
        }
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let catalog = fixture();
        let err = catalog.get(999).unwrap_err();
        assert!(matches!(err, HribiError::NotFound { .. }));
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let catalog = fixture();
        let names: Vec<&str> = catalog.all().iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Triglav", "Stol", "Boč"]);
    }

    #[test]
    fn test_distinct_ranges_sorted_and_deduped() {
        let catalog = fixture();
        assert_eq!(
            catalog.distinct_mountain_ranges(),
            &["Julian Alps".to_string(), "Karavanke Alps".to_string()]
        );
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let mut a = test_hill(vec![]);
        a.id = 7;
        a.name = "First".to_string();
        let mut b = test_hill(vec![]);
        b.id = 7;
        b.name = "Second".to_string();

        let catalog = Catalog::new(vec![a, b]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(7).unwrap().name, "First");
    }
}
