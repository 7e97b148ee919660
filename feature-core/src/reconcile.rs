//! Id reconciliation for merge imports
//!
//! Existing ids are never touched. Each imported record keeps its id when it
//! is free; otherwise the id is bumped by one until it no longer collides
//! with the existing records or with earlier records of the same batch.
//! Processing follows input order, so the result is deterministic, though
//! not the most compact possible numbering.

use log::{debug, info};
use std::collections::HashSet;

use crate::models::Feature;

/// An id change made while merging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdChange {
    pub original: i64,
    pub assigned: i64,
}

/// Result of merging an imported batch into a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Existing records followed by the imported ones
    pub features: Vec<Feature>,
    /// One entry per imported record, in import order
    pub id_mapping: Vec<IdChange>,
}

impl MergeOutcome {
    /// Only the entries whose id actually changed
    pub fn reassigned(&self) -> impl Iterator<Item = &IdChange> {
        self.id_mapping.iter().filter(|change| change.original != change.assigned)
    }
}

/// Appends `imported` to `existing`, re-identifying colliding records
pub fn merge(existing: &[Feature], imported: &[Feature]) -> MergeOutcome {
    let mut taken: HashSet<i64> = existing.iter().map(|f| f.id).collect();
    let mut features = existing.to_vec();
    let mut id_mapping = Vec::with_capacity(imported.len());

    for feature in imported {
        let mut candidate = feature.id;
        while taken.contains(&candidate) {
            candidate = candidate.wrapping_add(1);
        }

        if candidate != feature.id {
            debug!("Reassigned imported id {} to {}", feature.id, candidate);
        }

        taken.insert(candidate);
        id_mapping.push(IdChange {
            original: feature.id,
            assigned: candidate,
        });
        features.push(Feature {
            id: candidate,
            ..feature.clone()
        });
    }

    let outcome = MergeOutcome { features, id_mapping };
    info!(
        "Merged {} imported feature(s), {} reassigned",
        imported.len(),
        outcome.reassigned().count()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(features: &[Feature]) -> Vec<i64> {
        features.iter().map(|f| f.id).collect()
    }

    fn with_ids(values: &[i64]) -> Vec<Feature> {
        values
            .iter()
            .map(|id| Feature::new(*id, format!("F{}", id), "", 1))
            .collect()
    }

    #[test]
    fn test_collision_moves_to_next_free_id() {
        let existing = with_ids(&[1, 2, 3]);
        let imported = vec![Feature::new(2, "Imported", "", 4)];

        let outcome = merge(&existing, &imported);

        assert_eq!(ids(&outcome.features), vec![1, 2, 3, 4]);
        assert_eq!(outcome.features[3].name, "Imported");
        assert_eq!(
            outcome.id_mapping,
            vec![IdChange {
                original: 2,
                assigned: 4
            }]
        );
    }

    #[test]
    fn test_free_ids_are_kept() {
        let outcome = merge(&with_ids(&[1, 2]), &with_ids(&[10, 11]));
        assert_eq!(ids(&outcome.features), vec![1, 2, 10, 11]);
        assert_eq!(outcome.reassigned().count(), 0);
    }

    #[test]
    fn test_collisions_within_batch() {
        let outcome = merge(&with_ids(&[5]), &with_ids(&[1, 1, 5, 2]));
        assert_eq!(ids(&outcome.features), vec![5, 1, 2, 6, 3]);

        let changed: Vec<(i64, i64)> = outcome
            .reassigned()
            .map(|c| (c.original, c.assigned))
            .collect();
        assert_eq!(changed, vec![(1, 2), (5, 6), (2, 3)]);
    }

    #[test]
    fn test_merge_into_empty() {
        let outcome = merge(&[], &with_ids(&[3, 3]));
        assert_eq!(ids(&outcome.features), vec![3, 4]);
    }

    #[test]
    fn test_merge_is_repeatable() {
        let existing = with_ids(&[1, 2]);
        let imported = with_ids(&[2, 2]);
        assert_eq!(merge(&existing, &imported), merge(&existing, &imported));
    }

    proptest! {
        #[test]
        fn prop_merge_ids_unique_and_existing_preserved(
            existing in proptest::collection::hash_set(-50i64..50, 0..20),
            imported in proptest::collection::vec(-50i64..50, 0..20),
        ) {
            let existing: Vec<i64> = existing.into_iter().collect();
            let outcome = merge(&with_ids(&existing), &with_ids(&imported));

            let merged = ids(&outcome.features);
            let unique: HashSet<i64> = merged.iter().copied().collect();
            prop_assert_eq!(unique.len(), merged.len());
            prop_assert_eq!(&merged[..existing.len()], &existing[..]);
            prop_assert_eq!(outcome.id_mapping.len(), imported.len());
        }
    }
}
