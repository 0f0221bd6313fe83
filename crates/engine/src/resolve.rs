use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::{TieBreakConfig, TieBreakStrategy};
use crate::model::{Conflict, CrossEntry, ResolvedEntry, ResolvedMapping};

/// Pick exactly one (brand, SKU) per canonical key.
///
/// Grouped selection: group entries by key, order candidates under the
/// configured tie-break, take the minimum. Every key with more than one
/// distinct candidate is also reported as a conflict; the resolution is a
/// data-quality signal for catalog curation, never silently "correct".
///
/// Must run exactly once per pipeline run, before aggregation; resolving per
/// query would let duplicate entries inflate demand sums.
pub fn resolve(
    entries: &[CrossEntry],
    tie_break: &TieBreakConfig,
) -> (ResolvedMapping, Vec<Conflict>) {
    let mut by_key: BTreeMap<&str, Vec<&CrossEntry>> = BTreeMap::new();
    for entry in entries {
        by_key.entry(&entry.key).or_default().push(entry);
    }

    let mut mapping = ResolvedMapping::default();
    let mut conflicts = Vec::new();

    for (key, mut candidates) in by_key {
        candidates.sort_by(|a, b| candidate_order(a, b, tie_break));
        // The same fact can appear twice in the wide catalog (reused brand
        // column, repeated row); identical candidates are not a conflict.
        candidates.dedup_by(|a, b| a.brand == b.brand && a.sku == b.sku);

        let winner = ResolvedEntry {
            key: key.to_string(),
            brand: candidates[0].brand.clone(),
            sku: candidates[0].sku.clone(),
        };

        if candidates.len() > 1 {
            conflicts.push(Conflict {
                key: key.to_string(),
                winner: winner.clone(),
                candidates: candidates.iter().map(|c| (*c).clone()).collect(),
            });
        }

        mapping.entries.insert(key.to_string(), winner);
    }

    (mapping, conflicts)
}

/// Total order over (brand, SKU) candidates for one key.
fn candidate_order(a: &CrossEntry, b: &CrossEntry, tie_break: &TieBreakConfig) -> Ordering {
    match tie_break.strategy {
        TieBreakStrategy::BrandLexical => {
            a.brand.cmp(&b.brand).then_with(|| a.sku.cmp(&b.sku))
        }
        TieBreakStrategy::BrandPriority => priority_index(&tie_break.priority, &a.brand)
            .cmp(&priority_index(&tie_break.priority, &b.brand))
            .then_with(|| a.brand.cmp(&b.brand))
            .then_with(|| a.sku.cmp(&b.sku)),
    }
}

/// Position in the priority list; unlisted brands sort after every listed one.
fn priority_index(priority: &[String], brand: &str) -> usize {
    priority
        .iter()
        .position(|p| p == brand)
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(brand: &str, key: &str, sku: &str) -> CrossEntry {
        CrossEntry { brand: brand.into(), key: key.into(), sku: sku.into() }
    }

    fn lexical() -> TieBreakConfig {
        TieBreakConfig::default()
    }

    #[test]
    fn unambiguous_keys_map_directly() {
        let entries = vec![
            entry("Moog", "K123456", "SUS-10001"),
            entry("MAS", "MS98765", "SUS-10001"),
        ];
        let (mapping, conflicts) = resolve(&entries, &lexical());
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("K123456").unwrap().sku, "SUS-10001");
        assert!(conflicts.is_empty());
    }

    #[test]
    fn ambiguous_key_picks_lexical_minimum_and_reports() {
        let entries = vec![
            entry("BrandB", "X1", "SKU-2"),
            entry("BrandA", "X1", "SKU-1"),
        ];
        let (mapping, conflicts) = resolve(&entries, &lexical());

        let winner = mapping.get("X1").unwrap();
        assert_eq!(winner.brand, "BrandA");
        assert_eq!(winner.sku, "SKU-1");

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].key, "X1");
        assert_eq!(conflicts[0].candidates.len(), 2);
        assert_eq!(conflicts[0].winner.brand, "BrandA");
    }

    #[test]
    fn same_brand_two_skus_breaks_on_sku() {
        let entries = vec![
            entry("Moog", "X1", "SUS-20000"),
            entry("Moog", "X1", "SUS-10000"),
        ];
        let (mapping, conflicts) = resolve(&entries, &lexical());
        assert_eq!(mapping.get("X1").unwrap().sku, "SUS-10000");
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn exact_duplicates_are_not_conflicts() {
        let entries = vec![
            entry("Moog", "X1", "SUS-10000"),
            entry("Moog", "X1", "SUS-10000"),
        ];
        let (mapping, conflicts) = resolve(&entries, &lexical());
        assert_eq!(mapping.len(), 1);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn brand_priority_overrides_lexical_order() {
        let tie_break = TieBreakConfig {
            strategy: TieBreakStrategy::BrandPriority,
            priority: vec!["OEM".into()],
        };
        let entries = vec![
            entry("Delphi", "X1", "SKU-1"),
            entry("OEM", "X1", "SKU-2"),
        ];
        let (mapping, conflicts) = resolve(&entries, &tie_break);
        assert_eq!(mapping.get("X1").unwrap().brand, "OEM");
        assert_eq!(conflicts[0].candidates[0].brand, "OEM");
        assert_eq!(conflicts[0].candidates[1].brand, "Delphi");
    }

    #[test]
    fn unlisted_brands_fall_back_to_lexical() {
        let tie_break = TieBreakConfig {
            strategy: TieBreakStrategy::BrandPriority,
            priority: vec!["OEM".into()],
        };
        let entries = vec![
            entry("MAS", "X1", "SKU-1"),
            entry("Delphi", "X1", "SKU-2"),
        ];
        let (mapping, _) = resolve(&entries, &tie_break);
        assert_eq!(mapping.get("X1").unwrap().brand, "Delphi");
    }

    #[test]
    fn input_order_does_not_change_winners() {
        let mut entries = vec![
            entry("BrandC", "X1", "SKU-3"),
            entry("BrandA", "X1", "SKU-1"),
            entry("BrandB", "X1", "SKU-2"),
            entry("Moog", "K1", "SUS-1"),
        ];
        let (forward, _) = resolve(&entries, &lexical());
        entries.reverse();
        let (reversed, _) = resolve(&entries, &lexical());
        assert_eq!(forward.entries, reversed.entries);
    }
}
