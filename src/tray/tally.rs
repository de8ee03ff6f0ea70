use super::item::DetectedItem;
use indexmap::IndexMap;

/// Insertion-ordered items awaiting checkout. Grows only by [`merge`] and
/// is emptied as a whole by [`TrayCollection::clear`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrayCollection {
    items: Vec<DetectedItem>,
}

impl TrayCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[DetectedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn tally(&self) -> Tally {
        group_by_label(self)
    }
}

impl From<Vec<DetectedItem>> for TrayCollection {
    fn from(items: Vec<DetectedItem>) -> Self {
        Self { items }
    }
}

/// Appends `incoming` to the end of `existing`. Repeated labels are never
/// folded together; they show up as a higher count in the tally.
pub fn merge(mut existing: TrayCollection, incoming: Vec<DetectedItem>) -> TrayCollection {
    existing.items.extend(incoming);
    existing
}

/// Label counts in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    counts: IndexMap<String, usize>,
}

impl Tally {
    pub fn get(&self, label: &str) -> Option<usize> {
        self.counts.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, always the length of the collection it came from.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

pub fn group_by_label(collection: &TrayCollection) -> Tally {
    let mut counts = IndexMap::new();
    for item in collection.items() {
        *counts.entry(item.label().to_string()).or_insert(0) += 1;
    }
    Tally { counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(labels: &[&str]) -> Vec<DetectedItem> {
        labels
            .iter()
            .map(|label| DetectedItem::new(*label, 0.5))
            .collect()
    }

    #[test]
    fn same_label_items_are_counted() {
        let tray = merge(
            TrayCollection::new(),
            vec![DetectedItem::new("glazed", 0.9), DetectedItem::new("glazed", 0.8)],
        );
        let tally = group_by_label(&tray);
        assert_eq!(tally.get("glazed"), Some(2));
        assert_eq!(tally.len(), 1);
    }

    #[test]
    fn merge_appends_without_deduplication() {
        let tray = merge(TrayCollection::new(), items(&["plain"]));
        let tray = merge(tray, items(&["glazed"]));
        let tray = merge(tray, items(&["plain"]));
        let labels: Vec<&str> = tray.items().iter().map(DetectedItem::label).collect();
        assert_eq!(labels, vec!["plain", "glazed", "plain"]);
    }

    #[test]
    fn tally_follows_first_occurrence_order() {
        let tray = TrayCollection::from(items(&["sprinkle", "plain", "sprinkle", "glazed"]));
        let tally = tray.tally();
        let rows: Vec<(&str, usize)> = tally.iter().collect();
        assert_eq!(rows, vec![("sprinkle", 2), ("plain", 1), ("glazed", 1)]);
    }

    #[test]
    fn tally_total_matches_all_merged_batches() {
        let batches = [
            items(&["plain", "glazed"]),
            items(&[]),
            items(&["glazed", "glazed", "unknown"]),
            items(&["boston"]),
        ];
        let expected: usize = batches.iter().map(Vec::len).sum();
        let tray = batches
            .into_iter()
            .fold(TrayCollection::new(), |tray, batch| merge(tray, batch));
        assert_eq!(tray.len(), expected);
        assert_eq!(tray.tally().total(), expected);
    }

    #[test]
    fn grouping_is_repeatable() {
        let tray = TrayCollection::from(items(&["plain", "glazed", "plain"]));
        assert_eq!(group_by_label(&tray), group_by_label(&tray));
    }

    #[test]
    fn clear_empties_tally() {
        let mut tray = TrayCollection::from(items(&["plain", "glazed"]));
        tray.clear();
        assert!(tray.is_empty());
        assert!(tray.tally().is_empty());
        assert_eq!(tray.tally().total(), 0);
    }
}
