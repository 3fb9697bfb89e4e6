use crate::period::PeriodSpec;
use crate::series::SeriesIdentifier;
use serde::{Deserialize, Serialize};

/// Ordering index given to items that were added without one.
pub const DEFAULT_ITEM_INDEX: i32 = 100;

/// One entry of a collage: a time series plus its own threshold and
/// percentile settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollageItem {
    pub id: i64,
    /// Display name
    pub name: String,
    pub identifier: SeriesIdentifier,
    /// Used to cluster items when presenting the collage
    pub grouping_hint: String,
    /// Threshold for the at-or-below / above counts
    pub boundary_value: Option<f64>,
    /// User percentile, 0-100
    pub percentile_value: Option<f64>,
    pub index: i32,
}

impl CollageItem {
    pub fn new(id: i64, name: impl Into<String>, identifier: SeriesIdentifier) -> Self {
        CollageItem {
            id,
            name: name.into(),
            identifier,
            grouping_hint: String::new(),
            boundary_value: None,
            percentile_value: None,
            index: DEFAULT_ITEM_INDEX,
        }
    }
}

/// A named, ordered set of items sharing one period filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collage {
    pub id: i64,
    pub name: String,
    pub owner: Option<String>,
    /// Temporary collages are removed by the periodic cleanup.
    pub temporary: bool,
    pub period: PeriodSpec,
    pub items: Vec<CollageItem>,
}

impl Collage {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Collage {
            id,
            name: name.into(),
            owner: None,
            temporary: false,
            period: PeriodSpec::default(),
            items: Vec::new(),
        }
    }

    /// Items sorted by `(index, name)`; equal keys keep their stored order.
    pub fn ordered_items(&self) -> Vec<&CollageItem> {
        let mut items: Vec<&CollageItem> = self.items.iter().collect();
        items.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, index: i32) -> CollageItem {
        let mut item = CollageItem::new(id, name, SeriesIdentifier::new("fews", "LOC", "Q"));
        item.index = index;
        item
    }

    #[test]
    fn new_item_uses_default_index() {
        let item = CollageItem::new(1, "Waterlevel", SeriesIdentifier::new("fews", "LOC", "H"));
        assert_eq!(item.index, DEFAULT_ITEM_INDEX);
        assert!(item.boundary_value.is_none());
        assert!(item.percentile_value.is_none());
    }

    #[test]
    fn ordered_items_sorts_by_index_then_name() {
        let mut collage = Collage::new(1, "Polder");
        collage.items = vec![
            item(1, "Zeta", 100),
            item(2, "Alpha", 100),
            item(3, "Omega", 10),
            item(4, "Alpha", 100),
        ];
        let ids: Vec<i64> = collage.ordered_items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn new_collage_is_permanent_and_unfiltered() {
        let collage = Collage::new(7, "Rivers");
        assert!(!collage.temporary);
        assert!(collage.period.is_unrestricted());
        assert!(collage.ordered_items().is_empty());
    }
}
