//! Grouping and summarising transfer objects.
//!
//! Both operations are pure. Grouping partitions its input: every item lands
//! in exactly one group, and for a fixed input order the group order and the
//! order within each group are stable.

use serde::Serialize;

/// Order in which groups are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// Order in which each key was first encountered.
    #[default]
    FirstSeen,
    /// Keys sorted lexicographically. Items keep their input order within
    /// each group.
    Lexicographic,
}

/// One group of a [`GroupedResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<T> {
    key: String,
    items: Vec<T>,
}

impl<T> Group<T> {
    /// Grouping key shared by every item.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Items in input order.
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

/// Ordered mapping from grouping key to the items sharing it.
///
/// Serialises as an array of `{ key, items }` objects so the group order
/// survives JSON round trips.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedResult<T> {
    groups: Vec<Group<T>>,
}

impl<T> GroupedResult<T> {
    /// Groups in emission order.
    pub fn groups(&self) -> &[Group<T>] {
        &self.groups
    }

    /// Items stored under `key`, if the key exists.
    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.groups
            .iter()
            .find(|group| group.key == key)
            .map(|group| group.items.as_slice())
    }

    /// Keys in emission order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    /// Total number of items across every group.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Partition `items` by `key_fn`.
///
/// # Examples
/// ```
/// use classbook::domain::{GroupOrder, group_by};
///
/// let grouped = group_by(vec!["bb", "a", "cc", "b"], |s| s.len().to_string(), GroupOrder::FirstSeen);
/// let keys: Vec<_> = grouped.keys().collect();
/// assert_eq!(keys, ["2", "1"]);
/// assert_eq!(grouped.get("2"), Some(&["bb", "cc"][..]));
/// ```
pub fn group_by<T>(
    items: Vec<T>,
    key_fn: impl Fn(&T) -> String,
    order: GroupOrder,
) -> GroupedResult<T> {
    let mut groups: Vec<Group<T>> = Vec::new();
    for item in items {
        let key = key_fn(&item);
        match groups.iter_mut().find(|group| group.key == key) {
            Some(group) => group.items.push(item),
            None => groups.push(Group {
                key,
                items: vec![item],
            }),
        }
    }
    if order == GroupOrder::Lexicographic {
        groups.sort_by(|left, right| left.key.cmp(&right.key));
    }
    GroupedResult { groups }
}

/// Count and spread of a numeric projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of items summarised.
    pub count: usize,
    /// Arithmetic mean, `0` when there are no items.
    pub average: f64,
    /// Smallest value, absent when there are no items.
    pub minimum: Option<f64>,
    /// Largest value, absent when there are no items.
    pub maximum: Option<f64>,
}

/// Summarise `items` through `value_fn`.
///
/// # Examples
/// ```
/// use classbook::domain::summarize;
///
/// let empty = summarize::<u8>(&[], |v| f64::from(*v));
/// assert_eq!(empty.count, 0);
/// assert_eq!(empty.average, 0.0);
///
/// let grades = summarize(&[70_u8, 80, 90], |v| f64::from(*v));
/// assert_eq!(grades.average, 80.0);
/// assert_eq!(grades.maximum, Some(90.0));
/// ```
pub fn summarize<T>(items: &[T], value_fn: impl Fn(&T) -> f64) -> Summary {
    let mut total = 0.0;
    let mut minimum: Option<f64> = None;
    let mut maximum: Option<f64> = None;
    for item in items {
        let value = value_fn(item);
        total += value;
        minimum = Some(minimum.map_or(value, |current| current.min(value)));
        maximum = Some(maximum.map_or(value, |current| current.max(value)));
    }
    let count = items.len();
    let average = if count == 0 {
        0.0
    } else {
        total / count as f64
    };
    Summary {
        count,
        average,
        minimum,
        maximum,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn classes() -> Vec<(&'static str, u32)> {
        vec![("10B", 1), ("10A", 2), ("10B", 3), ("9A", 4), ("10A", 5)]
    }

    #[rstest]
    fn first_seen_order_is_stable() {
        let grouped = group_by(classes(), |(class, _)| (*class).to_owned(), GroupOrder::FirstSeen);

        let keys: Vec<_> = grouped.keys().collect();
        assert_eq!(keys, ["10B", "10A", "9A"]);
        assert_eq!(grouped.get("10B"), Some(&[("10B", 1), ("10B", 3)][..]));
    }

    #[rstest]
    fn lexicographic_order_preserves_item_order() {
        let grouped = group_by(
            classes(),
            |(class, _)| (*class).to_owned(),
            GroupOrder::Lexicographic,
        );

        let keys: Vec<_> = grouped.keys().collect();
        assert_eq!(keys, ["10A", "10B", "9A"]);
        assert_eq!(grouped.get("10A"), Some(&[("10A", 2), ("10A", 5)][..]));
    }

    #[rstest]
    #[case(GroupOrder::FirstSeen)]
    #[case(GroupOrder::Lexicographic)]
    fn groups_partition_input(#[case] order: GroupOrder) {
        let input = classes();
        let grouped = group_by(input.clone(), |(class, _)| (*class).to_owned(), order);

        assert_eq!(grouped.item_count(), input.len());
        for item in &input {
            let occurrences = grouped
                .groups()
                .iter()
                .filter(|group| group.items().contains(item))
                .count();
            assert_eq!(occurrences, 1, "{item:?} must appear in exactly one group");
        }
    }

    #[rstest]
    fn grouping_nothing_yields_no_groups() {
        let grouped = group_by(Vec::<u8>::new(), |v| v.to_string(), GroupOrder::FirstSeen);
        assert!(grouped.is_empty());
    }

    #[rstest]
    fn summary_of_empty_is_zero() {
        let summary = summarize::<u8>(&[], |v| f64::from(*v));
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.minimum, None);
        assert_eq!(summary.maximum, None);
    }

    #[rstest]
    fn summary_reports_spread() {
        let summary = summarize(&[55_u8, 100, 70], |v| f64::from(*v));
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, 75.0);
        assert_eq!(summary.minimum, Some(55.0));
        assert_eq!(summary.maximum, Some(100.0));
    }

    #[rstest]
    fn grouped_result_serialises_in_order() {
        let grouped = group_by(vec![("b", 1), ("a", 2)], |(k, _)| (*k).to_owned(), GroupOrder::FirstSeen);
        let value = serde_json::to_value(&grouped).expect("serialises");
        assert_eq!(
            value,
            serde_json::json!([
                { "key": "b", "items": [["b", 1]] },
                { "key": "a", "items": [["a", 2]] }
            ])
        );
    }
}
