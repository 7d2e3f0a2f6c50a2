//! Combine category, text and proximity filters into the visible POI set.
//!
//! The candidate set is the last proximity-search result while a search
//! centre is active and the full point list otherwise. Candidates then pass
//! through the category and text predicates in their original order.

use std::collections::BTreeMap;

use crate::{PointOfInterest, SearchState};

/// Points that should be displayed, with per-category counts.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VisibleSet<'a> {
    /// Points passing every active filter, in candidate order.
    pub visible: Vec<&'a PointOfInterest>,
    /// Number of visible points per category.
    pub category_counts: BTreeMap<&'a str, usize>,
}

impl VisibleSet<'_> {
    /// Number of visible points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Whether no point is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

/// Compute the visible set for the current search state.
///
/// # Examples
/// ```
/// use waypost_core::{Coordinate, PointOfInterest, SearchState, compute_visible_set};
///
/// let points = vec![
///     PointOfInterest::new(1, "Restaurante El Sabor", "Restaurante", Coordinate::new(-2.9, -79.0)),
///     PointOfInterest::new(2, "Hospital del Río", "Hospital", Coordinate::new(-2.88, -78.99)),
/// ];
/// let state = SearchState::default().with_text_query("resta");
///
/// let set = compute_visible_set(&points, &[], &state);
/// assert_eq!(set.visible.len(), 1);
/// assert_eq!(set.category_counts.get("Restaurante"), Some(&1));
/// ```
#[must_use]
pub fn compute_visible_set<'a>(
    all_points: &'a [PointOfInterest],
    search_results: &'a [PointOfInterest],
    state: &SearchState,
) -> VisibleSet<'a> {
    let candidates = if state.center.is_some() {
        search_results
    } else {
        all_points
    };

    let category = state.active_category();
    let query = normalise_query(&state.text_query);

    let visible: Vec<&PointOfInterest> = candidates
        .iter()
        .filter(|poi| matches_category(poi, category))
        .filter(|poi| matches_text(poi, query.as_deref()))
        .collect();

    let category_counts = count_categories(&visible);
    VisibleSet {
        visible,
        category_counts,
    }
}

fn normalise_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn matches_category(poi: &PointOfInterest, category: Option<&str>) -> bool {
    category.is_none_or(|wanted| poi.category == wanted)
}

fn matches_text(poi: &PointOfInterest, query: Option<&str>) -> bool {
    let Some(needle) = query else {
        return true;
    };
    poi.name.to_lowercase().contains(needle)
        || poi
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}

fn count_categories<'a>(visible: &[&'a PointOfInterest]) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for poi in visible {
        *counts.entry(poi.category.as_str()).or_insert(0) += 1;
    }
    counts
}
