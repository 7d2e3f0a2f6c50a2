//! Map markers for POI categories.
//!
//! The category set is fetched from the backend at runtime, so a category
//! without a dedicated marker is expected and falls back to a generic pin.

/// Marker shown for a POI category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CategoryMarker {
    /// Fork and knife.
    Restaurant,
    /// Hospital building.
    Hospital,
    /// School building.
    School,
    /// Tree.
    Park,
    /// Bank building.
    Bank,
    /// Plain pin for categories without a dedicated marker.
    Generic,
}

impl CategoryMarker {
    /// Marker for `category`, matching the backend's category names.
    ///
    /// # Examples
    /// ```
    /// use waypost_core::CategoryMarker;
    ///
    /// assert_eq!(CategoryMarker::for_category("Parque"), CategoryMarker::Park);
    /// assert_eq!(CategoryMarker::for_category("Museo"), CategoryMarker::Generic);
    /// ```
    #[must_use]
    pub fn for_category(category: &str) -> Self {
        match category {
            "Restaurante" => Self::Restaurant,
            "Hospital" => Self::Hospital,
            "Escuela" => Self::School,
            "Parque" => Self::Park,
            "Banco" => Self::Bank,
            _ => Self::Generic,
        }
    }

    /// Glyph drawn inside the marker.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Restaurant => "🍴",
            Self::Hospital => "🏥",
            Self::School => "🏫",
            Self::Park => "🌳",
            Self::Bank => "🏦",
            Self::Generic => "📍",
        }
    }
}
