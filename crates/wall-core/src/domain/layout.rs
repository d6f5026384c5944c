//! Layout catalog domain entity.
//!
//! The appliance stores a list of named display layouts.  The client keeps the
//! most recently fetched list as an ordered [`LayoutCatalog`] and addresses
//! layouts by their zero-based *local index* within it.
//!
//! A local index is only meaningful against the catalog it was obtained from.
//! [`LayoutCatalog::replace`] swaps the whole list at once, after which any
//! previously returned index may name a different layout or lie past the end.

use thiserror::Error;

/// Appliance-assigned layout identifier.
pub type LayoutId = i32;

/// Sentinel reported to host integrations when no catalog entry matches.
pub const NOT_FOUND: i32 = -1;

/// Errors that can occur when addressing the catalog.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A local index does not exist in the current catalog.
    #[error("layout index {index} is out of range for a catalog of {len} layouts")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One appliance layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Identifier used by the appliance in `window-manager/layout` requests.
    pub id: LayoutId,
    /// Display name shown to operators.
    pub name: String,
}

impl Layout {
    pub fn new(id: LayoutId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Ordered catalog of the layouts the appliance last reported.
///
/// The catalog is created empty, replaced wholesale, and never edited in
/// place.  Each entry carries both id and name, so the two can never drift
/// out of step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutCatalog {
    layouts: Vec<Layout>,
}

impl LayoutCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every entry with `layouts`, preserving their order.
    ///
    /// All local indices handed out before this call are invalidated.
    pub fn replace(&mut self, layouts: Vec<Layout>) {
        self.layouts = layouts;
    }

    /// Number of layouts in the catalog.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Returns `true` if no catalog has been loaded yet, or the appliance
    /// reported no layouts.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Returns the layout at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Layout> {
        self.layouts.get(index)
    }

    /// Returns the appliance id of the layout at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::IndexOutOfRange`] if `index` is not a valid
    /// local index for the current catalog.
    pub fn id_at(&self, index: usize) -> Result<LayoutId, LayoutError> {
        self.get(index)
            .map(|layout| layout.id)
            .ok_or(LayoutError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Returns the display name of the layout at `index`, if any.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.get(index).map(|layout| layout.name.as_str())
    }

    /// Finds the local index of the layout with appliance id `id`.
    ///
    /// The search is linear and returns the first match in catalog order.
    /// Returns `None` if the id is absent or the catalog is empty.
    pub fn resolve(&self, id: LayoutId) -> Option<usize> {
        self.layouts.iter().position(|layout| layout.id == id)
    }

    /// Returns the layouts as a slice in catalog order.
    pub fn as_slice(&self) -> &[Layout] {
        &self.layouts
    }
}

impl From<Vec<Layout>> for LayoutCatalog {
    fn from(layouts: Vec<Layout>) -> Self {
        Self { layouts }
    }
}

/// Converts an optional local index into the signed form host integrations
/// expect, mapping `None` to [`NOT_FOUND`].
pub fn index_or_sentinel(index: Option<usize>) -> i32 {
    index
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(NOT_FOUND)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn main_and_alt() -> LayoutCatalog {
        LayoutCatalog::from(vec![Layout::new(5, "Main"), Layout::new(7, "Alt")])
    }

    #[test]
    fn test_new_catalog_is_empty() {
        let catalog = LayoutCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_resolve_returns_matching_local_index() {
        // Arrange
        let catalog = main_and_alt();

        // Act / Assert
        assert_eq!(catalog.resolve(5), Some(0));
        assert_eq!(catalog.resolve(7), Some(1));
    }

    #[test]
    fn test_resolve_unknown_id_returns_none() {
        let catalog = main_and_alt();
        assert_eq!(catalog.resolve(99), None);
    }

    #[test]
    fn test_resolve_on_empty_catalog_returns_none() {
        assert_eq!(LayoutCatalog::new().resolve(5), None);
    }

    #[test]
    fn test_resolve_duplicate_ids_returns_first_match() {
        let catalog = LayoutCatalog::from(vec![
            Layout::new(3, "A"),
            Layout::new(3, "B"),
        ]);
        assert_eq!(catalog.resolve(3), Some(0));
    }

    #[test]
    fn test_resolve_result_is_always_within_bounds() {
        // Every id in the catalog resolves to an index inside the catalog.
        let catalog = LayoutCatalog::from(
            (0..20).map(|i| Layout::new(i * 3, format!("L{i}"))).collect::<Vec<_>>(),
        );
        for id in -5..70 {
            if let Some(index) = catalog.resolve(id) {
                assert!(index < catalog.len());
                assert_eq!(catalog.id_at(index), Ok(id));
            }
        }
    }

    #[test]
    fn test_replace_swaps_whole_catalog() {
        // Arrange
        let mut catalog = main_and_alt();

        // Act
        catalog.replace(vec![Layout::new(9, "Only")]);

        // Assert: the old entries are gone, indices now refer to the new list
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve(5), None);
        assert_eq!(catalog.name_at(0), Some("Only"));
        assert_eq!(catalog.name_at(1), None);
    }

    #[test]
    fn test_id_at_out_of_range_is_an_error() {
        let catalog = main_and_alt();
        assert_eq!(
            catalog.id_at(2),
            Err(LayoutError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_slice_preserves_catalog_order() {
        let catalog = main_and_alt();
        let names: Vec<&str> = catalog.as_slice().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Main", "Alt"]);
    }

    #[test]
    fn test_index_or_sentinel() {
        assert_eq!(index_or_sentinel(Some(1)), 1);
        assert_eq!(index_or_sentinel(None), NOT_FOUND);
    }
}
