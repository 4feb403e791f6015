//! Product selection sheet
//!
//! Backs the "add products" dialog: one catalog's active entries, each with
//! a pick count starting at 0. The picked rows become line items that get
//! merged into the table's tab.

use crate::services::CatalogProvider;
use shared::{CatalogEntry, ItemCategory, LineItem};

use super::money;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRow {
    pub entry: CatalogEntry,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct SelectionSheet {
    category: ItemCategory,
    rows: Vec<SelectionRow>,
}

impl SelectionSheet {
    /// Load the catalog; a failed fetch yields an empty sheet
    pub async fn load(catalog: &dyn CatalogProvider, category: ItemCategory) -> Self {
        match catalog.list_active(category).await {
            Ok(entries) => Self::from_entries(category, entries),
            Err(e) => {
                tracing::warn!(%category, error = %e, "Could not load catalog");
                Self::from_entries(category, Vec::new())
            }
        }
    }

    /// Inactive entries are skipped
    pub fn from_entries(category: ItemCategory, entries: Vec<CatalogEntry>) -> Self {
        let rows = entries
            .into_iter()
            .filter(|e| e.active)
            .map(|entry| SelectionRow { entry, quantity: 0 })
            .collect();
        Self { category, rows }
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    pub fn rows(&self) -> &[SelectionRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row_mut(&mut self, id: &str) -> Option<&mut SelectionRow> {
        self.rows.iter_mut().find(|row| row.entry.id == id)
    }

    /// Returns false if `id` is not on the sheet
    pub fn increment(&mut self, id: &str) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.quantity = (row.quantity + 1).min(money::MAX_QUANTITY);
                true
            }
            None => false,
        }
    }

    /// Never goes below 0
    pub fn decrement(&mut self, id: &str) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.quantity = (row.quantity - 1).max(0);
                true
            }
            None => false,
        }
    }

    /// Typed-in quantity; negatives clamp to 0
    pub fn set_quantity(&mut self, id: &str, quantity: i32) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.quantity = quantity.clamp(0, money::MAX_QUANTITY);
                true
            }
            None => false,
        }
    }

    /// Rows with a positive count
    pub fn selected(&self) -> impl Iterator<Item = &SelectionRow> {
        self.rows.iter().filter(|row| row.quantity > 0)
    }

    pub fn has_selection(&self) -> bool {
        self.selected().next().is_some()
    }

    pub fn total(&self) -> f64 {
        money::order_total(&self.line_items())
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.selected()
            .map(|row| LineItem::from_catalog(&row.entry, self.category, row.quantity))
            .collect()
    }

    pub fn into_line_items(self) -> Vec<LineItem> {
        self.line_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{GatewayError, GatewayResult};
    use async_trait::async_trait;

    fn entry(id: &str, price: f64, active: bool) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: id.to_uppercase(),
            price,
            description: None,
            active,
            image_ref: None,
        }
    }

    struct FixedCatalog(GatewayResult<Vec<CatalogEntry>>);

    #[async_trait]
    impl CatalogProvider for FixedCatalog {
        async fn list_active(&self, _category: ItemCategory) -> GatewayResult<Vec<CatalogEntry>> {
            self.0.clone()
        }
        async fn delete_entry(&self, _category: ItemCategory, _id: &str) -> GatewayResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_inactive_entries_skipped() {
        let sheet = SelectionSheet::from_entries(
            ItemCategory::BeverageFood,
            vec![entry("te", 2.0, true), entry("old", 1.0, false)],
        );
        assert_eq!(sheet.rows().len(), 1);
        assert!(sheet.rows().iter().all(|r| r.quantity == 0));
    }

    #[test]
    fn test_counts_never_negative() {
        let mut sheet =
            SelectionSheet::from_entries(ItemCategory::BeverageFood, vec![entry("te", 2.0, true)]);
        assert!(sheet.decrement("te"));
        assert_eq!(sheet.rows()[0].quantity, 0);
        assert!(sheet.set_quantity("te", -5));
        assert_eq!(sheet.rows()[0].quantity, 0);
        assert!(!sheet.increment("missing"));
        assert!(!sheet.has_selection());
    }

    #[test]
    fn test_selection_to_line_items() {
        let mut sheet = SelectionSheet::from_entries(
            ItemCategory::Ceramic,
            vec![entry("c1", 15.0, true), entry("c2", 25.0, true)],
        );
        sheet.increment("c2");
        sheet.increment("c2");
        sheet.decrement("c2");
        sheet.set_quantity("c1", 2);

        assert_eq!(sheet.total(), 55.0);
        let lines = sheet.into_line_items();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_id, "c1");
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].name, "C1");
        assert_eq!(lines[1].category, ItemCategory::Ceramic);
    }

    #[tokio::test]
    async fn test_load_failure_gives_empty_sheet() {
        let catalog = FixedCatalog(Err(GatewayError::Unavailable("offline".into())));
        let sheet = SelectionSheet::load(&catalog, ItemCategory::BeverageFood).await;
        assert!(sheet.is_empty());
    }

    #[tokio::test]
    async fn test_load_success() {
        let catalog = FixedCatalog(Ok(vec![entry("te", 2.0, true)]));
        let sheet = SelectionSheet::load(&catalog, ItemCategory::BeverageFood).await;
        assert_eq!(sheet.category(), ItemCategory::BeverageFood);
        assert_eq!(sheet.rows().len(), 1);
    }
}
