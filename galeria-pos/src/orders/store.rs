//! TableOrderStore - single source of truth for every open table tab
//!
//! # Mutation Flow
//!
//! ```text
//! save_items / merge_item(s) / set_quantity / clear_table
//!     ├─ 1. Validate input (no state touched on error)
//!     ├─ 2. Take write lock, rebuild the table's item list
//!     ├─ 3. Recompute total, stamp last_updated
//!     ├─ 4. Persist whole map to KvStore (best-effort, logged)
//!     └─ 5. Broadcast full map snapshot to subscribers
//! ```
//!
//! In-memory state is authoritative for the running session: a failed
//! write is logged and the mutation stands.

use super::error::{StoreError, StoreResult};
use super::money;
use super::storage::{KvStore, StorageError, StorageResult};
use parking_lot::RwLock;
use shared::{LineItem, TableOrder};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Storage key holding the serialized `[table_number, TableOrder]` list
pub const TABLE_ORDERS_KEY: &str = "table_orders";

/// Snapshot broadcast channel capacity
const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// All open orders, keyed by table number
pub type TableOrderMap = BTreeMap<u32, TableOrder>;

pub struct TableOrderStore {
    orders: RwLock<TableOrderMap>,
    kv: Arc<dyn KvStore>,
    snapshot_tx: broadcast::Sender<Arc<TableOrderMap>>,
}

impl std::fmt::Debug for TableOrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableOrderStore")
            .field("open_tables", &self.orders.read().len())
            .field("kv", &"<KvStore>")
            .finish()
    }
}

impl TableOrderStore {
    /// Build the store from whatever the durable store holds
    ///
    /// Read or decode failures yield an empty store.
    pub fn load(kv: Arc<dyn KvStore>) -> Self {
        let orders = match read_persisted(kv.as_ref()) {
            Ok(orders) => {
                if !orders.is_empty() {
                    tracing::info!(open_tables = orders.len(), "Table orders restored");
                }
                orders
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to restore table orders, starting empty");
                TableOrderMap::new()
            }
        };
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            orders: RwLock::new(orders),
            kv,
            snapshot_tx,
        }
    }

    /// Subscribe to full-map snapshots, sent after every mutation
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<TableOrderMap>> {
        self.snapshot_tx.subscribe()
    }

    // ========== Queries ==========

    /// Copy of the table's items, empty if there is no order
    pub fn get_items(&self, table: u32) -> Vec<LineItem> {
        self.orders
            .read()
            .get(&table)
            .map(|order| order.items.clone())
            .unwrap_or_default()
    }

    pub fn get_order(&self, table: u32) -> Option<TableOrder> {
        self.orders.read().get(&table).cloned()
    }

    /// Cached total, 0 if there is no order
    pub fn total_for(&self, table: u32) -> f64 {
        self.orders
            .read()
            .get(&table)
            .map(|order| order.total)
            .unwrap_or(0.0)
    }

    pub fn has_order(&self, table: u32) -> bool {
        self.orders
            .read()
            .get(&table)
            .is_some_and(|order| !order.is_empty())
    }

    /// All tables with a non-empty order, ascending by table number
    pub fn list_active(&self) -> Vec<TableOrder> {
        self.orders
            .read()
            .values()
            .filter(|order| !order.is_empty())
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> Arc<TableOrderMap> {
        Arc::new(self.orders.read().clone())
    }

    // ========== Mutations ==========

    /// Replace the table's items wholesale
    ///
    /// Lines with quantity <= 0 are dropped; an empty result removes the
    /// order. Duplicate `item_id`s are rejected.
    pub fn save_items(&self, table: u32, items: Vec<LineItem>) -> StoreResult<()> {
        validate_table(table)?;
        let items = prepare_replacement(items)?;

        let mut orders = self.orders.write();
        write_entry(&mut orders, table, items);
        self.commit(&orders);
        tracing::debug!(table, total = self.total_in(&orders, table), "Table items saved");
        Ok(())
    }

    /// Merge one incoming line: existing `item_id` adds quantity, otherwise append
    pub fn merge_item(&self, table: u32, line: LineItem) -> StoreResult<()> {
        self.merge_items(table, vec![line])
    }

    /// Merge a batch of lines with a single persist/notify
    ///
    /// Either every line is merged or none is.
    pub fn merge_items(&self, table: u32, lines: Vec<LineItem>) -> StoreResult<()> {
        validate_table(table)?;
        for line in &lines {
            money::validate_quantity(&line.item_id, line.quantity)?;
            money::validate_price(line)?;
        }
        if lines.is_empty() {
            return Ok(());
        }

        let mut orders = self.orders.write();
        let mut items = orders
            .get(&table)
            .map(|order| order.items.clone())
            .unwrap_or_default();
        for line in lines {
            merge_line(&mut items, line)?;
        }
        write_entry(&mut orders, table, items);
        self.commit(&orders);
        tracing::debug!(table, total = self.total_in(&orders, table), "Items merged into table");
        Ok(())
    }

    /// Set one line's quantity; quantity <= 0 removes the line
    pub fn set_quantity(&self, table: u32, item_id: &str, quantity: i32) -> StoreResult<()> {
        validate_table(table)?;
        if quantity > money::MAX_QUANTITY {
            return Err(StoreError::InvalidQuantity {
                item_id: item_id.to_string(),
                quantity,
            });
        }

        let mut orders = self.orders.write();
        let Some(order) = orders
            .get(&table)
            .filter(|order| order.find_item(item_id).is_some())
        else {
            return Err(StoreError::ItemNotFound {
                table,
                item_id: item_id.to_string(),
            });
        };
        let items: Vec<LineItem> = order
            .items
            .iter()
            .filter(|item| quantity > 0 || item.item_id != item_id)
            .cloned()
            .map(|mut item| {
                if item.item_id == item_id {
                    item.quantity = quantity;
                }
                item
            })
            .collect();
        write_entry(&mut orders, table, items);
        self.commit(&orders);
        Ok(())
    }

    pub fn remove_item(&self, table: u32, item_id: &str) -> StoreResult<()> {
        self.set_quantity(table, item_id, 0)
    }

    /// Drop the table's order from memory and storage
    ///
    /// Returns whether an order existed.
    pub fn clear_table(&self, table: u32) -> bool {
        let mut orders = self.orders.write();
        let existed = orders.remove(&table).is_some();
        self.commit(&orders);
        tracing::info!(table, existed, "Table cleared");
        existed
    }

    /// Drop every order and delete the storage key
    pub fn clear_all(&self) {
        let mut orders = self.orders.write();
        orders.clear();
        if let Err(e) = self.kv.remove(TABLE_ORDERS_KEY) {
            tracing::error!(error = %e, "Failed to remove table orders from storage");
        }
        self.notify(&orders);
        tracing::info!("All table orders cleared");
    }

    // ========== Internals ==========

    fn total_in(&self, orders: &TableOrderMap, table: u32) -> f64 {
        orders.get(&table).map(|o| o.total).unwrap_or(0.0)
    }

    /// Persist then notify; called with the write lock held so writes land in order
    fn commit(&self, orders: &TableOrderMap) {
        if let Err(e) = write_persisted(self.kv.as_ref(), orders) {
            tracing::error!(error = %e, "Failed to persist table orders, keeping in-memory state");
        }
        self.notify(orders);
    }

    fn notify(&self, orders: &TableOrderMap) {
        if self.snapshot_tx.receiver_count() == 0 {
            return;
        }
        // Err only means every receiver was dropped in between
        let _ = self.snapshot_tx.send(Arc::new(orders.clone()));
    }
}

fn validate_table(table: u32) -> StoreResult<()> {
    if table == 0 {
        return Err(StoreError::InvalidTable(table));
    }
    Ok(())
}

/// Drop non-positive lines, then validate prices and uniqueness
fn prepare_replacement(items: Vec<LineItem>) -> StoreResult<Vec<LineItem>> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity <= 0 {
            continue;
        }
        money::validate_quantity(&item.item_id, item.quantity)?;
        money::validate_price(&item)?;
        if !seen.insert(item.item_id.clone()) {
            return Err(StoreError::DuplicateItem(item.item_id));
        }
        kept.push(item);
    }
    Ok(kept)
}

/// Name, price and category of an existing line are kept; only quantity grows
fn merge_line(items: &mut Vec<LineItem>, line: LineItem) -> StoreResult<()> {
    match items.iter_mut().find(|item| item.item_id == line.item_id) {
        Some(existing) => {
            let quantity = existing.quantity.saturating_add(line.quantity);
            money::validate_quantity(&line.item_id, quantity)?;
            existing.quantity = quantity;
        }
        None => items.push(line),
    }
    Ok(())
}

fn write_entry(orders: &mut TableOrderMap, table: u32, items: Vec<LineItem>) {
    if items.is_empty() {
        orders.remove(&table);
        return;
    }
    let order = TableOrder {
        table_number: table,
        total: money::order_total(&items),
        items,
        last_updated: shared::util::now(),
    };
    orders.insert(table, order);
}

fn write_persisted(kv: &dyn KvStore, orders: &TableOrderMap) -> StorageResult<()> {
    let entries: Vec<(u32, &TableOrder)> = orders.iter().map(|(n, o)| (*n, o)).collect();
    let bytes = serde_json::to_vec(&entries)?;
    kv.set(TABLE_ORDERS_KEY, &bytes)
}

/// Decode the persisted list, re-establishing invariants on the way in
///
/// Entries keyed 0 or left empty are dropped, as are lines with a
/// non-positive quantity or an invalid price. Duplicate lines are merged
/// and totals recomputed.
fn read_persisted(kv: &dyn KvStore) -> StorageResult<TableOrderMap> {
    let Some(bytes) = kv.get(TABLE_ORDERS_KEY)? else {
        return Ok(TableOrderMap::new());
    };
    let entries: Vec<(u32, TableOrder)> =
        serde_json::from_slice(&bytes).map_err(StorageError::from)?;

    let mut orders = TableOrderMap::new();
    for (table, order) in entries {
        if table == 0 {
            continue;
        }
        let mut items: Vec<LineItem> = Vec::with_capacity(order.items.len());
        let valid = order
            .items
            .into_iter()
            .filter(|i| i.quantity > 0 && money::validate_price(i).is_ok());
        for item in valid {
            match items.iter_mut().find(|i| i.item_id == item.item_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity)
                }
                None => items.push(item),
            }
        }
        if items.is_empty() {
            continue;
        }
        orders.insert(
            table,
            TableOrder {
                table_number: table,
                total: money::order_total(&items),
                items,
                last_updated: order.last_updated,
            },
        );
    }
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::storage::RedbKvStore;
    use shared::ItemCategory;

    fn create_test_store() -> (TableOrderStore, Arc<RedbKvStore>) {
        let kv = Arc::new(RedbKvStore::open_in_memory().unwrap());
        (TableOrderStore::load(kv.clone()), kv)
    }

    fn cafe(quantity: i32) -> LineItem {
        LineItem::new("cafe1", "Café", 3.0, quantity, ItemCategory::BeverageFood)
    }

    fn vasija() -> LineItem {
        LineItem::new("c1", "Vasija", 15.0, 1, ItemCategory::Ceramic)
    }

    /// Store whose writes always fail
    struct BrokenKv;

    impl KvStore for BrokenKv {
        fn get(&self, _key: &str) -> StorageResult<Option<Vec<u8>>> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
        fn set(&self, _key: &str, _value: &[u8]) -> StorageResult<()> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
        fn remove(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
    }

    fn persisted_tables(kv: &RedbKvStore) -> Vec<u32> {
        let bytes = kv.get(TABLE_ORDERS_KEY).unwrap().unwrap_or_default();
        if bytes.is_empty() {
            return vec![];
        }
        let entries: Vec<(u32, TableOrder)> = serde_json::from_slice(&bytes).unwrap();
        entries.into_iter().map(|(n, _)| n).collect()
    }

    #[test]
    fn test_merge_adds_quantities() {
        let (store, _) = create_test_store();
        store.merge_item(5, cafe(2)).unwrap();
        store.merge_item(5, cafe(1)).unwrap();

        let items = store.get_items(5);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(store.total_for(5), 9.0);
        assert!(store.has_order(5));
    }

    #[test]
    fn test_merge_keeps_captured_name_and_price() {
        let (store, _) = create_test_store();
        store.merge_item(1, cafe(1)).unwrap();
        let mut repriced = cafe(1);
        repriced.unit_price = 4.0;
        repriced.name = "Café doble".to_string();
        store.merge_item(1, repriced).unwrap();

        let items = store.get_items(1);
        assert_eq!(items[0].unit_price, 3.0);
        assert_eq!(items[0].name, "Café");
        assert_eq!(store.total_for(1), 6.0);
    }

    #[test]
    fn test_merge_rejects_non_positive_quantity() {
        let (store, _) = create_test_store();
        let err = store.merge_item(2, cafe(0)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuantity { quantity: 0, .. }));
        assert!(!store.has_order(2));
    }

    #[test]
    fn test_sub_cent_price_rejected_and_total_is_line_sum() {
        let (store, _) = create_test_store();
        let gramo = LineItem::new("g", "Gramo", 0.125, 1, ItemCategory::BeverageFood);
        let err = store.merge_item(5, gramo.clone()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPrice { price, .. } if price == 0.125));
        assert!(matches!(
            store.save_items(5, vec![gramo]),
            Err(StoreError::InvalidPrice { .. })
        ));
        assert!(!store.has_order(5));

        store
            .merge_items(5, vec![cafe(3), LineItem::new("t", "Té", 2.25, 2, ItemCategory::BeverageFood)])
            .unwrap();
        let sum: f64 = store
            .get_items(5)
            .iter()
            .map(|i| i.unit_price * f64::from(i.quantity))
            .sum();
        assert_eq!(store.total_for(5), sum);
        assert_eq!(store.total_for(5), 13.5);
    }

    #[test]
    fn test_merge_over_max_quantity_rejected() {
        let (store, _) = create_test_store();
        store.merge_item(6, cafe(money::MAX_QUANTITY)).unwrap();
        let err = store.merge_item(6, cafe(1)).unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidQuantity {
                item_id: "cafe1".to_string(),
                quantity: money::MAX_QUANTITY + 1,
            }
        );
        assert_eq!(store.get_items(6)[0].quantity, money::MAX_QUANTITY);
    }

    #[test]
    fn test_set_quantity_over_max_rejected() {
        let (store, _) = create_test_store();
        store.merge_item(7, cafe(1)).unwrap();
        let err = store
            .set_quantity(7, "cafe1", money::MAX_QUANTITY + 1)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuantity { .. }));
        assert_eq!(store.get_items(7)[0].quantity, 1);
        assert_eq!(store.total_for(7), 3.0);
    }

    #[test]
    fn test_merge_items_is_all_or_nothing() {
        let (store, _) = create_test_store();
        store.merge_item(3, cafe(1)).unwrap();
        let mut bad = vasija();
        bad.unit_price = -1.0;
        let err = store.merge_items(3, vec![cafe(2), bad]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPrice { .. }));
        assert_eq!(store.get_items(3)[0].quantity, 1);
    }

    #[test]
    fn test_merge_appends_in_order() {
        let (store, _) = create_test_store();
        store.merge_items(4, vec![cafe(1), vasija()]).unwrap();
        let ids: Vec<_> = store.get_items(4).into_iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec!["cafe1", "c1"]);
        assert_eq!(store.total_for(4), 18.0);
    }

    #[test]
    fn test_invalid_table_number() {
        let (store, _) = create_test_store();
        assert_eq!(
            store.merge_item(0, cafe(1)),
            Err(StoreError::InvalidTable(0))
        );
        assert_eq!(store.save_items(0, vec![]), Err(StoreError::InvalidTable(0)));
    }

    #[test]
    fn test_save_items_replaces_and_drops_zero_quantities() {
        let (store, _) = create_test_store();
        store.merge_items(6, vec![cafe(2), vasija()]).unwrap();

        let mut items = store.get_items(6);
        items[0].quantity = 0;
        store.save_items(6, items).unwrap();

        let items = store.get_items(6);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_id, "c1");
        assert_eq!(store.total_for(6), 15.0);
    }

    #[test]
    fn test_save_items_rejects_duplicates() {
        let (store, _) = create_test_store();
        let err = store.save_items(7, vec![cafe(1), cafe(2)]).unwrap_err();
        assert_eq!(err, StoreError::DuplicateItem("cafe1".to_string()));
        assert!(!store.has_order(7));
    }

    #[test]
    fn test_save_empty_purges_table() {
        let (store, kv) = create_test_store();
        store.merge_item(8, cafe(1)).unwrap();
        store.save_items(8, vec![]).unwrap();
        assert!(!store.has_order(8));
        assert!(store.get_order(8).is_none());
        assert!(persisted_tables(&kv).is_empty());
    }

    #[test]
    fn test_get_items_is_a_copy() {
        let (store, _) = create_test_store();
        store.merge_item(9, cafe(1)).unwrap();
        let mut items = store.get_items(9);
        items[0].quantity = 50;
        assert_eq!(store.get_items(9)[0].quantity, 1);
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let (store, _) = create_test_store();
        store.merge_items(10, vec![cafe(1), vasija()]).unwrap();

        store.set_quantity(10, "cafe1", 4).unwrap();
        assert_eq!(store.total_for(10), 27.0);

        store.remove_item(10, "c1").unwrap();
        assert_eq!(store.total_for(10), 12.0);

        let err = store.set_quantity(10, "nope", 1).unwrap_err();
        assert!(matches!(err, StoreError::ItemNotFound { table: 10, .. }));

        store.set_quantity(10, "cafe1", 0).unwrap();
        assert!(!store.has_order(10));
    }

    #[test]
    fn test_clear_table() {
        let (store, kv) = create_test_store();
        store.merge_item(5, cafe(2)).unwrap();
        store.merge_item(6, vasija()).unwrap();

        assert!(store.clear_table(5));
        assert!(store.get_items(5).is_empty());
        assert!(!store.has_order(5));
        assert_eq!(store.total_for(5), 0.0);
        assert_eq!(persisted_tables(&kv), vec![6]);

        assert!(!store.clear_table(5));
    }

    #[test]
    fn test_clear_all_removes_key() {
        let (store, kv) = create_test_store();
        store.merge_item(1, cafe(1)).unwrap();
        store.merge_item(2, cafe(1)).unwrap();
        store.clear_all();
        assert!(store.list_active().is_empty());
        assert_eq!(kv.get(TABLE_ORDERS_KEY).unwrap(), None);
    }

    #[test]
    fn test_list_active_sorted_by_table() {
        let (store, _) = create_test_store();
        store.merge_item(12, cafe(1)).unwrap();
        store.merge_item(3, vasija()).unwrap();
        let tables: Vec<u32> = store.list_active().iter().map(|o| o.table_number).collect();
        assert_eq!(tables, vec![3, 12]);
    }

    #[test]
    fn test_reload_restores_same_map() {
        let (store, kv) = create_test_store();
        store.merge_items(5, vec![cafe(3), vasija()]).unwrap();
        store.merge_item(2, cafe(1)).unwrap();
        let before = store.snapshot();

        let reloaded = TableOrderStore::load(kv);
        assert_eq!(*reloaded.snapshot(), *before);
        assert_eq!(reloaded.total_for(5), 24.0);
    }

    #[test]
    fn test_load_recomputes_stale_totals() {
        let kv = Arc::new(RedbKvStore::open_in_memory().unwrap());
        let blob = serde_json::json!([
            [4, {
                "table_number": 4,
                "items": [
                    {"item_id": "cafe1", "name": "Café", "unit_price": 3.0, "quantity": 1, "category": "beverage_food"},
                    {"item_id": "cafe1", "name": "Café", "unit_price": 3.0, "quantity": 2, "category": "beverage_food"},
                    {"item_id": "g", "name": "Gramo", "unit_price": 0.125, "quantity": 1, "category": "beverage_food"}
                ],
                "total": 999.0,
                "last_updated": "2026-03-01T10:00:00Z"
            }],
            [7, {"table_number": 7, "items": [], "total": 0.0, "last_updated": "2026-03-01T10:00:00Z"}]
        ]);
        kv.set(TABLE_ORDERS_KEY, &serde_json::to_vec(&blob).unwrap())
            .unwrap();

        let store = TableOrderStore::load(kv);
        assert_eq!(store.get_items(4).len(), 1);
        assert_eq!(store.get_items(4)[0].quantity, 3);
        assert_eq!(store.total_for(4), 9.0);
        assert!(!store.has_order(7));
        assert_eq!(store.list_active().len(), 1);
    }

    #[test]
    fn test_corrupted_blob_loads_empty() {
        let kv = Arc::new(RedbKvStore::open_in_memory().unwrap());
        kv.set(TABLE_ORDERS_KEY, b"{not json").unwrap();
        let store = TableOrderStore::load(kv);
        assert!(store.list_active().is_empty());
    }

    #[test]
    fn test_storage_failure_keeps_memory_state() {
        let store = TableOrderStore::load(Arc::new(BrokenKv));
        store.merge_item(5, cafe(2)).unwrap();
        assert_eq!(store.total_for(5), 6.0);
        assert!(store.clear_table(5));
        store.clear_all();
    }

    #[test]
    fn test_subscribers_receive_full_map() {
        let (store, _) = create_test_store();
        let mut rx = store.subscribe();

        store.merge_item(1, cafe(1)).unwrap();
        store.merge_item(2, vasija()).unwrap();

        let first = rx.try_recv().unwrap();
        assert_eq!(first.len(), 1);
        let second = rx.try_recv().unwrap();
        assert_eq!(second.keys().copied().collect::<Vec<_>>(), vec![1, 2]);

        store.clear_table(1);
        let third = rx.try_recv().unwrap();
        assert_eq!(third.keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_total_matches_lines_after_every_mutation() {
        let (store, _) = create_test_store();
        let check = |store: &TableOrderStore| {
            let expected: f64 = store
                .get_items(11)
                .iter()
                .map(|i| i.unit_price * f64::from(i.quantity))
                .sum();
            assert_eq!(store.total_for(11), expected);
        };
        store.merge_item(11, cafe(2)).unwrap();
        check(&store);
        store.merge_item(11, vasija()).unwrap();
        check(&store);
        store.set_quantity(11, "cafe1", 5).unwrap();
        check(&store);
        store.remove_item(11, "c1").unwrap();
        check(&store);
        store.clear_table(11);
        check(&store);
    }
}
