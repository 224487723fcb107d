//! Order store
//!
//! Canonical order records keyed by id, with a secondary unique index
//! on the idempotency key. Ids are assigned sequentially on insert.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use types::errors::ExchangeError;
use types::ids::{OrderId, UserId};
use types::order::Order;

/// Concurrent order record store
#[derive(Debug)]
pub struct OrderStore {
    orders: DashMap<OrderId, Order>,
    by_idempotency_key: DashMap<String, OrderId>,
    next_id: AtomicU64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            by_idempotency_key: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Persist a new order, assigning its id
    ///
    /// Enforces idempotency-key uniqueness across all orders; a
    /// colliding key fails with DUPLICATE and persists nothing.
    pub fn insert(&self, mut order: Order) -> Result<Order, ExchangeError> {
        let id = OrderId(self.next_id.fetch_add(1, Ordering::SeqCst));
        order.id = id;

        if let Some(key) = order.idempotency_key.clone() {
            match self.by_idempotency_key.entry(key) {
                Entry::Occupied(occupied) => {
                    return Err(ExchangeError::Duplicate {
                        key: occupied.key().clone(),
                    })
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(id);
                }
            }
        }

        self.orders.insert(id, order.clone());
        Ok(order)
    }

    /// Update an existing order record
    pub fn save(&self, order: &Order) {
        self.orders.insert(order.id, order.clone());
    }

    /// Mutate an order under its row lock, returning the new record
    ///
    /// Concurrent settlements touching the same resting order are
    /// serialized here.
    pub fn modify<F>(&self, id: OrderId, f: F) -> Option<Order>
    where
        F: FnOnce(&mut Order),
    {
        self.orders.get_mut(&id).map(|mut order| {
            f(&mut order);
            order.clone()
        })
    }

    /// Load by id
    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).map(|o| o.clone())
    }

    /// Load by id, scoped to its owner
    pub fn get_owned(&self, id: OrderId, user_id: UserId) -> Option<Order> {
        self.orders
            .get(&id)
            .filter(|o| o.user_id == user_id)
            .map(|o| o.clone())
    }

    /// Look up by idempotency key
    pub fn find_by_idempotency_key(&self, key: &str) -> Option<Order> {
        let id = *self.by_idempotency_key.get(key)?;
        self.get(id)
    }

    /// All orders of a user, oldest first
    pub fn list_by_user(&self, user_id: UserId) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        orders.sort_by_key(|o| o.id);
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::currency::{Currency, Symbol};
    use types::numeric::{Price, Quantity};
    use types::order::{OrderKind, OrderStatus, Side};

    fn new_order(user: u64, key: Option<&str>) -> Order {
        Order {
            id: OrderId(0), // assigned by the store
            user_id: UserId(user),
            kind: OrderKind::LIMIT,
            side: Side::BUY,
            symbol: Symbol::new(Currency::BTC, Currency::USDT),
            price: Some(Price::from_u64(50000)),
            quantity: "1.0".parse().unwrap(),
            filled_quantity: Quantity::zero(),
            status: OrderStatus::OPEN,
            idempotency_key: key.map(str::to_string),
            created_at: 1_708_123_456_789_000_000,
            updated_at: 1_708_123_456_789_000_000,
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = OrderStore::new();
        let o1 = store.insert(new_order(1, None)).unwrap();
        let o2 = store.insert(new_order(1, None)).unwrap();

        assert!(o1.id < o2.id);
        assert_eq!(store.get(o1.id).unwrap(), o1);
    }

    #[test]
    fn test_idempotency_key_collision() {
        let store = OrderStore::new();
        store.insert(new_order(1, Some("key-1"))).unwrap();

        let err = store.insert(new_order(1, Some("key-1"))).unwrap_err();
        assert!(matches!(err, ExchangeError::Duplicate { .. }));
    }

    #[test]
    fn test_find_by_idempotency_key() {
        let store = OrderStore::new();
        let order = store.insert(new_order(1, Some("key-7"))).unwrap();

        assert_eq!(store.find_by_idempotency_key("key-7").unwrap(), order);
        assert!(store.find_by_idempotency_key("missing").is_none());
    }

    #[test]
    fn test_get_owned_checks_user() {
        let store = OrderStore::new();
        let order = store.insert(new_order(1, None)).unwrap();

        assert!(store.get_owned(order.id, UserId(1)).is_some());
        assert!(store.get_owned(order.id, UserId(2)).is_none());
    }

    #[test]
    fn test_save_updates_record() {
        let store = OrderStore::new();
        let mut order = store.insert(new_order(1, None)).unwrap();

        order.fill("0.4".parse().unwrap(), 1_708_123_456_790_000_000);
        store.save(&order);

        let loaded = store.get(order.id).unwrap();
        assert_eq!(loaded.status, OrderStatus::PARTIAL);
        assert_eq!(loaded.filled_quantity, "0.4".parse().unwrap());
    }

    #[test]
    fn test_modify_under_row_lock() {
        let store = OrderStore::new();
        let order = store.insert(new_order(1, None)).unwrap();

        let updated = store
            .modify(order.id, |o| o.fill("1.0".parse().unwrap(), 2))
            .unwrap();
        assert_eq!(updated.status, OrderStatus::FILLED);
        assert_eq!(store.get(order.id).unwrap(), updated);

        assert!(store.modify(OrderId(999), |_| {}).is_none());
    }

    #[test]
    fn test_list_by_user_oldest_first() {
        let store = OrderStore::new();
        let o1 = store.insert(new_order(1, None)).unwrap();
        store.insert(new_order(2, None)).unwrap();
        let o3 = store.insert(new_order(1, None)).unwrap();

        let orders = store.list_by_user(UserId(1));
        assert_eq!(
            orders.iter().map(|o| o.id).collect::<Vec<_>>(),
            vec![o1.id, o3.id]
        );
    }
}
