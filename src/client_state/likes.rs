use chrono::NaiveDate;
use uuid::Uuid;

use super::StateStore;

/// Per-day "liked" flags, so a visitor can like a product once per calendar day.
pub struct LikeLedger<'a, S: StateStore + ?Sized> {
    store: &'a mut S,
    today: NaiveDate,
}

impl<'a, S: StateStore + ?Sized> LikeLedger<'a, S> {
    pub fn new(store: &'a mut S, today: NaiveDate) -> Self {
        Self { store, today }
    }

    pub fn key(product_id: Uuid, day: NaiveDate) -> String {
        format!("liked:{product_id}:{day}")
    }

    pub fn is_liked(&self, product_id: Uuid) -> bool {
        self.store.get(&Self::key(product_id, self.today)).is_some()
    }

    pub fn mark(&mut self, product_id: Uuid) {
        self.store.set(&Self::key(product_id, self.today), "1".to_string());
    }

    pub fn unmark(&mut self, product_id: Uuid) {
        self.store.remove(&Self::key(product_id, self.today));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_state::MemoryStore;

    #[test]
    fn flags_expire_with_the_day() {
        let mut store = MemoryStore::new();
        let id = Uuid::from_u128(7);
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).expect("date");
        let tuesday = NaiveDate::from_ymd_opt(2026, 10, 20).expect("date");

        LikeLedger::new(&mut store, monday).mark(id);
        assert!(LikeLedger::new(&mut store, monday).is_liked(id));
        assert!(!LikeLedger::new(&mut store, tuesday).is_liked(id));
    }

    #[test]
    fn unmark_clears_todays_flag() {
        let mut store = MemoryStore::new();
        let id = Uuid::from_u128(7);
        let day = NaiveDate::from_ymd_opt(2026, 1, 2).expect("date");
        let mut ledger = LikeLedger::new(&mut store, day);
        ledger.mark(id);
        ledger.unmark(id);
        assert!(!ledger.is_liked(id));
        assert!(store.is_empty());
    }

    #[test]
    fn key_contains_product_and_date() {
        let id = Uuid::nil();
        let day = NaiveDate::from_ymd_opt(2026, 3, 4).expect("date");
        assert_eq!(
            LikeLedger::<MemoryStore>::key(id, day),
            "liked:00000000-0000-0000-0000-000000000000:2026-03-04"
        );
    }
}
