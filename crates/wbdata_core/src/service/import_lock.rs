//! Per-indicator serialization of imports.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Hands out one mutex per indicator code.
///
/// Slots are never evicted; the key space is bounded by the catalog.
#[derive(Debug, Default)]
pub(crate) struct ImportLocks {
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ImportLocks {
    /// Returns the lock slot for `indicator`, creating it on first use.
    pub(crate) fn slot(&self, indicator: &str) -> Arc<Mutex<()>> {
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(slots.entry(indicator.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::ImportLocks;
    use std::sync::Arc;

    #[test]
    fn same_indicator_shares_one_slot() {
        let locks = ImportLocks::default();
        let first = locks.slot("NY.GDP.MKTP.CD");
        let second = locks.slot("NY.GDP.MKTP.CD");
        let other = locks.slot("SP.RUR.TOTL");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
    }
}
