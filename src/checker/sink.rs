use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Collects the distinct unresolved items reported by every worker.
///
/// Items are deduplicated case-insensitively; when two spellings of the same
/// item arrive, the one that sorts first is kept so the result does not
/// depend on which worker got there first.
#[derive(Debug, Default)]
pub struct ErrorSink {
    items: Mutex<BTreeMap<String, String>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item. Returns `true` if it was not seen before.
    pub fn add_word(&self, item: impl Into<String>) -> bool {
        let item = item.into();
        let key = item.to_lowercase();

        let mut items = self.items.lock();
        match items.get_mut(&key) {
            Some(existing) => {
                if item < *existing {
                    *existing = item;
                }
                false
            }
            None => {
                items.insert(key, item);
                true
            }
        }
    }

    pub fn count(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn clear(&self) {
        self.items.lock().clear();
    }

    /// Distinct items in natural string order.
    pub fn items(&self) -> Vec<String> {
        let mut items: Vec<String> = self.items.lock().values().cloned().collect();
        items.sort();
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_dedup_and_order() {
        let sink = ErrorSink::new();
        assert!(sink.add_word("teh"));
        assert!(sink.add_word("recieve"));
        assert!(!sink.add_word("teh"));
        assert!(!sink.add_word("Teh"));

        assert_eq!(sink.count(), 2);
        assert_eq!(sink.items(), vec!["Teh", "recieve"]);
    }

    #[test]
    fn test_clear() {
        let sink = ErrorSink::new();
        sink.add_word("wrod");
        sink.clear();
        assert!(sink.is_empty());
        assert!(sink.items().is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let sink = Arc::new(ErrorSink::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..100 {
                        sink.add_word(format!("word{}", i));
                        sink.add_word(format!("only{}", t));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(sink.count(), 108);
    }
}
