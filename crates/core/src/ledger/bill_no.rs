//! Bill number generation.
//!
//! Numbers look like `BILL-1718031234567-0`: the millisecond clock followed by a
//! sequence that restarts whenever the clock moves forward. If the clock stalls or
//! steps back, the last millisecond is kept and the sequence keeps counting, so a
//! generator never hands out the same pair twice.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;

#[derive(Debug)]
struct BillState {
    millis: i64,
    sequence: u32,
}

/// Process-wide monotonic bill number source.
#[derive(Debug)]
pub struct BillNumberGenerator {
    state: Mutex<BillState>,
}

impl Default for BillNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BillNumberGenerator {
    /// Creates a generator that has issued nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(BillState {
                millis: i64::MIN,
                sequence: 0,
            }),
        }
    }

    /// Issues the next bill number using the wall clock.
    pub fn next(&self) -> String {
        self.next_at(Utc::now().timestamp_millis())
    }

    fn next_at(&self, now_millis: i64) -> String {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if now_millis > state.millis {
            state.millis = now_millis;
            state.sequence = 0;
        } else if let Some(sequence) = state.sequence.checked_add(1) {
            state.sequence = sequence;
        } else {
            state.millis += 1;
            state.sequence = 0;
        }

        format!("BILL-{}-{}", state.millis, state.sequence)
    }
}

static GENERATOR: BillNumberGenerator = BillNumberGenerator::new();

/// Issues the next bill number from the process-wide generator.
pub fn next_bill_no() -> String {
    GENERATOR.next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_format() {
        let generator = BillNumberGenerator::new();
        assert_eq!(generator.next_at(1_718_031_234_567), "BILL-1718031234567-0");
        assert_eq!(generator.next_at(1_718_031_234_567), "BILL-1718031234567-1");
        assert_eq!(generator.next_at(1_718_031_234_568), "BILL-1718031234568-0");
    }

    #[test]
    fn test_clock_step_back_keeps_counting() {
        let generator = BillNumberGenerator::new();
        generator.next_at(2_000);
        assert_eq!(generator.next_at(1_000), "BILL-2000-1");
        assert_eq!(generator.next_at(1_500), "BILL-2000-2");
    }

    #[test]
    fn test_sequential_stress_unique() {
        let generator = BillNumberGenerator::new();
        let issued: HashSet<String> = (0..5_000).map(|_| generator.next()).collect();
        assert_eq!(issued.len(), 5_000);
    }

    #[test]
    fn test_concurrent_unique() {
        let generator = Arc::new(BillNumberGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || (0..500).map(|_| generator.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut issued = HashSet::new();
        for handle in handles {
            for bill in handle.join().unwrap() {
                assert!(issued.insert(bill));
            }
        }
        assert_eq!(issued.len(), 4_000);
    }

    #[test]
    fn test_global_source_unique() {
        let issued: HashSet<String> = (0..1_000).map(|_| next_bill_no()).collect();
        assert_eq!(issued.len(), 1_000);
    }
}
