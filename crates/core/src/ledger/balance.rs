//! Running balance replay.

use rust_decimal::Decimal;

use fenceledger_shared::types::TransactionId;

use super::error::LedgerError;
use super::types::LedgerTransaction;
use crate::amount::checked_sum;

/// Cumulative `debit - credit` of a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningBalance {
    current: Decimal,
}

impl RunningBalance {
    /// Starts an empty ledger at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Decimal::ZERO,
        }
    }

    /// Applies one entry and returns the balance after it.
    ///
    /// Returns `None`, leaving the balance unchanged, when the result would
    /// leave the stored range.
    pub fn apply(&mut self, debit: Decimal, credit: Decimal) -> Option<Decimal> {
        let change = debit.checked_sub(credit)?;
        self.current = checked_sum(self.current, change)?;
        Some(self.current)
    }

    /// Balance after the last applied entry.
    #[must_use]
    pub const fn current(&self) -> Decimal {
        self.current
    }
}

/// Sorts ascending by date, equal dates by ID.
pub fn sort_chronologically(entries: &mut [LedgerTransaction]) {
    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
}

/// Replays a whole ledger, assigning every entry its running total.
///
/// The entries are sorted chronologically in place. Returns the `(id, total)`
/// pairs whose stored total changed; a second replay returns nothing.
///
/// # Errors
///
/// `OutOfRange("total")` when a running total would leave the stored range.
pub fn replay(
    entries: &mut [LedgerTransaction],
) -> Result<Vec<(TransactionId, Decimal)>, LedgerError> {
    sort_chronologically(entries);

    let mut balance = RunningBalance::new();
    let mut changed = Vec::new();
    for entry in entries.iter_mut() {
        let total = balance
            .apply(entry.debit, entry.credit)
            .ok_or(LedgerError::OutOfRange("total"))?;
        if entry.total != total {
            entry.total = total;
            changed.push((entry.id, total));
        }
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionType;
    use chrono::{Duration, TimeZone, Utc};
    use fenceledger_shared::types::UserId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn entry(day: i64, kind: TransactionType, amount: Decimal) -> LedgerTransaction {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap() + Duration::days(day);
        let (debit, credit) = kind.split_amount(amount);
        LedgerTransaction {
            id: TransactionId::new(),
            date,
            bill_no: String::new(),
            material_id: None,
            material_name: None,
            category: None,
            transaction_type: kind,
            quantity: dec!(1),
            unit_price: amount,
            debit,
            credit,
            total: Decimal::ZERO,
            party_id: None,
            party_name: None,
            notes: None,
            owner_id: UserId::new(),
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_running_balance() {
        let mut balance = RunningBalance::new();
        assert_eq!(balance.apply(dec!(1000), dec!(0)), Some(dec!(1000)));
        assert_eq!(balance.apply(dec!(0), dec!(400)), Some(dec!(600)));
        assert_eq!(balance.current(), dec!(600));
    }

    #[test]
    fn test_balance_beyond_stored_range_is_rejected() {
        let mut balance = RunningBalance::new();
        assert!(balance.apply(dec!(999999999999999), dec!(0)).is_some());
        assert_eq!(balance.apply(dec!(1), dec!(0)), None);
        assert_eq!(balance.current(), dec!(999999999999999));
    }

    #[test]
    fn test_replay_overflowing_total_fails() {
        let mut entries = vec![
            entry(0, TransactionType::Purchase, dec!(600000000000000)),
            entry(1, TransactionType::Sale, dec!(600000000000000)),
        ];
        assert!(matches!(replay(&mut entries), Err(LedgerError::OutOfRange("total"))));
    }

    #[test]
    fn test_back_dated_entry_shifts_later_totals() {
        let mut entries = vec![
            entry(0, TransactionType::Purchase, dec!(1000)),
            entry(5, TransactionType::Payment, dec!(300)),
        ];
        replay(&mut entries).unwrap();
        assert_eq!(entries[1].total, dec!(700));

        entries.push(entry(2, TransactionType::Purchase, dec!(50)));
        let changed = replay(&mut entries).unwrap();

        let totals: Vec<Decimal> = entries.iter().map(|e| e.total).collect();
        assert_eq!(totals, vec![dec!(1000), dec!(1050), dec!(750)]);
        // the first entry is untouched
        assert_eq!(changed.len(), 2);
    }

    #[test]
    fn test_equal_dates_ordered_by_id() {
        let mut first = entry(0, TransactionType::Purchase, dec!(10));
        let mut second = entry(0, TransactionType::Payment, dec!(4));
        first.id = TransactionId::from_uuid(Uuid::from_u128(1));
        second.id = TransactionId::from_uuid(Uuid::from_u128(2));
        let (first_id, second_id) = (first.id, second.id);

        let mut entries = vec![second, first];
        replay(&mut entries).unwrap();

        assert_eq!(entries[0].id, first_id);
        assert_eq!(entries[1].id, second_id);
        assert_eq!(entries[1].total, dec!(6));
    }

    fn kind_strategy() -> impl Strategy<Value = TransactionType> {
        prop::sample::select(TransactionType::ALL.to_vec())
    }

    fn entries_strategy() -> impl Strategy<Value = Vec<LedgerTransaction>> {
        prop::collection::vec(
            (0i64..30, kind_strategy(), 0i64..1_000_000i64),
            0..25,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .map(|(day, kind, cents)| entry(day, kind, Decimal::new(cents, 2)))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every stored total equals the prefix sum of `debit - credit`.
        #[test]
        fn prop_totals_are_prefix_sums(mut entries in entries_strategy()) {
            replay(&mut entries).unwrap();

            let mut sum = Decimal::ZERO;
            for window in entries.windows(2) {
                prop_assert!((window[0].date, window[0].id) <= (window[1].date, window[1].id));
            }
            for entry in &entries {
                sum += entry.debit - entry.credit;
                prop_assert_eq!(entry.total, sum);
            }
        }

        /// Replaying an already consistent ledger changes nothing.
        #[test]
        fn prop_replay_idempotent(mut entries in entries_strategy()) {
            replay(&mut entries).unwrap();
            let snapshot = entries.clone();

            prop_assert!(replay(&mut entries).unwrap().is_empty());
            prop_assert_eq!(entries, snapshot);
        }

        /// Input order does not matter.
        #[test]
        fn prop_input_order_irrelevant(mut entries in entries_strategy()) {
            let mut reversed: Vec<_> = entries.iter().rev().cloned().collect();
            replay(&mut entries).unwrap();
            replay(&mut reversed).unwrap();

            prop_assert_eq!(entries, reversed);
        }

        /// Removing an entry and replaying gives the same totals as never having it.
        #[test]
        fn prop_delete_then_replay_consistent(
            mut entries in entries_strategy(),
            pick in any::<prop::sample::Index>(),
        ) {
            prop_assume!(!entries.is_empty());
            replay(&mut entries).unwrap();
            let removed = pick.index(entries.len());
            entries.remove(removed);

            let mut fresh = entries.clone();
            for e in &mut fresh {
                e.total = Decimal::ZERO;
            }
            replay(&mut entries).unwrap();
            replay(&mut fresh).unwrap();

            prop_assert_eq!(entries, fresh);
        }
    }
}
