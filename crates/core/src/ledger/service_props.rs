//! Property-based tests for LedgerService.
//!
//! Random sequences of create, update, and delete against one owner's ledger
//! for two parties must leave every stored total equal to the chronological
//! prefix sum, and stock equal to the floored replay of every stock movement.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::*;
use crate::auth::UserRole;
use crate::material::{Material, MaterialCategory};
use crate::party::Party;
use crate::test_support::{InMemoryStore, principal};
use fenceledger_shared::types::TransactionId;

#[derive(Debug, Clone)]
enum Op {
    Create {
        kind: TransactionType,
        second_party: bool,
        day: i64,
        qty: i64,
        price: i64,
    },
    Update {
        pick: prop::sample::Index,
        day: Option<i64>,
        price: Option<i64>,
        swap_party: bool,
    },
    Delete {
        pick: prop::sample::Index,
    },
}

fn kind_strategy() -> impl Strategy<Value = TransactionType> {
    prop::sample::select(TransactionType::ALL.to_vec())
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (kind_strategy(), any::<bool>(), 0i64..20, 1i64..50, 0i64..500).prop_map(
            |(kind, second_party, day, qty, price)| Op::Create {
                kind,
                second_party,
                day,
                qty,
                price,
            }
        ),
        2 => (
            any::<prop::sample::Index>(),
            prop::option::of(0i64..20),
            prop::option::of(0i64..500),
            any::<bool>(),
        )
            .prop_map(|(pick, day, price, swap_party)| Op::Update {
                pick,
                day,
                price,
                swap_party,
            }),
        1 => any::<prop::sample::Index>().prop_map(|pick| Op::Delete { pick }),
    ]
}

fn assert_ledgers_consistent(
    store: &InMemoryStore,
    parties: &[Party],
) -> Result<(), TestCaseError> {
    for party in parties {
        let mut entries: Vec<LedgerTransaction> = store
            .transactions()
            .into_iter()
            .filter(|tx| tx.party_id == Some(party.id))
            .collect();
        sort_chronologically(&mut entries);

        let mut running = Decimal::ZERO;
        for entry in &entries {
            prop_assert_eq!(entry.debit + entry.credit, entry.quantity * entry.unit_price);
            prop_assert!(entry.debit.is_zero() || entry.credit.is_zero());
            running += entry.debit - entry.credit;
            prop_assert_eq!(entry.total, running);
        }
    }
    Ok(())
}

async fn run(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let store = InMemoryStore::new();
    let user = principal(UserRole::StoreBoy);
    let material: Material =
        store.seed_material(user.user_id, MaterialCategory::Raw, Decimal::ZERO);
    let parties = [
        store.seed_party(user.user_id, "First"),
        store.seed_party(user.user_id, "Second"),
    ];
    let service = LedgerService::new(&store);
    let base = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    let mut live: Vec<TransactionId> = Vec::new();

    for op in ops {
        match op {
            Op::Create { kind, second_party, day, qty, price } => {
                let party = &parties[usize::from(second_party)];
                let tx = service
                    .create(
                        &user,
                        CreateTransactionInput {
                            transaction_type: kind,
                            quantity: Decimal::from(qty),
                            unit_price: Decimal::new(price, 1),
                            material_id: Some(material.id),
                            party_id: Some(party.id),
                            date: Some(base + Duration::days(day)),
                            notes: None,
                        },
                    )
                    .await
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                live.push(tx.id);
            }
            Op::Update { pick, day, price, swap_party } => {
                if live.is_empty() {
                    continue;
                }
                let id = live[pick.index(live.len())];
                let current = store.transaction(id).ok_or_else(|| TestCaseError::fail("missing"))?;
                let party_id = swap_party.then(|| {
                    if current.party_id == Some(parties[0].id) {
                        parties[1].id
                    } else {
                        parties[0].id
                    }
                });
                service
                    .update(
                        &user,
                        id,
                        UpdateTransactionInput {
                            date: day.map(|d| base + Duration::days(d)),
                            unit_price: price.map(|p| Decimal::new(p, 1)),
                            party_id,
                            ..UpdateTransactionInput::default()
                        },
                    )
                    .await
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
            Op::Delete { pick } => {
                if live.is_empty() {
                    continue;
                }
                let id = live.remove(pick.index(live.len()));
                service
                    .delete(&user, id)
                    .await
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
        }

        assert_ledgers_consistent(&store, &parties)?;
        prop_assert!(store.material(material.id).map(|m| m.quantity) >= Some(Decimal::ZERO));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Stored totals match a chronological replay after every operation.
    #[test]
    fn prop_totals_consistent_after_every_mutation(
        ops in prop::collection::vec(op_strategy(), 1..30),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(run(ops))?;
    }

    /// Creating and then deleting a purchase restores stock exactly.
    #[test]
    fn prop_purchase_then_delete_restores_stock(start in 0i64..1_000, qty in 1i64..1_000) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(async {
            let store = InMemoryStore::new();
            let user = principal(UserRole::StoreBoy);
            let material =
                store.seed_material(user.user_id, MaterialCategory::Raw, Decimal::from(start));
            let service = LedgerService::new(&store);

            let tx = service
                .create(
                    &user,
                    CreateTransactionInput {
                        transaction_type: TransactionType::Purchase,
                        quantity: Decimal::from(qty),
                        unit_price: Decimal::ONE,
                        material_id: Some(material.id),
                        party_id: None,
                        date: None,
                        notes: None,
                    },
                )
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            service
                .delete(&user, tx.id)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(
                store.material(material.id).map(|m| m.quantity),
                Some(Decimal::from(start))
            );
            Ok::<(), TestCaseError>(())
        })?;
    }
}
