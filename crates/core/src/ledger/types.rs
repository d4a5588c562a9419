//! Ledger types.

use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, Utc};
use fenceledger_shared::types::{MaterialId, PartyId, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::date::deserialize_optional_datetime;
use super::error::LedgerError;
use crate::amount::checked_product;
use crate::material::MaterialCategory;
use crate::variant::UnknownVariant;

/// Kind of ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Goods bought in: stock up, debit.
    Purchase,
    /// Goods sold: stock down, debit.
    Sale,
    /// Money paid out: credit.
    Payment,
    /// Money received: credit.
    Receipt,
}

impl TransactionType {
    /// All transaction types.
    pub const ALL: [Self; 4] = [Self::Purchase, Self::Sale, Self::Payment, Self::Receipt];

    /// Wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "Purchase",
            Self::Sale => "Sale",
            Self::Payment => "Payment",
            Self::Receipt => "Receipt",
        }
    }

    /// Returns true for the goods-moving types, which require a material.
    #[must_use]
    pub const fn moves_stock(self) -> bool {
        matches!(self, Self::Purchase | Self::Sale)
    }

    /// Signed stock change for a quantity, `None` for money-only types.
    #[must_use]
    pub fn stock_delta(self, quantity: Decimal) -> Option<Decimal> {
        match self {
            Self::Purchase => Some(quantity),
            Self::Sale => Some(-quantity),
            Self::Payment | Self::Receipt => None,
        }
    }

    /// Splits an amount into `(debit, credit)`. Exactly one side carries the amount.
    #[must_use]
    pub fn split_amount(self, amount: Decimal) -> (Decimal, Decimal) {
        if self.moves_stock() {
            (amount, Decimal::ZERO)
        } else {
            (Decimal::ZERO, amount)
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Purchase" => Ok(Self::Purchase),
            "Sale" => Ok(Self::Sale),
            "Payment" => Ok(Self::Payment),
            "Receipt" => Ok(Self::Receipt),
            other => Err(UnknownVariant::new("transaction type", other)),
        }
    }
}

/// Identifies one running-balance ledger: a party as seen by one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerKey {
    /// Owner of the transactions.
    pub owner_id: UserId,
    /// Counterparty.
    pub party_id: PartyId,
}

/// A stored ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransaction {
    /// Transaction ID; breaks ties between equal dates.
    pub id: TransactionId,
    /// Business date.
    pub date: DateTime<Utc>,
    /// Unique human-facing number.
    pub bill_no: String,
    /// Material moved, Purchase and Sale only.
    pub material_id: Option<MaterialId>,
    /// Material name at the time of writing.
    pub material_name: Option<String>,
    /// Material category at the time of writing.
    pub category: Option<MaterialCategory>,
    /// Kind of transaction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Quantity, strictly positive.
    pub quantity: Decimal,
    /// Price per unit, never negative.
    pub unit_price: Decimal,
    /// Amount for Purchase and Sale.
    pub debit: Decimal,
    /// Amount for Payment and Receipt.
    pub credit: Decimal,
    /// Running balance of the party ledger up to and including this entry.
    pub total: Decimal,
    /// Counterparty.
    pub party_id: Option<PartyId>,
    /// Party name, kept in step with party renames.
    pub party_name: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// User who recorded the transaction.
    pub owner_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl LedgerTransaction {
    /// `quantity * unit_price` at storage precision, `None` when out of range.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        checked_product(self.quantity, self.unit_price)
    }

    /// Contribution to the running balance.
    #[must_use]
    pub fn net_change(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Re-derives debit and credit from type, quantity, and price.
    pub fn recompute_amounts(&mut self) -> Result<(), LedgerError> {
        let amount = self.amount().ok_or(LedgerError::OutOfRange("amount"))?;
        let (debit, credit) = self.transaction_type.split_amount(amount);
        self.debit = debit;
        self.credit = credit;
        Ok(())
    }

    /// Ledger this transaction belongs to, if it has a party.
    #[must_use]
    pub fn ledger_key(&self) -> Option<LedgerKey> {
        self.party_id.map(|party_id| LedgerKey {
            owner_id: self.owner_id,
            party_id,
        })
    }

    /// Material and signed quantity this transaction moved, if any.
    #[must_use]
    pub fn stock_effect(&self) -> Option<(MaterialId, Decimal)> {
        let material_id = self.material_id?;
        let delta = self.transaction_type.stock_delta(self.quantity)?;
        Some((material_id, delta))
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionInput {
    /// Kind of transaction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Quantity, must be positive.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Required for Purchase and Sale, ignored otherwise.
    #[serde(default)]
    pub material_id: Option<MaterialId>,
    /// Counterparty.
    #[serde(default)]
    pub party_id: Option<PartyId>,
    /// Business date, now when absent.
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub date: Option<DateTime<Utc>>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of a transaction. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionInput {
    /// New type.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// New quantity.
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// New unit price.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// New material; re-snapshots name and category when it differs.
    #[serde(default)]
    pub material_id: Option<MaterialId>,
    /// New party; re-snapshots the name when it differs.
    #[serde(default)]
    pub party_id: Option<PartyId>,
    /// New business date.
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub date: Option<DateTime<Utc>>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// List filter for transactions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Only this party.
    #[serde(default)]
    pub party_id: Option<PartyId>,
    /// Only this type.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// First calendar day included.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last calendar day included.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Filter for one party's entries.
    #[must_use]
    pub fn for_party(party_id: PartyId) -> Self {
        Self {
            party_id: Some(party_id),
            ..Self::default()
        }
    }

    /// Half-open UTC bounds `[from, until)` for the date range.
    ///
    /// `until` is midnight after `end_date`, so the whole end day is included.
    #[must_use]
    pub fn date_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let from = self
            .start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc());
        let until = self
            .end_date
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc());
        (from, until)
    }

    /// Returns true if the transaction passes every set criterion.
    #[must_use]
    pub fn matches(&self, tx: &LedgerTransaction) -> bool {
        let (from, until) = self.date_bounds();
        self.party_id.is_none_or(|id| tx.party_id == Some(id))
            && self
                .transaction_type
                .is_none_or(|t| tx.transaction_type == t)
            && from.is_none_or(|from| tx.date >= from)
            && until.is_none_or(|until| tx.date < until)
    }
}

/// A party's ledger as visible to one caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyStatement {
    /// The party.
    pub party_id: PartyId,
    /// Its current name.
    pub party_name: String,
    /// Entries in chronological order, `total` replayed over this list.
    pub entries: Vec<LedgerTransaction>,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Final running balance.
    pub balance: Decimal,
}
