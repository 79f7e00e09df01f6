use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coffeedocket_core::{CustomerId, DomainError, DomainResult, Money, StaffId, TransactionId};

/// Transaction kind.
///
/// `Topup` and `Refund` credit the balance; `Serve` debits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Topup,
    Serve,
    Refund,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Topup => "topup",
            TransactionKind::Serve => "serve",
            TransactionKind::Refund => "refund",
        }
    }
}

impl core::str::FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topup" => Ok(TransactionKind::Topup),
            "serve" => Ok(TransactionKind::Serve),
            "refund" => Ok(TransactionKind::Refund),
            other => Err(DomainError::validation(format!(
                "kind must be one of: topup, serve, refund (got {other:?})"
            ))),
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction as submitted by staff, before it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub customer_id: CustomerId,
    pub staff_id: StaffId,
    pub kind: TransactionKind,
    pub coffee_count: i64,
    /// Money charged; only meaningful for topup/serve.
    pub amount: Option<Money>,
    /// Display-only descriptors copied from the menu at serve time.
    pub drink: Option<String>,
    pub size: Option<String>,
    pub addons: Vec<String>,
    pub discount: Option<Money>,
    pub notes: Option<String>,
}

impl TransactionDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.coffee_count <= 0 {
            return Err(DomainError::validation(format!(
                "coffee count must be > 0, got {}",
                self.coffee_count
            )));
        }
        if self.kind == TransactionKind::Refund && self.amount.is_some() {
            return Err(DomainError::validation(
                "a refund cannot carry a charge amount",
            ));
        }
        Ok(())
    }

    /// Human-readable summary stored on the record (the log keeps copied
    /// strings, never menu foreign keys).
    pub fn describe(&self) -> String {
        let coffees = if self.coffee_count == 1 {
            "1 coffee".to_string()
        } else {
            format!("{} coffees", self.coffee_count)
        };
        match self.kind {
            TransactionKind::Topup => match self.amount {
                Some(amount) => format!("Top-up of {coffees} for {amount}"),
                None => format!("Top-up of {coffees}"),
            },
            TransactionKind::Refund => format!("Refund of {coffees}"),
            TransactionKind::Serve => {
                let mut parts = Vec::new();
                if let Some(size) = &self.size {
                    parts.push(size.clone());
                }
                if let Some(drink) = &self.drink {
                    parts.push(drink.clone());
                }
                let mut description = if parts.is_empty() {
                    format!("Served {coffees}")
                } else {
                    format!("Served {coffees}: {}", parts.join(" "))
                };
                if !self.addons.is_empty() {
                    description.push_str(&format!(" with {}", self.addons.join(", ")));
                }
                description
            }
        }
    }
}

/// An immutable ledger entry. Once recorded it is never mutated or deleted
/// by the application; there is no edit or void path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub customer_id: CustomerId,
    pub staff_id: StaffId,
    pub kind: TransactionKind,
    pub coffee_count: i64,
    pub amount: Option<Money>,
    pub drink: Option<String>,
    pub size: Option<String>,
    pub addons: Vec<String>,
    pub discount: Option<Money>,
    pub notes: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Seal a validated draft into a record.
    pub fn from_draft(draft: TransactionDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        draft.validate()?;
        let description = draft.describe();
        Ok(Self {
            id: TransactionId::new(),
            customer_id: draft.customer_id,
            staff_id: draft.staff_id,
            kind: draft.kind,
            coffee_count: draft.coffee_count,
            amount: draft.amount,
            drink: draft.drink,
            size: draft.size,
            addons: draft.addons,
            discount: draft.discount,
            notes: draft.notes,
            description,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: TransactionKind, coffee_count: i64) -> TransactionDraft {
        TransactionDraft {
            customer_id: CustomerId::new(),
            staff_id: StaffId::new(),
            kind,
            coffee_count,
            amount: None,
            drink: None,
            size: None,
            addons: vec![],
            discount: None,
            notes: None,
        }
    }

    #[test]
    fn rejects_zero_and_negative_coffee_count() {
        assert!(draft(TransactionKind::Topup, 0).validate().is_err());
        assert!(draft(TransactionKind::Serve, -3).validate().is_err());
        assert!(draft(TransactionKind::Topup, 1).validate().is_ok());
    }

    #[test]
    fn rejects_refund_with_amount() {
        let mut d = draft(TransactionKind::Refund, 2);
        d.amount = Some(Money::from_cents(500).unwrap());
        assert!(d.validate().is_err());
    }

    #[test]
    fn topup_description_includes_amount_when_present() {
        let mut d = draft(TransactionKind::Topup, 10);
        d.amount = Some(Money::from_cents(3500).unwrap());
        assert_eq!(d.describe(), "Top-up of 10 coffees for 35.00");
    }

    #[test]
    fn serve_description_lists_descriptors() {
        let mut d = draft(TransactionKind::Serve, 1);
        d.drink = Some("cappuccino".to_string());
        d.size = Some("large".to_string());
        d.addons = vec!["oat milk".to_string(), "caramel".to_string()];
        assert_eq!(
            d.describe(),
            "Served 1 coffee: large cappuccino with oat milk, caramel"
        );
    }

    #[test]
    fn kind_parses_and_displays() {
        for kind in [
            TransactionKind::Topup,
            TransactionKind::Serve,
            TransactionKind::Refund,
        ] {
            let parsed: TransactionKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("void".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn from_draft_validates_first() {
        let bad = draft(TransactionKind::Serve, 0);
        assert!(Transaction::from_draft(bad, Utc::now()).is_err());
    }
}
