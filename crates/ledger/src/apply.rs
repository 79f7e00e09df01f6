//! BalanceLedger arithmetic.
//!
//! The arithmetic never clamps at zero: a serve can drive the balance
//! negative, so replaying any transaction sequence always yields the
//! starting balance plus the signed sum of its events (topups and refunds
//! credit, serves debit). Whether an overdraw is *permitted* is a policy
//! question answered by [`check_serve_allowed`] before the transaction is
//! recorded. Overflow is the one thing the arithmetic does guard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coffeedocket_core::{DomainError, DomainResult};

use crate::customer::Customer;
use crate::transaction::{Transaction, TransactionKind};

/// What to do when a serve would take the balance below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdraftPolicy {
    /// Reject the serve with a conflict error (the default).
    Reject,
    /// Record the serve and let the balance go negative.
    AllowOverdraw,
}

impl Default for OverdraftPolicy {
    fn default() -> Self {
        OverdraftPolicy::Reject
    }
}

/// Guard evaluated by the service layer before recording a serve.
pub fn check_serve_allowed(
    customer: &Customer,
    coffee_count: i64,
    policy: OverdraftPolicy,
) -> DomainResult<()> {
    if policy == OverdraftPolicy::Reject && customer.balance < coffee_count {
        return Err(DomainError::conflict(format!(
            "insufficient balance: have {}, serve needs {}",
            customer.balance, coffee_count
        )));
    }
    Ok(())
}

/// Apply one transaction to a customer snapshot.
///
/// - topup: `balance += coffee_count`; a charge amount is recorded on the
///   transaction only and never touches `total_spent`.
/// - serve: `balance -= coffee_count` (no clamp here), `total_spent` grows by
///   the charge when present, `visit_count += 1`, `last_visit` is stamped.
/// - refund: `balance += coffee_count`.
///
/// The version counter bumps by one per applied transaction. A count that
/// would overflow the balance is an invariant violation; the customer is
/// left untouched.
pub fn apply_transaction(
    customer: &mut Customer,
    tx: &Transaction,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    match tx.kind {
        TransactionKind::Topup => {
            customer.balance = credit_balance(customer.balance, tx.coffee_count)?;
        }
        TransactionKind::Serve => {
            customer.balance = customer
                .balance
                .checked_sub(tx.coffee_count)
                .ok_or_else(|| DomainError::invariant("coffee balance overflow"))?;
            if let Some(amount) = tx.amount {
                customer.total_spent = customer.total_spent.add(amount)?;
            }
            customer.visit_count += 1;
            customer.last_visit = Some(now);
        }
        TransactionKind::Refund => {
            customer.balance = credit_balance(customer.balance, tx.coffee_count)?;
        }
    }
    customer.updated_at = now;
    customer.version += 1;
    Ok(())
}

fn credit_balance(balance: i64, count: i64) -> DomainResult<i64> {
    balance
        .checked_add(count)
        .ok_or_else(|| DomainError::invariant("coffee balance overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::NewCustomer;
    use crate::transaction::TransactionDraft;
    use coffeedocket_core::{CustomerId, Money, StaffId};
    use proptest::prelude::*;

    fn customer() -> Customer {
        NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: None,
            notify_email: false,
            notify_sms: false,
        }
        .into_customer(CustomerId::new(), Utc::now())
        .unwrap()
    }

    fn tx(kind: TransactionKind, coffee_count: i64, amount_cents: Option<i64>) -> Transaction {
        Transaction::from_draft(
            TransactionDraft {
                customer_id: CustomerId::new(),
                staff_id: StaffId::new(),
                kind,
                coffee_count,
                amount: amount_cents.map(|c| Money::from_cents(c).unwrap()),
                drink: None,
                size: None,
                addons: vec![],
                discount: None,
                notes: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn serve_then_topup_then_refund_scenario() {
        let mut c = customer();
        c.balance = 5;

        apply_transaction(&mut c, &tx(TransactionKind::Serve, 1, Some(450)), Utc::now()).unwrap();
        assert_eq!(c.balance, 4);
        assert_eq!(c.total_spent, Money::from_cents(450).unwrap());
        assert_eq!(c.visit_count, 1);
        assert!(c.last_visit.is_some());

        apply_transaction(&mut c, &tx(TransactionKind::Topup, 10, Some(3500)), Utc::now()).unwrap();
        assert_eq!(c.balance, 14);
        // A topup charge never counts toward spend.
        assert_eq!(c.total_spent, Money::from_cents(450).unwrap());
        assert_eq!(c.visit_count, 1);

        apply_transaction(&mut c, &tx(TransactionKind::Refund, 2, None), Utc::now()).unwrap();
        assert_eq!(c.balance, 16);
        assert_eq!(c.visit_count, 1);
    }

    #[test]
    fn serve_at_zero_goes_negative_without_error() {
        let mut c = customer();
        assert_eq!(c.balance, 0);
        apply_transaction(&mut c, &tx(TransactionKind::Serve, 1, None), Utc::now()).unwrap();
        assert_eq!(c.balance, -1);
    }

    #[test]
    fn serve_without_amount_leaves_spend_unchanged() {
        let mut c = customer();
        c.balance = 3;
        apply_transaction(&mut c, &tx(TransactionKind::Serve, 1, None), Utc::now()).unwrap();
        assert_eq!(c.total_spent, Money::ZERO);
        assert_eq!(c.visit_count, 1);
    }

    #[test]
    fn overflowing_counts_are_rejected_not_wrapped() {
        let mut c = customer();
        c.balance = 1;
        let err = apply_transaction(&mut c, &tx(TransactionKind::Topup, i64::MAX, None), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        // Rejection leaves the snapshot untouched.
        assert_eq!(c.balance, 1);
        assert_eq!(c.version, 0);

        c.balance = i64::MIN + 1;
        assert!(apply_transaction(&mut c, &tx(TransactionKind::Serve, 2, None), Utc::now()).is_err());
        assert_eq!(c.balance, i64::MIN + 1);
    }

    #[test]
    fn version_bumps_once_per_transaction() {
        let mut c = customer();
        apply_transaction(&mut c, &tx(TransactionKind::Topup, 5, None), Utc::now()).unwrap();
        apply_transaction(&mut c, &tx(TransactionKind::Serve, 1, None), Utc::now()).unwrap();
        assert_eq!(c.version, 2);
    }

    #[test]
    fn reject_policy_blocks_overdraw() {
        let mut c = customer();
        c.balance = 2;
        assert!(check_serve_allowed(&c, 3, OverdraftPolicy::Reject).is_err());
        assert!(check_serve_allowed(&c, 2, OverdraftPolicy::Reject).is_ok());
        assert!(check_serve_allowed(&c, 3, OverdraftPolicy::AllowOverdraw).is_ok());
    }

    proptest! {
        /// Replaying any sequence yields the starting balance plus the
        /// signed sum of its events.
        #[test]
        fn replay_matches_signed_sum(
            initial in 0i64..500,
            events in proptest::collection::vec((0u8..3, 1i64..50), 0..40),
        ) {
            let mut c = customer();
            c.balance = initial;

            let mut expected = initial;
            for (kind, count) in &events {
                let kind = match kind {
                    0 => TransactionKind::Topup,
                    1 => TransactionKind::Serve,
                    _ => TransactionKind::Refund,
                };
                match kind {
                    TransactionKind::Serve => expected -= count,
                    _ => expected += count,
                }
                apply_transaction(&mut c, &tx(kind, *count, None), Utc::now()).unwrap();
            }

            prop_assert_eq!(c.balance, expected);
            prop_assert_eq!(c.version, events.len() as i64);
        }
    }
}
