use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coffeedocket_core::{CustomerId, DomainError, DomainResult, Money};

/// Customer status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

/// A customer record with its running loyalty counters.
///
/// `balance` is the number of prepaid coffees still redeemable. The invariant
/// maintained by the ledger is that `balance` always equals the signed sum of
/// all transactions applied to this customer in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub balance: i64,
    pub total_spent: Money,
    pub visit_count: i64,
    pub status: CustomerStatus,
    pub notify_email: bool,
    pub notify_sms: bool,
    pub last_visit: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency counter; bumped on every persisted mutation.
    pub version: i64,
}

impl Customer {
    /// Whether transactions may be recorded against this customer.
    pub fn can_transact(&self) -> bool {
        self.status == CustomerStatus::Active
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for creating a customer (staff action or self-signup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notify_email: bool,
    pub notify_sms: bool,
}

impl NewCustomer {
    /// Validate and build the initial record (balance and counters start at zero).
    pub fn into_customer(self, id: CustomerId, now: DateTime<Utc>) -> DomainResult<Customer> {
        if self.first_name.trim().is_empty() {
            return Err(DomainError::validation("first name cannot be empty"));
        }
        if self.last_name.trim().is_empty() {
            return Err(DomainError::validation("last name cannot be empty"));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }

        Ok(Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            balance: 0,
            total_spent: Money::ZERO,
            visit_count: 0,
            status: CustomerStatus::Active,
            notify_email: self.notify_email,
            notify_sms: self.notify_sms,
            last_visit: None,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }
}

/// Minimal shape check; the identity provider is the authority on deliverability.
pub fn validate_email(email: &str) -> DomainResult<()> {
    let trimmed = email.trim();
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || trimmed.contains(' ') {
        return Err(DomainError::validation(format!("malformed email: {email}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_customer() -> NewCustomer {
        NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: None,
            notify_email: true,
            notify_sms: false,
        }
    }

    #[test]
    fn new_customer_starts_with_zero_counters() {
        let c = new_customer()
            .into_customer(CustomerId::new(), Utc::now())
            .unwrap();
        assert_eq!(c.balance, 0);
        assert_eq!(c.total_spent, Money::ZERO);
        assert_eq!(c.visit_count, 0);
        assert_eq!(c.status, CustomerStatus::Active);
        assert!(c.last_visit.is_none());
        assert_eq!(c.version, 0);
    }

    #[test]
    fn rejects_blank_name() {
        let mut input = new_customer();
        input.first_name = "   ".to_string();
        let err = input
            .into_customer(CustomerId::new(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_malformed_email() {
        for bad in ["no-at-sign", "a@b", "a b@example.com", "@example.com"] {
            let mut input = new_customer();
            input.email = Some(bad.to_string());
            assert!(
                input.into_customer(CustomerId::new(), Utc::now()).is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn email_is_optional() {
        let mut input = new_customer();
        input.email = None;
        assert!(input.into_customer(CustomerId::new(), Utc::now()).is_ok());
    }

    #[test]
    fn inactive_customer_cannot_transact() {
        let mut c = new_customer()
            .into_customer(CustomerId::new(), Utc::now())
            .unwrap();
        assert!(c.can_transact());
        c.status = CustomerStatus::Inactive;
        assert!(!c.can_transact());
    }
}
