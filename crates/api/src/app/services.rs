//! Store/identity wiring and the application facade.

use std::sync::Arc;

use chrono::Utc;

use coffeedocket_auth::Role;
use coffeedocket_core::{CustomerId, StaffId};
use coffeedocket_ledger::{Customer, NewCustomer, OverdraftPolicy};
use coffeedocket_store::{
    CustomerStore, IdentityAccount, IdentityProvider, InMemoryIdentityProvider, InMemoryStore,
    MenuStore, StoreError, TransactionStore,
};

use crate::config::Config;
use crate::search::SearchRegistry;

#[cfg(feature = "postgres")]
use coffeedocket_store::PostgresStore;
#[cfg(feature = "postgres")]
use sqlx::PgPool;

/// Application services handed to every handler.
///
/// The stores are trait objects so the same router runs against the
/// in-memory double and the Postgres backend.
pub struct AppServices {
    pub customers: Arc<dyn CustomerStore>,
    pub transactions: Arc<dyn TransactionStore>,
    pub menu: Arc<dyn MenuStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub search: SearchRegistry,
}

pub async fn build_services(config: &Config) -> AppServices {
    let identity: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::new());

    seed_admin_account(config, identity.as_ref()).await;

    #[cfg(feature = "postgres")]
    if config.use_postgres {
        match &config.database_url {
            Some(url) => match PgPool::connect(url).await {
                Ok(pool) => {
                    tracing::info!("using postgres store");
                    let store = Arc::new(PostgresStore::new(pool, OverdraftPolicy::Reject));
                    return assemble(store.clone(), store.clone(), store, identity);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "postgres unavailable; falling back to in-memory store");
                }
            },
            None => {
                tracing::warn!("USE_POSTGRES_STORE set but DATABASE_URL missing; using in-memory store");
            }
        }
    }

    let store = Arc::new(InMemoryStore::new(OverdraftPolicy::Reject));
    assemble(store.clone(), store.clone(), store, identity)
}

fn assemble(
    customers: Arc<dyn CustomerStore>,
    transactions: Arc<dyn TransactionStore>,
    menu: Arc<dyn MenuStore>,
    identity: Arc<dyn IdentityProvider>,
) -> AppServices {
    let search = SearchRegistry::new(customers.clone());
    AppServices {
        customers,
        transactions,
        menu,
        identity,
        search,
    }
}

async fn seed_admin_account(config: &Config, identity: &dyn IdentityProvider) {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return;
    };
    let staff_id = StaffId::new();
    match identity
        .sign_up(*staff_id.as_uuid(), email, password, "Administrator", Some(Role::Admin))
        .await
    {
        Ok(_) => tracing::info!(%email, "seeded admin account"),
        Err(e) => tracing::warn!(%email, error = %e, "could not seed admin account"),
    }
}

impl AppServices {
    /// Create a customer, rejecting duplicate emails before anything is
    /// written anywhere.
    pub async fn create_customer(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        if let Some(email) = &new.email {
            if self.customers.find_customer_by_email(email).await?.is_some() {
                return Err(StoreError::conflict(format!(
                    "a customer with email {email} already exists"
                )));
            }
        }
        let customer = new.into_customer(CustomerId::new(), Utc::now())?;
        self.customers.insert_customer(customer).await
    }

    /// Self-signup: the duplicate-email pre-check runs before any identity
    /// account exists. If the provider rejects the account afterwards, the
    /// customer row is rolled back.
    pub async fn sign_up_customer(
        &self,
        new: NewCustomer,
        password: &str,
    ) -> Result<(Customer, IdentityAccount), StoreError> {
        let Some(email) = new.email.clone() else {
            return Err(StoreError::Validation("signup requires an email".to_string()));
        };

        let customer = self.create_customer(new).await?;
        let display_name = customer.full_name();

        match self
            .identity
            .sign_up(*customer.id.as_uuid(), &email, password, &display_name, None)
            .await
        {
            Ok(account) => Ok((customer, account)),
            Err(e) => {
                if let Err(cleanup) = self.customers.delete_customer(customer.id).await {
                    tracing::warn!(customer_id = %customer.id, error = %cleanup,
                        "could not roll back customer row after failed signup");
                }
                Err(e)
            }
        }
    }

    /// Hard delete: the row goes, and the linked identity account goes with
    /// it. Customers without an account (staff-created) delete cleanly too.
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), StoreError> {
        self.customers.delete_customer(id).await?;
        match self.identity.admin_delete_user(*id.as_uuid()).await {
            Ok(()) | Err(StoreError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
