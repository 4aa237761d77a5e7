//! Staff accounts for the fleet console.
//!
//! Accounts live in a [`HashDirectory`] keyed by email. Registration always
//! yields a pending employee; only seeded accounts can start out active or
//! as administrators.

use std::fmt;
use std::str::FromStr;

use fleet_core::directory::{HashDirectory, Keyed};
use fleet_core::error::{FleetError, FleetResult, RecordKind};
use fleet_core::records::ParseStatusError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Admin => "ADMIN",
            Role::Employee => "EMPLOYEE",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    #[default]
    Pending,
    Inactive,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Pending => "PENDING",
            AccountStatus::Inactive => "INACTIVE",
        })
    }
}

impl FromStr for AccountStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(AccountStatus::Active),
            "PENDING" => Ok(AccountStatus::Pending),
            "INACTIVE" => Ok(AccountStatus::Inactive),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user_id: String,
    pub email: String,
    password: String,
    pub name: String,
    pub role: Role,
    pub status: AccountStatus,
}

impl Keyed for UserAccount {
    const KIND: RecordKind = RecordKind::Account;

    fn key(&self) -> &str {
        &self.email
    }
}

/// An account created at startup, before any registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub status: AccountStatus,
}

impl SeedAccount {
    pub fn default_admin() -> Self {
        Self {
            email: "admin@fleet.com".into(),
            password: "admin123".into(),
            name: "System Administrator".into(),
            role: Role::Admin,
            status: AccountStatus::Active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountRegistry {
    accounts: HashDirectory<UserAccount>,
    issued: usize,
}

impl AccountRegistry {
    pub fn new(seeds: &[SeedAccount]) -> FleetResult<Self> {
        let mut registry = Self {
            accounts: HashDirectory::new(),
            issued: 0,
        };
        for seed in seeds {
            registry.create(seed.clone())?;
            info!(email = %seed.email, role = %seed.role, "seed account initialized");
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn create(&mut self, seed: SeedAccount) -> FleetResult<&UserAccount> {
        if self.accounts.contains(&seed.email) {
            return Err(FleetError::duplicate(RecordKind::Account, seed.email));
        }
        let account = UserAccount {
            user_id: format!("U{:03}", self.issued + 1),
            email: seed.email,
            password: seed.password,
            name: seed.name,
            role: seed.role,
            status: seed.status,
        };
        let email = account.email.clone();
        self.accounts.insert(account)?;
        self.issued += 1;
        self.accounts.search(&email)
    }

    /// Register a new employee. The account waits for approval.
    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> FleetResult<&UserAccount> {
        let account = self.create(SeedAccount {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role: Role::Employee,
            status: AccountStatus::Pending,
        })?;
        debug!(email, user_id = %account.user_id, "account registered");
        Ok(account)
    }

    /// Email and password must both match. Pending and inactive accounts
    /// can log in; callers decide what their status allows.
    pub fn login(&self, email: &str, password: &str) -> FleetResult<&UserAccount> {
        match self.accounts.search(email) {
            Ok(account) if account.password == password => Ok(account),
            _ => Err(FleetError::InvalidCredentials {
                email: email.to_string(),
            }),
        }
    }

    pub fn find(&self, email: &str) -> FleetResult<&UserAccount> {
        self.accounts.search(email)
    }

    pub fn set_status(&mut self, email: &str, status: AccountStatus) -> FleetResult<&UserAccount> {
        let account = self.accounts.get_mut(email)?;
        account.status = status;
        debug!(email, %status, "account status updated");
        Ok(&*account)
    }

    /// Accounts awaiting approval, ordered by email.
    pub fn pending(&self) -> Vec<&UserAccount> {
        let mut pending: Vec<&UserAccount> = self
            .accounts
            .iter()
            .filter(|account| account.status == AccountStatus::Pending)
            .collect();
        pending.sort_by(|a, b| a.email.cmp(&b.email));
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AccountRegistry {
        AccountRegistry::new(&[SeedAccount::default_admin()]).expect("seed admin")
    }

    #[test]
    fn seeded_admin_can_log_in() {
        let registry = registry();
        let admin = registry.login("admin@fleet.com", "admin123").expect("login");
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.status, AccountStatus::Active);
        assert_eq!(admin.user_id, "U001");
    }

    #[test]
    fn registration_creates_pending_employee() {
        let mut registry = registry();
        let account = registry
            .register("asha@fleet.com", "secret", "Asha Rao")
            .expect("register");
        assert_eq!(account.role, Role::Employee);
        assert_eq!(account.status, AccountStatus::Pending);
        assert_eq!(account.user_id, "U002");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let mut registry = registry();
        let err = registry.register("admin@fleet.com", "x", "Impostor").unwrap_err();
        assert_eq!(err, FleetError::duplicate(RecordKind::Account, "admin@fleet.com"));
        assert_eq!(
            registry.find("admin@fleet.com").expect("admin").role,
            Role::Admin
        );
    }

    #[test]
    fn wrong_password_and_unknown_email_fail_alike() {
        let registry = registry();
        for (email, password) in [("admin@fleet.com", "nope"), ("ghost@fleet.com", "admin123")] {
            assert_eq!(
                registry.login(email, password),
                Err(FleetError::InvalidCredentials {
                    email: email.to_string()
                })
            );
        }
    }

    #[test]
    fn approval_clears_pending_list() {
        let mut registry = registry();
        registry.register("b@fleet.com", "pw", "B").expect("register");
        registry.register("a@fleet.com", "pw", "A").expect("register");
        let pending: Vec<&str> = registry.pending().iter().map(|a| a.email.as_str()).collect();
        assert_eq!(pending, vec!["a@fleet.com", "b@fleet.com"]);

        registry
            .set_status("a@fleet.com", AccountStatus::Active)
            .expect("approve");
        assert_eq!(registry.pending().len(), 1);
        assert!(registry.set_status("c@fleet.com", AccountStatus::Active).is_err());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("inactive".parse(), Ok(AccountStatus::Inactive));
        assert!("gone".parse::<AccountStatus>().is_err());
    }
}
