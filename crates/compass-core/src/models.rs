//! Domain models for Compass

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A money account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub account_type: AccountType,
    /// Current balance in integer cents
    pub balance_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
    Cash,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Credit => "credit",
            Self::Cash => "cash",
        }
    }

    /// Whether balances of this type count toward spendable cash.
    /// Credit balances are owed money, not money on hand.
    pub fn is_liquid(&self) -> bool {
        matches!(self, Self::Checking | Self::Savings | Self::Cash)
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "credit" => Ok(Self::Credit),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: Option<i64>,
    pub kind: TransactionKind,
    /// Always positive; `kind` carries the direction
    pub amount_cents: i64,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A transaction to be recorded (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub account_id: Option<i64>,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub description: String,
    pub date: NaiveDate,
}

/// A recurring income or expense item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringItem {
    pub id: i64,
    pub name: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub next_due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A recurring item to be created
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecurringItem {
    pub name: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub next_due_date: NaiveDate,
}

/// Debt lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Active,
    PaidOff,
    Defaulted,
    Deferred,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PaidOff => "paid_off",
            Self::Defaulted => "defaulted",
            Self::Deferred => "deferred",
        }
    }
}

impl std::str::FromStr for DebtStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "paid_off" => Ok(Self::PaidOff),
            "defaulted" => Ok(Self::Defaulted),
            "deferred" => Ok(Self::Deferred),
            _ => Err(format!("Unknown debt status: {}", s)),
        }
    }
}

impl std::fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked debt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub name: String,
    pub balance_cents: i64,
    pub apr_percent: f64,
    pub minimum_payment_cents: Option<i64>,
    pub next_due_date: Option<NaiveDate>,
    pub status: DebtStatus,
    pub created_at: DateTime<Utc>,
}

impl Debt {
    /// Whether this debt participates in payoff simulations
    pub fn in_simulation(&self) -> bool {
        self.status == DebtStatus::Active && self.balance_cents > 0
    }
}

/// A debt to be created
#[derive(Debug, Clone, Deserialize)]
pub struct NewDebt {
    pub name: String,
    pub balance_cents: i64,
    pub apr_percent: f64,
    pub minimum_payment_cents: Option<i64>,
    pub next_due_date: Option<NaiveDate>,
}

/// Risk tier of a daily decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Caution,
    Warning,
    Danger,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Critical => "critical",
        }
    }

    /// Numeric severity for ordering (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Self::Safe => 1,
            Self::Caution => 2,
            Self::Warning => 3,
            Self::Danger => 4,
            Self::Critical => 5,
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "safe" => Ok(Self::Safe),
            "caution" => Ok(Self::Caution),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of directive a decision issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Pay,
    Save,
    Spend,
    Freeze,
    Wait,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pay => "pay",
            Self::Save => "save",
            Self::Spend => "spend",
            Self::Freeze => "freeze",
            Self::Wait => "wait",
        }
    }
}

impl std::str::FromStr for CommandType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pay" => Ok(Self::Pay),
            "save" => Ok(Self::Save),
            "spend" => Ok(Self::Spend),
            "freeze" => Ok(Self::Freeze),
            "wait" => Ok(Self::Wait),
            _ => Err(format!("Unknown command type: {}", s)),
        }
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single directive a decision carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryCommand {
    #[serde(rename = "type")]
    pub command_type: CommandType,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Where the user should go next in the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextAction {
    pub text: String,
    pub url: String,
}

/// A persisted daily decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionState {
    pub id: i64,
    pub user_id: String,
    pub risk_level: RiskLevel,
    pub primary_command: PrimaryCommand,
    /// At most two entries, most relevant first
    pub warnings: Vec<String>,
    pub next_action: NextAction,
    /// Diagnostic snapshot of the inputs; not user-facing
    pub basis: serde_json::Value,
    pub computed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_locked: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_account_type_liquidity() {
        assert!(AccountType::Checking.is_liquid());
        assert!(AccountType::Savings.is_liquid());
        assert!(AccountType::Cash.is_liquid());
        assert!(!AccountType::Credit.is_liquid());
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Critical.priority() > RiskLevel::Danger.priority());
        assert!(RiskLevel::Danger.priority() > RiskLevel::Warning.priority());
        assert!(RiskLevel::Warning.priority() > RiskLevel::Caution.priority());
        assert!(RiskLevel::Caution.priority() > RiskLevel::Safe.priority());
    }

    #[test]
    fn test_enum_round_trips() {
        assert_eq!(DebtStatus::from_str("paid_off").unwrap(), DebtStatus::PaidOff);
        assert_eq!(DebtStatus::PaidOff.as_str(), "paid_off");
        assert_eq!(CommandType::from_str("freeze").unwrap(), CommandType::Freeze);
        assert_eq!(RiskLevel::from_str("caution").unwrap(), RiskLevel::Caution);
    }

    #[test]
    fn test_debt_simulation_filter() {
        let debt = Debt {
            id: 1,
            name: "Card".to_string(),
            balance_cents: 0,
            apr_percent: 19.99,
            minimum_payment_cents: Some(2500),
            next_due_date: None,
            status: DebtStatus::Active,
            created_at: Utc::now(),
        };
        assert!(!debt.in_simulation());

        let debt = Debt {
            balance_cents: 10_000,
            ..debt
        };
        assert!(debt.in_simulation());

        let debt = Debt {
            status: DebtStatus::Deferred,
            ..debt
        };
        assert!(!debt.in_simulation());
    }
}
