use serde::{Deserialize, Serialize};
use velaro_shared::pii::Masked;

/// A payment instrument as submitted by the caller. Card and account numbers
/// are wrapped in [`Masked`] so they never reach log output in plain form.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum PaymentSource {
    Card(CardSource),
    BankAccount(BankAccountSource),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardSource {
    pub name: String,
    pub number: Masked<String>,
    pub cvc: Masked<String>,
    pub exp_month: u8,
    pub exp_year: i32,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_city: Option<String>,
    pub address_country: String,
    pub address_post_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BankAccountSource {
    pub name: String,
    pub number: Masked<String>,
    pub sort_code: String,
    pub account_type: AccountType,
    pub bank_name: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Individual,
    Company,
}

/// Payment-instrument validation failures. One variant per rule.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cardholder name must not be empty")]
    MissingName,

    #[error("card number must be 13 to 19 digits")]
    InvalidCardNumber,

    #[error("cvc must be 3 or 4 digits")]
    InvalidCvc,

    #[error("exp_month must be between 1 and 12")]
    InvalidExpiryMonth,

    #[error("exp_year must not be in the past")]
    InvalidExpiryYear,

    #[error("country must be a 2-letter code, got '{0}'")]
    InvalidCountry(String),

    #[error("sort_code must be 6 digits")]
    InvalidSortCode,

    #[error("bank_name must not be empty")]
    MissingBankName,
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn check_country(code: &str) -> Result<(), SourceError> {
    if code.chars().count() == 2 {
        Ok(())
    } else {
        Err(SourceError::InvalidCountry(code.to_string()))
    }
}

impl PaymentSource {
    pub fn validate(&self, current_year: i32) -> Result<(), SourceError> {
        match self {
            PaymentSource::Card(card) => card.validate(current_year),
            PaymentSource::BankAccount(account) => account.validate(),
        }
    }

    /// Redact the instrument for storage and responses: only the last 4
    /// digits of the number survive.
    pub fn mask(&self) -> MaskedSource {
        match self {
            PaymentSource::Card(card) => MaskedSource::Card(MaskedCard {
                name: card.name.clone(),
                number: format!("************{}", last4(card.number.expose())),
                exp_month: card.exp_month,
                exp_year: card.exp_year,
                address_country: card.address_country.clone(),
                address_post_code: card.address_post_code.clone(),
            }),
            PaymentSource::BankAccount(account) => MaskedSource::BankAccount(MaskedBankAccount {
                name: account.name.clone(),
                account_type: account.account_type,
                number: format!("*********{}", last4(account.number.expose())),
                sort_code: account.sort_code.clone(),
                bank_name: account.bank_name.clone(),
                country: account.country.clone(),
            }),
        }
    }
}

impl CardSource {
    fn validate(&self, current_year: i32) -> Result<(), SourceError> {
        if self.name.trim().is_empty() {
            return Err(SourceError::MissingName);
        }
        let number = self.number.expose();
        if !all_digits(number) || !(13..=19).contains(&number.len()) {
            return Err(SourceError::InvalidCardNumber);
        }
        let cvc = self.cvc.expose();
        if !all_digits(cvc) || !(3..=4).contains(&cvc.len()) {
            return Err(SourceError::InvalidCvc);
        }
        if !(1..=12).contains(&self.exp_month) {
            return Err(SourceError::InvalidExpiryMonth);
        }
        if self.exp_year < current_year {
            return Err(SourceError::InvalidExpiryYear);
        }
        check_country(&self.address_country)
    }
}

impl BankAccountSource {
    fn validate(&self) -> Result<(), SourceError> {
        if self.name.trim().is_empty() {
            return Err(SourceError::MissingName);
        }
        if !all_digits(&self.sort_code) || self.sort_code.len() != 6 {
            return Err(SourceError::InvalidSortCode);
        }
        if self.bank_name.trim().is_empty() {
            return Err(SourceError::MissingBankName);
        }
        check_country(&self.country)
    }
}

fn last4(number: &str) -> &str {
    let len = number.len();
    &number[len.saturating_sub(4)..]
}

// ============================================================================
// Masked representations (what gets stored and returned)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum MaskedSource {
    Card(MaskedCard),
    BankAccount(MaskedBankAccount),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskedCard {
    pub name: String,
    pub number: String,
    pub exp_month: u8,
    pub exp_year: i32,
    pub address_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_post_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskedBankAccount {
    pub name: String,
    pub account_type: AccountType,
    pub number: String,
    pub sort_code: String,
    pub bank_name: String,
    pub country: String,
}
