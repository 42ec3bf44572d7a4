use std::fmt;

use serde::Serialize;

use crate::core::SzepError;

/// Card holder identity typed into the portal's balance form.
///
/// Both fields are length-checked once at construction and never change afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    card_number: String,
    card_code: String,
}

impl AccountIdentity {
    /// Required length of the card number (the last eight digits printed on the card).
    pub const CARD_NUMBER_LEN: usize = 8;
    /// Required length of the card code.
    pub const CARD_CODE_LEN: usize = 3;

    /// Validates and builds an identity.
    ///
    /// # Errors
    ///
    /// Returns [`SzepError::Config`] if either field has the wrong length.
    pub fn new(card_number: impl Into<String>, card_code: impl Into<String>) -> Result<Self, SzepError> {
        let card_number = card_number.into().trim().to_string();
        let card_code = card_code.into().trim().to_string();

        let n = card_number.chars().count();
        if n != Self::CARD_NUMBER_LEN {
            return Err(SzepError::Config(format!(
                "card number must be exactly {} characters, got {n}",
                Self::CARD_NUMBER_LEN
            )));
        }
        let n = card_code.chars().count();
        if n != Self::CARD_CODE_LEN {
            return Err(SzepError::Config(format!(
                "card code must be exactly {} characters, got {n}",
                Self::CARD_CODE_LEN
            )));
        }

        Ok(Self {
            card_number,
            card_code,
        })
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn card_code(&self) -> &str {
        &self.card_code
    }
}

impl fmt::Debug for AccountIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountIdentity")
            .field("card_number", &self.card_number)
            .field("card_code", &"***")
            .finish()
    }
}

/// Token and session id scraped from the landing page.
///
/// Valid for a single tick only; the portal rotates the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub session_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"***")
            .field("session_id", &"***")
            .finish()
    }
}

/// Both card pockets tracked by the integration, in HUF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BalanceSnapshot {
    /// Accommodation pocket (`szamla_osszeg9`).
    pub accommodation: i64,
    /// Active Hungarians pocket (`szamla_osszeg8`).
    pub active_hungarians: i64,
}

impl BalanceSnapshot {
    /// Value of one pocket.
    pub fn get(&self, kind: BalanceKind) -> i64 {
        match kind {
            BalanceKind::Accommodation => self.accommodation,
            BalanceKind::ActiveHungarians => self.active_hungarians,
        }
    }
}

/// Identifies one of the two pockets exposed as readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceKind {
    Accommodation,
    ActiveHungarians,
}

impl BalanceKind {
    pub const ALL: [BalanceKind; 2] = [BalanceKind::Accommodation, BalanceKind::ActiveHungarians];

    /// Stable identifier, used in unique ids.
    pub fn as_str(self) -> &'static str {
        match self {
            BalanceKind::Accommodation => "accommodation",
            BalanceKind::ActiveHungarians => "active_hungarians",
        }
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            BalanceKind::Accommodation => "Accommodation",
            BalanceKind::ActiveHungarians => "Active Hungarians",
        }
    }

    /// Key of this pocket in the balance payload.
    pub(crate) fn wire_key(self) -> &'static str {
        match self {
            BalanceKind::Accommodation => "szamla_osszeg9",
            BalanceKind::ActiveHungarians => "szamla_osszeg8",
        }
    }
}

impl fmt::Display for BalanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named numeric value handed to the host's sensor model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub kind: BalanceKind,
    /// `"<poller name> - <label>"`.
    pub name: String,
    /// `"<poller name>_<kind>"`.
    pub unique_id: String,
    /// `None` until the first successful tick.
    pub value: Option<i64>,
    pub unit: &'static str,
}

/// Currency unit of every reading.
pub const BALANCE_UNIT: &str = "HUF";
