use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the customer pays for an order
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Unknown,
    Card,
    Sbp,
    CreditCard,
    InvestorMoney,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Unknown => "UNKNOWN",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Sbp => "SBP",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::InvestorMoney => "INVESTOR_MONEY",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNKNOWN" => Ok(PaymentMethod::Unknown),
            "CARD" => Ok(PaymentMethod::Card),
            "SBP" => Ok(PaymentMethod::Sbp),
            "CREDIT_CARD" => Ok(PaymentMethod::CreditCard),
            "INVESTOR_MONEY" => Ok(PaymentMethod::InvestorMoney),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}
