use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Identity carried by the session cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// Error returned when a stored label does not belong to its enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label: {0}")]
pub struct UnknownLabel(pub String);

// Declares a closed string enumeration with serde names, `as_str` and `FromStr`.
macro_rules! labels {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownLabel(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labels! {
    /// Currencies a record may be denominated in. Declaration order is the
    /// tie-break order used by summaries.
    Currency {
        Euro => "€",
        Dollar => "$",
    }
}

labels! {
    IncomeSource {
        Salary => "Salary",
        Freelance => "Freelance",
        Investments => "Investments",
        Rent => "Rent",
        Dividends => "Dividends",
        Others => "Others",
    }
}

labels! {
    ExpenseCategory {
        Rent => "Rent",
        Food => "Food",
        Entertainment => "Entertainment",
    }
}

/// Dated, owner-scoped, currency-tagged amount. Implemented by [`Income`] and
/// [`Expense`] so the summaries can treat both streams alike.
pub trait MonetaryRecord {
    fn amount(&self) -> f64;
    fn currency(&self) -> Currency;
    fn occurred_on(&self) -> &str;
}

/// Anything with an owning user.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip)]
    pub owner_id: String,
    pub source: IncomeSource,
    pub amount: f64,
    pub currency: Currency,
    pub date_received: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip)]
    pub owner_id: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub currency: Currency,
    pub date_spent: String,
}

impl MonetaryRecord for Income {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn currency(&self) -> Currency {
        self.currency
    }

    fn occurred_on(&self) -> &str {
        &self.date_received
    }
}

impl MonetaryRecord for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn currency(&self) -> Currency {
        self.currency
    }

    fn occurred_on(&self) -> &str {
        &self.date_spent
    }
}

impl Owned for Income {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for Expense {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomePayload {
    pub source: IncomeSource,
    pub amount: f64,
    pub currency: Currency,
    pub date_received: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    pub category: ExpenseCategory,
    pub amount: f64,
    pub currency: Currency,
    pub date_spent: String,
}
