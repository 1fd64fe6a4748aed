//! Types that represent the core data model, such as `Transaction` and `Settings`.
mod amount;
mod settings;
mod transaction;

pub use amount::{Amount, AmountError};
pub use settings::{Settings, CHAT_ID_PLACEHOLDER, TOKEN_PLACEHOLDER};
pub use transaction::{Transaction, TransactionType};
