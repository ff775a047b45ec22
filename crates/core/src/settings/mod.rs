pub mod account_validation;
pub mod settings_model;

pub use account_validation::validate_account;
pub use settings_model::{AccountConfig, PollConfig};
