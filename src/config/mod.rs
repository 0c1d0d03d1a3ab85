pub mod validator_config;

pub use validator_config::{ContentTypeScope, ValidatorConfig};
