pub mod client;
pub mod engine;
pub mod form;
pub mod normalizer;
pub mod presenter;
pub mod print;

pub use crate::domain::model::{Incorporation, Renewal, Transfer};
pub use crate::domain::ports::{CalculationService, ConfigProvider, PrintSurface};
pub use crate::domain::schema::{Section, Transaction, TransactionKind};
pub use crate::utils::error::Result;
