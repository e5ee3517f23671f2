pub mod allocation;
pub mod allow_list;
pub mod contract;
mod error;
pub mod helpers;
pub mod metadata;
pub mod msg;
pub mod pricing;
pub mod query;
pub mod reservation;
pub mod state;
pub mod sudo;

pub use crate::error::ContractError;
