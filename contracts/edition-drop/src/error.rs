use cosmwasm_std::{StdError, Uint128};
use cw_controllers::AdminError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Admin(#[from] AdminError),

    #[error("NotOwner")]
    NotOwner {},

    #[error("NotPermitted")]
    NotPermitted {},

    #[error("QuotaExceeded: remaining {remaining}, requested {requested}")]
    QuotaExceeded { remaining: u32, requested: u32 },

    #[error("WrongPayment: got {got}, expected {expected}")]
    WrongPayment { got: Uint128, expected: Uint128 },

    #[error("SoldOut")]
    SoldOut {},

    #[error("InvalidRange: {start_id} + {count} exceeds [1, {capacity}]")]
    InvalidRange {
        start_id: u32,
        count: u32,
        capacity: u32,
    },

    #[error("SizeMismatch: expected {expected}, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("InvalidTokenId: {token_id}")]
    InvalidTokenId { token_id: u32 },

    #[error("AlreadyReserved: {token_id}")]
    AlreadyReserved { token_id: u32 },

    #[error("AlreadyIssued: {token_id}")]
    AlreadyIssued { token_id: u32 },

    #[error("TooManyReservations: limit {limit}")]
    TooManyReservations { limit: u32 },

    #[error("CapacityMismatch: drop capacity {expected}, got {got}")]
    CapacityMismatch { expected: u32, got: u32 },

    #[error("InvalidCapacity")]
    InvalidCapacity {},

    #[error("InvalidRoyalty: {0} bps")]
    InvalidRoyalty(u64),

    #[error("NotHolder")]
    NotHolder {},

    #[error("AlreadyRedeemed: {token_id}")]
    AlreadyRedeemed { token_id: u32 },

    #[error("NothingToWithdraw")]
    NothingToWithdraw {},

    #[error("Invalid reply ID")]
    InvalidReplyID {},

    #[error("Reply error")]
    ReplyOnSuccess {},
}
