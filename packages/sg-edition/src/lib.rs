use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

/// Royalties are expressed in basis points, 10_000 = 100%
pub const MAX_ROYALTY_BPS: u64 = 10_000;

/// Marks a consumed reservation slot. Edition ids start at 1.
pub const EMPTY_SLOT: u32 = 0;

/// Who besides the operator may mint
#[cw_serde]
#[derive(Copy, Eq)]
pub enum AccessMode {
    /// Only the operator can mint
    OperatorOnly,
    /// Operator and allow-listed addresses
    AllowListOnly,
    /// Anyone
    Public,
}

impl AccessMode {
    pub fn admits_allow_list(&self) -> bool {
        matches!(self, AccessMode::AllowListOnly | AccessMode::Public)
    }

    pub fn admits_public(&self) -> bool {
        matches!(self, AccessMode::Public)
    }
}

/// Descriptive fields of a single edition.
/// Hashes are opaque hex strings supplied by the operator.
#[cw_serde]
#[derive(Default)]
pub struct EditionMetadata {
    pub description: String,
    pub animation_url: String,
    pub animation_hash: String,
    pub image_url: String,
    pub image_hash: String,
    pub condition_report_url: String,
    pub condition_report_hash: String,
    pub redeemed_animation_url: String,
    pub redeemed_animation_hash: String,
    pub redeemed_image_url: String,
    pub redeemed_image_hash: String,
}

/// Display view of an issued edition
#[cw_serde]
pub struct EditionDescription {
    pub token_id: u32,
    /// "{drop name} {token_id}/{capacity}"
    pub name: String,
    pub description: String,
    pub token_uri: String,
    pub animation_url: String,
    pub animation_hash: String,
    pub image_url: String,
    pub image_hash: String,
    pub condition_report_url: String,
    pub condition_report_hash: String,
    pub redeemed: bool,
}

#[cw_serde]
pub struct RoyaltyInfoResponse {
    pub address: String,
    pub royalty_amount: Uint128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_mode_gates() {
        assert!(!AccessMode::OperatorOnly.admits_allow_list());
        assert!(!AccessMode::OperatorOnly.admits_public());
        assert!(AccessMode::AllowListOnly.admits_allow_list());
        assert!(!AccessMode::AllowListOnly.admits_public());
        assert!(AccessMode::Public.admits_allow_list());
        assert!(AccessMode::Public.admits_public());
    }
}
