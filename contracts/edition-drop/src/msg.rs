use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use cw_controllers::AdminResponse;
use sg_edition::{AccessMode, EditionDescription, EditionMetadata, RoyaltyInfoResponse};

use crate::state::{DropConfig, TokenId};

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    /// Number of editions, ids run from 1 to capacity
    pub capacity: u32,
    /// Defaults to the instantiating address (the factory's caller)
    pub operator: Option<String>,
    /// Prefix for token uris without an explicit override
    pub base_uri: String,
    /// cw721 code used for the ownership collection
    pub collection_code_id: u64,
    pub max_reservations_per_address: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Mint `quantity` editions to `recipient` (defaults to sender).
    /// Quota is charged to the sender.
    Mint {
        recipient: Option<String>,
        quantity: u32,
    },
    /// Mint a single edition to the sender
    Purchase {},
    /// Mint one edition to each recipient
    MintToMany { recipients: Vec<String> },
    /// Redeem the physical item behind an edition. Only the current holder.
    Redeem { token_id: TokenId },

    // Operator only below
    SetPricing {
        capacity: u32,
        royalty_bps: u64,
        allow_list_price: Uint128,
        general_price: Uint128,
        allow_list_quota: u32,
        general_quota: u32,
    },
    SetAccessMode { mode: AccessMode },
    /// Sets the public price and opens the drop to everyone
    SetGeneralPrice { price: Uint128 },
    UpdateReservationCap { max_reservations_per_address: u32 },
    UpdateOperator { operator: Option<String> },
    SetAllowList {
        batch_tag: u32,
        addresses: Vec<String>,
        flags: Vec<bool>,
    },
    Reserve {
        addresses: Vec<String>,
        token_ids: Vec<TokenId>,
    },
    LoadMetadataChunk {
        start_id: TokenId,
        count: u32,
        descriptions: Vec<String>,
        animation_urls: Vec<String>,
        animation_hashes: Vec<String>,
        image_urls: Vec<String>,
        image_hashes: Vec<String>,
    },
    LoadRedeemedMetadata {
        token_id: TokenId,
        animation_url: String,
        animation_hash: String,
        image_url: String,
        image_hash: String,
    },
    UpdateRedeemedUrls {
        token_id: TokenId,
        image_url: String,
        animation_url: String,
    },
    UpdateConditionReport {
        token_id: TokenId,
        url: String,
        hash: String,
    },
    UpdateMetadata {
        start_id: TokenId,
        count: u32,
        token_uris: Vec<String>,
    },
    UpdateBaseUri { base_uri: String },
    UpdateRedeemedUri { token_id: TokenId, uri: String },
    /// Send collected mint payments to the operator
    Withdraw {},
}

#[cw_serde]
pub enum SudoMsg {
    /// Replace the operator, can only be called by governance
    UpdateOperator { operator: String },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(AdminResponse)]
    Operator {},
    #[returns(CollectionResponse)]
    Collection {},
    #[returns(ConfigResponse)]
    Config {},
    #[returns(SupplyResponse)]
    Supply {},
    #[returns(u32)]
    MintLimit { address: String },
    #[returns(bool)]
    CanMint { address: String },
    #[returns(u32)]
    MintCount { address: String },
    #[returns(bool)]
    IsAllowListed { address: String },
    #[returns(u64)]
    AllowListCount {},
    #[returns(bool)]
    IsReserved { token_id: TokenId },
    #[returns(Option<String>)]
    ReservedBy { token_id: TokenId },
    #[returns(u32)]
    ReservationCount { address: String },
    #[returns(Vec<TokenId>)]
    Reservations { address: String },
    #[returns(EditionMetadata)]
    Metadata { token_id: TokenId },
    #[returns(bool)]
    MetadataLoaded {},
    #[returns(String)]
    TokenUri { token_id: TokenId },
    #[returns(EditionDescription)]
    Describe { token_id: TokenId },
    #[returns(RoyaltyInfoResponse)]
    RoyaltyInfo {
        token_id: TokenId,
        sale_price: Uint128,
    },
}

#[cw_serde]
pub struct CollectionResponse {
    pub collection: String,
}

#[cw_serde]
pub struct ConfigResponse {
    pub config: DropConfig,
}

#[cw_serde]
pub struct SupplyResponse {
    pub capacity: u32,
    pub issued: u32,
    pub remaining: u32,
}
