use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Empty, Uint128};
use cw_controllers::Admin;
use cw_storage_plus::{Item, Map};
use sg_edition::{AccessMode, EditionMetadata};

pub type TokenId = u32;

#[cw_serde]
pub struct DropConfig {
    pub name: String,
    pub symbol: String,
    /// Fixed at instantiation
    pub capacity: u32,
    pub royalty_bps: u64,
    pub allow_list_price: Uint128,
    pub general_price: Uint128,
    pub allow_list_quota: u32,
    pub general_quota: u32,
    pub access_mode: AccessMode,
    /// Slots a single address may hold in its reservation list
    pub max_reservations_per_address: u32,
    pub base_uri: String,
}

pub const CONFIG: Item<DropConfig> = Item::new("config");

/// Counters every allocation reads and advances
#[cw_serde]
pub struct Supply {
    /// Editions issued so far, never above capacity
    pub issued: u32,
    /// Next id the free-pool scan looks at
    pub cursor: TokenId,
}

impl Supply {
    pub fn new() -> Self {
        Supply {
            issued: 0,
            cursor: 1,
        }
    }

    pub fn remaining(&self, capacity: u32) -> u32 {
        capacity.saturating_sub(self.issued)
    }
}

impl Default for Supply {
    fn default() -> Self {
        Self::new()
    }
}

pub const SUPPLY: Item<Supply> = Item::new("supply");

pub const OPERATOR: Admin = Admin::new("operator");

pub const COLLECTION: Item<Addr> = Item::new("collection");

pub const ALLOW_LIST: Map<&Addr, Empty> = Map::new("al");
pub const ALLOW_LIST_COUNT: Item<u64> = Item::new("al_count");

/// Editions charged to a requester, across all tiers
pub const MINT_COUNT: Map<&Addr, u32> = Map::new("mc");

/// Reserved ids in reservation order, consumed slots hold `EMPTY_SLOT`
pub const RESERVATION_SLOTS: Map<&Addr, Vec<TokenId>> = Map::new("rs");
pub const RESERVED_BY: Map<TokenId, Addr> = Map::new("rb");
/// Outstanding (unconsumed) reservations per address
pub const RESERVATION_COUNT: Map<&Addr, u32> = Map::new("rc");

/// Ids handed out so far, by reservation or by the free-pool scan, with the
/// address each was first minted to
pub const ISSUED: Map<TokenId, Addr> = Map::new("issued");

pub const METADATA: Map<TokenId, EditionMetadata> = Map::new("md");
/// Ids written at least once by a metadata chunk
pub const COVERED: Map<TokenId, Empty> = Map::new("cov");
pub const COVERED_COUNT: Item<u32> = Item::new("covered");
pub const METADATA_LOADED: Item<bool> = Item::new("md_loaded");

pub const TOKEN_URIS: Map<TokenId, String> = Map::new("uri");
pub const REDEEMED_URIS: Map<TokenId, String> = Map::new("ruri");
pub const REDEEMED: Map<TokenId, Empty> = Map::new("redeemed");
