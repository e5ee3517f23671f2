use std::fmt;

use cosmwasm_std::{Addr, Deps, DepsMut, StdError, StdResult, Storage, Uint128};
use sg_edition::AccessMode;

use crate::allow_list::is_member;
use crate::error::ContractError;
use crate::reservation::{commit_drain, plan_drain};
use crate::state::{
    DropConfig, Supply, TokenId, CONFIG, ISSUED, MINT_COUNT, OPERATOR, RESERVED_BY, SUPPLY,
};

/// Access tier of a requester, resolved once per request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// Free, unlimited up to the remaining supply, ignores the access mode
    Operator,
    AllowList,
    General,
}

impl Tier {
    pub fn unit_price(&self, config: &DropConfig) -> Uint128 {
        match self {
            Tier::Operator => Uint128::zero(),
            Tier::AllowList => config.allow_list_price,
            Tier::General => config.general_price,
        }
    }

    /// Editions the requester may still be charged for
    pub fn remaining(&self, config: &DropConfig, supply: &Supply, minted: u32) -> u32 {
        match self {
            Tier::Operator => supply.remaining(config.capacity),
            Tier::AllowList => config.allow_list_quota.saturating_sub(minted),
            Tier::General => config.general_quota.saturating_sub(minted),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tier = match self {
            Tier::Operator => "operator",
            Tier::AllowList => "allow_list",
            Tier::General => "general",
        };
        write!(f, "{}", tier)
    }
}

/// `None` when the current mode does not admit the requester
pub fn resolve_tier(
    deps: Deps,
    config: &DropConfig,
    requester: &Addr,
) -> StdResult<Option<Tier>> {
    if OPERATOR.is_admin(deps, requester)? {
        return Ok(Some(Tier::Operator));
    }
    if config.access_mode == AccessMode::OperatorOnly {
        return Ok(None);
    }
    if is_member(deps.storage, requester) && config.access_mode.admits_allow_list() {
        return Ok(Some(Tier::AllowList));
    }
    if config.access_mode.admits_public() {
        return Ok(Some(Tier::General));
    }
    Ok(None)
}

/// Who receives the editions of a single allocation
pub enum Beneficiaries {
    /// `quantity` editions to one address
    All(Addr, u32),
    /// One edition per address
    Each(Vec<Addr>),
}

impl Beneficiaries {
    pub fn quantity(&self) -> StdResult<u32> {
        match self {
            Beneficiaries::All(_, quantity) => Ok(*quantity),
            Beneficiaries::Each(recipients) => u32::try_from(recipients.len())
                .map_err(|_| StdError::generic_err("too many recipients")),
        }
    }

    pub fn recipient(&self, index: usize) -> Option<&Addr> {
        match self {
            Beneficiaries::All(recipient, _) => Some(recipient),
            Beneficiaries::Each(recipients) => recipients.get(index),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Allocation {
    pub tier: Tier,
    /// Assignment order: own reservations first, then the free pool
    pub token_ids: Vec<TokenId>,
}

/// Validates a request and assigns one edition id per beneficiary slot,
/// charging the quota to `requester`.
///
/// Every check and the full assignment are computed before the first write,
/// so an error leaves storage untouched.
pub fn allocate(
    deps: DepsMut,
    requester: &Addr,
    beneficiaries: &Beneficiaries,
    payment: Uint128,
) -> Result<Allocation, ContractError> {
    let quantity = beneficiaries.quantity()?;
    let config = CONFIG.load(deps.storage)?;
    let mut supply = SUPPLY.load(deps.storage)?;

    let tier = resolve_tier(deps.as_ref(), &config, requester)?
        .ok_or(ContractError::NotPermitted {})?;

    let minted = MINT_COUNT
        .may_load(deps.storage, requester)?
        .unwrap_or_default();
    let remaining = tier.remaining(&config, &supply, minted);
    if quantity > remaining {
        return Err(ContractError::QuotaExceeded {
            remaining,
            requested: quantity,
        });
    }

    if tier != Tier::Operator {
        let expected = tier
            .unit_price(&config)
            .checked_mul(Uint128::from(quantity))
            .map_err(StdError::from)?;
        if payment != expected {
            return Err(ContractError::WrongPayment {
                got: payment,
                expected,
            });
        }
    }

    if quantity > supply.remaining(config.capacity) {
        return Err(ContractError::SoldOut {});
    }

    let drain = plan_drain(deps.storage, requester, quantity)?;
    let mut token_ids = drain.taken.clone();
    let cursor = scan_free_pool(
        deps.storage,
        config.capacity,
        supply.cursor,
        quantity - token_ids.len() as u32,
        &mut token_ids,
    )?;
    let owners = (0..token_ids.len())
        .map(|index| {
            beneficiaries
                .recipient(index)
                .ok_or_else(|| StdError::generic_err("missing beneficiary"))
        })
        .collect::<StdResult<Vec<_>>>()?;

    commit_drain(deps.storage, requester, &drain)?;
    for (token_id, owner) in token_ids.iter().zip(owners) {
        ISSUED.save(deps.storage, *token_id, owner)?;
    }
    supply.cursor = cursor;
    supply.issued += quantity;
    SUPPLY.save(deps.storage, &supply)?;
    MINT_COUNT.save(deps.storage, requester, &(minted + quantity))?;

    Ok(Allocation { tier, token_ids })
}

/// Walks up from `cursor` collecting ids that are neither reserved nor issued.
/// Returns the cursor to persist; ids skipped because they are reserved stay
/// behind it and can only leave through their reserver's own list.
fn scan_free_pool(
    storage: &dyn Storage,
    capacity: u32,
    mut cursor: TokenId,
    needed: u32,
    token_ids: &mut Vec<TokenId>,
) -> Result<TokenId, ContractError> {
    let mut found = 0;
    while found < needed {
        if cursor > capacity {
            return Err(ContractError::SoldOut {});
        }
        if !RESERVED_BY.has(storage, cursor) && !ISSUED.has(storage, cursor) {
            token_ids.push(cursor);
            found += 1;
        }
        cursor += 1;
    }
    Ok(cursor)
}

/// Same `remaining` an allocation by `addr` would see, 0 when not admitted
pub fn mint_limit(deps: Deps, addr: &Addr) -> StdResult<u32> {
    let config = CONFIG.load(deps.storage)?;
    let supply = SUPPLY.load(deps.storage)?;
    let Some(tier) = resolve_tier(deps, &config, addr)? else {
        return Ok(0);
    };
    let minted = MINT_COUNT.may_load(deps.storage, addr)?.unwrap_or_default();
    Ok(tier.remaining(&config, &supply, minted))
}

pub fn query_mint_limit(deps: Deps, address: String) -> StdResult<u32> {
    let addr = deps.api.addr_validate(&address)?;
    mint_limit(deps, &addr)
}

pub fn query_can_mint(deps: Deps, address: String) -> StdResult<bool> {
    Ok(query_mint_limit(deps, address)? > 0)
}

pub fn query_mint_count(deps: Deps, address: String) -> StdResult<u32> {
    let addr = deps.api.addr_validate(&address)?;
    Ok(MINT_COUNT.may_load(deps.storage, &addr)?.unwrap_or_default())
}
