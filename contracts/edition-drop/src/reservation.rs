use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use cosmwasm_std::{Addr, Deps, DepsMut, Event, MessageInfo, StdResult, Storage};
use sg_edition::EMPTY_SLOT;
use sg_std::Response;

use crate::contract::only_operator;
use crate::error::ContractError;
use crate::state::{TokenId, CONFIG, ISSUED, RESERVATION_COUNT, RESERVATION_SLOTS, RESERVED_BY};

/// Earmarks `token_ids[i]` for `addresses[i]`.
/// Reservations are appended, so an address drains them in the order they were
/// made. Consumed slots stay in the list and do not count toward
/// `max_reservations_per_address`.
pub fn execute_reserve(
    deps: DepsMut,
    info: MessageInfo,
    addresses: Vec<String>,
    token_ids: Vec<TokenId>,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;
    if addresses.len() != token_ids.len() {
        return Err(ContractError::SizeMismatch {
            expected: addresses.len(),
            got: token_ids.len(),
        });
    }

    let config = CONFIG.load(deps.storage)?;
    let addrs = addresses
        .iter()
        .map(|address| deps.api.addr_validate(address))
        .collect::<StdResult<Vec<_>>>()?;

    let mut staged: BTreeMap<Addr, Vec<TokenId>> = BTreeMap::new();
    let mut batch = BTreeSet::new();
    for (addr, &token_id) in addrs.iter().zip(token_ids.iter()) {
        if token_id == 0 || token_id > config.capacity {
            return Err(ContractError::InvalidRange {
                start_id: token_id,
                count: 1,
                capacity: config.capacity,
            });
        }
        if batch.contains(&token_id) || RESERVED_BY.has(deps.storage, token_id) {
            return Err(ContractError::AlreadyReserved { token_id });
        }
        if ISSUED.has(deps.storage, token_id) {
            return Err(ContractError::AlreadyIssued { token_id });
        }

        let slots = match staged.entry(addr.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                e.insert(RESERVATION_SLOTS.may_load(deps.storage, addr)?.unwrap_or_default())
            }
        };
        let live = slots.iter().filter(|slot| **slot != EMPTY_SLOT).count();
        if live >= config.max_reservations_per_address as usize {
            return Err(ContractError::TooManyReservations {
                limit: config.max_reservations_per_address,
            });
        }
        slots.push(token_id);
        batch.insert(token_id);
    }

    for (addr, &token_id) in addrs.iter().zip(token_ids.iter()) {
        RESERVED_BY.save(deps.storage, token_id, addr)?;
        RESERVATION_COUNT.update(deps.storage, addr, |count| -> StdResult<_> {
            Ok(count.unwrap_or_default() + 1)
        })?;
    }
    for (addr, slots) in staged {
        RESERVATION_SLOTS.save(deps.storage, &addr, &slots)?;
    }

    let event = Event::new("reserve")
        .add_attribute("token_ids", join_ids(&token_ids))
        .add_attribute("sender", info.sender);
    Ok(Response::new().add_event(event))
}

/// Reserved ids an allocation takes from the requester's own list
#[derive(Debug, Default, PartialEq)]
pub struct Drain {
    /// Slot list with the taken entries cleared
    pub slots: Vec<TokenId>,
    pub taken: Vec<TokenId>,
}

/// Takes up to `quantity` reserved ids in stored order without writing anything
pub fn plan_drain(storage: &dyn Storage, addr: &Addr, quantity: u32) -> StdResult<Drain> {
    let mut slots = RESERVATION_SLOTS
        .may_load(storage, addr)?
        .unwrap_or_default();
    let mut taken = vec![];
    for slot in slots.iter_mut() {
        if taken.len() as u32 == quantity {
            break;
        }
        if *slot == EMPTY_SLOT {
            continue;
        }
        taken.push(*slot);
        *slot = EMPTY_SLOT;
    }
    Ok(Drain { slots, taken })
}

pub fn commit_drain(storage: &mut dyn Storage, addr: &Addr, drain: &Drain) -> StdResult<()> {
    if drain.taken.is_empty() {
        return Ok(());
    }
    RESERVATION_SLOTS.save(storage, addr, &drain.slots)?;
    for token_id in drain.taken.iter() {
        RESERVED_BY.remove(storage, *token_id);
    }
    RESERVATION_COUNT.update(storage, addr, |count| -> StdResult<_> {
        Ok(count
            .unwrap_or_default()
            .saturating_sub(drain.taken.len() as u32))
    })?;
    Ok(())
}

pub fn join_ids(token_ids: &[TokenId]) -> String {
    token_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn query_is_reserved(deps: Deps, token_id: TokenId) -> StdResult<bool> {
    Ok(RESERVED_BY.has(deps.storage, token_id))
}

pub fn query_reserved_by(deps: Deps, token_id: TokenId) -> StdResult<Option<String>> {
    Ok(RESERVED_BY
        .may_load(deps.storage, token_id)?
        .map(|addr| addr.to_string()))
}

pub fn query_reservation_count(deps: Deps, address: String) -> StdResult<u32> {
    let addr = deps.api.addr_validate(&address)?;
    Ok(RESERVATION_COUNT
        .may_load(deps.storage, &addr)?
        .unwrap_or_default())
}

pub fn query_reservations(deps: Deps, address: String) -> StdResult<Vec<TokenId>> {
    let addr = deps.api.addr_validate(&address)?;
    Ok(RESERVATION_SLOTS
        .may_load(deps.storage, &addr)?
        .unwrap_or_default())
}
