use cosmwasm_std::{Deps, DepsMut, Event, MessageInfo, StdResult, Uint128};
use sg_edition::{AccessMode, MAX_ROYALTY_BPS};
use sg_std::Response;

use crate::contract::only_operator;
use crate::error::ContractError;
use crate::msg::{ConfigResponse, SupplyResponse};
use crate::state::{CONFIG, SUPPLY};

/// Overwrites prices, quotas and the royalty rate.
/// `capacity` must repeat the fixed capacity of the drop.
#[allow(clippy::too_many_arguments)]
pub fn execute_set_pricing(
    deps: DepsMut,
    info: MessageInfo,
    capacity: u32,
    royalty_bps: u64,
    allow_list_price: Uint128,
    general_price: Uint128,
    allow_list_quota: u32,
    general_quota: u32,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    if capacity != config.capacity {
        return Err(ContractError::CapacityMismatch {
            expected: config.capacity,
            got: capacity,
        });
    }
    if royalty_bps > MAX_ROYALTY_BPS {
        return Err(ContractError::InvalidRoyalty(royalty_bps));
    }

    config.royalty_bps = royalty_bps;
    config.allow_list_price = allow_list_price;
    config.general_price = general_price;
    config.allow_list_quota = allow_list_quota;
    config.general_quota = general_quota;
    CONFIG.save(deps.storage, &config)?;

    let event = Event::new("set_pricing")
        .add_attribute("royalty_bps", royalty_bps.to_string())
        .add_attribute("allow_list_price", allow_list_price)
        .add_attribute("general_price", general_price)
        .add_attribute("allow_list_quota", allow_list_quota.to_string())
        .add_attribute("general_quota", general_quota.to_string())
        .add_attribute("sender", info.sender);
    Ok(Response::new().add_event(event))
}

pub fn execute_set_access_mode(
    deps: DepsMut,
    info: MessageInfo,
    mode: AccessMode,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;

    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.access_mode = mode;
        Ok(config)
    })?;

    let event = Event::new("set_access_mode")
        .add_attribute("mode", format!("{:?}", mode))
        .add_attribute("sender", info.sender);
    Ok(Response::new().add_event(event))
}

/// Sets the general price and opens the drop to the public
pub fn execute_set_general_price(
    deps: DepsMut,
    info: MessageInfo,
    price: Uint128,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;

    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.general_price = price;
        config.access_mode = AccessMode::Public;
        Ok(config)
    })?;

    let event = Event::new("price_changed")
        .add_attribute("price", price)
        .add_attribute("sender", info.sender);
    Ok(Response::new().add_event(event))
}

/// Existing slot lists longer than the new cap are kept; they only stop growing.
pub fn execute_update_reservation_cap(
    deps: DepsMut,
    info: MessageInfo,
    max_reservations_per_address: u32,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;

    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.max_reservations_per_address = max_reservations_per_address;
        Ok(config)
    })?;

    let event = Event::new("update_reservation_cap")
        .add_attribute(
            "max_reservations_per_address",
            max_reservations_per_address.to_string(),
        )
        .add_attribute("sender", info.sender);
    Ok(Response::new().add_event(event))
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse { config })
}

pub fn query_supply(deps: Deps) -> StdResult<SupplyResponse> {
    let config = CONFIG.load(deps.storage)?;
    let supply = SUPPLY.load(deps.storage)?;
    Ok(SupplyResponse {
        capacity: config.capacity,
        issued: supply.issued,
        remaining: supply.remaining(config.capacity),
    })
}
