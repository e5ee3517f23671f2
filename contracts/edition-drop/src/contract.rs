use std::cmp::Ordering;

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_binary, Addr, BankMsg, Deps, DepsMut, Empty, Env, Event, MessageInfo, Reply, StdError,
    SubMsg, WasmMsg,
};
use cw2::set_contract_version;
use cw721_base::{
    ExecuteMsg as Cw721ExecuteMsg, Extension, InstantiateMsg as Cw721InstantiateMsg, MintMsg,
};
use cw_utils::{may_pay, maybe_addr, parse_reply_instantiate_data};
use semver::Version;
use sg_edition::AccessMode;
use sg_std::{Response, NATIVE_DENOM};

use crate::allocation::{allocate, Beneficiaries};
use crate::allow_list::execute_set_allow_list;
use crate::error::ContractError;
use crate::metadata::{
    execute_load_metadata_chunk, execute_load_redeemed_metadata, execute_redeem,
    execute_update_base_uri, execute_update_condition_report, execute_update_metadata,
    execute_update_redeemed_uri, execute_update_redeemed_urls,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg};
use crate::pricing::{
    execute_set_access_mode, execute_set_general_price, execute_set_pricing,
    execute_update_reservation_cap,
};
use crate::reservation::{execute_reserve, join_ids};
use crate::state::{
    DropConfig, Supply, ALLOW_LIST_COUNT, COLLECTION, CONFIG, COVERED_COUNT, METADATA_LOADED,
    OPERATOR, SUPPLY,
};

// version info for migration info
pub const CONTRACT_NAME: &str = "crates.io:edition-drop";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const INIT_COLLECTION_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // ids run 1..=capacity and the scan cursor may sit one past the end
    if msg.capacity == 0 || msg.capacity == u32::MAX {
        return Err(ContractError::InvalidCapacity {});
    }

    let operator = maybe_addr(deps.api, msg.operator)?.unwrap_or(info.sender);
    OPERATOR.set(deps.branch(), Some(operator.clone()))?;

    let config = DropConfig {
        name: msg.name.clone(),
        symbol: msg.symbol.clone(),
        capacity: msg.capacity,
        royalty_bps: 0,
        allow_list_price: Default::default(),
        general_price: Default::default(),
        allow_list_quota: 0,
        general_quota: 0,
        access_mode: AccessMode::OperatorOnly,
        max_reservations_per_address: msg.max_reservations_per_address,
        base_uri: msg.base_uri,
    };
    CONFIG.save(deps.storage, &config)?;
    SUPPLY.save(deps.storage, &Supply::new())?;
    ALLOW_LIST_COUNT.save(deps.storage, &0)?;
    COVERED_COUNT.save(deps.storage, &0)?;
    METADATA_LOADED.save(deps.storage, &false)?;

    let wasm_msg = WasmMsg::Instantiate {
        code_id: msg.collection_code_id,
        msg: to_binary(&Cw721InstantiateMsg {
            name: msg.name,
            symbol: msg.symbol,
            minter: env.contract.address.to_string(),
        })?,
        funds: vec![],
        admin: None,
        label: "Edition Collection".to_string(),
    };
    let submsg = SubMsg::reply_on_success(wasm_msg, INIT_COLLECTION_REPLY_ID);

    let event = Event::new("instantiate")
        .add_attribute("capacity", config.capacity.to_string())
        .add_attribute("operator", operator);
    Ok(Response::new().add_submessage(submsg).add_event(event))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    if msg.id != INIT_COLLECTION_REPLY_ID {
        return Err(ContractError::InvalidReplyID {});
    }

    let reply = parse_reply_instantiate_data(msg);
    match reply {
        Ok(res) => {
            let collection = deps.api.addr_validate(&res.contract_address)?;
            COLLECTION.save(deps.storage, &collection)?;

            let event = Event::new("init_collection_reply").add_attribute("collection", collection);
            Ok(Response::default().add_event(event))
        }
        Err(_) => Err(ContractError::ReplyOnSuccess {}),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let api = deps.api;

    match msg {
        ExecuteMsg::Mint {
            recipient,
            quantity,
        } => {
            let recipient = maybe_addr(api, recipient)?.unwrap_or_else(|| info.sender.clone());
            execute_mint(deps, info, Beneficiaries::All(recipient, quantity))
        }
        ExecuteMsg::Purchase {} => {
            let recipient = info.sender.clone();
            execute_mint(deps, info, Beneficiaries::All(recipient, 1))
        }
        ExecuteMsg::MintToMany { recipients } => {
            let recipients = recipients
                .iter()
                .map(|r| api.addr_validate(r))
                .collect::<Result<Vec<_>, _>>()?;
            execute_mint(deps, info, Beneficiaries::Each(recipients))
        }
        ExecuteMsg::Redeem { token_id } => execute_redeem(deps, info, token_id),
        ExecuteMsg::SetPricing {
            capacity,
            royalty_bps,
            allow_list_price,
            general_price,
            allow_list_quota,
            general_quota,
        } => execute_set_pricing(
            deps,
            info,
            capacity,
            royalty_bps,
            allow_list_price,
            general_price,
            allow_list_quota,
            general_quota,
        ),
        ExecuteMsg::SetAccessMode { mode } => execute_set_access_mode(deps, info, mode),
        ExecuteMsg::SetGeneralPrice { price } => execute_set_general_price(deps, info, price),
        ExecuteMsg::UpdateReservationCap {
            max_reservations_per_address,
        } => execute_update_reservation_cap(deps, info, max_reservations_per_address),
        ExecuteMsg::UpdateOperator { operator } => execute_update_operator(deps, info, operator),
        ExecuteMsg::SetAllowList {
            batch_tag,
            addresses,
            flags,
        } => execute_set_allow_list(deps, info, batch_tag, addresses, flags),
        ExecuteMsg::Reserve {
            addresses,
            token_ids,
        } => execute_reserve(deps, info, addresses, token_ids),
        ExecuteMsg::LoadMetadataChunk {
            start_id,
            count,
            descriptions,
            animation_urls,
            animation_hashes,
            image_urls,
            image_hashes,
        } => execute_load_metadata_chunk(
            deps,
            info,
            start_id,
            count,
            descriptions,
            animation_urls,
            animation_hashes,
            image_urls,
            image_hashes,
        ),
        ExecuteMsg::LoadRedeemedMetadata {
            token_id,
            animation_url,
            animation_hash,
            image_url,
            image_hash,
        } => execute_load_redeemed_metadata(
            deps,
            info,
            token_id,
            animation_url,
            animation_hash,
            image_url,
            image_hash,
        ),
        ExecuteMsg::UpdateRedeemedUrls {
            token_id,
            image_url,
            animation_url,
        } => execute_update_redeemed_urls(deps, info, token_id, image_url, animation_url),
        ExecuteMsg::UpdateConditionReport {
            token_id,
            url,
            hash,
        } => execute_update_condition_report(deps, info, token_id, url, hash),
        ExecuteMsg::UpdateMetadata {
            start_id,
            count,
            token_uris,
        } => execute_update_metadata(deps, info, start_id, count, token_uris),
        ExecuteMsg::UpdateBaseUri { base_uri } => execute_update_base_uri(deps, info, base_uri),
        ExecuteMsg::UpdateRedeemedUri { token_id, uri } => {
            execute_update_redeemed_uri(deps, info, token_id, uri)
        }
        ExecuteMsg::Withdraw {} => execute_withdraw(deps, env, info),
    }
}

pub fn only_operator(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    if !OPERATOR.is_admin(deps, sender)? {
        return Err(ContractError::NotOwner {});
    }
    Ok(())
}

/// Allocates editions charged to the sender and mints them in the collection
pub fn execute_mint(
    deps: DepsMut,
    info: MessageInfo,
    beneficiaries: Beneficiaries,
) -> Result<Response, ContractError> {
    let payment = may_pay(&info, NATIVE_DENOM)?;
    let collection = COLLECTION.load(deps.storage)?;

    let allocation = allocate(deps, &info.sender, &beneficiaries, payment)?;

    let mut res = Response::new();
    for (index, token_id) in allocation.token_ids.iter().enumerate() {
        let owner = beneficiaries
            .recipient(index)
            .ok_or_else(|| StdError::generic_err("missing beneficiary"))?;
        let mint_msg = Cw721ExecuteMsg::<Extension, Empty>::Mint(MintMsg {
            token_id: token_id.to_string(),
            owner: owner.to_string(),
            token_uri: None,
            extension: None,
        });
        res = res.add_message(WasmMsg::Execute {
            contract_addr: collection.to_string(),
            msg: to_binary(&mint_msg)?,
            funds: vec![],
        });
    }

    let event = Event::new("edition_sold")
        .add_attribute("requester", info.sender)
        .add_attribute("tier", allocation.tier.to_string())
        .add_attribute("quantity", allocation.token_ids.len().to_string())
        .add_attribute("token_ids", join_ids(&allocation.token_ids))
        .add_attribute("paid", payment.to_string());
    Ok(res.add_event(event))
}

pub fn execute_update_operator(
    deps: DepsMut,
    info: MessageInfo,
    operator: Option<String>,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;
    let new_operator = maybe_addr(deps.api, operator)?;
    Ok(OPERATOR.execute_update_admin(deps, info, new_operator)?)
}

/// Sends the whole native balance collected from sales to the operator
pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;

    let balance = deps
        .querier
        .query_balance(&env.contract.address, NATIVE_DENOM)?;
    if balance.amount.is_zero() {
        return Err(ContractError::NothingToWithdraw {});
    }

    let msg = BankMsg::Send {
        to_address: info.sender.to_string(),
        amount: vec![balance.clone()],
    };
    let event = Event::new("withdraw")
        .add_attribute("amount", balance.to_string())
        .add_attribute("recipient", info.sender);
    Ok(Response::new().add_message(msg).add_event(event))
}

fn parse_version(version: &str) -> Result<Version, StdError> {
    version
        .parse()
        .map_err(|_| StdError::generic_err(format!("Invalid edition-drop version {}", version)))
}

/// Upgrades only from an older edition-drop; the same version is a no-op
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = cw2::get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(StdError::generic_err(format!(
            "Cannot migrate {} to {}",
            stored.contract, CONTRACT_NAME
        ))
        .into());
    }

    match parse_version(&stored.version)?.cmp(&parse_version(CONTRACT_VERSION)?) {
        Ordering::Greater => {
            return Err(StdError::generic_err(format!(
                "Cannot downgrade edition-drop from {} to {}",
                stored.version, CONTRACT_VERSION
            ))
            .into())
        }
        Ordering::Equal => return Ok(Response::new()),
        Ordering::Less => {}
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let event = Event::new("migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION);
    Ok(Response::new().add_event(event))
}
