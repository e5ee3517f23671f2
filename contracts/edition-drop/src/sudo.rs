#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{Addr, DepsMut, Env, Event};
use sg_std::Response;

use crate::{msg::SudoMsg, state::OPERATOR, ContractError};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn sudo(deps: DepsMut, _env: Env, msg: SudoMsg) -> Result<Response, ContractError> {
    let api = deps.api;

    match msg {
        SudoMsg::UpdateOperator { operator } => {
            sudo_update_operator(deps, api.addr_validate(&operator)?)
        }
    }
}

/// Governance can replace the operator without its consent
pub fn sudo_update_operator(deps: DepsMut, operator: Addr) -> Result<Response, ContractError> {
    OPERATOR.set(deps, Some(operator.clone()))?;

    let event = Event::new("update-operator").add_attribute("operator", operator);
    Ok(Response::new().add_event(event))
}
