#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_binary, Binary, Deps, Env, StdResult, Uint128};
use sg_edition::{RoyaltyInfoResponse, MAX_ROYALTY_BPS};

use crate::allocation::{query_can_mint, query_mint_count, query_mint_limit};
use crate::allow_list::{query_allow_list_count, query_is_allow_listed};
use crate::error::ContractError;
use crate::metadata::{query_describe, query_metadata, query_metadata_loaded, query_token_uri};
use crate::msg::{CollectionResponse, QueryMsg};
use crate::pricing::{query_config, query_supply};
use crate::reservation::{
    query_is_reserved, query_reservation_count, query_reservations, query_reserved_by,
};
use crate::state::{COLLECTION, CONFIG, OPERATOR};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::Operator {} => to_binary(&OPERATOR.query_admin(deps)?),
        QueryMsg::Collection {} => to_binary(&query_collection(deps)?),
        QueryMsg::Config {} => to_binary(&query_config(deps)?),
        QueryMsg::Supply {} => to_binary(&query_supply(deps)?),
        QueryMsg::MintLimit { address } => to_binary(&query_mint_limit(deps, address)?),
        QueryMsg::CanMint { address } => to_binary(&query_can_mint(deps, address)?),
        QueryMsg::MintCount { address } => to_binary(&query_mint_count(deps, address)?),
        QueryMsg::IsAllowListed { address } => to_binary(&query_is_allow_listed(deps, address)?),
        QueryMsg::AllowListCount {} => to_binary(&query_allow_list_count(deps)?),
        QueryMsg::IsReserved { token_id } => to_binary(&query_is_reserved(deps, token_id)?),
        QueryMsg::ReservedBy { token_id } => to_binary(&query_reserved_by(deps, token_id)?),
        QueryMsg::ReservationCount { address } => {
            to_binary(&query_reservation_count(deps, address)?)
        }
        QueryMsg::Reservations { address } => to_binary(&query_reservations(deps, address)?),
        QueryMsg::Metadata { token_id } => to_binary(&query_metadata(deps, token_id)?),
        QueryMsg::MetadataLoaded {} => to_binary(&query_metadata_loaded(deps)?),
        QueryMsg::TokenUri { token_id } => to_binary(&query_token_uri(deps, token_id)?),
        QueryMsg::Describe { token_id } => to_binary(&query_describe(deps, token_id)?),
        QueryMsg::RoyaltyInfo {
            token_id: _,
            sale_price,
        } => to_binary(&query_royalty_info(deps, sale_price)?),
    }?;
    Ok(res)
}

fn query_collection(deps: Deps) -> StdResult<CollectionResponse> {
    let collection = COLLECTION.load(deps.storage)?;
    Ok(CollectionResponse {
        collection: collection.to_string(),
    })
}

/// Same rate for every edition, paid to the operator
fn query_royalty_info(deps: Deps, sale_price: Uint128) -> StdResult<RoyaltyInfoResponse> {
    let config = CONFIG.load(deps.storage)?;
    let operator = OPERATOR.get(deps)?;
    Ok(RoyaltyInfoResponse {
        address: operator.map(|addr| addr.to_string()).unwrap_or_default(),
        royalty_amount: sale_price.multiply_ratio(config.royalty_bps, MAX_ROYALTY_BPS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::tests::{setup_drop, COLLECTION_ADDR, OPERATOR_ADDR};
    use crate::pricing::execute_set_pricing;
    use cosmwasm_std::from_binary;
    use cosmwasm_std::testing::{mock_env, mock_info};
    use cw_controllers::AdminResponse;

    #[test]
    fn operator_and_collection() {
        let deps = setup_drop(10);

        let res = query(deps.as_ref(), mock_env(), QueryMsg::Operator {}).unwrap();
        let res: AdminResponse = from_binary(&res).unwrap();
        assert_eq!(res.admin, Some(OPERATOR_ADDR.to_string()));

        let res = query(deps.as_ref(), mock_env(), QueryMsg::Collection {}).unwrap();
        let res: CollectionResponse = from_binary(&res).unwrap();
        assert_eq!(res.collection, COLLECTION_ADDR);
    }

    #[test]
    fn royalty_info() {
        let mut deps = setup_drop(10);
        execute_set_pricing(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            10,
            750,
            Uint128::zero(),
            Uint128::zero(),
            0,
            0,
        )
        .unwrap();

        let res = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::RoyaltyInfo {
                token_id: 1,
                sale_price: Uint128::new(1_000_000),
            },
        )
        .unwrap();
        let res: RoyaltyInfoResponse = from_binary(&res).unwrap();
        assert_eq!(
            res,
            RoyaltyInfoResponse {
                address: OPERATOR_ADDR.to_string(),
                royalty_amount: Uint128::new(75_000),
            }
        );
    }

    #[test]
    fn read_path_errors_keep_their_kind() {
        let deps = setup_drop(10);
        let err =
            query(deps.as_ref(), mock_env(), QueryMsg::TokenUri { token_id: 1 }).unwrap_err();
        assert_eq!(err, ContractError::InvalidTokenId { token_id: 1 });

        let err =
            query(deps.as_ref(), mock_env(), QueryMsg::Metadata { token_id: 11 }).unwrap_err();
        assert!(matches!(err, ContractError::InvalidRange { .. }));
    }
}
