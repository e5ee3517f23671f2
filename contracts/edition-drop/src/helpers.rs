use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, to_binary, Addr, QuerierWrapper, QueryRequest, StdResult, Uint128, WasmMsg, WasmQuery,
};
use sg_std::{CosmosMsg, NATIVE_DENOM};

use crate::msg::{ConfigResponse, ExecuteMsg, QueryMsg, SupplyResponse};
use crate::state::DropConfig;

/// EditionDropContract is a wrapper around Addr that provides a lot of helpers
#[cw_serde]
pub struct EditionDropContract(pub Addr);

impl EditionDropContract {
    pub fn addr(&self) -> Addr {
        self.0.clone()
    }

    pub fn call<T: Into<ExecuteMsg>>(&self, msg: T) -> StdResult<CosmosMsg> {
        let msg = to_binary(&msg.into())?;
        Ok(WasmMsg::Execute {
            contract_addr: self.addr().into(),
            msg,
            funds: vec![],
        }
        .into())
    }

    /// Mint paying `amount` in the native denom
    pub fn mint(
        &self,
        recipient: Option<String>,
        quantity: u32,
        amount: Uint128,
    ) -> StdResult<CosmosMsg> {
        let msg = to_binary(&ExecuteMsg::Mint {
            recipient,
            quantity,
        })?;
        let funds = if amount.is_zero() {
            vec![]
        } else {
            coins(amount.u128(), NATIVE_DENOM)
        };
        Ok(WasmMsg::Execute {
            contract_addr: self.addr().into(),
            msg,
            funds,
        }
        .into())
    }

    pub fn config(&self, querier: &QuerierWrapper) -> StdResult<DropConfig> {
        let res: ConfigResponse = querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
            contract_addr: self.addr().into(),
            msg: to_binary(&QueryMsg::Config {})?,
        }))?;

        Ok(res.config)
    }

    pub fn supply(&self, querier: &QuerierWrapper) -> StdResult<SupplyResponse> {
        querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
            contract_addr: self.addr().into(),
            msg: to_binary(&QueryMsg::Supply {})?,
        }))
    }

    pub fn mint_limit(&self, querier: &QuerierWrapper, address: &str) -> StdResult<u32> {
        querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
            contract_addr: self.addr().into(),
            msg: to_binary(&QueryMsg::MintLimit {
                address: address.to_string(),
            })?,
        }))
    }

    pub fn token_uri(&self, querier: &QuerierWrapper, token_id: u32) -> StdResult<String> {
        querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
            contract_addr: self.addr().into(),
            msg: to_binary(&QueryMsg::TokenUri { token_id })?,
        }))
    }
}
