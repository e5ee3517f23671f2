use cosmwasm_std::{Addr, Deps, DepsMut, Empty, Event, MessageInfo, StdResult, Storage};
use sg_std::Response;

use crate::contract::only_operator;
use crate::error::ContractError;
use crate::state::{ALLOW_LIST, ALLOW_LIST_COUNT};

/// Sets membership for each (address, flag) pair.
/// The count only moves on an actual change, so repeats are no-ops.
pub fn execute_set_allow_list(
    deps: DepsMut,
    info: MessageInfo,
    batch_tag: u32,
    addresses: Vec<String>,
    flags: Vec<bool>,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;
    if addresses.len() != flags.len() {
        return Err(ContractError::SizeMismatch {
            expected: addresses.len(),
            got: flags.len(),
        });
    }

    let addrs = addresses
        .iter()
        .map(|address| deps.api.addr_validate(address))
        .collect::<StdResult<Vec<_>>>()?;

    let mut count = ALLOW_LIST_COUNT.may_load(deps.storage)?.unwrap_or_default();
    for (addr, flag) in addrs.iter().zip(flags) {
        count = set_membership(deps.storage, addr, flag, count)?;
    }
    ALLOW_LIST_COUNT.save(deps.storage, &count)?;

    let event = Event::new("set_allow_list")
        .add_attribute("batch_tag", batch_tag.to_string())
        .add_attribute("size", addrs.len().to_string())
        .add_attribute("new-count", count.to_string())
        .add_attribute("sender", info.sender);
    Ok(Response::new().add_event(event))
}

fn set_membership(
    storage: &mut dyn Storage,
    addr: &Addr,
    flag: bool,
    count: u64,
) -> StdResult<u64> {
    let member = ALLOW_LIST.has(storage, addr);
    match (member, flag) {
        (false, true) => {
            ALLOW_LIST.save(storage, addr, &Empty {})?;
            Ok(count + 1)
        }
        (true, false) => {
            ALLOW_LIST.remove(storage, addr);
            Ok(count - 1)
        }
        _ => Ok(count),
    }
}

pub fn is_member(storage: &dyn Storage, addr: &Addr) -> bool {
    ALLOW_LIST.has(storage, addr)
}

pub fn query_is_allow_listed(deps: Deps, address: String) -> StdResult<bool> {
    let addr = deps.api.addr_validate(&address)?;
    Ok(is_member(deps.storage, &addr))
}

pub fn query_allow_list_count(deps: Deps) -> StdResult<u64> {
    Ok(ALLOW_LIST_COUNT.may_load(deps.storage)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::tests::{setup_drop, OPERATOR_ADDR};
    use cosmwasm_std::testing::mock_info;

    fn set(
        deps: DepsMut,
        sender: &str,
        addresses: &[&str],
        flags: &[bool],
    ) -> Result<Response, ContractError> {
        execute_set_allow_list(
            deps,
            mock_info(sender, &[]),
            1,
            addresses.iter().map(|a| a.to_string()).collect(),
            flags.to_vec(),
        )
    }

    #[test]
    fn only_operator_updates() {
        let mut deps = setup_drop(10);
        let err = set(deps.as_mut(), "artist", &["artist"], &[true]).unwrap_err();
        assert_eq!(err, ContractError::NotOwner {});
        assert!(!query_is_allow_listed(deps.as_ref(), "artist".to_string()).unwrap());
    }

    #[test]
    fn add_twice_counts_once() {
        let mut deps = setup_drop(10);
        set(deps.as_mut(), OPERATOR_ADDR, &["artist"], &[true]).unwrap();
        assert!(query_is_allow_listed(deps.as_ref(), "artist".to_string()).unwrap());
        assert_eq!(query_allow_list_count(deps.as_ref()).unwrap(), 1);

        set(deps.as_mut(), OPERATOR_ADDR, &["artist"], &[true]).unwrap();
        assert_eq!(query_allow_list_count(deps.as_ref()).unwrap(), 1);
    }

    #[test]
    fn remove_more_than_once() {
        let mut deps = setup_drop(10);
        set(deps.as_mut(), OPERATOR_ADDR, &["artist", "collector"], &[true, true]).unwrap();
        assert_eq!(query_allow_list_count(deps.as_ref()).unwrap(), 2);

        set(deps.as_mut(), OPERATOR_ADDR, &["artist"], &[false]).unwrap();
        assert!(!query_is_allow_listed(deps.as_ref(), "artist".to_string()).unwrap());
        assert_eq!(query_allow_list_count(deps.as_ref()).unwrap(), 1);

        set(deps.as_mut(), OPERATOR_ADDR, &["artist"], &[false]).unwrap();
        assert_eq!(query_allow_list_count(deps.as_ref()).unwrap(), 1);
    }

    #[test]
    fn duplicate_in_one_batch_uses_last_flag() {
        let mut deps = setup_drop(10);
        set(
            deps.as_mut(),
            OPERATOR_ADDR,
            &["artist", "artist", "artist"],
            &[true, false, true],
        )
        .unwrap();
        assert!(query_is_allow_listed(deps.as_ref(), "artist".to_string()).unwrap());
        assert_eq!(query_allow_list_count(deps.as_ref()).unwrap(), 1);
    }

    #[test]
    fn length_mismatch() {
        let mut deps = setup_drop(10);
        let err =
            set(deps.as_mut(), OPERATOR_ADDR, &["artist", "collector"], &[true]).unwrap_err();
        assert_eq!(err, ContractError::SizeMismatch { expected: 2, got: 1 });
        assert_eq!(query_allow_list_count(deps.as_ref()).unwrap(), 0);
    }
}
