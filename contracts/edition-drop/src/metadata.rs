use cosmwasm_std::{Deps, DepsMut, Empty, Event, MessageInfo, StdResult, Storage};
use cw721::{Cw721QueryMsg, OwnerOfResponse};
use sg_edition::{EditionDescription, EditionMetadata};
use sg_std::Response;

use crate::contract::only_operator;
use crate::error::ContractError;
use crate::state::{
    DropConfig, TokenId, COLLECTION, CONFIG, COVERED, COVERED_COUNT, ISSUED, METADATA,
    METADATA_LOADED, REDEEMED, REDEEMED_URIS, TOKEN_URIS,
};

/// `[start_id, start_id + count - 1]` must sit inside `[1, capacity]`
fn check_range(start_id: TokenId, count: u32, capacity: u32) -> Result<(), ContractError> {
    if start_id == 0 || start_id as u64 + count as u64 > capacity as u64 + 1 {
        return Err(ContractError::InvalidRange {
            start_id,
            count,
            capacity,
        });
    }
    Ok(())
}

fn check_len<T>(items: &[T], count: u32) -> Result<(), ContractError> {
    if items.len() != count as usize {
        return Err(ContractError::SizeMismatch {
            expected: count as usize,
            got: items.len(),
        });
    }
    Ok(())
}

fn update_record(
    storage: &mut dyn Storage,
    token_id: TokenId,
    action: impl FnOnce(&mut EditionMetadata),
) -> StdResult<()> {
    let mut record = METADATA.may_load(storage, token_id)?.unwrap_or_default();
    action(&mut record);
    METADATA.save(storage, token_id, &record)
}

/// Loads descriptive fields for a contiguous id range.
/// Coverage only grows, and `METADATA_LOADED` latches once every id has been written.
#[allow(clippy::too_many_arguments)]
pub fn execute_load_metadata_chunk(
    deps: DepsMut,
    info: MessageInfo,
    start_id: TokenId,
    count: u32,
    descriptions: Vec<String>,
    animation_urls: Vec<String>,
    animation_hashes: Vec<String>,
    image_urls: Vec<String>,
    image_hashes: Vec<String>,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;

    let config = CONFIG.load(deps.storage)?;
    check_range(start_id, count, config.capacity)?;
    check_len(&descriptions, count)?;
    check_len(&animation_urls, count)?;
    check_len(&animation_hashes, count)?;
    check_len(&image_urls, count)?;
    check_len(&image_hashes, count)?;

    let mut covered = COVERED_COUNT.may_load(deps.storage)?.unwrap_or_default();
    let fields = descriptions
        .into_iter()
        .zip(animation_urls)
        .zip(animation_hashes)
        .zip(image_urls)
        .zip(image_hashes);
    for (token_id, ((((description, animation_url), animation_hash), image_url), image_hash)) in
        (start_id..).zip(fields)
    {
        update_record(deps.storage, token_id, |record| {
            record.description = description;
            record.animation_url = animation_url;
            record.animation_hash = animation_hash;
            record.image_url = image_url;
            record.image_hash = image_hash;
        })?;
        if !COVERED.has(deps.storage, token_id) {
            COVERED.save(deps.storage, token_id, &Empty {})?;
            covered += 1;
        }
    }
    COVERED_COUNT.save(deps.storage, &covered)?;

    let loaded = METADATA_LOADED.may_load(deps.storage)?.unwrap_or_default()
        || covered == config.capacity;
    METADATA_LOADED.save(deps.storage, &loaded)?;

    let event = Event::new("load_metadata_chunk")
        .add_attribute("start_id", start_id.to_string())
        .add_attribute("count", count.to_string())
        .add_attribute("covered", covered.to_string())
        .add_attribute("loaded", loaded.to_string());
    Ok(Response::new().add_event(event))
}

pub fn execute_load_redeemed_metadata(
    deps: DepsMut,
    info: MessageInfo,
    token_id: TokenId,
    animation_url: String,
    animation_hash: String,
    image_url: String,
    image_hash: String,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;
    let config = CONFIG.load(deps.storage)?;
    check_range(token_id, 1, config.capacity)?;

    update_record(deps.storage, token_id, |record| {
        record.redeemed_animation_url = animation_url;
        record.redeemed_animation_hash = animation_hash;
        record.redeemed_image_url = image_url;
        record.redeemed_image_hash = image_hash;
    })?;

    let event =
        Event::new("load_redeemed_metadata").add_attribute("token_id", token_id.to_string());
    Ok(Response::new().add_event(event))
}

/// Replaces the redeemed media urls, the hashes stay as loaded
pub fn execute_update_redeemed_urls(
    deps: DepsMut,
    info: MessageInfo,
    token_id: TokenId,
    image_url: String,
    animation_url: String,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;
    let config = CONFIG.load(deps.storage)?;
    check_range(token_id, 1, config.capacity)?;

    update_record(deps.storage, token_id, |record| {
        record.redeemed_image_url = image_url;
        record.redeemed_animation_url = animation_url;
    })?;

    let event = Event::new("update_redeemed_urls").add_attribute("token_id", token_id.to_string());
    Ok(Response::new().add_event(event))
}

pub fn execute_update_condition_report(
    deps: DepsMut,
    info: MessageInfo,
    token_id: TokenId,
    url: String,
    hash: String,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;
    let config = CONFIG.load(deps.storage)?;
    check_range(token_id, 1, config.capacity)?;

    update_record(deps.storage, token_id, |record| {
        record.condition_report_url = url;
        record.condition_report_hash = hash;
    })?;

    let event =
        Event::new("update_condition_report").add_attribute("token_id", token_id.to_string());
    Ok(Response::new().add_event(event))
}

/// Explicit token uris for a range, taking precedence over the base uri
pub fn execute_update_metadata(
    deps: DepsMut,
    info: MessageInfo,
    start_id: TokenId,
    count: u32,
    token_uris: Vec<String>,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;
    let config = CONFIG.load(deps.storage)?;
    check_range(start_id, count, config.capacity)?;
    check_len(&token_uris, count)?;

    for (token_id, uri) in (start_id..).zip(token_uris) {
        TOKEN_URIS.save(deps.storage, token_id, &uri)?;
    }

    let event = Event::new("update_metadata")
        .add_attribute("start_id", start_id.to_string())
        .add_attribute("count", count.to_string());
    Ok(Response::new().add_event(event))
}

pub fn execute_update_base_uri(
    deps: DepsMut,
    info: MessageInfo,
    base_uri: String,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.base_uri = base_uri;
    CONFIG.save(deps.storage, &config)?;

    let event = Event::new("update_base_uri").add_attribute("base_uri", config.base_uri);
    Ok(Response::new().add_event(event))
}

pub fn execute_update_redeemed_uri(
    deps: DepsMut,
    info: MessageInfo,
    token_id: TokenId,
    uri: String,
) -> Result<Response, ContractError> {
    only_operator(deps.as_ref(), &info.sender)?;
    let config = CONFIG.load(deps.storage)?;
    check_range(token_id, 1, config.capacity)?;

    REDEEMED_URIS.save(deps.storage, token_id, &uri)?;

    let event = Event::new("update_redeemed_uri")
        .add_attribute("token_id", token_id.to_string())
        .add_attribute("uri", uri);
    Ok(Response::new().add_event(event))
}

/// Marks the physical item behind an edition as redeemed.
/// Only the current holder in the collection can redeem.
pub fn execute_redeem(
    deps: DepsMut,
    info: MessageInfo,
    token_id: TokenId,
) -> Result<Response, ContractError> {
    if !ISSUED.has(deps.storage, token_id) {
        return Err(ContractError::InvalidTokenId { token_id });
    }
    if REDEEMED.has(deps.storage, token_id) {
        return Err(ContractError::AlreadyRedeemed { token_id });
    }

    let collection = COLLECTION.load(deps.storage)?;
    let res: OwnerOfResponse = deps.querier.query_wasm_smart(
        collection,
        &Cw721QueryMsg::OwnerOf {
            token_id: token_id.to_string(),
            include_expired: None,
        },
    )?;
    if res.owner != info.sender.as_str() {
        return Err(ContractError::NotHolder {});
    }

    REDEEMED.save(deps.storage, token_id, &Empty {})?;

    let event = Event::new("redeem")
        .add_attribute("token_id", token_id.to_string())
        .add_attribute("holder", info.sender);
    Ok(Response::new().add_event(event))
}

pub fn query_metadata(deps: Deps, token_id: TokenId) -> Result<EditionMetadata, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    check_range(token_id, 1, config.capacity)?;
    Ok(METADATA.may_load(deps.storage, token_id)?.unwrap_or_default())
}

pub fn query_metadata_loaded(deps: Deps) -> StdResult<bool> {
    Ok(METADATA_LOADED.may_load(deps.storage)?.unwrap_or_default())
}

fn token_uri(storage: &dyn Storage, config: &DropConfig, token_id: TokenId) -> StdResult<String> {
    if REDEEMED.has(storage, token_id) {
        if let Some(uri) = REDEEMED_URIS.may_load(storage, token_id)? {
            return Ok(uri);
        }
    }
    Ok(TOKEN_URIS
        .may_load(storage, token_id)?
        .unwrap_or_else(|| format!("{}{}.json", config.base_uri, token_id)))
}

pub fn query_token_uri(deps: Deps, token_id: TokenId) -> Result<String, ContractError> {
    if !ISSUED.has(deps.storage, token_id) {
        return Err(ContractError::InvalidTokenId { token_id });
    }
    let config = CONFIG.load(deps.storage)?;
    Ok(token_uri(deps.storage, &config, token_id)?)
}

fn pick(redeemed: bool, redeemed_value: String, value: String) -> String {
    if redeemed && !redeemed_value.is_empty() {
        redeemed_value
    } else {
        value
    }
}

/// Display view of an issued edition. Redeemed editions show their redeemed
/// media wherever it has been loaded.
pub fn query_describe(deps: Deps, token_id: TokenId) -> Result<EditionDescription, ContractError> {
    if !ISSUED.has(deps.storage, token_id) {
        return Err(ContractError::InvalidTokenId { token_id });
    }
    let config = CONFIG.load(deps.storage)?;
    let record = METADATA.may_load(deps.storage, token_id)?.unwrap_or_default();
    let redeemed = REDEEMED.has(deps.storage, token_id);

    Ok(EditionDescription {
        token_id,
        name: format!("{} {}/{}", config.name, token_id, config.capacity),
        token_uri: token_uri(deps.storage, &config, token_id)?,
        description: record.description,
        animation_url: pick(redeemed, record.redeemed_animation_url, record.animation_url),
        animation_hash: pick(redeemed, record.redeemed_animation_hash, record.animation_hash),
        image_url: pick(redeemed, record.redeemed_image_url, record.image_url),
        image_hash: pick(redeemed, record.redeemed_image_hash, record.image_hash),
        condition_report_url: record.condition_report_url,
        condition_report_hash: record.condition_report_hash,
        redeemed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::tests::{setup_drop, COLLECTION_ADDR, OPERATOR_ADDR};
    use cosmwasm_std::testing::{mock_info, MockApi, MockQuerier, MockStorage};
    use cosmwasm_std::{
        from_binary, to_binary, Addr, ContractResult, OwnedDeps, SystemError, SystemResult,
        WasmQuery,
    };

    fn chunk(
        deps: DepsMut,
        start_id: TokenId,
        count: u32,
        tag: &str,
    ) -> Result<Response, ContractError> {
        let fields = |field: &str| -> Vec<String> {
            (start_id..start_id.saturating_add(count))
                .map(|id| format!("{}-{}-{}", tag, field, id))
                .collect()
        };
        execute_load_metadata_chunk(
            deps,
            mock_info(OPERATOR_ADDR, &[]),
            start_id,
            count,
            fields("description"),
            fields("animation"),
            fields("animation_hash"),
            fields("image"),
            fields("image_hash"),
        )
    }

    fn issue(deps: DepsMut, token_id: TokenId) {
        ISSUED
            .save(deps.storage, token_id, &Addr::unchecked("holder"))
            .unwrap();
    }

    /// Answers cw721 `OwnerOf` for the collection with `owner`
    fn collection_owner(
        deps: &mut OwnedDeps<MockStorage, MockApi, MockQuerier>,
        owner: &'static str,
    ) {
        deps.querier.update_wasm(move |query| match query {
            WasmQuery::Smart { contract_addr, msg } if contract_addr == COLLECTION_ADDR => {
                match from_binary(msg) {
                    Ok(Cw721QueryMsg::OwnerOf { .. }) => {
                        let res = OwnerOfResponse {
                            owner: owner.to_string(),
                            approvals: vec![],
                        };
                        SystemResult::Ok(ContractResult::Ok(to_binary(&res).unwrap()))
                    }
                    _ => SystemResult::Err(SystemError::UnsupportedRequest {
                        kind: "cw721 query".to_string(),
                    }),
                }
            }
            _ => SystemResult::Err(SystemError::NoSuchContract {
                addr: "unknown".to_string(),
            }),
        });
    }

    #[test]
    fn coverage_is_monotonic() {
        let mut deps = setup_drop(20);

        chunk(deps.as_mut(), 1, 10, "a").unwrap();
        assert!(!query_metadata_loaded(deps.as_ref()).unwrap());
        chunk(deps.as_mut(), 5, 10, "b").unwrap();
        assert!(!query_metadata_loaded(deps.as_ref()).unwrap());
        assert_eq!(COVERED_COUNT.load(deps.as_ref().storage).unwrap(), 14);

        chunk(deps.as_mut(), 11, 10, "c").unwrap();
        assert!(query_metadata_loaded(deps.as_ref()).unwrap());
        assert_eq!(COVERED_COUNT.load(deps.as_ref().storage).unwrap(), 20);

        // rewrites keep the flag set
        chunk(deps.as_mut(), 1, 1, "d").unwrap();
        assert!(query_metadata_loaded(deps.as_ref()).unwrap());

        let record = query_metadata(deps.as_ref(), 7).unwrap();
        assert_eq!(record.description, "b-description-7");
        assert_eq!(record.image_hash, "b-image_hash-7");
    }

    #[test]
    fn chunk_validation() {
        let mut deps = setup_drop(20);

        let err = chunk(deps.as_mut(), 0, 1, "a").unwrap_err();
        assert!(matches!(err, ContractError::InvalidRange { .. }));
        let err = chunk(deps.as_mut(), 15, 7, "a").unwrap_err();
        assert_eq!(
            err,
            ContractError::InvalidRange {
                start_id: 15,
                count: 7,
                capacity: 20
            }
        );
        let err = chunk(deps.as_mut(), u32::MAX, 2, "a").unwrap_err();
        assert!(matches!(err, ContractError::InvalidRange { .. }));

        let err = execute_load_metadata_chunk(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            1,
            2,
            vec!["one".to_string(), "two".to_string()],
            vec!["one".to_string()],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, ContractError::SizeMismatch { expected: 2, got: 1 });

        let err = execute_load_metadata_chunk(
            deps.as_mut(),
            mock_info("artist", &[]),
            1,
            0,
            vec![],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, ContractError::NotOwner {});
        assert_eq!(COVERED_COUNT.load(deps.as_ref().storage).unwrap(), 0);
    }

    #[test]
    fn redeemed_fields_do_not_count_as_coverage() {
        let mut deps = setup_drop(2);
        execute_load_redeemed_metadata(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            1,
            "r-animation".to_string(),
            "r-animation-hash".to_string(),
            "r-image".to_string(),
            "r-image-hash".to_string(),
        )
        .unwrap();
        assert_eq!(COVERED_COUNT.load(deps.as_ref().storage).unwrap(), 0);

        chunk(deps.as_mut(), 1, 2, "a").unwrap();
        assert!(query_metadata_loaded(deps.as_ref()).unwrap());
        // the chunk leaves redeemed fields alone
        let record = query_metadata(deps.as_ref(), 1).unwrap();
        assert_eq!(record.redeemed_animation_url, "r-animation");
        assert_eq!(record.animation_url, "a-animation-1");

        execute_update_redeemed_urls(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            1,
            "r-image-2".to_string(),
            "r-animation-2".to_string(),
        )
        .unwrap();
        let record = query_metadata(deps.as_ref(), 1).unwrap();
        assert_eq!(record.redeemed_image_url, "r-image-2");
        assert_eq!(record.redeemed_animation_url, "r-animation-2");
        assert_eq!(record.redeemed_image_hash, "r-image-hash");

        let err = execute_load_redeemed_metadata(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            3,
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidRange { .. }));
    }

    #[test]
    fn token_uri_precedence() {
        let mut deps = setup_drop(10);

        let err = query_token_uri(deps.as_ref(), 3).unwrap_err();
        assert_eq!(err, ContractError::InvalidTokenId { token_id: 3 });

        issue(deps.as_mut(), 3);
        assert_eq!(
            query_token_uri(deps.as_ref(), 3).unwrap(),
            "http://example.com/token/3.json"
        );

        execute_update_base_uri(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            "ipfs://drop/".to_string(),
        )
        .unwrap();
        assert_eq!(query_token_uri(deps.as_ref(), 3).unwrap(), "ipfs://drop/3.json");

        execute_update_metadata(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            2,
            2,
            vec!["ipfs://two".to_string(), "ipfs://three".to_string()],
        )
        .unwrap();
        assert_eq!(query_token_uri(deps.as_ref(), 3).unwrap(), "ipfs://three");

        execute_update_redeemed_uri(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            3,
            "ipfs://three-redeemed".to_string(),
        )
        .unwrap();
        // the redeemed uri only shows once the edition is redeemed
        assert_eq!(query_token_uri(deps.as_ref(), 3).unwrap(), "ipfs://three");
        REDEEMED.save(deps.as_mut().storage, 3, &Empty {}).unwrap();
        assert_eq!(
            query_token_uri(deps.as_ref(), 3).unwrap(),
            "ipfs://three-redeemed"
        );
    }

    #[test]
    fn update_metadata_validation() {
        let mut deps = setup_drop(10);
        let uris = |n: usize| -> Vec<String> {
            (0..n).map(|i| format!("ipfs://uri-{}", i)).collect()
        };

        let err =
            execute_update_metadata(deps.as_mut(), mock_info(OPERATOR_ADDR, &[]), 0, 1, uris(1))
                .unwrap_err();
        assert_eq!(
            err,
            ContractError::InvalidRange {
                start_id: 0,
                count: 1,
                capacity: 10
            }
        );

        let err =
            execute_update_metadata(deps.as_mut(), mock_info(OPERATOR_ADDR, &[]), 2, 10, uris(10))
                .unwrap_err();
        assert_eq!(
            err,
            ContractError::InvalidRange {
                start_id: 2,
                count: 10,
                capacity: 10
            }
        );

        let err =
            execute_update_metadata(deps.as_mut(), mock_info(OPERATOR_ADDR, &[]), 1, 5, uris(10))
                .unwrap_err();
        assert_eq!(err, ContractError::SizeMismatch { expected: 5, got: 10 });

        let err = execute_update_metadata(deps.as_mut(), mock_info("artist", &[]), 1, 1, uris(1))
            .unwrap_err();
        assert_eq!(err, ContractError::NotOwner {});

        // nothing landed
        assert_eq!(TOKEN_URIS.may_load(deps.as_ref().storage, 1).unwrap(), None);

        execute_update_metadata(deps.as_mut(), mock_info(OPERATOR_ADDR, &[]), 1, 10, uris(10))
            .unwrap();
        issue(deps.as_mut(), 10);
        assert_eq!(query_token_uri(deps.as_ref(), 10).unwrap(), "ipfs://uri-9");
    }

    #[test]
    fn redeemed_urls_outside_the_drop() {
        let mut deps = setup_drop(10);
        for token_id in [0, 11] {
            let err = execute_update_redeemed_urls(
                deps.as_mut(),
                mock_info(OPERATOR_ADDR, &[]),
                token_id,
                "r-image".to_string(),
                "r-animation".to_string(),
            )
            .unwrap_err();
            assert_eq!(
                err,
                ContractError::InvalidRange {
                    start_id: token_id,
                    count: 1,
                    capacity: 10
                }
            );
        }

        let err = execute_update_redeemed_urls(
            deps.as_mut(),
            mock_info("artist", &[]),
            10,
            "r-image".to_string(),
            "r-animation".to_string(),
        )
        .unwrap_err();
        assert_eq!(err, ContractError::NotOwner {});
        assert_eq!(METADATA.may_load(deps.as_ref().storage, 10).unwrap(), None);
    }

    #[test]
    fn describe_switches_media_on_redeem() {
        let mut deps = setup_drop(10);
        chunk(deps.as_mut(), 4, 1, "a").unwrap();
        execute_load_redeemed_metadata(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            4,
            "r-animation".to_string(),
            "r-animation-hash".to_string(),
            String::new(),
            String::new(),
        )
        .unwrap();
        execute_update_condition_report(
            deps.as_mut(),
            mock_info(OPERATOR_ADDR, &[]),
            4,
            "ipfs://report".to_string(),
            "report-hash".to_string(),
        )
        .unwrap();

        let err = query_describe(deps.as_ref(), 4).unwrap_err();
        assert_eq!(err, ContractError::InvalidTokenId { token_id: 4 });

        issue(deps.as_mut(), 4);
        let description = query_describe(deps.as_ref(), 4).unwrap();
        assert_eq!(description.name, "Edition 4/10");
        assert_eq!(description.description, "a-description-4");
        assert_eq!(description.animation_url, "a-animation-4");
        assert_eq!(description.condition_report_url, "ipfs://report");
        assert!(!description.redeemed);

        collection_owner(&mut deps, "holder");
        execute_redeem(deps.as_mut(), mock_info("holder", &[]), 4).unwrap();
        let description = query_describe(deps.as_ref(), 4).unwrap();
        assert!(description.redeemed);
        assert_eq!(description.animation_url, "r-animation");
        assert_eq!(description.animation_hash, "r-animation-hash");
        // no redeemed image was loaded
        assert_eq!(description.image_url, "a-image-4");
    }

    #[test]
    fn only_the_holder_redeems_once() {
        let mut deps = setup_drop(10);

        let err = execute_redeem(deps.as_mut(), mock_info("holder", &[]), 2).unwrap_err();
        assert_eq!(err, ContractError::InvalidTokenId { token_id: 2 });

        issue(deps.as_mut(), 2);
        collection_owner(&mut deps, "holder");

        let err = execute_redeem(deps.as_mut(), mock_info("someone", &[]), 2).unwrap_err();
        assert_eq!(err, ContractError::NotHolder {});

        execute_redeem(deps.as_mut(), mock_info("holder", &[]), 2).unwrap();
        let err = execute_redeem(deps.as_mut(), mock_info("holder", &[]), 2).unwrap_err();
        assert_eq!(err, ContractError::AlreadyRedeemed { token_id: 2 });
    }
}
