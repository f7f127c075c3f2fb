mod common;

use common::FakeAppStream;
use serde_json::json;
use settle_aws::appstream::types::{ComputeCapacity, FleetConfig, fleet_state};
use settle_aws::appstream::FleetResource;
use settle_core::{
    ApiError, AttributeMap, OperationContext, ProviderConfig, ResourceData, ResourceHandler,
};
use std::sync::Arc;

fn config() -> FleetConfig {
    let mut config = FleetConfig {
        name: "web".to_string(),
        instance_type: "stream.standard.small".to_string(),
        compute_capacity: ComputeCapacity {
            desired_instances: 1,
        },
        image_name: Some("AppStream-WinServer2019".to_string()),
        ..Default::default()
    };
    config.tags.insert("env".to_string(), "dev".to_string());
    config
}

fn handler(fake: &Arc<FakeAppStream>) -> FleetResource {
    FleetResource::new(fake.clone(), &ProviderConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_create_retries_until_dependencies_visible() {
    let fake = Arc::new(FakeAppStream::new());
    *fake.create_not_found.lock().unwrap() = 2;

    let mut data = ResourceData::for_create(AttributeMap::encode(&config()).unwrap());
    handler(&fake)
        .create(&OperationContext::background(), &mut data)
        .await
        .unwrap();

    assert_eq!(data.id(), "web");
    assert_eq!(
        fake.mutations(),
        vec!["CreateFleet", "CreateFleet", "CreateFleet", "StartFleet"]
    );
    assert_eq!(data.state().get_str("state"), Some(fleet_state::RUNNING));
    assert_eq!(data.state().get("tags"), Some(&json!({"env": "dev"})));
    assert_eq!(data.state().get("tags_all"), Some(&json!({"env": "dev"})));
}

#[tokio::test(start_paused = true)]
async fn test_create_rejects_invalid_config() {
    let fake = Arc::new(FakeAppStream::new());
    let mut invalid = config();
    invalid.max_user_duration_in_seconds = Some(10);

    let mut data = ResourceData::for_create(AttributeMap::encode(&invalid).unwrap());
    let err = handler(&fake)
        .create(&OperationContext::background(), &mut data)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("error creating AppStream Fleet (web)"));
    assert!(fake.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_read_missing_fleet_clears_id() {
    let fake = Arc::new(FakeAppStream::new());
    let mut data = ResourceData::existing("web", AttributeMap::new());

    handler(&fake)
        .read(&OperationContext::background(), &mut data)
        .await
        .unwrap();

    assert_eq!(data.id(), "");
}

#[tokio::test(start_paused = true)]
async fn test_read_missing_new_fleet_is_error() {
    let fake = Arc::new(FakeAppStream::new());
    let mut data = ResourceData::for_create(AttributeMap::new());
    data.set_id("web");

    let err = handler(&fake)
        .read(&OperationContext::background(), &mut data)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("error reading AppStream Fleet (web)"));
    assert_eq!(data.id(), "web");
}

#[tokio::test(start_paused = true)]
async fn test_read_cancelled_context() {
    let fake = Arc::new(FakeAppStream::with_fleet("web", fleet_state::RUNNING));
    let ctx = OperationContext::background();
    ctx.cancel();

    let mut data = ResourceData::existing("web", AttributeMap::new());
    let err = handler(&fake).read(&ctx, &mut data).await.unwrap_err();

    assert!(err.cause::<settle_core::ContextError>().is_some());
    assert!(fake.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_update_quiesce_field_stops_and_restarts() {
    let fake = Arc::new(FakeAppStream::with_fleet("web", fleet_state::RUNNING));
    *fake.tags.lock().unwrap() = config().tags;

    let prior = AttributeMap::encode(&config()).unwrap();
    let mut planned = config();
    planned.instance_type = "stream.standard.medium".to_string();
    let mut data = ResourceData::for_update("web", prior, AttributeMap::encode(&planned).unwrap());

    handler(&fake)
        .update(&OperationContext::background(), &mut data)
        .await
        .unwrap();

    assert_eq!(fake.mutations(), vec!["StopFleet", "UpdateFleet", "StartFleet"]);
    let update = fake.last_update.lock().unwrap().clone().unwrap();
    assert_eq!(update.instance_type.as_deref(), Some("stream.standard.medium"));
    assert_eq!(fake.state().as_deref(), Some(fleet_state::RUNNING));
    assert_eq!(
        data.state().get_str("instance_type"),
        Some("stream.standard.medium")
    );
}

#[tokio::test(start_paused = true)]
async fn test_update_in_place_keeps_fleet_running() {
    let fake = Arc::new(FakeAppStream::with_fleet("web", fleet_state::RUNNING));

    let prior = AttributeMap::encode(&config()).unwrap();
    let mut planned = config();
    planned.display_name = Some("Web".to_string());
    let mut data = ResourceData::for_update("web", prior, AttributeMap::encode(&planned).unwrap());

    handler(&fake)
        .update(&OperationContext::background(), &mut data)
        .await
        .unwrap();

    assert_eq!(fake.mutations(), vec!["UpdateFleet"]);
    let update = fake.last_update.lock().unwrap().clone().unwrap();
    assert_eq!(update.display_name.as_deref(), Some("Web"));
    assert!(update.instance_type.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_update_tags() {
    let fake = Arc::new(FakeAppStream::with_fleet("web", fleet_state::RUNNING));
    let mut before = config();
    before.tags.insert("team".to_string(), "a".to_string());
    *fake.tags.lock().unwrap() = before.tags.clone();

    let mut after = config();
    after.tags.insert("env".to_string(), "prod".to_string());
    let mut data = ResourceData::for_update(
        "web",
        AttributeMap::encode(&before).unwrap(),
        AttributeMap::encode(&after).unwrap(),
    );

    handler(&fake)
        .update(&OperationContext::background(), &mut data)
        .await
        .unwrap();

    assert_eq!(
        fake.mutations(),
        vec!["UpdateFleet", "UntagResource", "TagResource"]
    );
    assert_eq!(data.state().get("tags"), Some(&json!({"env": "prod"})));
}

#[tokio::test(start_paused = true)]
async fn test_delete_is_idempotent() {
    let fake = Arc::new(FakeAppStream::with_fleet("web", fleet_state::RUNNING));
    let handler = handler(&fake);
    let ctx = OperationContext::background();

    let mut data = ResourceData::existing("web", AttributeMap::new());
    handler.delete(&ctx, &mut data).await.unwrap();
    assert_eq!(fake.mutations(), vec!["StopFleet", "DeleteFleet"]);
    assert!(fake.state().is_none());

    // 2 回目: fleet はもう無い
    handler.delete(&ctx, &mut data).await.unwrap();
    assert_eq!(
        fake.mutations(),
        vec!["StopFleet", "DeleteFleet", "StopFleet", "DeleteFleet"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_keeps_id_when_start_fails() {
    let fake = Arc::new(FakeAppStream::new());
    *fake.start_error.lock().unwrap() = Some(ApiError::new("LimitExceededException", "too many fleets"));

    let mut data = ResourceData::for_create(AttributeMap::encode(&config()).unwrap());
    let err = handler(&fake)
        .create(&OperationContext::background(), &mut data)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("AppStream Fleet (web)"));
    assert_eq!(data.id(), "web");
    assert_eq!(fake.mutations(), vec!["CreateFleet", "StartFleet"]);
    assert_eq!(fake.state().as_deref(), Some(fleet_state::STOPPED));
}

#[tokio::test(start_paused = true)]
async fn test_update_after_create_leaves_capacity_alone() {
    let fake = Arc::new(FakeAppStream::new());
    let handler = handler(&fake);
    let ctx = OperationContext::background();

    let mut created = ResourceData::for_create(AttributeMap::encode(&config()).unwrap());
    handler.create(&ctx, &mut created).await.unwrap();
    let prior = created.into_state();
    assert!(prior.get("compute_capacity").unwrap().get("running").is_some());

    let mut planned = config();
    planned.display_name = Some("Web".to_string());
    let mut data = ResourceData::for_update("web", prior, AttributeMap::encode(&planned).unwrap());
    handler.update(&ctx, &mut data).await.unwrap();

    let update = fake.last_update.lock().unwrap().clone().unwrap();
    assert!(update.compute_capacity.is_none());
    assert_eq!(update.display_name.as_deref(), Some("Web"));
}
