//! Fleet state waiters

use super::api::AppStreamApi;
use super::status::fleet_state;
use super::types::{Fleet, fleet_state as state};
use settle_core::{OperationContext, Polling, StateChangeConf, WaitError};
use std::time::Duration;

async fn wait(
    ctx: &OperationContext,
    api: &dyn AppStreamApi,
    name: &str,
    conf: StateChangeConf,
    polling: &Polling,
) -> Result<Option<Fleet>, WaitError> {
    polling
        .apply(conf)
        .wait_for_state(ctx, || fleet_state(api, name))
        .await
        .map_err(|failure| failure.into_error())
}

pub async fn fleet_state_running(
    ctx: &OperationContext,
    api: &dyn AppStreamApi,
    name: &str,
    timeout: Duration,
    polling: &Polling,
) -> Result<Option<Fleet>, WaitError> {
    let conf = StateChangeConf::new(&[state::STARTING], &[state::RUNNING], timeout);
    wait(ctx, api, name, conf, polling).await
}

pub async fn fleet_state_stopped(
    ctx: &OperationContext,
    api: &dyn AppStreamApi,
    name: &str,
    timeout: Duration,
    polling: &Polling,
) -> Result<Option<Fleet>, WaitError> {
    let conf = StateChangeConf::new(&[state::STOPPING], &[state::STOPPED], timeout);
    wait(ctx, api, name, conf, polling).await
}
