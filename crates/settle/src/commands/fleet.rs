use anyhow::Context;
use colored::Colorize;
use settle_aws::AwsProvider;
use settle_aws::appstream::FLEET_RESOURCE_TYPE;
use settle_aws::appstream::types::fleet_state;
use settle_core::{AttributeMap, OperationContext, ResourceData, ResourceHandler};

fn handler(provider: &AwsProvider) -> anyhow::Result<Box<dyn ResourceHandler>> {
    provider
        .resource(FLEET_RESOURCE_TYPE)
        .with_context(|| format!("resource type {} is not registered", FLEET_RESOURCE_TYPE))
}

fn colored_state(state: &str) -> colored::ColoredString {
    match state {
        fleet_state::RUNNING => state.green(),
        fleet_state::STOPPED => state.dimmed(),
        _ => state.yellow(),
    }
}

pub async fn show(ctx: &OperationContext, provider: &AwsProvider, name: &str) -> anyhow::Result<()> {
    let mut data = ResourceData::existing(name, AttributeMap::new());
    handler(provider)?.read(ctx, &mut data).await?;

    if data.id().is_empty() {
        println!("{}", format!("ℹ fleet '{}' は存在しません", name).dimmed());
        return Ok(());
    }

    let state = data.state();
    println!("{} {}", "Fleet:".bold(), name.cyan());
    println!("  state:         {}", colored_state(state.get_str("state").unwrap_or("-")));
    println!("  instance_type: {}", state.get_str("instance_type").unwrap_or("-"));
    println!("  arn:           {}", state.get_str("arn").unwrap_or("-"));
    if let Some(capacity) = state.get_ok("compute_capacity") {
        println!("  capacity:      {}", capacity);
    }
    if let Some(tags) = state.get_ok("tags") {
        println!("  tags:          {}", tags);
    }
    Ok(())
}

pub async fn delete(
    ctx: &OperationContext,
    provider: &AwsProvider,
    name: &str,
    yes: bool,
) -> anyhow::Result<()> {
    println!("{}", format!("fleet '{}' を削除します", name).yellow());

    // 確認（--yesが指定されていない場合）
    if !yes {
        println!();
        println!("{}", "警告: fleet を停止してから削除します。".yellow());
        println!("実行するには --yes オプションを指定してください");
        return Ok(());
    }

    let mut data = ResourceData::existing(name, AttributeMap::new());
    handler(provider)?.delete(ctx, &mut data).await?;

    println!();
    println!("{}", format!("✓ fleet '{}' を削除しました", name).green().bold());
    Ok(())
}
