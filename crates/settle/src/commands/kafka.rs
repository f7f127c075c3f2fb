use anyhow::Context;
use colored::Colorize;
use settle_aws::AwsProvider;
use settle_aws::kafka::{
    cluster_created, cluster_deleted, cluster_operation_completed, delete_configuration as delete,
};
use settle_core::OperationContext;

pub async fn wait_created(
    ctx: &OperationContext,
    provider: &AwsProvider,
    arn: &str,
) -> anyhow::Result<()> {
    let config = provider.config();
    println!("{}", format!("クラスタ {} の作成完了を待機中...", arn).blue());

    let cluster = cluster_created(
        ctx,
        provider.clients().kafka.as_ref(),
        arn,
        config.timeouts.cluster_create(),
        &config.polling,
    )
    .await
    .with_context(|| format!("error waiting for MSK Cluster ({}) to be created", arn))?;

    if let Some(cluster) = cluster {
        println!(
            "{}",
            format!("✓ {} は {} です", cluster.cluster_name, cluster.state)
                .green()
                .bold()
        );
    }
    Ok(())
}

pub async fn wait_deleted(
    ctx: &OperationContext,
    provider: &AwsProvider,
    arn: &str,
) -> anyhow::Result<()> {
    let config = provider.config();
    println!("{}", format!("クラスタ {} の削除完了を待機中...", arn).blue());

    cluster_deleted(
        ctx,
        provider.clients().kafka.as_ref(),
        arn,
        config.timeouts.cluster_delete(),
        &config.polling,
    )
    .await
    .with_context(|| format!("error waiting for MSK Cluster ({}) to be deleted", arn))?;

    println!("{}", "✓ クラスタは削除されました".green().bold());
    Ok(())
}

pub async fn wait_operation(
    ctx: &OperationContext,
    provider: &AwsProvider,
    arn: &str,
) -> anyhow::Result<()> {
    let config = provider.config();
    println!("{}", format!("クラスタ操作 {} の完了を待機中...", arn).blue());

    let operation = cluster_operation_completed(
        ctx,
        provider.clients().kafka.as_ref(),
        arn,
        config.timeouts.cluster_update(),
        &config.polling,
    )
    .await
    .with_context(|| format!("error waiting for MSK Cluster Operation ({}) to complete", arn))?;

    let kind = operation
        .and_then(|op| op.operation_type)
        .unwrap_or_else(|| "operation".to_string());
    println!("{}", format!("✓ {} が完了しました", kind).green().bold());
    Ok(())
}

pub async fn delete_configuration(
    ctx: &OperationContext,
    provider: &AwsProvider,
    arn: &str,
    yes: bool,
) -> anyhow::Result<()> {
    println!("{}", format!("MSK 設定 {} を削除します", arn).yellow());

    if !yes {
        println!("実行するには --yes オプションを指定してください");
        return Ok(());
    }

    let config = provider.config();
    delete(
        ctx,
        provider.clients().kafka.as_ref(),
        arn,
        config.timeouts.configuration_delete(),
        &config.polling,
    )
    .await?;

    println!("{}", "✓ MSK 設定を削除しました".green().bold());
    Ok(())
}
