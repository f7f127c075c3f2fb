use anyhow::Context;
use colored::Colorize;
use settle_aws::AwsProvider;
use settle_aws::ssm::{PARAMETERS_BY_PATH_DATA_SOURCE_TYPE, ParametersByPath};
use settle_core::{AttributeMap, OperationContext, ResourceData};

pub async fn params(
    ctx: &OperationContext,
    provider: &AwsProvider,
    path: &str,
    with_decryption: bool,
) -> anyhow::Result<()> {
    let source = provider
        .data_source(PARAMETERS_BY_PATH_DATA_SOURCE_TYPE)
        .with_context(|| {
            format!("data source {} is not registered", PARAMETERS_BY_PATH_DATA_SOURCE_TYPE)
        })?;

    let mut data = ResourceData::for_create(
        AttributeMap::new()
            .with("path", path)
            .with("with_decryption", with_decryption),
    );
    source.read(ctx, &mut data).await?;

    let found: ParametersByPath = data.state().decode()?;
    if found.names.is_empty() {
        println!("{}", format!("ℹ {} 配下にパラメータはありません", path).dimmed());
        return Ok(());
    }

    println!("{} {}", "Path:".bold(), path.cyan());
    for ((name, kind), value) in found.names.iter().zip(&found.types).zip(&found.values) {
        println!("  {} {} = {}", name.cyan(), format!("({})", kind).dimmed(), value);
    }
    println!();
    println!("{} 件", found.names.len());
    Ok(())
}
