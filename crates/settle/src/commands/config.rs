use colored::Colorize;
use settle_core::ProviderConfig;
use std::path::Path;

/// 設定ファイルを読み込み、CLI フラグで上書きする
pub fn load(
    path: Option<&Path>,
    region: Option<String>,
    profile: Option<String>,
) -> anyhow::Result<ProviderConfig> {
    let mut config = ProviderConfig::load(path)?;
    if region.is_some() {
        config.region = region;
    }
    if profile.is_some() {
        config.profile = profile;
    }
    Ok(config)
}

pub fn show(config: &ProviderConfig) -> anyhow::Result<()> {
    println!("{}", "解決済みの設定:".bold());
    print!("{}", serde_yaml::to_string(config)?);
    Ok(())
}
