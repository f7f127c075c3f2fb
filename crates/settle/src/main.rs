mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use settle_aws::AwsProvider;
use settle_core::OperationContext;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "settle")]
#[command(about = "AWS リソースが落ち着くまで待つ。", long_about = None)]
struct Cli {
    /// 設定ファイルのパス (省略時は SETTLE_CONFIG_PATH / ./settle.yaml / ~/.config/settle/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// AWS リージョン (設定ファイルより優先)
    #[arg(long, global = true)]
    region: Option<String>,
    /// AWS 認証プロファイル (設定ファイルより優先)
    #[arg(long, global = true)]
    profile: Option<String>,
    /// 操作全体のタイムアウト（秒）
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// AppStream fleet
    #[command(subcommand)]
    Fleet(FleetCommands),
    /// Amazon MSK クラスタ / 設定
    #[command(subcommand)]
    Kafka(KafkaCommands),
    /// SSM Parameter Store
    #[command(subcommand)]
    Ssm(SsmCommands),
    /// 設定の確認
    #[command(subcommand)]
    Config(ConfigCommands),
    /// バージョン情報を表示
    Version,
}

#[derive(Subcommand)]
enum FleetCommands {
    /// fleet の現在の状態を表示
    Show {
        /// fleet 名
        name: String,
    },
    /// fleet を停止して削除（停止完了まで待つ）
    Delete {
        /// fleet 名
        name: String,
        /// 確認なしで実行
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum KafkaCommands {
    /// クラスタが ACTIVE になるまで待つ
    WaitCreated {
        /// クラスタ ARN
        arn: String,
    },
    /// クラスタが消えるまで待つ
    WaitDeleted {
        /// クラスタ ARN
        arn: String,
    },
    /// クラスタ操作が完了するまで待つ
    WaitOperation {
        /// クラスタ操作 ARN
        arn: String,
    },
    /// MSK 設定を削除（消えるまで待つ）
    DeleteConfiguration {
        /// 設定 ARN
        arn: String,
        /// 確認なしで実行
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SsmCommands {
    /// パス配下のパラメータを一覧表示
    Params {
        /// パラメータ階層 (例: /app/prod)
        path: String,
        /// SecureString を復号しない
        #[arg(long)]
        no_decrypt: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// 解決済みの設定を表示
    Show,
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Ctrl-C で cancel される context
fn operation_context(timeout: Option<u64>) -> OperationContext {
    let token = CancellationToken::new();
    let ctx = OperationContext::from_token(token.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "中断しています...".yellow());
            token.cancel();
        }
    });

    match timeout {
        Some(secs) => ctx.with_timeout(Duration::from_secs(secs)),
        None => ctx,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("settle {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = commands::config::load(cli.config.as_deref(), cli.region, cli.profile)?;
    init_tracing(&config.log_level);
    tracing::debug!(region = ?config.region, profile = ?config.profile, "configuration resolved");

    let ctx = operation_context(cli.timeout);
    let provider = AwsProvider::from_config(config).await;

    // コマンドディスパッチ
    match cli.command {
        Commands::Fleet(FleetCommands::Show { name }) => {
            commands::fleet::show(&ctx, &provider, &name).await?;
        }
        Commands::Fleet(FleetCommands::Delete { name, yes }) => {
            commands::fleet::delete(&ctx, &provider, &name, yes).await?;
        }
        Commands::Kafka(KafkaCommands::WaitCreated { arn }) => {
            commands::kafka::wait_created(&ctx, &provider, &arn).await?;
        }
        Commands::Kafka(KafkaCommands::WaitDeleted { arn }) => {
            commands::kafka::wait_deleted(&ctx, &provider, &arn).await?;
        }
        Commands::Kafka(KafkaCommands::WaitOperation { arn }) => {
            commands::kafka::wait_operation(&ctx, &provider, &arn).await?;
        }
        Commands::Kafka(KafkaCommands::DeleteConfiguration { arn, yes }) => {
            commands::kafka::delete_configuration(&ctx, &provider, &arn, yes).await?;
        }
        Commands::Ssm(SsmCommands::Params { path, no_decrypt }) => {
            commands::ssm::params(&ctx, &provider, &path, !no_decrypt).await?;
        }
        Commands::Config(ConfigCommands::Show) => {
            commands::config::show(provider.config())?;
        }
        // 設定読み込み前に処理済み
        Commands::Version => {}
    }

    Ok(())
}
