use clap::Parser;
use pages_deploy::adapters::browser;
use pages_deploy::utils::logger;
use pages_deploy::{CliConfig, DeployError, DeployReport, FileConfig, Settings};
use std::time::Duration;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const BROWSER_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Deploy failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("✗ {}", e.user_friendly_message());
        eprintln!("  {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<(), DeployError> {
    let file_settings = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            FileConfig::from_file(path)?.into_settings()
        }
        None => Settings::default(),
    };

    // 驗證配置，缺少 token 時在任何網路請求前失敗
    let request = cli.settings().or(file_settings).resolve()?;

    println!("\n{}", RULE);
    println!("  Portfolio Deployer");
    println!("{}", RULE);

    let report = pages_deploy::deploy(&request).await?;
    print_summary(&report);

    if request.open_browser {
        println!("  Opening browser in {} seconds...", BROWSER_DELAY.as_secs());
        tokio::time::sleep(BROWSER_DELAY).await;
        if let Err(e) = browser::open_url(&report.pages_url) {
            tracing::warn!("Could not open browser: {:#}", e);
        }
    }

    Ok(())
}

fn print_summary(report: &DeployReport) {
    println!("\n{}", RULE);
    println!("  ✅ Deployment complete!");
    println!("  🌐 Your portfolio will be live at:");
    println!("     {}", report.pages_url);
    println!("  ⏳ GitHub Pages can take 1–2 minutes to publish.");
    println!("{}\n", RULE);

    tracing::info!(
        "Deployed {} entries ({} skipped) at {}",
        report.staged.copied.len(),
        report.staged.skipped.len(),
        report.finished_at.to_rfc3339()
    );
}
