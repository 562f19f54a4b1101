//! 命令行定义与子命令处理
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;

use crate::config::{ConfigManager, GlobalConfig, RuleOrigin, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_MAX_HTML_LEN};
use crate::detector::{fingerprint_html, init_detector_with_config};
use crate::envelope::Envelope;
use crate::rule::model::{DetectedAnalytics, DetectedTechnology};
use crate::server::{self, RequestDispatcher};
use crate::service::FingerprintService;

/// Web technology fingerprinting over JSON-RPC (stdio / HTTP) and the command line
#[derive(Parser, Debug)]
#[command(name = "rsfingerprint", version, author, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "FILE", help = "JSON signature catalog replacing the built-in one")]
    pub rules: Option<PathBuf>,

    #[arg(long, global = true, value_name = "MS", default_value_t = DEFAULT_FETCH_TIMEOUT_MS, help = "Fetch timeout in milliseconds")]
    pub timeout_ms: u64,

    #[arg(long, global = true, value_name = "UA", help = "User-Agent used when fetching pages")]
    pub user_agent: Option<String>,

    #[arg(long, global = true, value_name = "BYTES", default_value_t = DEFAULT_MAX_HTML_LEN, help = "HTML larger than this is truncated before matching")]
    pub max_html_bytes: usize,

    #[arg(long, global = true, value_name = "LEVEL", help = "Log level (overrides RUST_LOG)")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve JSON-RPC over stdin/stdout, one message per line
    Stdio,
    /// Serve JSON-RPC and REST endpoints over HTTP
    Serve {
        #[arg(long, value_name = "ADDR", help = "Listen address (default 127.0.0.1:8787)")]
        bind: Option<SocketAddr>,
    },
    /// Fetch a URL and print its fingerprint
    Scan {
        #[arg(value_name = "URL")]
        url: String,
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Fingerprint a local HTML file
    Detect {
        #[arg(long, value_name = "FILE")]
        html: PathBuf,
        #[arg(long = "header", value_name = "NAME: VALUE", help = "Response header, may be repeated")]
        headers: Vec<String>,
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl CliArgs {
    /// 命令行参数覆盖默认配置
    pub fn to_config(&self) -> GlobalConfig {
        let mut builder = ConfigManager::custom()
            .fetch_timeout_ms(self.timeout_ms)
            .max_html_len(self.max_html_bytes);
        if let Some(path) = &self.rules {
            builder = builder.rule_origin(RuleOrigin::LocalFile(path.clone()));
        }
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Commands::Serve { bind: Some(addr) } = &self.command {
            builder = builder.bind_addr(*addr);
        }
        builder.build()
    }
}

/// 解析 `Name: value` 形式的 Header
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("header `{}` must look like `Name: value`", raw);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("header `{}` has an empty name", raw);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// 执行子命令
pub async fn run(args: CliArgs) -> Result<()> {
    let config = args.to_config();

    match args.command {
        Commands::Stdio => {
            let dispatcher = dispatcher(&config).await?;
            server::run_stdio(dispatcher).await?;
        }
        Commands::Serve { .. } => {
            let dispatcher = dispatcher(&config).await?;
            server::serve(dispatcher, config.bind_addr).await?;
        }
        Commands::Scan { url, format } => {
            let service = FingerprintService::from_config(&config)
                .await
                .context("failed to load signature catalog")?;
            let envelope = service.fingerprint_url(&url, None).await;
            let ok = envelope.ok;
            match format {
                OutputFormat::Json => print_json(&envelope)?,
                OutputFormat::Text => print_text(
                    &envelope.data.technologies,
                    &envelope.data.analytics,
                    &envelope.meta.warnings,
                ),
            }
            if !ok {
                bail!("scan of {} failed", url);
            }
        }
        Commands::Detect { html, headers, format } => {
            let content = tokio::fs::read_to_string(&html)
                .await
                .with_context(|| format!("cannot read {}", html.display()))?;
            let headers = headers
                .iter()
                .map(|h| parse_header(h))
                .collect::<Result<HashMap<_, _>>>()?;

            init_detector_with_config(config)
                .await
                .context("failed to load signature catalog")?;
            let report = fingerprint_html(&content, &headers)?;

            match format {
                OutputFormat::Json => {
                    let data = json!({
                        "technologies": report.technologies,
                        "analytics": report.analytics,
                    });
                    let envelope = Envelope::success(data, report.warnings)
                        .with_source(html.display().to_string());
                    print_json(&envelope)?;
                }
                OutputFormat::Text => print_text(&report.technologies, &report.analytics, &report.warnings),
            }
        }
    }

    Ok(())
}

async fn dispatcher(config: &GlobalConfig) -> Result<RequestDispatcher> {
    let service = FingerprintService::from_config(config)
        .await
        .context("failed to load signature catalog")?;
    Ok(RequestDispatcher::new(service))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_text(technologies: &[DetectedTechnology], analytics: &[DetectedAnalytics], warnings: &[String]) {
    for tech in technologies {
        println!("{}", tech);
    }
    for item in analytics {
        println!("{}", item);
    }
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}
