//! rstranslate 命令行工具

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use rstranslate::{
    ConfigManager, EligibilityClassifier, GlobalConfig, HtmlExtractor, NodeShell, RuleLoader,
    TagFlattener, TreeReconstructor,
};

#[derive(Parser)]
#[command(name = "rstranslate")]
#[command(version, about = "规则驱动的网页翻译判定与标签树重建", long_about = None)]
#[command(after_help = "EXAMPLES:
    rstranslate classify --lang ZH \"你好 API\"
    rstranslate flatten '<p>Hello <b>World</b></p>'
    rstranslate reconstruct --shells shells.json '<t0>你好 <t1>世界</t1></t0>'")]
struct Cli {
    /// 配置文件（JSON）
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 判定文本是否需要翻译
    Classify {
        /// 规则文件（JSON），缺省时使用配置或内置规则
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// 目标语言代码
        #[arg(long, value_name = "CODE")]
        lang: Option<String>,

        /// 以JSON输出判定结果
        #[arg(long)]
        json: bool,

        text: String,
    },

    /// 将HTML片段扁平化为带标签文本与节点壳
    Flatten { html: String },

    /// 按节点壳重建带标签文本
    Reconstruct {
        /// 节点壳文件（JSON，键为 "tN"）
        #[arg(long, value_name = "FILE")]
        shells: PathBuf,

        /// 以JSON输出节点树
        #[arg(long)]
        json: bool,

        tagged: String,
    },

    /// 输出当前生效的规则集
    Rules {
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    config.verbose |= cli.verbose;
    init_tracing(config.verbose);

    match cli.command {
        Command::Classify { rules, lang, json, text } => {
            if let Some(path) = rules {
                config.rule_path = Some(path);
            }
            if let Some(lang) = lang {
                config.target_language = lang;
            }
            let rule_set = RuleLoader::load(&config).context("加载规则失败")?;
            let classification =
                EligibilityClassifier::new().classify(&text, &rule_set, &config.target_language);

            if json {
                println!("{}", serde_json::to_string_pretty(&classification)?);
            } else {
                println!("translate: {}", classification.translate);
                for line in classification.trace_lines() {
                    println!("  {}", line);
                }
            }
        }
        Command::Flatten { html } => {
            let fragment = HtmlExtractor::new().extract(&html);
            let flattened = TagFlattener::flatten(&fragment);
            println!("{}", serde_json::to_string_pretty(&flattened)?);
        }
        Command::Reconstruct { shells, json, tagged } => {
            let text = std::fs::read_to_string(&shells)
                .with_context(|| format!("读取节点壳文件失败：{}", shells.display()))?;
            let shells: BTreeMap<String, NodeShell> =
                serde_json::from_str(&text).context("节点壳文件格式错误")?;
            debug!("已加载{}个节点壳", shells.len());

            let reconstruction = TreeReconstructor::from_config(&config).reconstruct_tagged(&tagged, &shells);
            if json {
                println!("{}", serde_json::to_string_pretty(&reconstruction)?);
            } else {
                println!("{}", reconstruction.root.to_html());
                for warning in &reconstruction.warnings {
                    eprintln!("warning: {}", warning);
                }
            }
        }
        Command::Rules { rules } => {
            if let Some(path) = rules {
                config.rule_path = Some(path);
            }
            let rule_set = RuleLoader::load(&config).context("加载规则失败")?;
            println!("{}", serde_json::to_string_pretty(&rule_set)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GlobalConfig> {
    match path {
        Some(path) => ConfigManager::load(path).with_context(|| format!("加载配置失败：{}", path.display())),
        None => Ok(ConfigManager::get_default()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
