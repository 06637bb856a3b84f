use crate::config::ReportConfig;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "scantron-report")]
#[command(version)]
#[command(about = "Process a question library and Scantron data into a survey report")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the filename prefix
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Override the maximum number of answers per question
    #[arg(long, global = true)]
    pub max_answers: Option<usize>,

    /// Directory holding the input and output files
    #[arg(long, global = true)]
    pub dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Process the questions and generate the report
    ProcReport,
}

impl Cli {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut ReportConfig) {
        if let Some(prefix) = &self.prefix {
            config.filename_prefix = prefix.clone();
        }
        if let Some(max_answers) = self.max_answers {
            config.max_answers = max_answers;
        }
        if let Some(dir) = &self.dir {
            config.base_dir = dir.clone();
        }
    }
}
