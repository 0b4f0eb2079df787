//! CLI argument structures

use crate::cli::help::AFTER_HELP;
use clap::Parser;
use std::path::PathBuf;

/// Text templates using ${var} expansion syntax
#[derive(Parser, Debug)]
#[command(name = "boilr")]
#[command(about = "boilr - Text templates using ${var} expansion syntax", long_about = None)]
#[command(version)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Set a KEY=VALUE variable (repeatable, overrides every other source)
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Load variables from a dotenv file
    #[arg(short = 's', long = "env-file", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Process this template file
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Process every template in a directory, recursively
    #[arg(short = 'd', long = "dir", value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Directory to save results in
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// File patterns to skip when processing a directory [default: .git,.DS_Store,.env]
    #[arg(short = 'i', long = "ignore", value_name = "PATTERN", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Template text to expand (read from stdin when omitted and piped)
    pub template: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "boilr", "-e", "a=1", "--env", "b=2", "-s", "vars.env", "-d", "tpl", "-o", "out",
            "-i", "*.bak,.git", "-i", "node_modules", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.env, vec!["a=1", "b=2"]);
        assert_eq!(cli.env_file, Some(PathBuf::from("vars.env")));
        assert_eq!(cli.dir, Some(PathBuf::from("tpl")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.ignore, vec!["*.bak", ".git", "node_modules"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.template.is_none());
    }

    #[test]
    fn test_env_pairs_keep_commas() {
        let cli = Cli::try_parse_from(["boilr", "-e", "list=a,b,c", "${list}"]).unwrap();
        assert_eq!(cli.env, vec!["list=a,b,c"]);
        assert_eq!(cli.template.as_deref(), Some("${list}"));
    }
}
