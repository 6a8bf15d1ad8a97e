//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Generate UML class diagrams from Python source code
#[derive(Parser, Debug)]
#[command(name = "generate-uml")]
#[command(about = "Generate UML class diagrams (draw.io XML) from Python source code")]
#[command(version)]
pub struct Args {
    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (compact, pretty, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Config file named on the command line, if any
    pub fn config_path(&self) -> Option<&Path> {
        match &self.command {
            Command::Generate { config, .. } | Command::List { config, .. } => config.as_deref(),
            Command::Version => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a class diagram from a main script and its sub-package imports
    ///
    /// Inputs that are not given are asked for interactively.
    Generate {
        /// Base package directory imports are resolved against
        #[arg(short, long)]
        base_dir: Option<PathBuf>,

        /// Main script: a path, or an index from `generate-uml list`
        #[arg(short, long)]
        main: Option<String>,

        /// Sub-package token an import must contain to be followed
        #[arg(short, long)]
        sub_package: Option<String>,

        /// Directory the diagram file is written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Glob patterns to exclude from the candidate list (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List candidate main scripts with their indices
    List {
        /// Base package directory
        #[arg(short, long)]
        base_dir: Option<PathBuf>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults() {
        let args = Args::try_parse_from(["generate-uml", "generate"]).unwrap();
        match args.command {
            Command::Generate {
                base_dir,
                main,
                sub_package,
                output,
                config,
                exclude,
                verbose,
            } => {
                assert!(base_dir.is_none());
                assert!(main.is_none());
                assert!(sub_package.is_none());
                assert!(output.is_none());
                assert!(config.is_none());
                assert!(exclude.is_empty());
                assert!(!verbose);
            }
            _ => panic!("Expected Generate command"),
        }
        assert!(args.log_level.is_none());
    }

    #[test]
    fn test_generate_with_options() {
        let args = Args::try_parse_from([
            "generate-uml", "generate",
            "--base-dir", "lib",
            "--main", "lib/app/main.py",
            "--sub-package", "models",
            "--output", "/tmp/diagrams",
            "--config", "custom.toml",
            "--exclude", "tests/**",
            "--verbose",
            "--log-level", "debug",
        ])
        .unwrap();

        assert_eq!(args.log_level.as_deref(), Some("debug"));
        match args.command {
            Command::Generate {
                base_dir, main, sub_package, output, config, exclude, verbose,
            } => {
                assert_eq!(base_dir, Some(PathBuf::from("lib")));
                assert_eq!(main.as_deref(), Some("lib/app/main.py"));
                assert_eq!(sub_package.as_deref(), Some("models"));
                assert_eq!(output, Some(PathBuf::from("/tmp/diagrams")));
                assert_eq!(config, Some(PathBuf::from("custom.toml")));
                assert_eq!(exclude, vec!["tests/**".to_string()]);
                assert!(verbose);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_short_flags() {
        let args =
            Args::try_parse_from(["generate-uml", "generate", "-b", "src", "-m", "2", "-s", "core"])
                .unwrap();
        match args.command {
            Command::Generate { base_dir, main, sub_package, .. } => {
                assert_eq!(base_dir, Some(PathBuf::from("src")));
                assert_eq!(main.as_deref(), Some("2"));
                assert_eq!(sub_package.as_deref(), Some("core"));
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_list_command() {
        let args = Args::try_parse_from(["generate-uml", "list", "--base-dir", "app"]).unwrap();
        match args.command {
            Command::List { base_dir, .. } => assert_eq!(base_dir, Some(PathBuf::from("app"))),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_config_path() {
        let args = Args::try_parse_from(["generate-uml", "list", "-c", "uml.toml"]).unwrap();
        assert_eq!(args.config_path(), Some(Path::new("uml.toml")));

        let args = Args::try_parse_from(["generate-uml", "version"]).unwrap();
        assert_eq!(args.config_path(), None);
    }

    #[test]
    fn test_version_command() {
        let args = Args::try_parse_from(["generate-uml", "version"]).unwrap();
        assert!(matches!(args.command, Command::Version));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["generate-uml"]).is_err());
    }
}
