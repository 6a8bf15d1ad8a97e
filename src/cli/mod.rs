//! CLI module for uml-generator

mod args;
mod prompt;

pub use args::{Args, Command};
pub use prompt::{Prompter, Selection};

use crate::analysis::{Analyzer, DiagramRequest, FileDiscovery};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::logging::init_logging;
use crate::output::{output_file_name, DrawioWriter};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    // CLI flags win over the config file's [logging] table
    let logging = load_config(args.config_path())
        .map(|cfg| cfg.logging)
        .unwrap_or_default();
    let level = args.log_level.clone().or(logging.level);
    let format = args.log_format.clone().or(logging.format);
    if let Err(e) = init_logging(level.as_deref(), format.as_deref()) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());

    match execute(args, &mut prompter) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute a parsed command, prompting through `prompter` for missing inputs
pub fn execute<R: BufRead, W: Write>(args: Args, prompter: &mut Prompter<R, W>) -> Result<()> {
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
            let mut cfg = load_config(config.as_deref())?;
            let base_given = base_dir.is_some();
            cfg.merge_cli(base_dir, sub_package, output, exclude);
            cfg.validate()?;

            if !base_given && main.as_deref().map_or(true, is_index) {
                let default = cfg.project.base_directory.clone();
                cfg.project.base_directory = prompter.base_directory(&default)?;
            }
            let base = cfg.project.base_directory.clone();

            let main_script = match main {
                Some(main) if !is_index(&main) => {
                    let path = PathBuf::from(main);
                    if !path.is_file() {
                        return Err(Error::PathNotFound(path));
                    }
                    path
                }
                main => {
                    let files = candidate_files(&cfg, &base)?;
                    match main.and_then(|m| m.parse::<usize>().ok()) {
                        Some(idx) => files.get(idx).cloned().ok_or_else(|| {
                            Error::other(format!(
                                "Main script index {} out of range (found {} files)",
                                idx,
                                files.len()
                            ))
                        })?,
                        None => match prompter.main_script(&files)? {
                            Selection::Chosen(path) => path,
                            Selection::Abort => {
                                println!("Exiting program.");
                                return Ok(());
                            }
                        },
                    }
                }
            };

            let sub_package = match cfg.project.sub_package.clone() {
                Some(sub) => sub,
                None => match prompter.sub_package()? {
                    Some(sub) => sub,
                    None => {
                        println!("Exiting program.");
                        return Ok(());
                    }
                },
            };

            if verbose {
                println!("Base directory: {}", base.display());
                println!("Main script: {}", main_script.display());
                println!("Sub-package: {}", sub_package);
                println!("Output: {}", cfg.output.directory.display());
            }

            let request = DiagramRequest::new(main_script, base, sub_package.as_str());
            let mut analyzer = Analyzer::new()?;
            let run = analyzer.analyze(&request)?;

            if verbose {
                println!(
                    "Analyzed {} files, found {} classes",
                    run.files.len(),
                    run.classes.len()
                );
                for (path, err) in &run.parse_errors {
                    println!("  skipped {}: {}", path.display(), err);
                }
            }

            let writer = DrawioWriter::new()
                .with_layout(cfg.diagram.layout())
                .with_name(&cfg.diagram.name);
            let xml = writer.render(&run.classes);

            std::fs::create_dir_all(&cfg.output.directory)?;
            let output_path = cfg.output.directory.join(output_file_name(&sub_package));
            std::fs::write(&output_path, xml)?;
            println!("UML XML saved to {}", output_path.display());

            Ok(())
        }

        Command::List { base_dir, config } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(base_dir, None, None, Vec::new());
            let base = cfg.project.base_directory.clone();

            for (idx, file) in candidate_files(&cfg, &base)?.iter().enumerate() {
                println!("{}: {}", idx, file.display());
            }
            Ok(())
        }

        Command::Version => {
            println!("generate-uml {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Explicit config must load; the default file is optional
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::load_lenient(Path::new(DEFAULT_CONFIG_FILE))),
    }
}

fn candidate_files(cfg: &Config, base: &Path) -> Result<Vec<PathBuf>> {
    if !base.is_dir() {
        return Err(Error::PathNotFound(base.to_path_buf()));
    }
    let files = FileDiscovery::new()
        .with_excludes(cfg.discovery.exclude.as_slice())?
        .python_files(base)?;
    if files.is_empty() {
        return Err(Error::NoInputFiles(base.to_path_buf()));
    }
    Ok(files)
}

fn is_index(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
