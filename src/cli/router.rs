//! Command routing and execution
//!
//! Builds the variable scope from its layers and sends the input to the
//! matching renderer.

use crate::app::AppConfig;
use crate::cli::args::Cli;
use crate::cli::validation::{resolve_paths, ResolvedPaths};
use crate::env::{dotenv, EnvReader, ScopedEnv};
use crate::error::{common, ErrorExt, Result};
use crate::render::{self, IgnoreRules, RenderEvent, RenderOutcome, RenderedEntry};
use std::io::{self, IsTerminal, Read, Write};
use tracing::debug;

/// Execute the CLI against the real process environment, stdin and stdout
pub fn execute(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let mut env = ScopedEnv::process();
    let stdin = io::stdin();
    let input = if stdin.is_terminal() {
        None
    } else {
        Some(stdin.lock())
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    run(&cli, config, &mut env, input, &mut out)?;
    out.flush().to_boilr("Failed to flush output")?;
    Ok(())
}

/// Execute the CLI with explicit collaborators
///
/// `input` is only read when no file, directory or template argument is given.
pub fn run<R, I, W>(
    cli: &Cli,
    config: &AppConfig,
    env: &mut ScopedEnv<R>,
    input: Option<I>,
    out: &mut W,
) -> Result<()>
where
    R: EnvReader,
    I: Read,
    W: Write,
{
    load_variables(cli, config, env)?;
    let ResolvedPaths { file, dir, output } = resolve_paths(cli, config)?;

    if let Some(file) = file {
        if let RenderOutcome::Text(text) = render::render_file(&file, output.as_deref(), env)? {
            writeln!(out, "{}", text)?;
        }
        return Ok(());
    }

    if let Some(dir) = dir {
        writeln!(out, "Processing: {}", dir.display())?;
        let ignore = if cli.ignore.is_empty() {
            IgnoreRules::default()
        } else {
            IgnoreRules::from_lines(&cli.ignore)
        };
        return render::render_dir_with(&dir, output.as_deref(), &ignore, env, |event| {
            match event {
                RenderEvent::Started(entry) => writeln!(out, " > file: {}", entry.relative)?,
                RenderEvent::Finished(RenderedEntry {
                    outcome: RenderOutcome::Text(text),
                    ..
                }) => writeln!(out, "{}", text)?,
                RenderEvent::Finished(_) => {}
            }
            Ok(())
        });
    }

    if let Some(template) = &cli.template {
        writeln!(out, "{}", render::render_str(template, env)?)?;
        return Ok(());
    }

    if let Some(input) = input {
        writeln!(out, "{}", render::render_reader(input, env)?)?;
    }

    Ok(())
}

/// Layer variables over the process environment: `./.env`, then `--env-file`, then `-e`
pub fn load_variables<R: EnvReader>(
    cli: &Cli,
    config: &AppConfig,
    env: &mut ScopedEnv<R>,
) -> Result<()> {
    let local = config.dotenv_path();
    if local.is_file() {
        let vars = dotenv::from_file(&local)?;
        debug!("Applying {} variable(s) from {}", vars.len(), local.display());
        env.extend(vars);
    }

    if let Some(path) = &cli.env_file {
        if !path.exists() {
            return Err(common::env_file_not_found(path));
        }
        let vars = dotenv::from_file(path)?;
        debug!("Applying {} variable(s) from {}", vars.len(), path.display());
        env.extend(vars);
    }

    if !cli.env.is_empty() {
        let vars = dotenv::parse_pairs(&cli.env).map_err(common::invalid_pair)?;
        debug!("Applying {} variable(s) from the command line", vars.len());
        env.extend(vars);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Environment, MockEnvReader};
    use crate::error::ErrorCode;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> AppConfig {
        AppConfig::default().with_working_dir(dir.path().to_path_buf())
    }

    fn run_to_string(args: &[&str], config: &AppConfig, stdin: Option<&str>) -> Result<String> {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let mut env = ScopedEnv::new(MockEnvReader::new().with_env("USER", "alice"));
        let mut out = Vec::new();
        run(&cli, config, &mut env, stdin.map(str::as_bytes), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_variable_layers() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), "A=local\nB=local\nC=local").unwrap();
        let env_file = dir.path().join("vars.env");
        fs::write(&env_file, "B=file\nC=file").unwrap();

        let cli = Cli::try_parse_from([
            "boilr",
            "-s",
            env_file.to_str().unwrap(),
            "-e",
            "C=flag",
        ])
        .unwrap();
        let mut env = ScopedEnv::new(MockEnvReader::new().with_env("A", "process"));
        load_variables(&cli, &config_in(&dir), &mut env).unwrap();

        assert_eq!(env.get("A").as_deref(), Some("local"));
        assert_eq!(env.get("B").as_deref(), Some("file"));
        assert_eq!(env.get("C").as_deref(), Some("flag"));
    }

    #[test]
    fn test_malformed_pair_reports_invalid_pair() {
        let dir = TempDir::new().unwrap();
        let err = run_to_string(&["boilr", "-e", "novalue", "x"], &config_in(&dir), None)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_PAIR);
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("novalue"));
    }

    #[test]
    fn test_missing_env_file() {
        let dir = TempDir::new().unwrap();
        let err = run_to_string(&["boilr", "-s", "nope.env", "x"], &config_in(&dir), None)
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("nope.env"));
    }

    #[test]
    fn test_template_argument_wins_over_stdin() {
        let dir = TempDir::new().unwrap();
        let out = run_to_string(
            &["boilr", "-e", "var=World", "Hello, ${var}!"],
            &config_in(&dir),
            Some("ignored ${USER}"),
        )
        .unwrap();
        assert_eq!(out, "Hello, World!\n");
    }

    #[test]
    fn test_stdin_and_no_input() {
        let dir = TempDir::new().unwrap();
        let out = run_to_string(&["boilr"], &config_in(&dir), Some("Hi ${USER^}")).unwrap();
        assert_eq!(out, "Hi Alice\n");

        let out = run_to_string(&["boilr"], &config_in(&dir), None).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_file_precedes_template() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.tpl");
        fs::write(&file, "from file ${USER}").unwrap();

        let out = run_to_string(
            &["boilr", "-f", file.to_str().unwrap(), "from arg"],
            &config_in(&dir),
            None,
        )
        .unwrap();
        assert_eq!(out, "from file alice\n");
    }

    #[test]
    fn test_directory_listing_output() {
        let dir = TempDir::new().unwrap();
        let tpl = dir.path().join("tpl");
        fs::create_dir_all(tpl.join("sub")).unwrap();
        fs::write(tpl.join("one.txt"), "1 ${USER}").unwrap();
        fs::write(tpl.join("sub/two.txt"), "2").unwrap();
        fs::write(tpl.join("skip.bak"), "no").unwrap();

        let out = run_to_string(
            &["boilr", "-d", tpl.to_str().unwrap(), "-i", "*.bak"],
            &config_in(&dir),
            None,
        )
        .unwrap();
        assert_eq!(
            out,
            format!(
                "Processing: {}\n > file: one.txt\n1 alice\n > file: sub/two.txt\n2\n",
                tpl.display()
            )
        );
    }

    #[test]
    fn test_directory_listing_names_failing_file() {
        let dir = TempDir::new().unwrap();
        let tpl = dir.path().join("tpl");
        fs::create_dir_all(&tpl).unwrap();
        fs::write(tpl.join("a.txt"), "fine").unwrap();
        fs::write(tpl.join("b.txt"), "broken ${oops").unwrap();

        let cli = Cli::try_parse_from(["boilr", "-d", tpl.to_str().unwrap()]).unwrap();
        let mut env = ScopedEnv::new(MockEnvReader::new());
        let mut out = Vec::new();
        let err = run(&cli, &config_in(&dir), &mut env, None::<&[u8]>, &mut out).unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!(
                "Processing: {}\n > file: a.txt\nfine\n > file: b.txt\n",
                tpl.display()
            )
        );
    }

    #[test]
    fn test_syntax_error_propagates() {
        let dir = TempDir::new().unwrap();
        let err = run_to_string(&["boilr", "${bad"], &config_in(&dir), None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
