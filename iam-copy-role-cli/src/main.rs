mod cli;
mod output;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Env, Target};
use iam_copy_role_core::{CopyRoleError, CopyStage, RoleCopyService};
use log::{debug, info, Level, LevelFilter};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help / --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(&CopyRoleError::Usage(e.to_string())),
    };

    if let Err(e) = init_logging(cli.verbose, cli.json) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    debug!("Stage: {}", CopyStage::ParseArgs);
    let args = match cli.copy_args() {
        Ok(args) => args,
        Err(e) => return fail(&e),
    };
    info!(
        "Arguments loaded. Source role name: {}, target role name: {}, role to assume: {}",
        args.source_role_name,
        args.target_role_name,
        args.role_to_assume_arn.as_deref().unwrap_or("-")
    );

    let service = RoleCopyService::new(&cli.client_options()).await;
    match service.copy_role(&args).await {
        Ok(report) => {
            let mut stdout = std::io::stdout().lock();
            match output::write_success(&mut stdout, &report, cli.json) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Failed to write output: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => fail(&e),
    }
}

fn fail(error: &CopyRoleError) -> ExitCode {
    // If stderr is gone the exit code still reports the failure.
    let _ = output::write_failure(&mut std::io::stderr().lock(), error);
    ExitCode::from(error.exit_code())
}

/// Progress goes to stdout unless stdout carries the JSON report.
fn init_logging(verbose: u8, json: bool) -> anyhow::Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .target(if json { Target::Stderr } else { Target::Stdout })
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            other => writeln!(buf, "[{other}] {}", record.args()),
        })
        .try_init()?;

    Ok(())
}
