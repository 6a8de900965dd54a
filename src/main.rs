use clap::Parser;
use repo_traffic::models::RunStamp;
use repo_traffic::{run, Cli, Config, GithubClient, RunPlan};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let stamp = RunStamp::now();
    let Config {
        username,
        token,
        owner,
        repos,
        output,
        csv_dir,
        reference_date,
        api_base,
    } = Config::from_cli(Cli::parse())?;
    let client = GithubClient::new(api_base, owner, username, token)?;

    let plan = RunPlan {
        repos,
        reference_date,
        stamp,
        output,
        csv_dir,
    };

    info!(
        "reporting {} repositories into {}",
        plan.repos.len(),
        plan.output.display()
    );
    let summary = run(&client, &plan).await?;

    if summary.is_clean() {
        return Ok(ExitCode::SUCCESS);
    }
    for (repo, err) in &summary.failed {
        error!("{repo} left out of the report: {err}");
    }
    Ok(ExitCode::FAILURE)
}
