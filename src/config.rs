use crate::client::DEFAULT_API_BASE;
use crate::errors::TrafficError;
use crate::stats::window_start;
use crate::storage::DEFAULT_REPORT_PATH;
use chrono::{Local, NaiveDate};
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;

/// Weekly visit and clone statistics for a set of GitHub repositories.
#[derive(Debug, Parser)]
#[command(name = "repo-traffic", version)]
pub struct Cli {
    /// GitHub username used for basic auth
    pub username: String,

    /// Access token paired with the username
    #[arg(long, env = "GH_CLONE_SCRAPPER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Owner (user or organization) of the repositories
    #[arg(long, env = "TRAFFIC_OWNER", default_value = "dftfeDevelopers")]
    pub owner: String,

    /// Repository to report on; repeat for several, reported in the given order
    #[arg(long = "repo", value_name = "NAME", default_values_t = [String::from("dftfe")])]
    pub repos: Vec<String>,

    /// Report file, appended to on every run
    #[arg(long, env = "TRAFFIC_REPORT_PATH", default_value = DEFAULT_REPORT_PATH)]
    pub output: PathBuf,

    /// Directory for the normalized per-day CSV log; no log when omitted
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,

    /// Reference day (YYYY-MM-DD); the report covers the seven days before it
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

#[derive(Debug)]
pub struct Config {
    pub username: String,
    pub token: SecretString,
    pub owner: String,
    pub repos: Vec<String>,
    pub output: PathBuf,
    pub csv_dir: Option<PathBuf>,
    pub reference_date: NaiveDate,
    pub api_base: String,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, TrafficError> {
        let username = cli.username.trim().to_string();
        if username.is_empty() {
            return Err(TrafficError::config("username must not be empty"));
        }

        let token = cli
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| TrafficError::config("no token; set GH_CLONE_SCRAPPER_TOKEN or pass --token"))?;

        let repos: Vec<String> = cli
            .repos
            .iter()
            .map(|repo| repo.trim().to_string())
            .filter(|repo| !repo.is_empty())
            .collect();
        if repos.is_empty() {
            return Err(TrafficError::config("at least one repository is required"));
        }

        Ok(Self {
            username,
            token: SecretString::from(token.trim().to_string()),
            owner: cli.owner,
            repos,
            output: cli.output,
            csv_dir: cli.csv_dir,
            reference_date: cli.date.unwrap_or_else(|| Local::now().date_naive()),
            api_base: cli.api_base,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))?;
    if window_start(date).is_none() {
        return Err(format!("{date} has no seven days before it"));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use secrecy::ExposeSecret;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("repo-traffic").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn explicit_arguments_flow_into_config() {
        let cli = parse(&[
            " alice ",
            "--token",
            "secret",
            "--repo",
            "one",
            "--repo",
            "two",
            "--date",
            "2024-01-13",
            "--owner",
            "acme",
            "--output",
            "out/stats.txt",
            "--api-base",
            "http://127.0.0.1:1",
        ]);
        let config = Config::from_cli(cli).unwrap();

        assert_eq!(config.username, "alice");
        assert_eq!(config.token.expose_secret(), "secret");
        assert_eq!(config.owner, "acme");
        assert_eq!(config.repos, ["one", "two"]);
        assert_eq!(config.output, PathBuf::from("out/stats.txt"));
        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
        assert_eq!(config.api_base, "http://127.0.0.1:1");
        assert!(config.csv_dir.is_none());
    }

    #[test]
    fn bad_date_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["repo-traffic", "alice", "--token", "t", "--date", "13/01/2024"]);
        assert!(result.is_err());
    }

    #[test]
    fn date_without_a_full_window_is_rejected() {
        let too_early = format!("--date={}", (NaiveDate::MIN + Days::new(6)).format("%Y-%m-%d"));
        let result = Cli::try_parse_from(["repo-traffic", "alice", "--token", "t", too_early.as_str()]);
        assert!(result.is_err());

        let earliest = NaiveDate::MIN + Days::new(7);
        let date_arg = format!("--date={}", earliest.format("%Y-%m-%d"));
        let cli = parse(&["alice", "--token", "t", date_arg.as_str()]);
        assert_eq!(cli.date, Some(earliest));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let mut cli = parse(&["alice", "--token", "x"]);
        cli.token = None;
        assert!(matches!(Config::from_cli(cli), Err(TrafficError::Config(_))));
    }

    #[test]
    fn blank_repositories_are_dropped() {
        let mut cli = parse(&["alice", "--token", "x"]);
        cli.repos = vec!["  ".into()];
        assert!(matches!(Config::from_cli(cli), Err(TrafficError::Config(_))));
    }
}
