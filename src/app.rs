use crate::client::TrafficSource;
use crate::errors::TrafficError;
use crate::index::{build_index, SeriesIndex};
use crate::models::{MetricKind, RunStamp, WindowReport};
use crate::report::{render_banner, render_csv_rows, render_repository};
use crate::stats::window_start;
use crate::storage::{csv_path, AppendSink};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{error, info};

pub const TOOL_NAME: &str = "GitHub";

/// Everything a batch run needs apart from the traffic source.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub repos: Vec<String>,
    pub reference_date: NaiveDate,
    pub stamp: RunStamp,
    pub output: PathBuf,
    pub csv_dir: Option<PathBuf>,
}

impl RunPlan {
    pub fn validate(&self) -> Result<(), TrafficError> {
        if window_start(self.reference_date).is_none() {
            return Err(TrafficError::config(format!(
                "no seven-day window before {}",
                self.reference_date
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, TrafficError)>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Indexed series for one repository.
pub struct RepositoryTraffic {
    pub visits: SeriesIndex,
    pub clones: SeriesIndex,
}

impl RepositoryTraffic {
    pub fn window(&self, reference_date: NaiveDate) -> WindowReport {
        crate::stats::aggregate(&self.visits, &self.clones, reference_date)
    }
}

pub async fn collect<S>(source: &S, repo: &str) -> Result<RepositoryTraffic, TrafficError>
where
    S: TrafficSource + ?Sized,
{
    let visits = source.fetch(MetricKind::Visits, repo).await?;
    let clones = source.fetch(MetricKind::Clones, repo).await?;

    Ok(RepositoryTraffic {
        visits: build_index(&visits)?,
        clones: build_index(&clones)?,
    })
}

/// Opens the report (and CSV log, if any) once, writes the batch and closes them.
pub async fn run<S>(source: &S, plan: &RunPlan) -> Result<RunSummary, TrafficError>
where
    S: TrafficSource + ?Sized,
{
    plan.validate()?;

    let mut report = AppendSink::open(&plan.output).await?;
    let mut csv = match &plan.csv_dir {
        Some(dir) => Some(AppendSink::open_csv(&csv_path(dir, &plan.stamp)).await?),
        None => None,
    };

    let batch = write_batch(source, plan, &mut report, csv.as_mut()).await;

    report.finish().await?;
    if let Some(csv) = csv {
        csv.finish().await?;
    }
    batch
}

/// Writes the banner then one block per repository, in plan order.
///
/// A repository whose fetch or records fail is logged and skipped; sink
/// write errors end the batch.
pub async fn write_batch<S>(
    source: &S,
    plan: &RunPlan,
    report: &mut AppendSink,
    mut csv: Option<&mut AppendSink>,
) -> Result<RunSummary, TrafficError>
where
    S: TrafficSource + ?Sized,
{
    plan.validate()?;
    report.write(&render_banner(TOOL_NAME, &plan.stamp)).await?;

    let mut summary = RunSummary::default();
    for repo in &plan.repos {
        let traffic = match collect(source, repo).await {
            Ok(traffic) => traffic,
            Err(err) if err.is_repository_local() => {
                error!("skipping {repo}: {err}");
                summary.failed.push((repo.clone(), err));
                continue;
            }
            Err(err) => return Err(err),
        };

        let window = traffic.window(plan.reference_date);
        report.write(&render_repository(repo, &window)).await?;
        if let Some(csv) = csv.as_deref_mut() {
            csv.write(&render_csv_rows(repo, &traffic.visits)).await?;
        }

        info!(
            "{repo}: {} visits, {} clones over the week before {}",
            window.totals.visits, window.totals.clones, plan.reference_date
        );
        summary.succeeded.push(repo.clone());
    }

    Ok(summary)
}
