use crate::index::SeriesIndex;
use crate::models::{RunStamp, WindowReport, WindowRow};

pub const COLUMNS: &str = "Visits\t\tUnique Visits\tClones\t\tUnique Clones";
pub const CSV_HEADER: &str = "repo,date,views,unique_visitors\n";

pub fn render_banner(tool: &str, stamp: &RunStamp) -> String {
    format!(
        "\n--------- \n{tool} statistics for the past week as of {}: \n \n",
        stamp.label()
    )
}

/// One repository's block: daily rows oldest first, then window totals.
pub fn render_repository(repo: &str, report: &WindowReport) -> String {
    let mut out = format!("{repo} Daily Statistics:\nDate\t\t{COLUMNS}\n");
    for row in &report.rows {
        out.push_str(&render_row(row));
    }

    let totals = &report.totals;
    out.push_str(&format!(
        "\n{repo}  Total Statistics:\n\t\t{COLUMNS}\n\t\t{}\t\t{}\t\t{}\t\t{}\n\n",
        totals.visits, totals.unique_visits, totals.clones, totals.unique_clones
    ));
    out
}

pub fn render_row(row: &WindowRow) -> String {
    format!(
        "{}\t{}\t\t{}\t\t{}\t\t{}\n",
        row.date_key, row.visits, row.unique_visits, row.clones, row.unique_clones
    )
}

/// Normalized log rows for every observed visits key, without a header.
pub fn render_csv_rows(repo: &str, visits: &SeriesIndex) -> String {
    let repo = csv_field(repo);
    let mut out = String::new();
    for (date, counts) in visits.iter() {
        out.push_str(&format!("{repo},{date},{},{}\n", counts.count, counts.uniques));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
