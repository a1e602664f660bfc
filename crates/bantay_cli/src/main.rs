//! Operator console for the Bantay data pipeline.
//!
//! # Responsibility
//! - Wire file inputs to core ingestion, stores, and chart aggregation.
//! - Keep output line-oriented so runs are easy to read and grep.

use bantay_core::db::migrations::latest_version;
use bantay_core::db::{open_db, DbError};
use bantay_core::{
    academic_breakdown, bubble_series, choropleth, default_log_level, init_logging,
    nat_result_histogram, parse_boundaries, scale_color, scatter_series, socioeconomic_breakdown,
    sort_stored, time_series, BatchIngestor, BoundaryError, CancelToken, CaseReport,
    CaseReportField, Direction, IngestError, RecordStore, RowSchema, SortConfig,
    SqliteCaseReportStore, SqliteTestScoreStore, StoreError, TabularOptions, TestScore,
    TestScoreField, TimeUnit, BIN_LABELS, LEGEND,
};
use serde_json::json;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    init_cli_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "init" => cmd_init(&args[1..]),
        "ingest" => cmd_ingest(&args[1..]),
        "list" => cmd_list(&args[1..]),
        "charts" => cmd_charts(&args[1..]),
        "map" => cmd_map(&args[1..]),
        other => {
            print_usage();
            Err(CliError::Usage(format!("unknown command `{other}`")))
        }
    }
}

fn cmd_init(args: &[String]) -> Result<(), CliError> {
    let db_path = required(args, 0, "db-path")?;
    let conn = open_db(db_path)?;
    drop(conn);
    println!("database ready at {db_path} (schema v{})", latest_version());
    Ok(())
}

fn cmd_ingest(args: &[String]) -> Result<(), CliError> {
    let db_path = required(args, 0, "db-path")?;
    let collection = required(args, 1, "collection")?;
    let csv_path = required(args, 2, "csv-file")?;

    let text = read_file(csv_path)?;
    let conn = open_db(db_path)?;
    match collection {
        "case_reports" => ingest_into(SqliteCaseReportStore::try_new(&conn)?, &text),
        "test_scores" => ingest_into(SqliteTestScoreStore::try_new(&conn)?, &text),
        other => Err(unknown_collection(other)),
    }
}

fn ingest_into<S>(store: S, text: &str) -> Result<(), CliError>
where
    S: RecordStore,
    S::Record: RowSchema,
{
    let ingestor = BatchIngestor::new(store);
    let report = ingestor.ingest(
        text,
        &TabularOptions::default(),
        &CancelToken::new(),
        |progress| {
            println!(
                "progress {:>3}% ({}/{})",
                progress.percent, progress.completed, progress.total
            );
        },
    )?;

    println!("persisted={} failed={}", report.persisted, report.failed);
    for failure in &report.failures {
        println!("  {}", failure.error);
    }
    Ok(())
}

fn cmd_list(args: &[String]) -> Result<(), CliError> {
    let db_path = required(args, 0, "db-path")?;
    let collection = required(args, 1, "collection")?;
    let sort_key = args.get(2).map(String::as_str);
    let descending = args.get(3).map(String::as_str) == Some("desc");

    let conn = open_db(db_path)?;
    match collection {
        "case_reports" => {
            print_report_rows(&SqliteCaseReportStore::try_new(&conn)?, sort_key, descending)
        }
        "test_scores" => {
            print_score_rows(&SqliteTestScoreStore::try_new(&conn)?, sort_key, descending)
        }
        other => Err(unknown_collection(other)),
    }
}

fn print_report_rows(
    store: &SqliteCaseReportStore<'_>,
    sort_key: Option<&str>,
    descending: bool,
) -> Result<(), CliError> {
    let mut listed = store.list_all()?;
    if let Some(key) = sort_key {
        let field = CaseReportField::parse_key(key)
            .ok_or_else(|| CliError::Usage(format!("unknown sort key `{key}`")))?;
        sort_stored(&mut listed, SortConfig { field, direction: direction_for(descending) });
    }

    for item in &listed {
        let report = &item.record;
        println!(
            "{}  {}  {}  {}  cases={} deaths={}",
            item.id, report.date, report.region, report.location, report.cases, report.deaths
        );
    }
    println!("{} case reports", listed.len());
    Ok(())
}

fn print_score_rows(
    store: &SqliteTestScoreStore<'_>,
    sort_key: Option<&str>,
    descending: bool,
) -> Result<(), CliError> {
    let mut listed = store.list_all()?;
    if let Some(key) = sort_key {
        let field = TestScoreField::parse_key(key)
            .ok_or_else(|| CliError::Usage(format!("unknown sort key `{key}`")))?;
        sort_stored(&mut listed, SortConfig { field, direction: direction_for(descending) });
    }

    for item in &listed {
        let score = &item.record;
        println!(
            "{}  {}  age={}  {}  nat={}",
            item.id,
            score.respondent,
            score.age,
            score.socioeconomic_status.label(),
            score.nat_result
        );
    }
    println!("{} test scores", listed.len());
    Ok(())
}

fn cmd_charts(args: &[String]) -> Result<(), CliError> {
    let db_path = required(args, 0, "db-path")?;
    let collection = required(args, 1, "collection")?;

    let conn = open_db(db_path)?;
    let payload = match collection {
        "case_reports" => {
            let store = SqliteCaseReportStore::try_new(&conn)?;
            let reports: Vec<CaseReport> = store
                .list_all()?
                .into_iter()
                .map(|item| item.record)
                .collect();
            json!({
                "monthly": time_series(&reports, TimeUnit::Month),
                "yearly": time_series(&reports, TimeUnit::Year),
                "scatter": scatter_series(&reports, TimeUnit::Month),
                "bubble": bubble_series(&reports, TimeUnit::Month),
            })
        }
        "test_scores" => {
            let store = SqliteTestScoreStore::try_new(&conn)?;
            let scores: Vec<TestScore> = store
                .list_all()?
                .into_iter()
                .map(|item| item.record)
                .collect();
            json!({
                "histogram": {
                    "labels": BIN_LABELS,
                    "counts": nat_result_histogram(&scores),
                },
                "socioeconomic": socioeconomic_breakdown(&scores),
                "academic": academic_breakdown(&scores),
            })
        }
        other => return Err(unknown_collection(other)),
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn cmd_map(args: &[String]) -> Result<(), CliError> {
    let db_path = required(args, 0, "db-path")?;
    let geojson_path = required(args, 1, "geojson-file")?;
    let show_legend = args.get(2).map(String::as_str) == Some("--legend");

    let geojson = read_file(geojson_path)?;
    let boundaries = parse_boundaries(&geojson)?;

    let conn = open_db(db_path)?;
    let store = SqliteCaseReportStore::try_new(&conn)?;
    let reports: Vec<CaseReport> = store
        .list_all()?
        .into_iter()
        .map(|item| item.record)
        .collect();

    for entry in choropleth(&boundaries, &reports) {
        println!(
            "{}  cases={} deaths={} color={}",
            entry.boundary.name,
            entry.totals.cases,
            entry.totals.deaths,
            scale_color(entry.totals.cases)
        );
    }

    if show_legend {
        println!();
        for row in LEGEND {
            println!("{}  {}", row.color, row.label);
        }
    }
    Ok(())
}

fn print_usage() {
    println!("bantay {}", bantay_core::core_version());
    println!();
    println!("usage:");
    println!("  bantay init <db-path>");
    println!("  bantay ingest <db-path> <collection> <csv-file>");
    println!("  bantay list <db-path> <collection> [sort-key] [desc]");
    println!("  bantay charts <db-path> <collection>");
    println!("  bantay map <db-path> <geojson-file> [--legend]");
    println!();
    println!("collections:");
    println!("  case_reports  columns: {}", CaseReport::COLUMNS.join(", "));
    println!("  test_scores   columns: {}", TestScore::COLUMNS.join(", "));
}

fn init_cli_logging() {
    let level =
        std::env::var("BANTAY_LOG").unwrap_or_else(|_| default_log_level().to_string());
    let log_dir = match std::env::var_os("BANTAY_LOG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::temp_dir().join("bantay-logs"),
    };

    match utf8_log_dir(&log_dir) {
        Ok(dir) => {
            if let Err(err) = init_logging(&level, dir) {
                eprintln!("warning: logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }
}

fn utf8_log_dir(log_dir: &Path) -> Result<&str, String> {
    log_dir
        .to_str()
        .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", log_dir.display()))
}

fn direction_for(descending: bool) -> Direction {
    if descending {
        Direction::Descending
    } else {
        Direction::Ascending
    }
}

fn required<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, CliError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("missing <{name}> argument")))
}

fn read_file(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })
}

fn unknown_collection(name: &str) -> CliError {
    CliError::Usage(format!(
        "unknown collection `{name}`; expected case_reports or test_scores"
    ))
}

/// Errors surfaced to the operator with a non-zero exit code.
#[derive(Debug)]
enum CliError {
    Usage(String),
    Io { path: String, source: std::io::Error },
    Db(DbError),
    Store(StoreError),
    Ingest(IngestError),
    Boundary(BoundaryError),
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(message) => write!(f, "{message}"),
            Self::Io { path, source } => write!(f, "cannot read `{path}`: {source}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Ingest(err) => write!(f, "{err}"),
            Self::Boundary(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<IngestError> for CliError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<BoundaryError> for CliError {
    fn from(value: BoundaryError) -> Self {
        Self::Boundary(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
