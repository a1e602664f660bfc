//! SQLite-backed record stores for the two collections.
//!
//! # Responsibility
//! - Implement `RecordStore` over the canonical `case_reports` and
//!   `test_scores` tables.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Constructors verify schema readiness instead of failing on first use.
//! - Enum columns hold the closed db ids mapped by this module only.
//! - `deaths > cases` is storable; consistency is an upstream concern.

use crate::db::migrations::latest_version;
use crate::model::case_report::{CaseReport, CaseReportPatch};
use crate::model::test_score::{
    AcademicDescription, SocioEconomicStatus, TestScore, TestScorePatch,
};
use crate::store::{RecordId, RecordStore, StoreError, StoreResult, Stored};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use uuid::Uuid;

const CASE_REPORT_SELECT_SQL: &str = "SELECT
    uuid,
    location,
    cases,
    deaths,
    date,
    region,
    year
FROM case_reports";

const TEST_SCORE_SELECT_SQL: &str = "SELECT
    uuid,
    respondent,
    age,
    sex,
    ethnic_group,
    academic_performance,
    academic_description,
    iq,
    school_type,
    socioeconomic_status,
    study_habit,
    nat_result
FROM test_scores";

const CASE_REPORT_COLUMNS: &[&str] = &[
    "uuid",
    "location",
    "cases",
    "deaths",
    "date",
    "region",
    "year",
    "created_at",
    "updated_at",
];

const TEST_SCORE_COLUMNS: &[&str] = &[
    "uuid",
    "respondent",
    "age",
    "sex",
    "ethnic_group",
    "academic_performance",
    "academic_description",
    "iq",
    "school_type",
    "socioeconomic_status",
    "study_habit",
    "nat_result",
    "created_at",
    "updated_at",
];

/// SQLite-backed store for dengue case reports.
pub struct SqliteCaseReportStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCaseReportStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_ready(conn, "case_reports", CASE_REPORT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteCaseReportStore<'_> {
    type Record = CaseReport;
    type Patch = CaseReportPatch;

    fn collection(&self) -> &'static str {
        "case_reports"
    }

    fn create(&self, record: &CaseReport) -> StoreResult<RecordId> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO case_reports (
                uuid,
                location,
                cases,
                deaths,
                date,
                region,
                year
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            rusqlite::params![
                id.to_string(),
                record.location.as_str(),
                record.cases,
                record.deaths,
                date_to_db(record.date),
                record.region.as_str(),
                record.year,
            ],
        )?;

        Ok(id)
    }

    fn list_all(&self) -> StoreResult<Vec<Stored<CaseReport>>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CASE_REPORT_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_case_report_row(row)?);
        }

        Ok(records)
    }

    fn update(&self, id: RecordId, patch: &CaseReportPatch) -> StoreResult<()> {
        let mut set_clauses: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(location) = &patch.location {
            set_clauses.push("location = ?");
            bind_values.push(Value::Text(location.clone()));
        }
        if let Some(cases) = patch.cases {
            set_clauses.push("cases = ?");
            bind_values.push(Value::Integer(i64::from(cases)));
        }
        if let Some(deaths) = patch.deaths {
            set_clauses.push("deaths = ?");
            bind_values.push(Value::Integer(i64::from(deaths)));
        }
        if let Some(date) = patch.date {
            set_clauses.push("date = ?");
            bind_values.push(Value::Text(date_to_db(date)));
        }
        if let Some(region) = &patch.region {
            set_clauses.push("region = ?");
            bind_values.push(Value::Text(region.clone()));
        }
        if let Some(year) = patch.year {
            set_clauses.push("year = ?");
            bind_values.push(Value::Integer(i64::from(year)));
        }
        set_clauses.push("updated_at = (strftime('%s', 'now') * 1000)");

        let sql = format!(
            "UPDATE case_reports SET {} WHERE uuid = ?;",
            set_clauses.join(", ")
        );
        bind_values.push(Value::Text(id.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: RecordId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM case_reports WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }
}

/// SQLite-backed store for NAT test scores.
pub struct SqliteTestScoreStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTestScoreStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_ready(conn, "test_scores", TEST_SCORE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteTestScoreStore<'_> {
    type Record = TestScore;
    type Patch = TestScorePatch;

    fn collection(&self) -> &'static str {
        "test_scores"
    }

    fn create(&self, record: &TestScore) -> StoreResult<RecordId> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO test_scores (
                uuid,
                respondent,
                age,
                sex,
                ethnic_group,
                academic_performance,
                academic_description,
                iq,
                school_type,
                socioeconomic_status,
                study_habit,
                nat_result
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            rusqlite::params![
                id.to_string(),
                record.respondent.as_str(),
                record.age,
                record.sex.as_str(),
                record.ethnic_group.as_str(),
                record.academic_performance,
                academic_to_db(record.academic_description),
                record.iq.as_str(),
                record.school_type.as_str(),
                socio_to_db(record.socioeconomic_status),
                record.study_habit.as_str(),
                record.nat_result,
            ],
        )?;

        Ok(id)
    }

    fn list_all(&self) -> StoreResult<Vec<Stored<TestScore>>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEST_SCORE_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_test_score_row(row)?);
        }

        Ok(records)
    }

    fn update(&self, id: RecordId, patch: &TestScorePatch) -> StoreResult<()> {
        let mut set_clauses: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(respondent) = &patch.respondent {
            set_clauses.push("respondent = ?");
            bind_values.push(Value::Text(respondent.clone()));
        }
        if let Some(age) = patch.age {
            set_clauses.push("age = ?");
            bind_values.push(Value::Integer(i64::from(age)));
        }
        if let Some(sex) = &patch.sex {
            set_clauses.push("sex = ?");
            bind_values.push(Value::Text(sex.clone()));
        }
        if let Some(ethnic_group) = &patch.ethnic_group {
            set_clauses.push("ethnic_group = ?");
            bind_values.push(Value::Text(ethnic_group.clone()));
        }
        if let Some(performance) = patch.academic_performance {
            set_clauses.push("academic_performance = ?");
            bind_values.push(Value::Real(performance));
        }
        if let Some(description) = patch.academic_description {
            set_clauses.push("academic_description = ?");
            bind_values.push(Value::Text(academic_to_db(description).to_string()));
        }
        if let Some(iq) = &patch.iq {
            set_clauses.push("iq = ?");
            bind_values.push(Value::Text(iq.clone()));
        }
        if let Some(school_type) = &patch.school_type {
            set_clauses.push("school_type = ?");
            bind_values.push(Value::Text(school_type.clone()));
        }
        if let Some(status) = patch.socioeconomic_status {
            set_clauses.push("socioeconomic_status = ?");
            bind_values.push(Value::Text(socio_to_db(status).to_string()));
        }
        if let Some(study_habit) = &patch.study_habit {
            set_clauses.push("study_habit = ?");
            bind_values.push(Value::Text(study_habit.clone()));
        }
        if let Some(nat_result) = patch.nat_result {
            set_clauses.push("nat_result = ?");
            bind_values.push(Value::Real(nat_result));
        }
        set_clauses.push("updated_at = (strftime('%s', 'now') * 1000)");

        let sql = format!(
            "UPDATE test_scores SET {} WHERE uuid = ?;",
            set_clauses.join(", ")
        );
        bind_values.push(Value::Text(id.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: RecordId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM test_scores WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_case_report_row(row: &Row<'_>) -> StoreResult<Stored<CaseReport>> {
    let id = read_uuid(row, "case_reports")?;

    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|_| {
        StoreError::InvalidData(format!("invalid date value `{date_text}` in case_reports.date"))
    })?;

    let record = CaseReport {
        location: row.get("location")?,
        cases: read_u32(row, "cases", "case_reports.cases")?,
        deaths: read_u32(row, "deaths", "case_reports.deaths")?,
        date,
        region: row.get("region")?,
        year: row.get("year")?,
    };

    Ok(Stored { id, record })
}

fn parse_test_score_row(row: &Row<'_>) -> StoreResult<Stored<TestScore>> {
    let id = read_uuid(row, "test_scores")?;

    let description_text: String = row.get("academic_description")?;
    let academic_description = parse_academic(&description_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid academic description `{description_text}` in test_scores.academic_description"
        ))
    })?;

    let status_text: String = row.get("socioeconomic_status")?;
    let socioeconomic_status = parse_socio(&status_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid socioeconomic status `{status_text}` in test_scores.socioeconomic_status"
        ))
    })?;

    let record = TestScore {
        respondent: row.get("respondent")?,
        age: read_u32(row, "age", "test_scores.age")?,
        sex: row.get("sex")?,
        ethnic_group: row.get("ethnic_group")?,
        academic_performance: row.get("academic_performance")?,
        academic_description,
        iq: row.get("iq")?,
        school_type: row.get("school_type")?,
        socioeconomic_status,
        study_habit: row.get("study_habit")?,
        nat_result: row.get("nat_result")?,
    };

    Ok(Stored { id, record })
}

fn read_uuid(row: &Row<'_>, table: &str) -> StoreResult<RecordId> {
    let uuid_text: String = row.get("uuid")?;
    Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in {table}.uuid"))
    })
}

fn read_u32(row: &Row<'_>, column: &str, qualified: &str) -> StoreResult<u32> {
    let value: i64 = row.get(column)?;
    u32::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid value `{value}` in {qualified}")))
}

fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn socio_to_db(status: SocioEconomicStatus) -> &'static str {
    match status {
        SocioEconomicStatus::OnPovertyLine => "on_poverty_line",
        SocioEconomicStatus::AbovePovertyLine => "above_poverty_line",
        SocioEconomicStatus::BelowPovertyLine => "below_poverty_line",
    }
}

fn parse_socio(value: &str) -> Option<SocioEconomicStatus> {
    match value {
        "on_poverty_line" => Some(SocioEconomicStatus::OnPovertyLine),
        "above_poverty_line" => Some(SocioEconomicStatus::AbovePovertyLine),
        "below_poverty_line" => Some(SocioEconomicStatus::BelowPovertyLine),
        _ => None,
    }
}

fn academic_to_db(description: AcademicDescription) -> &'static str {
    match description {
        AcademicDescription::Outstanding => "outstanding",
        AcademicDescription::Satisfactory => "satisfactory",
        AcademicDescription::DidNotMeetExpectation => "did_not_meet_expectation",
        AcademicDescription::FairlySatisfactory => "fairly_satisfactory",
        AcademicDescription::VerySatisfactory => "very_satisfactory",
    }
}

fn parse_academic(value: &str) -> Option<AcademicDescription> {
    match value {
        "outstanding" => Some(AcademicDescription::Outstanding),
        "satisfactory" => Some(AcademicDescription::Satisfactory),
        "did_not_meet_expectation" => Some(AcademicDescription::DidNotMeetExpectation),
        "fairly_satisfactory" => Some(AcademicDescription::FairlySatisfactory),
        "very_satisfactory" => Some(AcademicDescription::VerySatisfactory),
        _ => None,
    }
}

fn ensure_store_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(StoreError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(StoreError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
