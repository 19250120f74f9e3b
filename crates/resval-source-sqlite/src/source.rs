use std::path::Path;
use std::sync::Mutex;

use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use resval_core::{
    Company, CompanyDirectory, CompanyId, DirectoryError, Resolution, ResolutionId, ResolutionStatus,
};
use resval_source::RecordSource;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteSource {
    conn: Mutex<Connection>,
}

impl SqliteSource {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(db_path).with_context(|| format!("open sqlite db {}", db_path.display()))?;
        Self::init(conn)
    }

    /// Open a database that must already exist. Used for reading records and
    /// companies, where a mistyped path must not turn into an empty source.
    pub fn open_existing(db_path: &Path) -> Result<Self> {
        ensure!(db_path.is_file(), "sqlite db {} does not exist", db_path.display());
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(db_path, flags)
            .with_context(|| format!("open sqlite db {}", db_path.display()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory().context("open in-memory sqlite db")?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let init_sql = include_str!("../migrations/0001_init.sql");
        conn.execute_batch(init_sql).context("apply schema")?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn status_to_str(s: &ResolutionStatus) -> &'static str {
        match s {
            ResolutionStatus::Active => "ACTIVE",
            ResolutionStatus::Inactive => "INACTIVE",
            ResolutionStatus::Suspended => "SUSPENDED",
            ResolutionStatus::Expired => "EXPIRED",
            ResolutionStatus::Revoked => "REVOKED",
            ResolutionStatus::Unknown => "UNKNOWN",
        }
    }

    fn str_to_status(s: &str) -> ResolutionStatus {
        match s {
            "ACTIVE" => ResolutionStatus::Active,
            "INACTIVE" => ResolutionStatus::Inactive,
            "SUSPENDED" => ResolutionStatus::Suspended,
            "EXPIRED" => ResolutionStatus::Expired,
            "REVOKED" => ResolutionStatus::Revoked,
            _ => ResolutionStatus::Unknown,
        }
    }

    fn date_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
        match row.get::<_, Option<String>>(idx)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .map(Some)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        }
    }

    fn write_resolution(conn: &Connection, r: &Resolution) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO resolutions(id, number, company_id, parent_id, vigency_start, vigency_end, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                r.id.as_str(),
                r.number,
                r.company_id.as_ref().map(|c| c.as_str()),
                r.parent_id.as_ref().map(|p| p.as_str()),
                r.vigency_start.map(|d| d.format(DATE_FORMAT).to_string()),
                r.vigency_end.map(|d| d.format(DATE_FORMAT).to_string()),
                r.status.as_ref().map(Self::status_to_str),
            ],
        )
    }

    fn write_company(conn: &Connection, c: &Company) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO companies(id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![c.id.as_str(), c.name],
        )
    }

    pub fn insert_resolution(&self, r: &Resolution) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        Self::write_resolution(&conn, r).with_context(|| format!("insert resolution {}", r.id))?;
        Ok(())
    }

    pub fn insert_company(&self, c: &Company) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        Self::write_company(&conn, c).with_context(|| format!("insert company {}", c.id))?;
        Ok(())
    }

    /// Replace the stored resolutions and companies with those of another
    /// source, in one transaction. Returns (resolutions, companies) imported.
    pub fn import_from(&self, source: &dyn RecordSource) -> Result<(usize, usize)> {
        let resolutions = source.load_resolutions().with_context(|| format!("load {}", source.describe()))?;
        let companies = source.load_companies()?;

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute_batch("DELETE FROM resolutions; DELETE FROM companies;").context("clear previous import")?;
        for r in &resolutions {
            Self::write_resolution(&tx, r)?;
        }
        for c in &companies {
            Self::write_company(&tx, c)?;
        }
        tx.commit()?;
        tracing::info!(resolutions = resolutions.len(), companies = companies.len(), "imported records");
        Ok((resolutions.len(), companies.len()))
    }
}

impl RecordSource for SqliteSource {
    fn load_resolutions(&self) -> Result<Vec<Resolution>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, number, company_id, parent_id, vigency_start, vigency_end, status
             FROM resolutions ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(Resolution {
                id: ResolutionId::from_str(r.get::<_, String>(0)?),
                number: r.get(1)?,
                company_id: r.get::<_, Option<String>>(2)?.map(CompanyId::from_str),
                parent_id: r.get::<_, Option<String>>(3)?.map(ResolutionId::from_str),
                vigency_start: Self::date_column(r, 4)?,
                vigency_end: Self::date_column(r, 5)?,
                status: r.get::<_, Option<String>>(6)?.map(|s| Self::str_to_status(&s)),
            })
        })?;
        let mut out = vec![];
        for row in rows {
            out.push(row.context("decode resolution row")?);
        }
        Ok(out)
    }

    fn load_companies(&self) -> Result<Vec<Company>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name FROM companies ORDER BY id")?;
        let rows = stmt.query_map([], |r| {
            Ok(Company { id: CompanyId::from_str(r.get::<_, String>(0)?), name: r.get(1)? })
        })?;
        let mut out = vec![];
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn describe(&self) -> String {
        "sqlite".to_string()
    }
}

impl CompanyDirectory for SqliteSource {
    fn exists(&self, company_id: &CompanyId) -> Result<bool, DirectoryError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT 1 FROM companies WHERE id = ?1", params![company_id.as_str()], |_| Ok(()))
            .optional()
            .map(|found| found.is_some())
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))
    }
}
