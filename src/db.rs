// 🗄️ Query Source - four-table join (student, branch, company, placement)
//
// Two drivers run the same SQL: MySQL (behind the `mysql` feature) and SQLite.
// The connection lives only for the duration of the load and is dropped on
// every return path.

use crate::config::{DbConfig, DbDriver};
use crate::error::{DashboardError, Result};
use crate::record::{OfferTable, RawOffer};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Combined offer query. offer_date is cast to text so both drivers hand the
/// same string to the date parser.
pub const OFFER_QUERY: &str = "
    SELECT
      p.id AS placement_id,
      s.id AS student_id,
      s.roll_no,
      s.name AS student_name,
      b.name AS branch,
      s.cgpa,
      s.batch_year,
      c.name AS company_name,
      p.package_lpa,
      p.role,
      CAST(p.offer_date AS CHAR) AS offer_date
    FROM placement p
      JOIN student s ON p.student_id = s.id
      JOIN branch b ON s.branch_id = b.id
      JOIN company c ON p.company_id = c.id
    ORDER BY p.id
";

/// Load the offer table through the configured driver
pub fn load_query(db: &DbConfig) -> Result<OfferTable> {
    tracing::debug!(source = %db.target(), "opening query source");

    match db.driver {
        DbDriver::Sqlite => {
            let conn = open_sqlite(db)?;
            load_from_sqlite(&conn)
        }
        DbDriver::Mysql => load_from_mysql(db),
    }
}

fn open_sqlite(db: &DbConfig) -> Result<Connection> {
    // Read-only: a missing file must fail rather than be created empty
    Connection::open_with_flags(
        Path::new(&db.database),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| DashboardError::Connection {
        target: db.target(),
        source: Box::new(e),
    })
}

/// Run the offer query against an open SQLite connection
pub fn load_from_sqlite(conn: &Connection) -> Result<OfferTable> {
    let mut stmt = conn.prepare(OFFER_QUERY)?;

    let raws = stmt
        .query_map([], |row| {
            Ok(RawOffer {
                placement_id: row.get(0)?,
                student_id: row.get(1)?,
                roll_no: row.get(2)?,
                student_name: row.get(3)?,
                branch: row.get(4)?,
                cgpa: row.get(5)?,
                batch_year: row.get(6)?,
                company_name: row.get(7)?,
                package_lpa: row.get(8)?,
                role: row.get(9)?,
                offer_date: row.get(10)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    raws.into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_record(i + 1))
        .collect()
}

#[cfg(feature = "mysql")]
fn load_from_mysql(db: &DbConfig) -> Result<OfferTable> {
    use mysql::prelude::Queryable;

    let non_empty = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());

    let opts = mysql::OptsBuilder::new()
        .ip_or_hostname(Some(db.host.clone()))
        .tcp_port(db.port)
        .user(non_empty(&db.user))
        .pass(non_empty(&db.password))
        .db_name(non_empty(&db.database));

    let mut conn = mysql::Conn::new(opts).map_err(|e| DashboardError::Connection {
        target: db.target(),
        source: Box::new(e),
    })?;

    let rows: Vec<mysql::Row> = conn
        .query(OFFER_QUERY)
        .map_err(|e| DashboardError::Query(e.to_string()))?;

    rows.into_iter()
        .enumerate()
        .map(|(i, mut row)| {
            let raw = RawOffer {
                placement_id: take(&mut row, 0)?,
                student_id: take(&mut row, 1)?,
                roll_no: take(&mut row, 2)?,
                student_name: take(&mut row, 3)?,
                branch: take(&mut row, 4)?,
                cgpa: take(&mut row, 5)?,
                batch_year: take(&mut row, 6)?,
                company_name: take(&mut row, 7)?,
                package_lpa: take(&mut row, 8)?,
                role: take(&mut row, 9)?,
                offer_date: take(&mut row, 10)?,
            };
            raw.into_record(i + 1)
        })
        .collect()
}

#[cfg(feature = "mysql")]
fn take<T: mysql::prelude::FromValue>(row: &mut mysql::Row, idx: usize) -> Result<T> {
    match row.take_opt::<T, usize>(idx) {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(DashboardError::Query(format!("column {idx}: {e}"))),
        None => Err(DashboardError::Query(format!("column {idx} missing from result"))),
    }
}

#[cfg(not(feature = "mysql"))]
fn load_from_mysql(_db: &DbConfig) -> Result<OfferTable> {
    Err(DashboardError::MissingDependency("mysql"))
}
