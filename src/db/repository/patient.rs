use rusqlite::{params, Connection, OptionalExtension};

use super::{now_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::{NewPatient, Patient};

/// Exact, case-sensitive name lookup. The oldest match wins when names repeat.
pub fn find_patient_by_name(conn: &Connection, name: &str) -> Result<Option<i64>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT id FROM patients WHERE name = ?1 ORDER BY id LIMIT 1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id)
}

pub fn insert_patient(conn: &Connection, patient: &NewPatient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, age, sex, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![patient.name, patient.age, patient.sex, now_timestamp()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Reuse the patient registered under this name, or register a new one.
///
/// Age and sex of an existing patient are never updated.
pub fn resolve_patient(conn: &Connection, patient: &NewPatient) -> Result<i64, DatabaseError> {
    if let Some(id) = find_patient_by_name(conn, &patient.name)? {
        tracing::debug!(patient_id = id, "Reusing existing patient");
        return Ok(id);
    }
    let id = insert_patient(conn, patient)?;
    tracing::info!(patient_id = id, "Registered new patient");
    Ok(id)
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            "SELECT id, name, age, sex, created_at FROM patients WHERE id = ?1",
            params![id],
            |row| {
                Ok(Patient {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    age: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                    sex: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    created_at: parse_timestamp(
                        &row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    ),
                })
            },
        )
        .optional()?;
    Ok(patient)
}
