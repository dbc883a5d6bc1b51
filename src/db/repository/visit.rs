use rusqlite::{params, Connection, OptionalExtension};

use super::{now_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::Visit;
use crate::scoring::DiagnosisCandidate;

/// Record one analysis. Symptoms and results are stored as JSON text.
pub fn insert_visit(
    conn: &Connection,
    patient_id: i64,
    symptoms: &[String],
    results: &[DiagnosisCandidate],
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO visits (patient_id, symptoms, analysis_result, timestamp)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            patient_id,
            serde_json::to_string(symptoms)?,
            serde_json::to_string(results)?,
            now_timestamp(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recently created visit for a patient, by id.
pub fn latest_visit_id(conn: &Connection, patient_id: i64) -> Result<Option<i64>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT id FROM visits WHERE patient_id = ?1 ORDER BY id DESC LIMIT 1",
            params![patient_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id)
}

/// Owning patient of a visit, if the visit exists.
pub fn visit_owner(conn: &Connection, visit_id: i64) -> Result<Option<i64>, DatabaseError> {
    let owner = conn
        .query_row(
            "SELECT patient_id FROM visits WHERE id = ?1",
            params![visit_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(owner)
}

/// Set the chosen diagnosis on a visit. Returns `false` if the visit is gone.
pub fn lock_disease(conn: &Connection, visit_id: i64, disease: &str) -> Result<bool, DatabaseError> {
    let updated = conn.execute(
        "UPDATE visits SET locked_disease = ?1 WHERE id = ?2",
        params![disease, visit_id],
    )?;
    Ok(updated > 0)
}

type VisitRow = (i64, i64, String, String, Option<String>, Option<String>);

const VISIT_COLUMNS: &str =
    "id, patient_id, symptoms, analysis_result, locked_disease, timestamp";

fn read_visit_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VisitRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn visit_from_row(row: VisitRow) -> Result<Visit, DatabaseError> {
    let (id, patient_id, symptoms, results, locked_disease, timestamp) = row;
    Ok(Visit {
        id,
        patient_id,
        symptoms: serde_json::from_str(&symptoms)?,
        results: serde_json::from_str(&results)?,
        locked_disease,
        timestamp: parse_timestamp(&timestamp.unwrap_or_default()),
    })
}

pub fn get_visit(conn: &Connection, visit_id: i64) -> Result<Option<Visit>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {VISIT_COLUMNS} FROM visits WHERE id = ?1"),
            params![visit_id],
            read_visit_row,
        )
        .optional()?;
    row.map(visit_from_row).transpose()
}

/// All visits for a patient, newest first.
pub fn list_visits(conn: &Connection, patient_id: i64) -> Result<Vec<Visit>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {VISIT_COLUMNS} FROM visits WHERE patient_id = ?1 ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map(params![patient_id], read_visit_row)?;

    let mut visits = Vec::new();
    for row in rows {
        visits.push(visit_from_row(row?)?);
    }
    Ok(visits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_patient;
    use crate::db::sqlite::open_memory_database;
    use crate::models::NewPatient;

    fn setup() -> (Connection, i64) {
        let conn = open_memory_database().unwrap();
        let patient_id = insert_patient(
            &conn,
            &NewPatient { name: "Test".into(), age: 40, sex: "male".into() },
        )
        .unwrap();
        (conn, patient_id)
    }

    fn candidate(name: &str, probability: u32) -> DiagnosisCandidate {
        DiagnosisCandidate {
            name: name.into(),
            probability,
            explanation: "why".into(),
            suggested_tests: vec!["ECG".into()],
        }
    }

    #[test]
    fn insert_and_read_back_visit() {
        let (conn, patient_id) = setup();
        let symptoms = vec!["cough".to_string()];
        let results = vec![candidate("Common Cold", 60)];
        let id = insert_visit(&conn, patient_id, &symptoms, &results).unwrap();

        let visit = get_visit(&conn, id).unwrap().unwrap();
        assert_eq!(visit.patient_id, patient_id);
        assert_eq!(visit.symptoms, symptoms);
        assert_eq!(visit.results, results);
        assert!(visit.locked_disease.is_none());
    }

    #[test]
    fn symptoms_stored_as_json_text() {
        let (conn, patient_id) = setup();
        let id = insert_visit(&conn, patient_id, &["sore throat".to_string()], &[]).unwrap();
        let raw: String = conn
            .query_row("SELECT symptoms FROM visits WHERE id = ?1", params![id], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, r#"["sore throat"]"#);
    }

    #[test]
    fn latest_visit_is_highest_id() {
        let (conn, patient_id) = setup();
        insert_visit(&conn, patient_id, &[], &[]).unwrap();
        let second = insert_visit(&conn, patient_id, &[], &[]).unwrap();
        assert_eq!(latest_visit_id(&conn, patient_id).unwrap(), Some(second));
    }

    #[test]
    fn latest_visit_none_without_visits() {
        let (conn, patient_id) = setup();
        assert_eq!(latest_visit_id(&conn, patient_id).unwrap(), None);
        assert_eq!(latest_visit_id(&conn, 9999).unwrap(), None);
    }

    #[test]
    fn lock_disease_sets_field() {
        let (conn, patient_id) = setup();
        let id = insert_visit(&conn, patient_id, &[], &[]).unwrap();
        assert!(lock_disease(&conn, id, "Angina").unwrap());
        let visit = get_visit(&conn, id).unwrap().unwrap();
        assert_eq!(visit.locked_disease.as_deref(), Some("Angina"));
    }

    #[test]
    fn lock_missing_visit_returns_false() {
        let (conn, _) = setup();
        assert!(!lock_disease(&conn, 77, "Angina").unwrap());
    }

    #[test]
    fn visit_owner_reports_patient() {
        let (conn, patient_id) = setup();
        let id = insert_visit(&conn, patient_id, &[], &[]).unwrap();
        assert_eq!(visit_owner(&conn, id).unwrap(), Some(patient_id));
        assert_eq!(visit_owner(&conn, id + 1).unwrap(), None);
    }

    #[test]
    fn list_visits_newest_first() {
        let (conn, patient_id) = setup();
        let a = insert_visit(&conn, patient_id, &["a".to_string()], &[]).unwrap();
        let b = insert_visit(&conn, patient_id, &["b".to_string()], &[]).unwrap();
        let visits = list_visits(&conn, patient_id).unwrap();
        let ids: Vec<i64> = visits.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn corrupt_json_surfaces_serialization_error() {
        let (conn, patient_id) = setup();
        conn.execute(
            "INSERT INTO visits (patient_id, symptoms, analysis_result) VALUES (?1, 'not json', '[]')",
            params![patient_id],
        )
        .unwrap();
        let result = list_visits(&conn, patient_id);
        assert!(matches!(result, Err(DatabaseError::Serialization(_))));
    }
}
