//! Roster loader
//!
//! Columns: `emp_id, emp_nm, dob, retr_dt, jjoin_date, grade_no, desg_no,
//! desg_nm, lastpromotiondate, status, senior_id`. The last promotion date and
//! the seniority rank are optional, both as columns and as values.

use super::{csv_reader, open, parse_date, required, required_date, required_u32, LoadError};
use crate::models::employee::{Employee, EmploymentStatus};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    #[serde(default)]
    emp_id: Option<String>,
    #[serde(default)]
    emp_nm: Option<String>,
    #[serde(default)]
    dob: Option<String>,
    #[serde(default)]
    retr_dt: Option<String>,
    #[serde(default)]
    jjoin_date: Option<String>,
    #[serde(default)]
    grade_no: Option<String>,
    #[serde(default)]
    desg_no: Option<String>,
    #[serde(default)]
    desg_nm: Option<String>,
    #[serde(default)]
    lastpromotiondate: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    senior_id: Option<String>,
}

impl EmployeeRow {
    fn into_employee(self, row: usize) -> Result<Employee, LoadError> {
        let last_promotion_date =
            optional(row, "lastpromotiondate", self.lastpromotiondate.as_deref(), parse_date);
        let seniority_rank = optional(row, "senior_id", self.senior_id.as_deref(), |raw| {
            raw.trim().parse().ok()
        });

        Ok(Employee {
            emp_id: required(row, "emp_id", &self.emp_id)?.to_string(),
            name: self.emp_nm.clone().unwrap_or_default(),
            date_of_birth: required_date(row, "dob", &self.dob)?,
            retirement_date: required_date(row, "retr_dt", &self.retr_dt)?,
            joining_date: required_date(row, "jjoin_date", &self.jjoin_date)?,
            grade_no: required_u32(row, "grade_no", &self.grade_no)?,
            desg_no: required_u32(row, "desg_no", &self.desg_no)?,
            designation_name: self.desg_nm.clone().unwrap_or_default(),
            last_promotion_date,
            status: EmploymentStatus::parse(self.status.as_deref().unwrap_or_default()),
            seniority_rank,
        })
    }
}

/// Parse an optional value; a present but unreadable value is dropped with a warning
fn optional<T>(
    row: usize,
    field: &'static str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = value.filter(|v| !v.trim().is_empty())?;
    let parsed = parse(raw);
    if parsed.is_none() {
        warn!(row, field, value = raw, "unreadable optional value ignored");
    }
    parsed
}

/// Read every roster row from CSV text
pub fn read_employees<R: Read>(reader: R) -> Result<Vec<Employee>, LoadError> {
    let mut csv = csv_reader(reader);
    let mut employees = Vec::new();
    for (index, record) in csv.deserialize::<EmployeeRow>().enumerate() {
        employees.push(record?.into_employee(index + 1)?);
    }
    Ok(employees)
}

/// Load the roster file at `path`
pub fn load_employees(path: impl AsRef<Path>) -> Result<Vec<Employee>, LoadError> {
    let path = path.as_ref();
    let employees = read_employees(open(path)?)?;
    info!(path = %path.display(), rows = employees.len(), "roster loaded");
    Ok(employees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn read_with_logs(csv: &str) -> (Vec<Employee>, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let employees = tracing::subscriber::with_default(subscriber, || {
            read_employees(csv.as_bytes()).unwrap()
        });
        (employees, logs.text())
    }

    const HEADER: &str = "emp_id,emp_nm,dob,retr_dt,jjoin_date,grade_no,desg_no,desg_nm,\
                          lastpromotiondate,status,senior_id\n";

    #[test]
    fn test_unreadable_optional_values_warn() {
        let row = "7001,A,1/1/1980,1/1/2040,1/1/2005,6,60,Officer,soon,Regular,first\n";
        let csv = format!("{HEADER}{row}");
        let (employees, logs) = read_with_logs(&csv);

        assert_eq!(employees[0].last_promotion_date, None);
        assert_eq!(employees[0].seniority_rank, None);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("field=\"lastpromotiondate\""));
        assert!(logs.contains("field=\"senior_id\""));
        assert!(logs.contains("value=\"first\""));
    }

    #[test]
    fn test_blank_optional_values_are_silent() {
        let row = "7002,B,1/1/1980,1/1/2040,1/1/2005,6,60,Officer, ,Regular,\n";
        let csv = format!("{HEADER}{row}");
        let (employees, logs) = read_with_logs(&csv);

        assert_eq!(employees[0].last_promotion_date, None);
        assert!(!logs.contains("WARN"));
    }

    #[test]
    fn test_padded_numbers_parse_but_status_stays_verbatim() {
        let row = "7003,C,1/1/1980,1/1/2040,1/1/2005, 6 ,60,Officer,,Regular , 4 \n";
        let csv = format!("{HEADER}{row}");
        let (employees, _) = read_with_logs(&csv);

        assert_eq!(employees[0].grade_no, 6);
        assert_eq!(employees[0].seniority_rank, Some(4));
        assert_eq!(employees[0].status, EmploymentStatus::Other("Regular ".to_string()));
        assert!(!employees[0].status.participates());
    }
}
