use serde::{Deserialize, Serialize};

/// Display identity copied onto an attendance record at mark-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSnapshot {
    pub name: String,
    pub email: String,
}

/// Row shape of the `employees` table columns the directory reads.
#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeNameRow {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
}

impl From<EmployeeNameRow> for EmployeeSnapshot {
    fn from(row: EmployeeNameRow) -> Self {
        let name = match row.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", row.first_name.trim(), last),
            _ => row.first_name.trim().to_string(),
        };

        Self {
            name,
            email: row.email,
        }
    }
}
