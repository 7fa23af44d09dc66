use log::debug;
use sqlx::PgConnection;

use crate::errors::AppError;
use crate::models::department::Department;

/// Row access needed to provision a department.
#[allow(async_fn_in_trait)]
pub trait DepartmentStore {
    async fn find_by_name(&mut self, name: &str) -> Result<Option<Department>, AppError>;

    /// Writes the row unless one with the same name already exists.
    /// Returns whether a row was written.
    async fn insert_if_absent(&mut self, department: &Department) -> Result<bool, AppError>;
}

impl DepartmentStore for PgConnection {
    async fn find_by_name(&mut self, name: &str) -> Result<Option<Department>, AppError> {
        debug!("looking up department {}", name);
        // created_at may be declared as timestamp or timestamptz
        sqlx::query_as::<_, Department>(
            "SELECT id, name, description, created_at::timestamptz AS created_at \
             FROM departments WHERE name = $1 \
             ORDER BY created_at, id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&mut *self)
        .await
        .map_err(|err| AppError::DatabaseError(err.to_string()))
    }

    async fn insert_if_absent(&mut self, department: &Department) -> Result<bool, AppError> {
        debug!("inserting department {} ({})", department.name, department.id);
        let result = sqlx::query(
            "INSERT INTO departments (id, name, description, created_at) \
             SELECT $1, $2::text, $3, $4 \
             WHERE NOT EXISTS (SELECT 1 FROM departments WHERE name = $2::text)",
        )
        .bind(department.id)
        .bind(&department.name)
        .bind(&department.description)
        .bind(department.created_at)
        .execute(&mut *self)
        .await
        .map_err(|err| AppError::DatabaseError(err.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}
