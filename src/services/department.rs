use log::{info, warn};
use sqlx::Connection;

use crate::db::{self, department::DepartmentStore, DatabaseConfig};
use crate::errors::AppError;
use crate::models::department::{NewDepartment, Provisioned};
use crate::utils::validation::validate_payload;

/// Returns the department named `name`, creating it first if it does not exist.
///
/// A lost race against a concurrent run (the conditional insert wrote nothing)
/// is resolved by reading back the winner's row.
pub async fn ensure_department<S: DepartmentStore>(
    store: &mut S,
    name: &str,
    description: &str,
) -> Result<Provisioned, AppError> {
    let new_department = NewDepartment::new(name, description);
    validate_payload(&new_department)?;

    if let Some(existing) = store.find_by_name(name).await? {
        info!("department {} already exists with id {}", name, existing.id);
        return Ok(Provisioned::Existing(existing));
    }

    let department = new_department.into_department();
    if store.insert_if_absent(&department).await? {
        info!("created department {} with id {}", name, department.id);
        return Ok(Provisioned::Created(department));
    }

    warn!("department {} was created concurrently, reading it back", name);
    store
        .find_by_name(name)
        .await?
        .map(Provisioned::Existing)
        .ok_or_else(|| AppError::DatabaseError(format!("department {} was neither inserted nor found", name)))
}

/// Opens one connection, provisions the department and closes the connection
/// whatever the outcome. Operator status lines go to `report`.
pub async fn provision<R: FnMut(&str)>(
    config: &DatabaseConfig,
    name: &str,
    description: &str,
    mut report: R,
) -> Result<Provisioned, AppError> {
    report(&format!("Connecting to database {}...", config.describe()));
    let mut conn = db::connect(config).await?;
    report("Connected!");

    let result = ensure_department(&mut conn, name, description).await;

    if let Err(err) = conn.close().await {
        warn!("failed to close database connection: {}", err);
    }

    result
}
