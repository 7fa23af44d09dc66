mod models;
mod utils;
mod db;
mod errors;
mod services;

use dotenv::dotenv;
use std::env;
use log::{error, info};

use crate::db::DatabaseConfig;
use crate::errors::AppError;
use crate::models::department::{Provisioned, DEFAULT_DEPARTMENT_DESCRIPTION, DEFAULT_DEPARTMENT_NAME};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let name = env::var("DEPARTMENT_NAME").unwrap_or_else(|_| DEFAULT_DEPARTMENT_NAME.to_string());
    let description = env::var("DEPARTMENT_DESCRIPTION")
        .unwrap_or_else(|_| DEFAULT_DEPARTMENT_DESCRIPTION.to_string());

    match run(&name, &description).await {
        Ok(outcome) => {
            info!("provisioning finished for {} (created: {})", name, outcome.was_created());
            println!("{}", render_outcome(&outcome));
        }
        Err(err) => {
            error!("provisioning failed: {}", err);
            eprintln!("\nError: {}", err);
        }
    }
}

async fn run(name: &str, description: &str) -> Result<Provisioned, AppError> {
    let config = DatabaseConfig::from_env()?;
    services::department::provision(&config, name, description, |line| println!("{}", line)).await
}

fn render_outcome(outcome: &Provisioned) -> String {
    let department = outcome.department();
    let mut lines = Vec::new();

    match outcome {
        Provisioned::Existing(_) => {
            lines.push(format!("\n{} already exists with ID: {}", department.name, department.id));
        }
        Provisioned::Created(_) => {
            lines.push(format!("\n{} department created!", department.name));
            lines.push(format!("   ID: {}", department.id));
            lines.push(format!("   Name: {}", department.name));
            lines.push(format!("   Description: {}", department.description.as_deref().unwrap_or("")));
        }
    }

    lines.push("\nAdd this to your backend .env:".to_string());
    lines.push(env_line(outcome));
    lines.join("\n")
}

fn env_line(outcome: &Provisioned) -> String {
    format!("DEFAULT_DEPARTMENT_ID={}", outcome.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::department::NewDepartment;

    #[test]
    fn created_output_ends_with_env_line() {
        let department = NewDepartment::new(DEFAULT_DEPARTMENT_NAME, DEFAULT_DEPARTMENT_DESCRIPTION).into_department();
        let id = department.id;
        let rendered = render_outcome(&Provisioned::Created(department));

        assert!(rendered.contains("GESBMS department created!"));
        assert!(rendered.contains("Description: GES Building Management System - Default Department"));
        assert_eq!(rendered.lines().last(), Some(format!("DEFAULT_DEPARTMENT_ID={}", id).as_str()));
    }

    #[test]
    fn existing_output_reports_id() {
        let department = NewDepartment::new(DEFAULT_DEPARTMENT_NAME, DEFAULT_DEPARTMENT_DESCRIPTION).into_department();
        let id = department.id;
        let rendered = render_outcome(&Provisioned::Existing(department));

        assert!(rendered.contains(&format!("GESBMS already exists with ID: {}", id)));
        assert!(!rendered.contains("created!"));
        assert!(rendered.ends_with(&format!("DEFAULT_DEPARTMENT_ID={}", id)));
    }

    #[test]
    fn existing_row_without_description_renders() {
        let mut department = NewDepartment::new(DEFAULT_DEPARTMENT_NAME, DEFAULT_DEPARTMENT_DESCRIPTION).into_department();
        department.description = None;
        department.created_at = None;
        let id = department.id;

        let rendered = render_outcome(&Provisioned::Existing(department));

        assert!(rendered.ends_with(&format!("DEFAULT_DEPARTMENT_ID={}", id)));
    }
}
