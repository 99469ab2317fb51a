// src/db/employee_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::auth::Employee,
};

// O repositório de funcionários, responsável pela tabela 'employees'
#[derive(Clone, Copy, Default)]
pub struct EmployeeRepository;

impl EmployeeRepository {
    pub async fn insert_employee<'e, E>(&self, executor: E, emp: &Employee) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees
                (id, username, password_hash, full_name, email, phone, address, role,
                 active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(emp.id)
        .bind(&emp.username)
        .bind(&emp.password_hash)
        .bind(&emp.full_name)
        .bind(&emp.email)
        .bind(&emp.phone)
        .bind(&emp.address)
        .bind(emp.role)
        .bind(emp.active)
        .bind(emp.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || format!("O usuário '{}' já está em uso", emp.username)))
    }

    pub async fn list_employees<'e, E>(&self, executor: E) -> Result<Vec<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE deleted_at IS NULL ORDER BY full_name",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_employee<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn find_by_username<'e, E>(&self, executor: E, username: &str) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE lower(username) = lower($1) AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn update_employee<'e, E>(&self, executor: E, emp: &Employee) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET password_hash = $2, full_name = $3, email = $4, phone = $5, address = $6,
                role = $7, active = $8, updated_at = $9
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(emp.id)
        .bind(&emp.password_hash)
        .bind(&emp.full_name)
        .bind(&emp.email)
        .bind(&emp.phone)
        .bind(&emp.address)
        .bind(emp.role)
        .bind(emp.active)
        .bind(emp.updated_at)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found("Funcionário"))
    }
}
