// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::db_utils::{clean_optional, required_text};
use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

// Representa um funcionário vindo do banco de dados
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub username: String,

    #[serde(skip_serializing, default)] // nunca sai na resposta
    pub password_hash: String,

    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn can_log_in(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }
}

// Dados para o auto-registro (cria um administrador)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(length(min = 3, max = 50, message = "O usuário deve ter entre 3 e 50 caracteres."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "O nome é obrigatório."))]
    pub given_names: String,
    #[validate(length(min = 1, max = 100, message = "O sobrenome é obrigatório."))]
    pub first_surname: String,
    #[validate(length(max = 100))]
    pub second_surname: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl RegisterPayload {
    pub fn full_name(&self) -> String {
        let mut parts = vec![self.given_names.trim(), self.first_surname.trim()];
        if let Some(second) = self.second_surname.as_deref().map(str::trim) {
            if !second.is_empty() {
                parts.push(second);
            }
        }
        parts.join(" ")
    }

    pub fn into_new_employee(self) -> NewEmployeePayload {
        let full_name = self.full_name();
        NewEmployeePayload {
            username: self.username,
            password: self.password,
            full_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            role: Some(Role::Admin),
        }
    }
}

// Cadastro de funcionário feito por alguém já autenticado
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployeePayload {
    #[validate(length(min = 3, max = 50, message = "O usuário deve ter entre 3 e 50 caracteres."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[validate(length(min = 1, max = 150, message = "O nome completo é obrigatório."))]
    pub full_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
}

impl NewEmployeePayload {
    /// O hash já deve vir calculado; aqui só normalizamos os campos.
    pub fn into_record(self, password_hash: String, now: DateTime<Utc>) -> Result<Employee, AppError> {
        Ok(Employee {
            id: Uuid::new_v4(),
            username: required_text(&self.username, "usuário")?.to_lowercase(),
            password_hash,
            full_name: required_text(&self.full_name, "nome completo")?,
            email: clean_optional(self.email).map(|e| e.to_lowercase()),
            phone: clean_optional(self.phone),
            address: clean_optional(self.address),
            role: self.role.unwrap_or(Role::Employee),
            active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub full_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl Employee {
    /// `password_hash` é o novo hash quando o patch trouxe senha.
    pub fn apply(
        self,
        patch: EmployeePatch,
        password_hash: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Employee, AppError> {
        Ok(Employee {
            password_hash: password_hash.unwrap_or(self.password_hash),
            full_name: match patch.full_name {
                Some(name) => required_text(&name, "nome completo")?,
                None => self.full_name,
            },
            email: patch
                .email
                .map_or(self.email, |e| clean_optional(Some(e)).map(|e| e.to_lowercase())),
            phone: patch.phone.map_or(self.phone, |p| clean_optional(Some(p))),
            address: patch.address.map_or(self.address, |a| clean_optional(Some(a))),
            role: patch.role.unwrap_or(self.role),
            active: patch.active.unwrap_or(self.active),
            updated_at: now,
            ..self
        })
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "O usuário é obrigatório."))]
    pub username: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub employee: Employee,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID do funcionário
    pub exp: usize,
    pub iat: usize,
}
