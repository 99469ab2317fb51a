// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{finish, SoftDeletable, Store},
    models::auth::{
        AuthResponse, Claims, Employee, EmployeePatch, LoginPayload, NewEmployeePayload,
        RegisterPayload,
    },
    services::soft_delete_in,
};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    token_ttl_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt_secret: String, token_ttl_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            store,
            jwt_secret,
            token_ttl_hours,
            bcrypt_cost,
        }
    }

    /// Auto-registro: cria um administrador e já devolve o token.
    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthResponse, AppError> {
        let employee = self.create_employee(payload.into_new_employee()).await?;
        tracing::info!("Administrador '{}' registrado", employee.username);
        self.respond_with_token(employee)
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthResponse, AppError> {
        let mut uow = self.store.begin().await?;
        let found = uow.find_employee_by_username(payload.username.trim()).await;
        let employee = finish(uow, found)
            .await?
            .filter(Employee::can_log_in)
            .ok_or(AppError::InvalidCredentials)?;

        if !self.verify_password(payload.password, employee.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.respond_with_token(employee)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Employee, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let mut uow = self.store.begin().await?;
        let found = uow.find_employee(token_data.claims.sub).await;
        finish(uow, found)
            .await?
            .filter(Employee::can_log_in)
            .ok_or(AppError::InvalidToken)
    }

    // ---
    // Funcionários
    // ---

    pub async fn create_employee(&self, payload: NewEmployeePayload) -> Result<Employee, AppError> {
        let password_hash = self.hash_password(payload.password.clone()).await?;
        let record = payload.into_record(password_hash, Utc::now())?;

        let mut uow = self.store.begin().await?;
        let result = uow.insert_employee(&record).await;
        finish(uow, result).await
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_employees().await;
        finish(uow, result).await
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<Employee, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow
            .find_employee(id)
            .await
            .and_then(|row| row.ok_or_else(|| AppError::not_found("Funcionário")));
        finish(uow, result).await
    }

    pub async fn update_employee(&self, id: Uuid, mut patch: EmployeePatch) -> Result<Employee, AppError> {
        // Hash fora da transação; é a parte lenta.
        let password_hash = match patch.password.take() {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let mut uow = self.store.begin().await?;
        let result: Result<Employee, AppError> = async {
            let current = uow
                .find_employee(id)
                .await?
                .ok_or_else(|| AppError::not_found("Funcionário"))?;
            let merged = current.apply(patch, password_hash, Utc::now())?;
            uow.update_employee(&merged).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn delete_employee(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result = soft_delete_in(&mut *uow, SoftDeletable::Employee, id).await;
        finish(uow, result).await
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    // Executa a verificação em um thread separado
    async fn verify_password(&self, password: String, password_hash: String) -> Result<bool, AppError> {
        let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
        Ok(valid)
    }

    fn respond_with_token(&self, employee: Employee) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            access_token: self.create_token(employee.id)?,
            token_type: "Bearer",
            employee,
        })
    }

    fn create_token(&self, employee_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.token_ttl_hours);

        let claims = Claims {
            sub: employee_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
