use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse};
use crate::services::{AreaService, COVERAGE_MESSAGE};
use crate::utils::{JwtService, hash_password, validate_email, validate_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
    jwt_service: JwtService,
    area_service: AreaService,
}

impl AuthService {
    pub fn new(pool: DbPool, jwt_service: JwtService, area_service: AreaService) -> Self {
        Self {
            pool,
            jwt_service,
            area_service,
        }
    }

    /// Registration is gated on service-area coverage: a rejected postcode
    /// never creates a row.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();
        validate_email(&email)?;
        validate_password(&request.password)?;

        let first_name = request.first_name.trim();
        let last_name = request.last_name.trim();
        let postcode = request.postcode.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AppError::Validation(
                "First and last name are required".to_string(),
            ));
        }
        if postcode.is_empty() {
            return Err(AppError::Validation("Postcode is required".to_string()));
        }

        if self.area_service.find_active_area(postcode).await?.is_none() {
            return Err(AppError::AreaNotServiced(COVERAGE_MESSAGE.to_string()));
        }

        let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;

        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, first_name, last_name, phone, address, postcode) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(&request.phone)
        .bind(&request.address)
        .bind(postcode)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Two concurrent registrations can both pass the probe above;
            // the unique index settles it.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Email already registered".to_string());
                }
            }
            AppError::Database(e)
        })?;

        let user = self.get_user(result.last_insert_rowid()).await?;
        self.auth_response(user)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, first_name, last_name, phone, address, postcode, \
                    is_admin, created_at \
             FROM users WHERE email = ?",
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(user) = user else {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        };

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        self.auth_response(user)
    }

    async fn get_user(&self, user_id: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, first_name, last_name, phone, address, postcode, \
                    is_admin, created_at \
             FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn auth_response(&self, user: User) -> AppResult<AuthResponse> {
        let token = self
            .jwt_service
            .generate_token(user.id, &user.email, user.is_admin)?;

        Ok(AuthResponse {
            token,
            expires_in: self.jwt_service.expires_in(),
            user: UserResponse::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn register_request(email: &str, postcode: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "Password123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: Some("+447700900000".to_string()),
            address: Some("1 Horseferry Road".to_string()),
            postcode: postcode.to_string(),
        }
    }

    async fn service() -> AuthService {
        let pool = test_pool().await;
        AuthService::new(
            pool.clone(),
            JwtService::new("test-secret", 604_800),
            AreaService::new(pool),
        )
    }

    async fn user_count(service: &AuthService) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&service.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_then_login_in_covered_area() {
        let service = service().await;

        let registered = service
            .register(register_request("ada@example.com", "SW1A 1AA"))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "ada@example.com");
        assert!(!registered.user.is_admin);
        assert!(!registered.token.is_empty());

        let logged_in = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "Password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_register_outside_coverage_creates_no_row() {
        let service = service().await;

        let result = service
            .register(register_request("ox@example.com", "OX1 1AA"))
            .await;

        assert!(matches!(result, Err(AppError::AreaNotServiced(_))));
        assert_eq!(user_count(&service).await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service = service().await;

        service
            .register(register_request("ada@example.com", "SW1A 1AA"))
            .await
            .unwrap();
        let result = service
            .register(register_request("ada@example.com", "W4 5BT"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(user_count(&service).await, 1);
    }

    #[tokio::test]
    async fn test_email_is_normalised() {
        let service = service().await;

        service
            .register(register_request("  Ada@Example.com ", "SW1A 1AA"))
            .await
            .unwrap();

        let logged_in = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "Password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_alike() {
        let service = service().await;
        service
            .register(register_request("ada@example.com", "SW1A 1AA"))
            .await
            .unwrap();

        let wrong_password = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "WrongPassword1".to_string(),
            })
            .await;
        let unknown_email = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "Password123".to_string(),
            })
            .await;

        for result in [wrong_password, unknown_email] {
            match result {
                Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid credentials"),
                other => panic!("expected Unauthorized, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_weak_password_rejected_before_area_check() {
        let service = service().await;

        let mut request = register_request("ada@example.com", "SW1A 1AA");
        request.password = "short".to_string();

        assert!(matches!(
            service.register(request).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(user_count(&service).await, 0);
    }
}
