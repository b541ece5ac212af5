//! Business registration, email verification and sign-in.

use crate::auth::password::{hash_password, verify_password};
use crate::auth::JwtService;
use crate::services::email::{otp_email_body, Mailer};
use crate::services::files::FileUploader;
use chrono::{Duration, Utc};
use cradle_core::models::{
    NewUser, SignInResponse, SignUpRequest, User, UserResponse, UserRole,
};
use cradle_core::AppError;
use cradle_db::UserRepository;
use cradle_storage::keys::USER_IMAGES;
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

const OTP_SUBJECT: &str = "Verify your Cradle account";

/// Four-digit numeric one-time password
pub fn generate_otp() -> String {
    rand::rng().random_range(1000..10000).to_string()
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    files: FileUploader,
    mailer: Arc<dyn Mailer>,
    jwt: JwtService,
    otp_ttl_minutes: i64,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        files: FileUploader,
        mailer: Arc<dyn Mailer>,
        jwt: JwtService,
        otp_ttl_minutes: i64,
    ) -> Self {
        Self {
            users,
            files,
            mailer,
            jwt,
            otp_ttl_minutes,
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("No account found for this email".to_string()))
    }

    async fn send_otp(&self, email: &str, otp: &str) -> Result<(), AppError> {
        self.mailer
            .send(email, OTP_SUBJECT, &otp_email_body(otp, self.otp_ttl_minutes))
            .await
    }

    /// Register a business. The account starts unverified and an OTP is emailed.
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<UserResponse, AppError> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let image = request
            .user_img
            .as_deref()
            .map(|raw| self.files.decode_image(raw))
            .transpose()?;

        let password_hash = hash_password(&request.password)?;

        let stored_image = match image {
            Some(file) => Some(self.files.store(USER_IMAGES, file).await?),
            None => None,
        };

        let otp = generate_otp();
        let mut new_user =
            NewUser::with_credentials(request.email.clone(), password_hash, UserRole::Business);
        new_user.business_name = Some(request.business_name.trim().to_string());
        new_user.contact_name = Some(request.contact_name);
        new_user.contact_number = Some(request.contact_number);
        new_user.business_address = Some(request.business_address);
        new_user.business_city = Some(request.business_city);
        new_user.business_state = Some(request.business_state);
        new_user.business_country = Some(request.business_country);
        new_user.sector = Some(request.sector);
        new_user.organization_size = Some(request.organization_size);
        new_user.user_img = stored_image.as_ref().map(|s| s.url.clone());
        new_user.is_verified = false;
        new_user.otp = Some(otp.clone());
        new_user.otp_expires_at = Some(Utc::now() + Duration::minutes(self.otp_ttl_minutes));

        let user = match self.users.insert(new_user).await {
            Ok(user) => user,
            Err(e) => {
                if let Some(stored) = stored_image {
                    self.files.discard(&stored.key).await;
                }
                return Err(e);
            }
        };

        tracing::info!(user_id = %user.id, "Business registered");
        self.send_otp(&user.email, &otp).await?;

        Ok(user.into())
    }

    #[tracing::instrument(skip(self, otp))]
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<UserResponse, AppError> {
        let user = self.find_by_email(email).await?;
        if user.is_verified {
            return Err(AppError::InvalidInput("Account is already verified".to_string()));
        }

        let valid = match (&user.otp, user.otp_expires_at) {
            (Some(stored), Some(expires_at)) => stored == otp && expires_at > Utc::now(),
            _ => false,
        };
        if !valid {
            return Err(AppError::InvalidInput("Invalid or expired OTP".to_string()));
        }

        self.users.mark_verified(user.id).await?;
        tracing::info!(user_id = %user.id, "Email verified");
        self.me(user.id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn resend_otp(&self, email: &str) -> Result<(), AppError> {
        let user = self.find_by_email(email).await?;
        if user.is_verified {
            return Err(AppError::InvalidInput("Account is already verified".to_string()));
        }

        let otp = generate_otp();
        let expires_at = Utc::now() + Duration::minutes(self.otp_ttl_minutes);
        self.users
            .set_otp(user.id, Some(otp.clone()), Some(expires_at))
            .await?;

        self.send_otp(&user.email, &otp).await
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AppError> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash) {
            return Err(invalid());
        }
        if !user.is_verified {
            return Err(AppError::Unauthorized(
                "Please verify your email before signing in".to_string(),
            ));
        }
        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        let access_token = self.jwt.issue(&user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "User signed in");

        Ok(SignInResponse {
            user: user.into(),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expires_in(),
        })
    }

    pub async fn me(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Make sure a verified admin account exists for the given credentials.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            if existing.role != UserRole::Admin {
                tracing::warn!(email = %email, "ADMIN_EMAIL belongs to a non-admin account");
            }
            return Ok(());
        }

        let user = self
            .users
            .insert(NewUser::with_credentials(
                email.to_string(),
                hash_password(password)?,
                UserRole::Admin,
            ))
            .await?;
        tracing::info!(user_id = %user.id, "Admin account created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_is_four_digits() {
        for _ in 0..200 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 4);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
