use reqwest::Method;
use roomdesk_core::{ClientError, ClientResult};
use roomdesk_shared::{AuthResponse, LoginRequest, Masked, RegisterRequest, Role, User};
use tracing::info;

use crate::http::{Ack, ApiClient, Auth};

/// Sign-up form as entered, before the confirmation check.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub about: Option<String>,
    pub email: String,
    pub password: Masked<String>,
    pub confirm_password: Masked<String>,
}

impl RegisterForm {
    pub fn validate(&self) -> ClientResult<RegisterRequest> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ClientError::Validation(
                "Please check the form fields and try again.".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(ClientError::Validation("Passwords do not match!".to_string()));
        }
        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            about: self.about.clone(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

impl ApiClient {
    /// Exchange credentials for a token and persist the session.
    pub async fn login(&self, username: &str, password: Masked<String>) -> ClientResult<User> {
        let request = LoginRequest {
            username: username.to_string(),
            password,
        };
        let response: AuthResponse = self
            .call(Method::POST, "/users/login", Auth::Public, Some(&request))
            .await
            .map_err(|e| match e {
                ClientError::AuthRequired(_) => {
                    ClientError::AuthRequired("Invalid username or password".to_string())
                }
                other => other,
            })?;

        let user = response.user;
        self.session().sign_in(response.token, user.clone()).await?;
        info!(user_id = user.id, role = %user.role, "Logged in");
        Ok(user)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.session().sign_out().await
    }

    pub async fn register(&self, form: &RegisterForm) -> ClientResult<String> {
        let request = form.validate()?;
        let ack: Ack = self
            .call(Method::POST, "/users/public/register", Auth::Public, Some(&request))
            .await?;
        info!(username = %request.username, "Registered user");
        Ok(ack.message_or("User registered successfully!"))
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session().current_user().await
    }

    pub async fn role(&self) -> Option<Role> {
        self.session().current_user().await.map(|u| u.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: " maria ".to_string(),
            about: None,
            email: "maria@example.com".to_string(),
            password: Masked::from(password),
            confirm_password: Masked::from(confirm),
        }
    }

    #[test]
    fn test_register_requires_matching_passwords() {
        let err = form("secret1", "secret2").validate().unwrap_err();
        assert_eq!(err, ClientError::Validation("Passwords do not match!".to_string()));

        let request = form("secret1", "secret1").validate().unwrap();
        assert_eq!(request.username, "maria");
        assert_eq!(request.password.expose(), "secret1");
    }

    #[test]
    fn test_register_requires_username() {
        let mut blank = form("a", "a");
        blank.username = "  ".to_string();
        assert!(matches!(blank.validate(), Err(ClientError::Validation(_))));
    }
}
