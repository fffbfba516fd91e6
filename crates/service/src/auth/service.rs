use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use super::domain::{AuthSession, LoginInput};
use super::errors::AuthError;
use crate::backend::{Account, BackendError, SessionBackend};

/// Session workflows independent of web framework
#[derive(Clone)]
pub struct AuthService {
    sessions: Arc<dyn SessionBackend>,
}

impl AuthService {
    pub fn new(sessions: Arc<dyn SessionBackend>) -> Self { Self { sessions } }

    /// Open a backend session for an email/password pair.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, domain::LoginInput};
    /// use service::backend::LocalBackend;
    /// let root = std::env::temp_dir().join(format!("servigraf_doc_{}", uuid::Uuid::new_v4().simple()));
    /// let backend = tokio_test::block_on(LocalBackend::open(root)).unwrap();
    /// tokio_test::block_on(backend.add_account("u@e.com", "N", "Passw0rd")).unwrap();
    /// let svc = AuthService::new(Arc::new(backend));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.account.email, "u@e.com");
    /// assert!(!session.secret.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = input.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Validation("email must look like an address".into()));
        }
        if input.password.is_empty() {
            return Err(AuthError::Validation("password is required".into()));
        }

        let session = match self.sessions.create_session(email, &input.password).await {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "login failed");
                return Err(AuthError::LoginFailed);
            }
        };
        let account = match self.sessions.get_account(&session.secret).await {
            Ok(a) => a,
            Err(e) => {
                error!(error = %e, "session opened but account lookup failed");
                return Err(AuthError::LoginFailed);
            }
        };
        info!(user_id = %account.id, "login");
        Ok(AuthSession { account, secret: session.secret, expire: session.expire })
    }

    #[instrument(skip_all)]
    pub async fn logout(&self, secret: &str) -> Result<(), AuthError> {
        match self.sessions.delete_session(secret).await {
            Ok(()) => {
                info!("logout");
                Ok(())
            }
            Err(BackendError::Unauthorized | BackendError::NotFound) => Err(AuthError::Unauthorized),
            Err(e) => {
                error!(error = %e, "logout failed");
                Err(AuthError::Backend(e.to_string()))
            }
        }
    }

    /// The account behind a session secret. Any failure reads as not logged in.
    pub async fn current_account(&self, secret: &str) -> Result<Account, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Unauthorized);
        }
        self.sessions.get_account(secret).await.map_err(|e| {
            debug!(error = %e, "session rejected");
            AuthError::Unauthorized
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::local_backend;

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn login_me_logout() -> anyhow::Result<()> {
        let svc = AuthService::new(local_backend().await?);
        let session = svc.login(login("admin@grafos.ec", "offset-2024")).await?;
        assert_eq!(session.account.name, "Admin");

        let me = svc.current_account(&session.secret).await?;
        assert_eq!(me, session.account);

        svc.logout(&session.secret).await?;
        assert!(matches!(svc.current_account(&session.secret).await, Err(AuthError::Unauthorized)));
        assert!(matches!(svc.logout(&session.secret).await, Err(AuthError::Unauthorized)));
        Ok(())
    }

    #[tokio::test]
    async fn bad_credentials_are_a_generic_failure() -> anyhow::Result<()> {
        let svc = AuthService::new(local_backend().await?);
        let err = svc.login(login("admin@grafos.ec", "nope")).await.unwrap_err();
        assert!(matches!(err, AuthError::LoginFailed));
        assert_eq!(err.code(), 1005);

        let err = svc.login(login("ghost@grafos.ec", "offset-2024")).await.unwrap_err();
        assert!(matches!(err, AuthError::LoginFailed));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_input_never_reaches_backend() -> anyhow::Result<()> {
        let svc = AuthService::new(local_backend().await?);
        assert!(matches!(svc.login(login("not-an-email", "x")).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.login(login("a@b.ec", "")).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.current_account("").await, Err(AuthError::Unauthorized)));
        Ok(())
    }
}
