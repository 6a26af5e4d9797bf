//! Driving port for login.
//!
//! Inbound adapters call this port to turn credentials into a [`Principal`]
//! without knowing where accounts live.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Principal, Role, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the signed-in principal.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error>;
}

/// Fixture user id granted to the `admin` fixture login.
pub const FIXTURE_ADMIN_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
/// Fixture user id granted to the `member` fixture login.
pub const FIXTURE_MEMBER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Authenticator with two hard-coded accounts.
///
/// `admin` / `password` signs in as an administrator and `member` /
/// `password` as a regular member.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let (id, role) = match (credentials.username(), credentials.password()) {
            ("admin", "password") => (FIXTURE_ADMIN_ID, Role::Admin),
            ("member", "password") => (FIXTURE_MEMBER_ID, Role::Member),
            _ => return Err(Error::unauthorized("invalid credentials")),
        };
        let user_id = UserId::new(id)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        Ok(Principal::new(user_id, role))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password", Some(Role::Admin))]
    #[case("member", "password", Some(Role::Member))]
    #[case("admin", "wrong", None)]
    #[case("other", "password", None)]
    #[tokio::test]
    async fn fixture_login_service_grants_roles(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: Option<Role>,
    ) {
        let creds =
            LoginCredentials::try_from_parts(username, password).expect("credentials shape");
        let result = FixtureLoginService.authenticate(&creds).await;
        match (expected, result) {
            (Some(role), Ok(principal)) => assert_eq!(principal.role(), role),
            (None, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (Some(_), Err(err)) => panic!("expected success, got error: {err:?}"),
            (None, Ok(principal)) => panic!("expected failure, got success: {principal:?}"),
        }
    }
}
