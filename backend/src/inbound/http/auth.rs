//! Authentication helpers used by HTTP handlers.
//!
//! Authentication mechanics are out of scope for this service; the fixture
//! credential check below exists so sessions can be minted in development
//! and tests. Production deployments substitute a real identity provider.

use crate::domain::{Error, LoginCredentials, UserId};

use super::ApiResult;

pub(crate) fn authenticate(credentials: &LoginCredentials) -> ApiResult<UserId> {
    if credentials.username() == "admin" && credentials.password() == "password" {
        UserId::new("123e4567-e89b-12d3-a456-426614174000")
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
    } else {
        Err(Error::unauthorized("invalid credentials"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn valid_credentials_yield_a_user_id() {
        let credentials =
            LoginCredentials::try_from_parts("admin", "password").expect("valid creds");
        assert!(authenticate(&credentials).is_ok());
    }

    #[rstest]
    fn wrong_credentials_are_unauthorised() {
        let credentials = LoginCredentials::try_from_parts("admin", "wrong").expect("valid shape");
        let error = authenticate(&credentials).expect_err("should be rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
