use crate::{
    AppState,
    config::ProxyHeaderAuthConfig,
    db::models::users::UserCreateDBRequest,
    errors::{Error, Result},
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, request::Parts},
};
use tracing::{debug, instrument, trace};

/// A verified identity forwarded by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-issued user id
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
}

impl Identity {
    /// Full name if the provider sent one, otherwise the first name.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.first_name.as_deref())
    }

    /// The user row to create the first time this identity is seen.
    pub fn user_request(&self) -> UserCreateDBRequest {
        UserCreateDBRequest {
            external_user_id: self.external_id.clone(),
            email: self.email.clone(),
            name: self.display_name().map(str::to_string),
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Read the identity headers.
///
/// Returns:
/// - `Ok(None)`: proxy auth disabled, or no user header present
/// - `Ok(Some(identity))`: user and email headers present
/// - `Err(BadRequest)`: user header present but no email
pub fn identity_from_headers(headers: &HeaderMap, config: &ProxyHeaderAuthConfig) -> Result<Option<Identity>> {
    if !config.enabled {
        return Ok(None);
    }

    let Some(external_id) = header_value(headers, &config.header_name) else {
        return Ok(None);
    };

    let email = header_value(headers, &config.email_header_name).ok_or_else(|| Error::bad_request("Email not found"))?;

    Ok(Some(Identity {
        external_id: external_id.to_string(),
        email: email.to_string(),
        name: header_value(headers, &config.name_header_name).map(str::to_string),
        first_name: header_value(headers, &config.first_name_header_name).map(str::to_string),
    }))
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match identity_from_headers(&parts.headers, &state.config.auth.proxy_header)? {
            Some(identity) => Ok(identity),
            None => {
                trace!("No identity headers on request");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}

impl OptionalFromRequestParts<AppState> for Identity {
    type Rejection = Error;

    /// An incomplete identity (user header without email) counts as anonymous here.
    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Option<Self>> {
        match identity_from_headers(&parts.headers, &state.config.auth.proxy_header) {
            Err(Error::BadRequest { message }) => {
                debug!(%message, "Treating incomplete identity as anonymous");
                Ok(None)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_full_identity() {
        let config = create_test_config().auth.proxy_header;
        let identity = identity_from_headers(
            &headers(&[
                ("x-codebox-user", "user_1"),
                ("x-codebox-email", "ada@example.com"),
                ("x-codebox-name", "Ada Lovelace"),
                ("x-codebox-first-name", "Ada"),
            ]),
            &config,
        )
        .unwrap()
        .unwrap();

        assert_eq!(identity.external_id, "user_1");
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.display_name(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_first_name_fallback() {
        let config = create_test_config().auth.proxy_header;
        let identity = identity_from_headers(
            &headers(&[
                ("x-codebox-user", "user_1"),
                ("x-codebox-email", "ada@example.com"),
                ("x-codebox-first-name", "Ada"),
            ]),
            &config,
        )
        .unwrap()
        .unwrap();

        assert_eq!(identity.user_request().name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_anonymous_request() {
        let config = create_test_config().auth.proxy_header;
        assert!(identity_from_headers(&HeaderMap::new(), &config).unwrap().is_none());
        assert!(identity_from_headers(&headers(&[("x-codebox-user", " ")]), &config).unwrap().is_none());
    }

    #[test]
    fn test_missing_email_is_bad_request() {
        let config = create_test_config().auth.proxy_header;
        let err = identity_from_headers(&headers(&[("x-codebox-user", "user_1")]), &config).unwrap_err();
        assert_eq!(err.user_message(), "Email not found");
    }

    #[test]
    fn test_disabled_proxy_auth_ignores_headers() {
        let mut config = create_test_config().auth.proxy_header;
        config.enabled = false;
        let result = identity_from_headers(
            &headers(&[("x-codebox-user", "user_1"), ("x-codebox-email", "ada@example.com")]),
            &config,
        )
        .unwrap();
        assert!(result.is_none());
    }
}
