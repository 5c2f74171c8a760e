use crate::error::{Result, VibeError};
use crate::http::{HttpRequest, HttpTransport};
use serde::Deserialize;
use urlencoding::encode;

const AUTHORIZE_URL: &str = "https://connect.deezer.com/oauth/auth.php";
const TOKEN_URL: &str = "https://connect.deezer.com/oauth/access_token.php";

/// Permissions needed to read the profile and manage playlists
pub const DEFAULT_PERMS: &str = "basic_access,email,offline_access,manage_library,delete_library";

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Lifetime in seconds; 0 for `offline_access` tokens
    #[serde(default)]
    pub expires: u64,
}

/// URL the user opens to grant access; Deezer redirects back with `?code=`
pub fn authorize_url(app_id: &str, redirect_uri: &str, perms: &str) -> String {
    format!(
        "{AUTHORIZE_URL}?app_id={}&redirect_uri={}&perms={}&response_type=code",
        encode(app_id),
        encode(redirect_uri),
        encode(perms)
    )
}

/// Code-for-token exchange of the Deezer authorization-code flow
pub struct DeezerAuth<T: HttpTransport> {
    transport: T,
    app_id: String,
    secret: String,
}

impl<T: HttpTransport> DeezerAuth<T> {
    pub fn new(transport: T, app_id: impl Into<String>, secret: impl Into<String>) -> Self {
        DeezerAuth {
            transport,
            app_id: app_id.into(),
            secret: secret.into(),
        }
    }

    pub fn exchange_code(&self, code: &str) -> Result<AccessToken> {
        let url = format!(
            "{TOKEN_URL}?app_id={}&secret={}&code={}&output=json",
            encode(&self.app_id),
            encode(&self.secret),
            encode(code)
        );
        let response = self.transport.send(&HttpRequest::get(url))?.error_for_status()?;

        // An invalid code comes back as 200 with a plain-text body such as "wrong code"
        serde_json::from_str::<AccessToken>(&response.body).map_err(|_| {
            VibeError::RemoteService {
                status: response.status,
                body: response.body.clone(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockHttpTransport};

    fn auth_with(transport: MockHttpTransport) -> DeezerAuth<MockHttpTransport> {
        DeezerAuth::new(transport, "123", "s3cret")
    }

    #[test]
    fn test_authorize_url() {
        assert_eq!(
            authorize_url(
                "123",
                "http://localhost:3000/api/auth/callback/deezer",
                "basic_access,email"
            ),
            "https://connect.deezer.com/oauth/auth.php?app_id=123&redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fapi%2Fauth%2Fcallback%2Fdeezer&perms=basic_access%2Cemail&response_type=code"
        );
    }

    #[test]
    fn test_exchange_code() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.url
                    == "https://connect.deezer.com/oauth/access_token.php?app_id=123&secret=s3cret&code=abc&output=json"
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse {
                    status: 200,
                    body: r#"{"access_token":"frJ9","expires":0}"#.to_string(),
                })
            });

        let token = auth_with(transport).exchange_code("abc").unwrap();
        assert_eq!(token.access_token, "frJ9");
        assert_eq!(token.expires, 0);
    }

    #[test]
    fn test_wrong_code_is_remote_service_error() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 200,
                body: "wrong code".to_string(),
            })
        });

        match auth_with(transport).exchange_code("stale") {
            Err(VibeError::RemoteService { body, .. }) => assert_eq!(body, "wrong code"),
            other => panic!("expected RemoteService, got {other:?}"),
        }
    }
}
