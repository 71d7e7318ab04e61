//! Request preparation and dispatch against the shortener backend.

use std::collections::BTreeMap;

use zellij_tile::prelude::HttpVerb;
use zellij_tile::shim::web_request;

use crate::api::requests::{
    ApiCall, CreateLinkBody, LoginBody, CONTEXT_GENERATION, CONTEXT_LINK_ID, CONTEXT_OP,
};
use crate::domain::Session;

/// A fully built HTTP request, ready to hand to the host.
///
/// Everything the host's non-blocking request call needs, computed without
/// performing any I/O. The `context` map is returned untouched with the
/// eventual result and carries the correlation data described in
/// [`requests`](crate::api::requests).
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub verb: HttpVerb,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub context: BTreeMap<String, String>,
}

/// Builds and dispatches backend requests.
///
/// Holds nothing but the backend base URL; auth travels per-call as an
/// injected [`Session`] reference so the client itself has no hidden state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given base URL. A trailing slash is ignored.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds the request for `call`, stamped with `generation`.
    ///
    /// Pure: no I/O, no host interaction. Bodied requests get a JSON
    /// `Content-Type`; when a session is supplied its token is attached as a
    /// bearer header.
    #[must_use]
    pub fn prepare(
        &self,
        call: &ApiCall,
        session: Option<&Session>,
        generation: u64,
    ) -> PreparedRequest {
        let mut headers = BTreeMap::new();
        if let Some(session) = session {
            headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", session.access_token),
            );
        }

        let mut context = BTreeMap::new();
        context.insert(CONTEXT_OP.to_string(), call.op().as_str().to_string());
        context.insert(CONTEXT_GENERATION.to_string(), generation.to_string());

        let (verb, url, body) = match call {
            ApiCall::Login { email, password } => (
                HttpVerb::Post,
                format!("{}/auth/login", self.base_url),
                encode_body(&LoginBody { email, password }),
            ),
            ApiCall::Logout => (
                HttpVerb::Post,
                format!("{}/auth/logout", self.base_url),
                Vec::new(),
            ),
            ApiCall::FetchLinks { user_id } => (
                HttpVerb::Get,
                format!("{}/links?user_id={user_id}", self.base_url),
                Vec::new(),
            ),
            ApiCall::FetchClicks { link_ids } => (
                HttpVerb::Get,
                format!("{}/clicks?link_ids={}", self.base_url, link_ids.join(",")),
                Vec::new(),
            ),
            ApiCall::CreateLink {
                title,
                original_url,
                custom_url,
                user_id,
            } => (
                HttpVerb::Post,
                format!("{}/links", self.base_url),
                encode_body(&CreateLinkBody {
                    title,
                    original_url,
                    custom_url: custom_url.as_deref(),
                    user_id,
                }),
            ),
            ApiCall::DeleteLink { id } => {
                context.insert(CONTEXT_LINK_ID.to_string(), id.clone());
                (
                    HttpVerb::Delete,
                    format!("{}/links/{id}", self.base_url),
                    Vec::new(),
                )
            }
            ApiCall::DownloadQr { link_id, url } => {
                context.insert(CONTEXT_LINK_ID.to_string(), link_id.clone());
                (HttpVerb::Get, url.clone(), Vec::new())
            }
        };

        if !body.is_empty() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        PreparedRequest {
            verb,
            url,
            headers,
            body,
            context,
        }
    }

    /// Prepares `call` and hands it to the host's non-blocking request shim.
    ///
    /// The result arrives later as a web request result event carrying the
    /// context map; nothing is returned here.
    pub fn dispatch(&self, call: &ApiCall, session: Option<&Session>, generation: u64) {
        let request = self.prepare(call, session, generation);
        tracing::debug!(
            op = call.op().as_str(),
            generation = generation,
            url = %request.url,
            "dispatching backend request"
        );
        web_request(
            request.url,
            request.verb,
            request.headers,
            request.body,
            request.context,
        );
    }
}

/// Encodes a JSON request body, degrading to an empty body on failure.
///
/// Serialization of these borrowed string structs cannot realistically fail,
/// but the render loop must never panic over a request body.
fn encode_body<T: serde::Serialize>(body: &T) -> Vec<u8> {
    serde_json::to_vec(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "failed to encode request body");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;

    fn session() -> Session {
        Session {
            access_token: "tok-123".to_string(),
            user: User {
                id: "u1".to_string(),
                email: "user@example.com".to_string(),
            },
            expires_at: None,
        }
    }

    fn client() -> ApiClient {
        ApiClient::new("https://api.tinyurlx.in/")
    }

    #[test]
    fn login_posts_credentials_without_auth_header() {
        let call = ApiCall::Login {
            email: "user@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        let request = client().prepare(&call, None, 1);

        assert!(matches!(request.verb, HttpVerb::Post));
        assert_eq!(request.url, "https://api.tinyurlx.in/auth/login");
        assert!(!request.headers.contains_key("Authorization"));
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );

        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["email"], "user@example.com");
        assert_eq!(body["password"], "hunter22");
    }

    #[test]
    fn authenticated_calls_carry_bearer_token() {
        let call = ApiCall::FetchLinks {
            user_id: "u1".to_string(),
        };
        let request = client().prepare(&call, Some(&session()), 3);

        assert!(matches!(request.verb, HttpVerb::Get));
        assert_eq!(request.url, "https://api.tinyurlx.in/links?user_id=u1");
        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Bearer tok-123")
        );
        assert!(request.body.is_empty());
        assert!(!request.headers.contains_key("Content-Type"));
    }

    #[test]
    fn context_carries_op_and_generation() {
        let call = ApiCall::FetchClicks {
            link_ids: vec!["a".to_string(), "b".to_string()],
        };
        let request = client().prepare(&call, Some(&session()), 42);

        assert_eq!(request.url, "https://api.tinyurlx.in/clicks?link_ids=a,b");
        assert_eq!(
            request.context.get(CONTEXT_OP).map(String::as_str),
            Some("fetch_clicks")
        );
        assert_eq!(
            request.context.get(CONTEXT_GENERATION).map(String::as_str),
            Some("42")
        );
    }

    #[test]
    fn delete_targets_the_row_and_echoes_its_id() {
        let call = ApiCall::DeleteLink {
            id: "l9".to_string(),
        };
        let request = client().prepare(&call, Some(&session()), 7);

        assert!(matches!(request.verb, HttpVerb::Delete));
        assert_eq!(request.url, "https://api.tinyurlx.in/links/l9");
        assert_eq!(
            request.context.get(CONTEXT_LINK_ID).map(String::as_str),
            Some("l9")
        );
    }

    #[test]
    fn create_body_includes_alias_only_when_set() {
        let call = ApiCall::CreateLink {
            title: "Docs".to_string(),
            original_url: "https://example.com/docs".to_string(),
            custom_url: None,
            user_id: "u1".to_string(),
        };
        let request = client().prepare(&call, Some(&session()), 2);
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert!(body.get("custom_url").is_none());
        assert_eq!(body["title"], "Docs");
        assert_eq!(body["user_id"], "u1");
    }

    #[test]
    fn qr_download_uses_the_absolute_image_url() {
        let call = ApiCall::DownloadQr {
            link_id: "l1".to_string(),
            url: "https://cdn.tinyurlx.in/qr/docs.png".to_string(),
        };
        let request = client().prepare(&call, Some(&session()), 5);

        assert_eq!(request.url, "https://cdn.tinyurlx.in/qr/docs.png");
        assert_eq!(
            request.context.get(CONTEXT_LINK_ID).map(String::as_str),
            Some("l1")
        );
    }
}
