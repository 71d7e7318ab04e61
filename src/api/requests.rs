//! Backend call descriptions and request preparation.
//!
//! Every operation the dashboard performs against the shortener backend is a
//! variant of [`ApiCall`]. Calls are turned into a [`PreparedRequest`] (verb,
//! URL, headers, body, correlation context) by [`ApiClient`](crate::api::ApiClient)
//! purely, with no I/O, so request construction is unit-testable without a host.
//!
//! The context map attached to each request is echoed back verbatim by the
//! host alongside the HTTP result. It carries the operation tag and the
//! request generation, which is how a result event finds its way back to the
//! lifecycle wrapper that issued it, and how superseded requests are told
//! apart from current ones.

use serde::Serialize;

/// Context key holding the operation tag.
pub const CONTEXT_OP: &str = "op";

/// Context key holding the request generation as a decimal string.
pub const CONTEXT_GENERATION: &str = "generation";

/// Context key echoing the link id for per-row operations.
pub const CONTEXT_LINK_ID: &str = "link_id";

/// One backend operation, with its payload.
///
/// Variants map one-to-one onto the lifecycle wrappers held in application
/// state. The session is deliberately not part of the call: it is injected at
/// preparation time so the same call value can be built before or after auth
/// state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// Exchange credentials for a session.
    Login { email: String, password: String },

    /// Invalidate the current session server-side.
    Logout,

    /// Fetch all links belonging to a user, newest first.
    FetchLinks { user_id: String },

    /// Fetch the click records for a set of links.
    FetchClicks { link_ids: Vec<String> },

    /// Create a new short link.
    CreateLink {
        title: String,
        original_url: String,
        custom_url: Option<String>,
        user_id: String,
    },

    /// Delete a link by id.
    DeleteLink { id: String },

    /// Download the backend-generated QR image for a link.
    ///
    /// `url` is the absolute image URL from the link row; it is fetched as-is
    /// rather than joined onto the API base.
    DownloadQr { link_id: String, url: String },
}

impl ApiCall {
    /// The operation tag for this call.
    #[must_use]
    pub fn op(&self) -> ApiOp {
        match self {
            Self::Login { .. } => ApiOp::Login,
            Self::Logout => ApiOp::Logout,
            Self::FetchLinks { .. } => ApiOp::FetchLinks,
            Self::FetchClicks { .. } => ApiOp::FetchClicks,
            Self::CreateLink { .. } => ApiOp::CreateLink,
            Self::DeleteLink { .. } => ApiOp::DeleteLink,
            Self::DownloadQr { .. } => ApiOp::DownloadQr,
        }
    }
}

/// Operation tags carried in the request context.
///
/// The string forms are part of the correlation protocol between
/// [`prepare`](crate::api::ApiClient::prepare) and
/// [`decode`](crate::api::decode); changing them orphans in-flight requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOp {
    Login,
    Logout,
    FetchLinks,
    FetchClicks,
    CreateLink,
    DeleteLink,
    DownloadQr,
}

impl ApiOp {
    /// The wire tag for the context map.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::FetchLinks => "fetch_links",
            Self::FetchClicks => "fetch_clicks",
            Self::CreateLink => "create_link",
            Self::DeleteLink => "delete_link",
            Self::DownloadQr => "download_qr",
        }
    }

    /// Parses a wire tag back into an operation, `None` for foreign tags.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            "fetch_links" => Some(Self::FetchLinks),
            "fetch_clicks" => Some(Self::FetchClicks),
            "create_link" => Some(Self::CreateLink),
            "delete_link" => Some(Self::DeleteLink),
            "download_qr" => Some(Self::DownloadQr),
            _ => None,
        }
    }
}

/// JSON body of a login request.
#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// JSON body of a link creation request.
#[derive(Serialize)]
pub(crate) struct CreateLinkBody<'a> {
    pub title: &'a str,
    pub original_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<&'a str>,
    pub user_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_tags_round_trip() {
        let ops = [
            ApiOp::Login,
            ApiOp::Logout,
            ApiOp::FetchLinks,
            ApiOp::FetchClicks,
            ApiOp::CreateLink,
            ApiOp::DeleteLink,
            ApiOp::DownloadQr,
        ];
        for op in ops {
            assert_eq!(ApiOp::parse(op.as_str()), Some(op));
        }
        assert_eq!(ApiOp::parse("rename_tab"), None);
    }

    #[test]
    fn create_body_omits_absent_alias() {
        let body = CreateLinkBody {
            title: "Docs",
            original_url: "https://example.com",
            custom_url: None,
            user_id: "u1",
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("custom_url"));

        let body = CreateLinkBody {
            custom_url: Some("docs"),
            ..body
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""custom_url":"docs""#));
    }
}
