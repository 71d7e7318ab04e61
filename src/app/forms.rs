//! Input form state and validation for the login screen and create-link dialog.
//!
//! Each form owns its field buffers, the currently focused field, and a map of
//! validation errors keyed by field. Validation checks every field and records
//! every failure in one pass, so the UI can show all problems at once instead
//! of only the first. A successful validation returns the typed payload ready
//! to be sent to the API.

use std::collections::BTreeMap;

use url::Url;

/// Fields of the login form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginField {
    Email,
    Password,
}

/// Fields of the create-link dialog, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CreateField {
    Title,
    LongUrl,
    CustomUrl,
}

/// Validated login form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Validated create-link payload.
///
/// `custom_url` is `None` when the alias field was left blank; whether a
/// non-blank alias is actually available is decided by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub title: String,
    pub original_url: String,
    pub custom_url: Option<String>,
}

/// State of the sign-in form on the login screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub errors: BTreeMap<LoginField, String>,
}

impl Default for LoginField {
    fn default() -> Self {
        LoginField::Email
    }
}

impl Default for CreateField {
    fn default() -> Self {
        CreateField::Title
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves focus to the next field, wrapping from the last to the first.
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    /// Moves focus to the previous field, wrapping from the first to the last.
    pub fn focus_prev(&mut self) {
        // Two fields, so previous and next coincide.
        self.focus_next();
    }

    /// Appends a character to the focused field.
    pub fn input_char(&mut self, c: char) {
        match self.focus {
            LoginField::Email => self.email.push(c),
            LoginField::Password => self.password.push(c),
        }
    }

    /// Removes the last character from the focused field.
    pub fn backspace(&mut self) {
        match self.focus {
            LoginField::Email => {
                self.email.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
        }
    }

    /// Validates every field and records every failure.
    ///
    /// Returns the credentials when the form is valid, `None` otherwise.
    /// Earlier errors are cleared first so fixing a field removes its message.
    ///
    /// # Rules
    ///
    /// - Email: required, must look like an address (`local@domain.tld`)
    /// - Password: required, at least 6 characters
    pub fn validate(&mut self) -> Option<Credentials> {
        self.errors.clear();

        if self.email.trim().is_empty() {
            self.errors
                .insert(LoginField::Email, "Email is required".to_string());
        } else if !looks_like_email(self.email.trim()) {
            self.errors
                .insert(LoginField::Email, "Invalid email".to_string());
        }

        if self.password.is_empty() {
            self.errors
                .insert(LoginField::Password, "Password is required".to_string());
        } else if self.password.chars().count() < 6 {
            self.errors.insert(
                LoginField::Password,
                "Password must be at least 6 characters".to_string(),
            );
        }

        if self.errors.is_empty() {
            Some(Credentials {
                email: self.email.trim().to_string(),
                password: self.password.clone(),
            })
        } else {
            None
        }
    }

    /// Returns the validation error for a field, if any.
    pub fn error(&self, field: LoginField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Clears all fields, errors, and focus back to the initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// State of the create-link dialog on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateLinkForm {
    pub title: String,
    pub long_url: String,
    pub custom_url: String,
    pub focus: CreateField,
    pub errors: BTreeMap<CreateField, String>,
}

impl CreateLinkForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            CreateField::Title => CreateField::LongUrl,
            CreateField::LongUrl => CreateField::CustomUrl,
            CreateField::CustomUrl => CreateField::Title,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            CreateField::Title => CreateField::CustomUrl,
            CreateField::LongUrl => CreateField::Title,
            CreateField::CustomUrl => CreateField::LongUrl,
        };
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            CreateField::Title => self.title.push(c),
            CreateField::LongUrl => self.long_url.push(c),
            CreateField::CustomUrl => self.custom_url.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            CreateField::Title => {
                self.title.pop();
            }
            CreateField::LongUrl => {
                self.long_url.pop();
            }
            CreateField::CustomUrl => {
                self.custom_url.pop();
            }
        }
    }

    /// Validates every field and records every failure.
    ///
    /// Returns the new-link payload when the form is valid, `None` otherwise.
    ///
    /// # Rules
    ///
    /// - Title: required
    /// - Long URL: required, must parse as an absolute http(s) URL
    /// - Custom alias: optional and never validated locally; a blank field
    ///   becomes `None` so the backend generates the short code
    pub fn validate(&mut self) -> Option<NewLink> {
        self.errors.clear();

        if self.title.trim().is_empty() {
            self.errors
                .insert(CreateField::Title, "Title is required".to_string());
        }

        let long_url = self.long_url.trim();
        if long_url.is_empty() {
            self.errors
                .insert(CreateField::LongUrl, "Long URL is required".to_string());
        } else if !is_http_url(long_url) {
            self.errors
                .insert(CreateField::LongUrl, "Must be a valid URL".to_string());
        }

        if self.errors.is_empty() {
            let custom = self.custom_url.trim();
            Some(NewLink {
                title: self.title.trim().to_string(),
                original_url: long_url.to_string(),
                custom_url: if custom.is_empty() {
                    None
                } else {
                    Some(custom.to_string())
                },
            })
        } else {
            None
        }
    }

    /// Returns the validation error for a field, if any.
    pub fn error(&self, field: CreateField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Clears all fields, errors, and focus back to the initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Cheap structural check for an email address.
///
/// Accepts `local@domain` where the local part is non-empty and the domain
/// contains a dot with characters on both sides. The backend performs the
/// authoritative check at sign-in.
fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.split_once('.').is_some_and(|(host, tld)| {
                    !host.is_empty() && !tld.is_empty()
                })
        }
        None => false,
    }
}

/// Returns true when the value parses as an absolute http or https URL.
fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_empty_form_collects_both_errors() {
        let mut form = LoginForm::new();

        assert!(form.validate().is_none());
        assert_eq!(form.error(LoginField::Email), Some("Email is required"));
        assert_eq!(
            form.error(LoginField::Password),
            Some("Password is required")
        );
    }

    #[test]
    fn test_login_malformed_email() {
        let mut form = LoginForm::new();
        form.email = "not-an-address".to_string();
        form.password = "hunter22".to_string();

        assert!(form.validate().is_none());
        assert_eq!(form.error(LoginField::Email), Some("Invalid email"));
        assert_eq!(form.error(LoginField::Password), None);
    }

    #[test]
    fn test_login_email_without_tld_rejected() {
        let mut form = LoginForm::new();
        form.email = "user@localhost".to_string();
        form.password = "hunter22".to_string();

        assert!(form.validate().is_none());
        assert_eq!(form.error(LoginField::Email), Some("Invalid email"));
    }

    #[test]
    fn test_login_short_password() {
        let mut form = LoginForm::new();
        form.email = "user@example.com".to_string();
        form.password = "abc".to_string();

        assert!(form.validate().is_none());
        assert_eq!(
            form.error(LoginField::Password),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_login_valid_returns_credentials() {
        let mut form = LoginForm::new();
        form.email = "  user@example.com ".to_string();
        form.password = "hunter22".to_string();

        let creds = form.validate();
        assert_eq!(
            creds,
            Some(Credentials {
                email: "user@example.com".to_string(),
                password: "hunter22".to_string(),
            })
        );
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_login_revalidation_clears_fixed_errors() {
        let mut form = LoginForm::new();
        assert!(form.validate().is_none());

        form.email = "user@example.com".to_string();
        form.password = "hunter22".to_string();
        assert!(form.validate().is_some());
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_login_focus_cycles_and_routes_input() {
        let mut form = LoginForm::new();
        form.input_char('a');
        form.focus_next();
        form.input_char('b');
        form.focus_next();
        form.input_char('c');

        assert_eq!(form.email, "ac");
        assert_eq!(form.password, "b");

        form.backspace();
        assert_eq!(form.email, "a");
    }

    #[test]
    fn test_create_empty_form_collects_errors() {
        let mut form = CreateLinkForm::new();

        assert!(form.validate().is_none());
        assert_eq!(form.error(CreateField::Title), Some("Title is required"));
        assert_eq!(
            form.error(CreateField::LongUrl),
            Some("Long URL is required")
        );
        assert_eq!(form.error(CreateField::CustomUrl), None);
    }

    #[test]
    fn test_create_rejects_relative_url() {
        let mut form = CreateLinkForm::new();
        form.title = "Docs".to_string();
        form.long_url = "example.com/docs".to_string();

        assert!(form.validate().is_none());
        assert_eq!(
            form.error(CreateField::LongUrl),
            Some("Must be a valid URL")
        );
    }

    #[test]
    fn test_create_rejects_non_http_scheme() {
        let mut form = CreateLinkForm::new();
        form.title = "Docs".to_string();
        form.long_url = "ftp://example.com/docs".to_string();

        assert!(form.validate().is_none());
        assert_eq!(
            form.error(CreateField::LongUrl),
            Some("Must be a valid URL")
        );
    }

    #[test]
    fn test_create_blank_alias_becomes_none() {
        let mut form = CreateLinkForm::new();
        form.title = "Docs".to_string();
        form.long_url = "https://example.com/docs".to_string();
        form.custom_url = "   ".to_string();

        let link = form.validate();
        assert_eq!(
            link,
            Some(NewLink {
                title: "Docs".to_string(),
                original_url: "https://example.com/docs".to_string(),
                custom_url: None,
            })
        );
    }

    #[test]
    fn test_create_alias_passes_through_unvalidated() {
        let mut form = CreateLinkForm::new();
        form.title = "Docs".to_string();
        form.long_url = "https://example.com/docs".to_string();
        form.custom_url = "my docs!!".to_string();

        let link = form.validate();
        assert_eq!(
            link.and_then(|l| l.custom_url),
            Some("my docs!!".to_string())
        );
    }

    #[test]
    fn test_create_focus_wraps_both_directions() {
        let mut form = CreateLinkForm::new();
        assert_eq!(form.focus, CreateField::Title);

        form.focus_prev();
        assert_eq!(form.focus, CreateField::CustomUrl);

        form.focus_next();
        assert_eq!(form.focus, CreateField::Title);
        form.focus_next();
        assert_eq!(form.focus, CreateField::LongUrl);
    }

    #[test]
    fn test_create_reset_clears_everything() {
        let mut form = CreateLinkForm::new();
        form.title = "Docs".to_string();
        form.focus = CreateField::CustomUrl;
        assert!(form.validate().is_none());

        form.reset();
        assert_eq!(form, CreateLinkForm::default());
    }
}
