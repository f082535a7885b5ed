use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Yandex.Direct account login (`Client-Login` header in v5, `Logins` in v4).
///
/// Invariant: non-empty after trimming.
pub struct Login(String);

impl Login {
    /// Field name used in error messages and the v5 header.
    pub const FIELD: &'static str = "login";

    /// Create a validated [`Login`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated login.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// OAuth token for the Yandex.Direct API.
///
/// Invariant: non-empty after trimming. `Debug` output never shows the value.
pub struct Token(String);

impl Token {
    /// Field name used by the legacy v4 body (`token`).
    pub const FIELD: &'static str = "token";

    /// Create a validated [`Token`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Login/token pair used by every client.
pub struct Credentials {
    login: Login,
    token: Token,
}

impl Credentials {
    /// Validate both parts and pair them.
    pub fn new(
        login: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            login: Login::new(login)?,
            token: Token::new(token)?,
        })
    }

    /// Borrow the login.
    pub fn login(&self) -> &Login {
        &self.login
    }

    pub fn token(&self) -> &Token {
        &self.token
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Search phrase submitted to Wordstat, kept exactly as provided.
///
/// Any text is accepted, including an empty string; the server decides what it
/// makes of it.
pub struct Phrase(String);

impl Phrase {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the phrase as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Numeric region identifier recognised by Yandex (e.g. `213` for Moscow).
pub struct GeoId(i64);

impl GeoId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GeoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Opaque Wordstat report id assigned by the server.
pub struct ReportId(i64);

impl ReportId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
