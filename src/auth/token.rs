//! Defines the session token stored in the auth cookie and how to serialize/deserialize it.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::api::AuthToken;

mod datetime_format {
    //! Specifies how to serialize a [time::OffsetDateTime] in a custom format that
    //! avoids serialisations with datetimes containing midnight.
    //!
    //! The default serializer for [time::OffsetDateTime] will serialize
    //! "00:00:00.000000" as "0:00:00.0" and the deserializer would error out
    //! because it expects the hours to be two digits, not one.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// Date time format for the cookie expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
    const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The logged in user as shown in the navigation bar and settings page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionUser {
    /// The user's display name.
    pub name: String,
    /// The e-mail address the user logged in with.
    pub email: String,
}

/// The session data kept in the encrypted auth cookie.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Token {
    /// The bearer token issued by the API.
    pub api_token: String,

    #[serde(flatten)]
    pub user: SessionUser,

    #[serde(
        serialize_with = "datetime_format::serialize",
        deserialize_with = "datetime_format::deserialize"
    )]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// The bearer token for calls to the API.
    pub fn auth_token(&self) -> AuthToken {
        AuthToken::new(self.api_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use time::{UtcOffset, macros::datetime};

    use crate::auth::token::{SessionUser, Token};

    fn test_token(hour: u8) -> Token {
        let expires_at = match hour {
            0 => datetime!(2025-12-21 00:00:00),
            _ => datetime!(2025-12-21 03:54:00),
        }
        .assume_offset(UtcOffset::UTC);

        Token {
            api_token: "abc".to_owned(),
            user: SessionUser {
                name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
            },
            expires_at,
        }
    }

    #[test]
    fn serialise_token() {
        let token = test_token(3);
        let expected = r#"{"api_token":"abc","name":"Ada","email":"ada@example.com","expires_at":"2025-12-21 03:54:00.0 +00:00:00"}"#;

        let actual = serde_json::to_string(&token).unwrap();

        assert_eq!(expected, actual);
    }

    #[test]
    fn deserialise_token() {
        let expected = test_token(3);
        let token_string = r#"{"api_token":"abc","name":"Ada","email":"ada@example.com","expires_at":"2025-12-21 03:54:00.0 +00:00:00"}"#;

        let actual: Token = serde_json::from_str(token_string).unwrap();

        assert_eq!(expected, actual);
    }

    #[test]
    fn deserialise_token_with_midnight_expiry() {
        let expected = test_token(0);
        let token_string = r#"{"api_token":"abc","name":"Ada","email":"ada@example.com","expires_at":"2025-12-21 00:00:00.0 +00:00:00"}"#;

        let actual: Token = serde_json::from_str(token_string).unwrap();

        assert_eq!(expected, actual);
    }

    #[test]
    fn auth_token_wraps_api_token() {
        assert_eq!(test_token(3).auth_token().as_str(), "abc");
    }
}
