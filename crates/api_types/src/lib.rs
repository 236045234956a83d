use serde::{Deserialize, Serialize};

/// A monetary amount as it appears on the wire.
///
/// Clients send balances either as a decimal string (`"42.50"`) or as a
/// plain JSON number (`42.5`); the server validates and normalizes both.
/// Responses always carry the string form with two fraction digits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BalanceInput {
    Number(f64),
    Text(String),
}

pub mod user {
    use super::*;

    /// Request body for `POST /api/auth/register`.
    ///
    /// `confirmPassword` is optional on the wire; when present it must match
    /// `password`. `balance` defaults to zero when omitted.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterUser {
        pub username: String,
        pub password: String,
        pub confirm_password: Option<String>,
        pub balance: Option<BalanceInput>,
    }

    /// Request body for `POST /api/auth/login` and admin login.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginUser {
        pub username: String,
        pub password: String,
    }

    /// Request body for `PUT /api/admin/users/{id}`.
    ///
    /// All three fields are replaced wholesale.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UpdateUser {
        pub username: String,
        pub password: String,
        pub balance: BalanceInput,
    }

    /// Full user record as returned by `/api/auth/me` and the admin routes.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub username: String,
        pub password: String,
        pub balance: String,
    }

    /// Response body for a successful registration.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Registered {
        pub id: String,
        pub username: String,
    }

    /// Response body for a successful login.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoggedIn {
        pub id: String,
        pub username: String,
        pub balance: String,
    }
}

pub mod session {
    use super::*;

    /// Generic acknowledgement (`admin-login`, `logout`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Acknowledged {
        pub success: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::user::RegisterUser;
    use super::*;

    #[test]
    fn balance_input_accepts_string_and_number() {
        let text: BalanceInput = serde_json::from_str("\"42.50\"").unwrap();
        assert_eq!(text, BalanceInput::Text("42.50".to_string()));

        let number: BalanceInput = serde_json::from_str("42.5").unwrap();
        assert_eq!(number, BalanceInput::Number(42.5));
    }

    #[test]
    fn register_uses_camel_case_confirmation_field() {
        let body = r#"{"username":"alice","password":"pw","confirmPassword":"pw"}"#;
        let req: RegisterUser = serde_json::from_str(body).unwrap();
        assert_eq!(req.confirm_password.as_deref(), Some("pw"));
        assert!(req.balance.is_none());
    }
}
