/**
 * Authentication Handler Types
 *
 * Request and response types shared by the signup, login and logout
 * handlers.
 */

use serde::{Deserialize, Serialize};

use crate::auth::users::UserAccount;

/// Sign up request.
#[derive(Deserialize, Serialize, Debug)]
pub struct SignupRequest {
    /// Desired username (minimum 5 characters)
    pub username: String,
    /// Password (minimum 5 characters; hashed before storage)
    pub password: String,
    /// Email address, used for event confirmation emails
    pub email: String,
}

/// Login request.
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User response, without sensitive data.
///
/// The password hash never appears in any response.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<UserAccount> for UserResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username,
            email: account.email,
        }
    }
}
