//! Authentication and profile endpoints.

use serde::Serialize;
use tracing::debug;

use grocer_shared::{ProfileUpdate, Session, UserProfile};

use crate::client::{decode, unit, Gateway};
use crate::error::Result;

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    phone: &'a str,
    is_business: bool,
}

#[derive(Debug, Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetBody<'a> {
    token: &'a str,
    password: &'a str,
}

impl Gateway {
    /// Exchange credentials for a session.  The server is the sole
    /// validator; its rejection message is surfaced verbatim.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        debug!(email, "POST /auth/login");
        let resp = self
            .post("/auth/login")
            .json(&LoginBody { email, password })
            .send()
            .await?;
        decode(resp).await
    }

    /// Create an account.  Validation (duplicate email and the rest) is
    /// entirely the server's.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: &str,
        is_business: bool,
    ) -> Result<Session> {
        debug!(email, "POST /auth/register");
        let resp = self
            .post("/auth/register")
            .json(&RegisterBody {
                name,
                email,
                password,
                phone,
                is_business,
            })
            .send()
            .await?;
        decode(resp).await
    }

    /// Request a password-reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let resp = self
            .post("/auth/forgot-password")
            .json(&EmailBody { email })
            .send()
            .await?;
        unit(resp).await
    }

    /// Complete a password reset with the emailed token.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        let resp = self
            .post("/auth/reset-password")
            .json(&ResetBody { token, password })
            .send()
            .await?;
        unit(resp).await
    }

    /// The signed-in user's profile.
    pub async fn profile(&self, token: &str) -> Result<UserProfile> {
        let resp = self.get("/auth/profile").bearer_auth(token).send().await?;
        decode(resp).await
    }

    /// Apply a partial profile update.  Fields left `None` are not sent.
    pub async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<()> {
        let resp = self
            .put("/auth/profile")
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        unit(resp).await
    }
}
