//! Session lifecycle: sign-in, sign-up, sign-out, and profile updates.

use serde::Serialize;
use tracing::{info, warn};

use grocer_shared::{Cart, ProfileUpdate, Session, UserProfile};

use crate::cart::ReplayReport;
use crate::error::{ClientError, Result};
use crate::events::{emit, StateEvent};
use crate::state::Storefront;

/// Result of a successful sign-in or sign-up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInOutcome {
    pub user: UserProfile,
    /// Outcome of replaying cart additions deferred while signed out.
    /// `None` when the queue was empty.
    pub replay: Option<ReplayReport>,
}

impl Storefront {
    /// Sign in with credentials.
    ///
    /// On success the session is persisted and becomes observable
    /// atomically, deferred guest-cart additions are replayed, and the
    /// cart is fetched.  A failure leaves any prior session untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<SignInOutcome> {
        let session = self.gateway.login(email, password).await?;
        info!(email = %session.user.email, "signed in");
        self.establish_session(session).await
    }

    /// Create an account and sign in with it.  The gateway is the sole
    /// validator; its rejection message is surfaced verbatim.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: &str,
        is_business: bool,
    ) -> Result<SignInOutcome> {
        let session = self
            .gateway
            .register(name, email, password, phone, is_business)
            .await?;
        info!(email = %session.user.email, "account created");
        self.establish_session(session).await
    }

    /// Sign out: clear the persisted session and reset the cart, all
    /// synchronously.  Never touches the network; safe to call when
    /// already signed out.
    pub fn logout(&self) -> Result<()> {
        {
            let mut guard = self.lock()?;
            guard.db.clear_session()?;
            guard.session = None;
            guard.cart = Cart::empty();
            guard.cart_busy = false;
            guard.last_cart_error = None;
        }
        info!("signed out");
        emit(&self.events, StateEvent::SessionChanged);
        emit(&self.events, StateEvent::CartChanged);
        Ok(())
    }

    /// Apply a partial profile update: the gateway first, then a shallow
    /// merge into the signed-in profile, re-persisted with the same token.
    /// Failure leaves both the in-memory and persisted profile unchanged.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile> {
        let (token, current) = {
            let guard = self.lock()?;
            let Some(session) = guard.session.as_ref() else {
                return Err(ClientError::NotAuthenticated);
            };
            (session.token.clone(), session.user.clone())
        };

        self.gateway.update_profile(&token, &update).await?;

        let merged = current.merged(&update);
        let session = Session {
            user: merged.clone(),
            token,
        };

        {
            let mut guard = self.lock()?;
            if guard.session.is_none() {
                // Signed out while the update was in flight.
                return Err(ClientError::NotAuthenticated);
            }
            guard.db.save_session(&session)?;
            guard.session = Some(session);
        }
        emit(&self.events, StateEvent::SessionChanged);
        info!("profile updated");
        Ok(merged)
    }

    /// Request a password-reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        Ok(self.gateway.forgot_password(email).await?)
    }

    /// Complete a password reset with the emailed token.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        Ok(self.gateway.reset_password(token, password).await?)
    }

    /// Persist and publish a fresh session, then bring the cart up to
    /// date: replay any deferred guest additions, clear their queue, and
    /// fetch the authoritative cart.  Cart sync problems are reported but
    /// do not undo the sign-in.
    async fn establish_session(&self, session: Session) -> Result<SignInOutcome> {
        let user = session.user.clone();

        {
            let mut guard = self.lock()?;
            guard.db.save_session(&session)?;
            guard.session = Some(session);
        }
        emit(&self.events, StateEvent::SessionChanged);

        let replay = match self.replay_pending_items().await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "pending cart replay failed");
                None
            }
        };

        if let Err(e) = self.fetch_cart().await {
            warn!(error = %e, "initial cart fetch failed");
        }

        Ok(SignInOutcome { user, replay })
    }
}
