//! Submit flow shared by every mutation.
//!
//! ```text
//! form -> client schema -> payload -> API call
//!      -> ok:  invalidate cached reads, success notification (server message)
//!      -> err: error notification (server message or generic fallback)
//! ```

use std::future::Future;

use thiserror::Error;
use tracing::debug;

use crate::cache::Resource;
use crate::context::PortalContext;
use crate::error::ClientError;
use crate::forms::{FormError, MerchandiseForm, MerchandiseRevisionForm, PortalForm, ProfileForm};
use crate::models::{Acknowledged, MerchandiseItem, Mutation, MutationAck, UserProfile};
use crate::notify::Notification;
use crate::payload::MutationPayload;

/// Reads touched by merchandise mutations.
const MERCH_READS: &[Resource] = &[Resource::Merch];
/// Reads touched by profile mutations; listings show profile fields too.
const PROFILE_READS: &[Resource] = &[
    Resource::CurrentUser,
    Resource::Users,
    Resource::PublicUsers,
];

/// Why a mutation flow did not complete.
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    /// The client schema rejected the form; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] FormError),
    /// The request failed.
    #[error(transparent)]
    Request(#[from] ClientError),
}

/// Mutation flows bound to a [`PortalContext`].
#[derive(Clone, Copy)]
pub struct MutationFlow<'a> {
    ctx: &'a PortalContext,
}

impl<'a> MutationFlow<'a> {
    pub(crate) const fn new(ctx: &'a PortalContext) -> Self {
        Self { ctx }
    }

    /// Create a merchandise item.
    ///
    /// # Errors
    /// Returns [`FlowError`] after raising an error notification.
    pub async fn create_merchandise(
        &self,
        form: MerchandiseForm,
    ) -> Result<Mutation<MerchandiseItem>, FlowError> {
        let payload = self.prepare(form)?;
        let api = self.ctx.merchandise();
        self.settle(MERCH_READS, api.create(&payload)).await
    }

    /// Patch a merchandise item.
    ///
    /// # Errors
    /// Returns [`FlowError`] after raising an error notification.
    pub async fn update_merchandise(
        &self,
        id: &str,
        form: MerchandiseRevisionForm,
    ) -> Result<Mutation<MerchandiseItem>, FlowError> {
        let payload = self.prepare(form)?;
        let api = self.ctx.merchandise();
        self.settle(MERCH_READS, api.update_by_id(id, &payload)).await
    }

    /// Delete a merchandise item.
    ///
    /// # Errors
    /// Returns [`FlowError`] after raising an error notification.
    pub async fn delete_merchandise(&self, id: &str) -> Result<MutationAck, FlowError> {
        let api = self.ctx.merchandise();
        self.settle(MERCH_READS, api.delete_by_id(id)).await
    }

    /// Patch the signed-in account's profile.
    ///
    /// # Errors
    /// Returns [`FlowError`] after raising an error notification.
    pub async fn update_current_user(
        &self,
        form: ProfileForm,
    ) -> Result<Mutation<UserProfile>, FlowError> {
        let payload = self.prepare(form)?;
        let api = self.ctx.users();
        self.settle(PROFILE_READS, api.update_current_user(&payload))
            .await
    }

    /// Patch any profile (officers only).
    ///
    /// # Errors
    /// Returns [`FlowError`] after raising an error notification.
    pub async fn update_user(
        &self,
        id: &str,
        form: ProfileForm,
    ) -> Result<Mutation<UserProfile>, FlowError> {
        let payload = self.prepare(form)?;
        let api = self.ctx.users();
        self.settle(PROFILE_READS, api.update_by_id(id, &payload))
            .await
    }

    /// Delete a profile (officers only).
    ///
    /// # Errors
    /// Returns [`FlowError`] after raising an error notification.
    pub async fn delete_user(&self, id: &str) -> Result<MutationAck, FlowError> {
        let api = self.ctx.users();
        self.settle(PROFILE_READS, api.delete_by_id(id)).await
    }

    fn prepare<F: PortalForm>(&self, form: F) -> Result<MutationPayload, FlowError> {
        if let Err(err) = form.validate() {
            debug!(field = err.field, "form rejected by client schema");
            self.ctx.notifier().notify(Notification::error(err.message.clone()));
            return Err(err.into());
        }
        Ok(form.into_payload())
    }

    async fn settle<T, Fut>(&self, reads: &[Resource], request: Fut) -> Result<T, FlowError>
    where
        T: Acknowledged,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        match request.await {
            Ok(response) => {
                for resource in reads {
                    self.ctx.cache().invalidate(*resource);
                }
                self.ctx
                    .notifier()
                    .notify(Notification::success(response.message()));
                Ok(response)
            }
            Err(err) => {
                self.ctx
                    .notifier()
                    .notify(Notification::error(err.user_message()));
                Err(err.into())
            }
        }
    }
}
