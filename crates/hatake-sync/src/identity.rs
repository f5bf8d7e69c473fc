//! Identity collaborator seam.
//!
//! The identity service has already authenticated the user; the sync
//! engine trusts the seller id it supplies and stamps it onto every
//! listing. Client payloads never choose their own seller.

use hatake_core::{SellerId, SellerProfile};
use std::sync::Arc;

/// The authenticated seller on whose behalf mutations run.
#[derive(Debug, Clone)]
pub struct AuthenticatedSeller {
    pub id: SellerId,
    pub profile: SellerProfile,
}

impl AuthenticatedSeller {
    pub fn new(id: SellerId, profile: SellerProfile) -> Self {
        Self { id, profile }
    }
}

/// Supplier of the authenticated seller for the current operation.
pub trait IdentityProvider: Send + Sync {
    fn authenticated_seller(&self) -> AuthenticatedSeller;
}

/// Arc wrapper for IdentityProvider trait objects.
pub type DynIdentityProvider = Arc<dyn IdentityProvider>;

/// Identity provider with a fixed seller; for embedding contexts
/// where the caller resolved authentication ahead of time, and for
/// tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    seller: AuthenticatedSeller,
}

impl StaticIdentity {
    pub fn new(seller: AuthenticatedSeller) -> Self {
        Self { seller }
    }
}

impl IdentityProvider for StaticIdentity {
    fn authenticated_seller(&self) -> AuthenticatedSeller {
        self.seller.clone()
    }
}
