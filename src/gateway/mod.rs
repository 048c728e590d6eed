//! REST access to the backend.
//!
//! [`Gateway`] owns the HTTP client and the session it authenticates with.
//! Each collection is reached through a typed [`Resource`], whose generic
//! CRUD calls are extended per entity with that collection's own endpoints.

mod assets;
mod auth;
mod categories;
mod client;
mod envelope;
mod historique;
mod interventions;
mod notifications;
mod reclamations;
mod resource;
mod services;
mod techniciens;
mod users;

pub use assets::AssetFilter;
pub use auth::{AuthApi, AuthResponse, RegisterRequest};
pub use categories::CategoryFilter;
pub use client::{Gateway, Query};
pub use envelope::{ApiEnvelope, PageRequest, PageResponse, ResponseShape};
pub use historique::{HISTORY_PAGE_SIZE, HistoriqueFilter};
pub use interventions::{
    BulkInterventionUpdate, ExportFormat, InterventionFilter, InterventionOwner,
};
pub use reclamations::{ReclamationFilter, check_satisfaction};
pub use resource::{Resource, RestResource, WALK_PAGE_SIZE};

use crate::models::{
    Asset, Category, HistoriqueEntry, Intervention, Notification, Reclamation, ServiceDirection,
    Technicien, User,
};

impl Gateway {
    pub fn resource<E: RestResource>(&self) -> Resource<'_, E> {
        Resource::new(self)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn assets(&self) -> Resource<'_, Asset> {
        self.resource()
    }

    pub fn categories(&self) -> Resource<'_, Category> {
        self.resource()
    }

    pub fn services(&self) -> Resource<'_, ServiceDirection> {
        self.resource()
    }

    pub fn interventions(&self) -> Resource<'_, Intervention> {
        self.resource()
    }

    pub fn reclamations(&self) -> Resource<'_, Reclamation> {
        self.resource()
    }

    pub fn technicians(&self) -> Resource<'_, Technicien> {
        self.resource()
    }

    pub fn users(&self) -> Resource<'_, User> {
        self.resource()
    }

    pub fn notifications(&self) -> Resource<'_, Notification> {
        self.resource()
    }

    pub fn history(&self) -> Resource<'_, HistoriqueEntry> {
        self.resource()
    }
}
