//! Business logic services

pub mod catalog;
pub mod email;
pub mod loans;
pub mod members;
pub mod notifications;

use std::sync::Arc;

use crate::{config::LoansConfig, jobs::JobQueue, repository::Repository};

use email::Mailer;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub loans: loans::LoansService,
    pub notifications: notifications::NotificationsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        loans_config: LoansConfig,
        jobs: JobQueue,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            members: members::MembersService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), loans_config, jobs),
            notifications: notifications::NotificationsService::new(repository, mailer),
        }
    }
}
