use std::sync::Arc;

use crate::application::dto::pagination::Page;
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    document_repo: Arc<dyn DocumentRepository>,
    user_repo: Arc<dyn UserRepository>,
    // None when running on the in-memory store
    pool: Option<PgPool>,
}

impl AppServices {
    pub fn new(
        document_repo: Arc<dyn DocumentRepository>,
        user_repo: Arc<dyn UserRepository>,
        pool: Option<PgPool>,
    ) -> Self {
        Self {
            document_repo,
            user_repo,
            pool,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn document_repo(&self) -> Arc<dyn DocumentRepository> {
        self.services.document_repo.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.services.pool.as_ref()
    }

    pub fn page(&self, limit: Option<i64>, offset: Option<i64>) -> Page {
        Page::from_params(
            limit,
            offset,
            self.cfg.page_default_limit,
            self.cfg.page_max_limit,
        )
    }
}
