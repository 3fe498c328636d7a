use std::sync::Arc;

use adminkit::TracedClient;
use anyhow::Context;
use arc_swap::ArcSwapOption;
use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::rest::handlers::NoticeSettings;
use crate::api::rest::routes;
use crate::config::UsersAdminConfig;
use crate::contract::client::UsersAdminApi;
use crate::domain::ports::Mailer;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::UsersAdminLocalClient;
use crate::i18n;
use crate::infra::crypto::Argon2Hasher;
use crate::infra::mail::{HttpMailer, LogMailer};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{SeaOrmRolesRepository, SeaOrmUsersRepository};

/// The users back-office module: owns the wired domain service and exposes
/// it over REST and as an in-process client.
#[derive(Default)]
pub struct UsersAdmin {
    service: ArcSwapOption<Service>,
    notices: ArcSwapOption<NoticeSettings>,
}

impl Clone for UsersAdmin {
    fn clone(&self) -> Self {
        Self {
            service: ArcSwapOption::new(self.service.load_full()),
            notices: ArcSwapOption::new(self.notices.load_full()),
        }
    }
}

impl UsersAdmin {
    pub const NAME: &'static str = "users_admin";

    /// Wire repositories, mailer and hasher into the domain service.
    pub fn init(&self, db: DatabaseConnection, cfg: UsersAdminConfig) -> anyhow::Result<()> {
        info!("Initializing users_admin module");
        cfg.validate()?;
        debug!(
            "Loaded users_admin config: items_per_page={}, locale={}, mail_gateway={}",
            cfg.items_per_page,
            cfg.locale,
            cfg.mail.base_url.is_some()
        );

        let mailer: Arc<dyn Mailer> = match cfg.mail.base_url.as_deref() {
            Some(base) => {
                let base = Url::parse(base)
                    .with_context(|| format!("invalid users_admin.mail.base_url '{base}'"))?;
                info!(%base, "Password mails go through the HTTP mail gateway");
                Arc::new(HttpMailer::new(TracedClient::default(), base))
            }
            None => {
                warn!("No mail gateway configured; password mails are only logged");
                Arc::new(LogMailer)
            }
        };

        if !i18n::is_supported(&cfg.locale) {
            warn!(
                locale = %cfg.locale,
                fallback = i18n::FALLBACK_LOCALE,
                "Unsupported notice locale, falling back"
            );
        }

        let service = Service::new(
            Arc::new(SeaOrmUsersRepository::new(db.clone())),
            Arc::new(SeaOrmRolesRepository::new(db)),
            mailer,
            Arc::new(Argon2Hasher::new()),
            ServiceConfig::from(&cfg),
        );

        let notices = NoticeSettings {
            default_locale: cfg.locale,
        };
        self.install(Arc::new(service), notices);
        Ok(())
    }

    /// Install an already wired service.
    pub fn install(&self, service: Arc<Service>, notices: NoticeSettings) {
        self.service.store(Some(service));
        self.notices.store(Some(Arc::new(notices)));
    }

    pub async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running users_admin database migrations");
        Migrator::up(db, None)
            .await
            .context("users_admin migrations failed")?;
        info!("users_admin database migrations completed successfully");
        Ok(())
    }

    pub fn register_rest(&self, router: Router) -> anyhow::Result<Router> {
        info!("Registering users_admin REST routes");
        let service = self.service()?;
        let notices = self
            .notices
            .load_full()
            .map(|n| n.as_ref().clone())
            .unwrap_or_default();

        Ok(routes::register_routes(router, service, notices))
    }

    /// In-process client for other modules.
    pub fn client(&self) -> anyhow::Result<Arc<dyn UsersAdminApi>> {
        Ok(Arc::new(UsersAdminLocalClient::new(self.service()?)))
    }

    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("users_admin service not initialized"))
    }
}
