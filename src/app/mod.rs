use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::AppConfig,
    database::DbManager,
    model::{PgSubscriberStore, SubscriberStore},
    templ_manager::{ConfirmationEmail, TemplateManager},
    EmailClient, Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState<PgSubscriberStore>,
    pub listener: TcpListener,
    pub allowed_origins: Vec<String>,
}

impl App {
    /// Connects every collaborator and binds the listener. Nothing is served yet.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let email_addr = config.email_config.valid_sender()?;

        let dm = DbManager::init(&config.db_config).await?;
        let confirmation_email = TemplateManager::init()?.confirmation_email()?;
        let email_client = EmailClient::new(
            &config.email_config.url,
            email_addr,
            config.email_config.valid_sender_name()?,
            config.email_config.auth_token.clone(),
            config.email_config.timeout(),
        )?;

        let app_state = AppState::new(
            PgSubscriberStore::new(dm.into_pool()),
            email_client,
            confirmation_email,
        );

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        Ok(App {
            app_state,
            listener,
            allowed_origins: config.net_config.allowed_origins,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

pub struct InternalState<S> {
    pub store: S,
    pub email_client: EmailClient,
    pub confirmation_email: ConfirmationEmail,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Deref)]
pub struct AppState<S>(Arc<InternalState<S>>);

// Derived `Clone` would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState(Arc::clone(&self.0))
    }
}

impl<S: SubscriberStore> AppState<S> {
    pub fn new(
        store: S,
        email_client: EmailClient,
        confirmation_email: ConfirmationEmail,
    ) -> Self {
        AppState(Arc::new(InternalState {
            store,
            email_client,
            confirmation_email,
        }))
    }
}
