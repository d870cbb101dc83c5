// src/app.rs
use tracing::info;

use crate::config::{AppConfig, ConfigError};
use crate::db::Database;
use crate::mailer::{LogMailer, Mailer, ResendMailer};
use crate::requisitions::RequisitionService;

/// Everything a request handler needs, built once in `main` and shared by
/// all workers.
pub struct App {
    pub db: Database,
    pub config: AppConfig,
    pub requisitions: RequisitionService,
    pub mailer: Box<dyn Mailer>,
}

impl App {
    pub fn new(config: AppConfig, mailer: Box<dyn Mailer>) -> Result<Self, ConfigError> {
        let requisitions = RequisitionService::new(config.requisition_config()?);
        Ok(Self {
            db: Database::new(config.database_path.clone()),
            config,
            requisitions,
            mailer,
        })
    }

    /// Resend when an API key is configured, otherwise mail is only logged.
    pub fn mailer_from_config(config: &AppConfig) -> Box<dyn Mailer> {
        match &config.mail.api_key {
            Some(key) => {
                info!(sender = %config.mail.sender, "mail delivery via Resend");
                Box::new(ResendMailer::new(key.clone(), config.mail.sender.clone()))
            }
            None => {
                info!("no mail API key configured, approval mails are logged only");
                Box::new(LogMailer)
            }
        }
    }
}
