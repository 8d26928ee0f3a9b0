use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use tracing::error;

use crate::{
    appointments::repo::{AppointmentStore, PgAppointmentStore},
    auth::jwt::JwtKeys,
    config::AppConfig,
    db,
    notifications::{Notifier, SmsSender, TextbeltSender},
    users::repo::{PgUserStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub notifier: Notifier,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config.database_url).await?;

        let sms = Arc::new(TextbeltSender::new(&config.sms)?) as Arc<dyn SmsSender>;
        let users = Arc::new(PgUserStore::new(pool.clone())) as Arc<dyn UserStore>;
        let appointments = Arc::new(PgAppointmentStore::new(pool)) as Arc<dyn AppointmentStore>;

        Ok(Self::from_parts(config, users, appointments, sms))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        appointments: Arc<dyn AppointmentStore>,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        let jwt = JwtKeys::new(&config.jwt);
        if !jwt.is_configured() {
            error!("JWT_SECRET is not set; login and every protected route will be refused");
        }
        let notifier = Notifier::new(sms, Duration::from_secs(config.sms.timeout_secs));
        Self {
            config,
            jwt,
            users,
            appointments,
            notifier,
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
