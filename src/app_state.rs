use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use crate::{advisor::Advisor, classify::Classifier, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub classifier: Arc<Classifier>,
    pub advisor: Arc<Advisor>,
    pub status: Arc<Mutex<Status>>,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Status {
    pub is_busy: bool,
    pub message: String,
    pub progress: f32, // Valor entre 0.0 y 1.0
}
