use crate::engine::RiskThresholds;
use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub thresholds: RiskThresholds,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, thresholds: RiskThresholds) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            thresholds,
        }
    }
}
