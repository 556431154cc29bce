use crate::domain::model::{Coordinate, PermissionStatus};
use crate::domain::ports::LocationSource;
use crate::utils::error::{AppError, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// 包裝裝置定位：權限狀態、持續更新與最後已知位置
pub struct LocationProvider {
    source: Arc<dyn LocationSource>,
    status: PermissionStatus,
    latest_tx: watch::Sender<Option<Coordinate>>,
    latest_rx: watch::Receiver<Option<Coordinate>>,
    updates: Option<JoinHandle<()>>,
}

impl LocationProvider {
    pub fn new(source: Arc<dyn LocationSource>) -> Self {
        let status = source.authorization_status();
        let (latest_tx, latest_rx) = watch::channel(None);
        Self {
            source,
            status,
            latest_tx,
            latest_rx,
            updates: None,
        }
    }

    pub fn status(&self) -> PermissionStatus {
        self.status
    }

    /// 要求權限；一旦轉為已授權就自動開始更新
    pub async fn request_authorization(&mut self) -> PermissionStatus {
        let previous = self.status;
        self.status = self.source.request_authorization().await;
        tracing::info!(
            "Location permission changed: {:?} -> {:?}",
            previous,
            self.status
        );

        if self.status.is_authorized() && !self.is_updating() {
            if let Err(e) = self.start_updates() {
                tracing::warn!("Could not start location updates: {}", e);
            }
        }
        self.status
    }

    pub fn start_updates(&mut self) -> Result<()> {
        if !self.status.is_authorized() {
            return Err(AppError::LocationUnauthorized);
        }
        if self.is_updating() {
            return Ok(());
        }

        let mut positions = self.source.position_updates();
        let latest = self.latest_tx.clone();
        self.updates = Some(tokio::spawn(async move {
            while let Some(position) = positions.recv().await {
                tracing::trace!("Location update: {}", position);
                if latest.send(Some(position)).is_err() {
                    break;
                }
            }
            tracing::debug!("Location stream ended");
        }));
        Ok(())
    }

    pub fn is_updating(&self) -> bool {
        self.updates.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 可能為 `None`（尚未收到第一次定位）
    pub fn last_known(&self) -> Option<Coordinate> {
        *self.latest_rx.borrow()
    }

    /// 用於等待第一次定位
    pub fn subscribe(&self) -> watch::Receiver<Option<Coordinate>> {
        self.latest_rx.clone()
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.updates.take() {
            handle.abort();
        }
    }
}

impl Drop for LocationProvider {
    fn drop(&mut self) {
        self.stop();
    }
}
