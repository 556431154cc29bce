use crate::domain::model::{Coordinate, PermissionStatus};
use crate::domain::ports::LocationSource;
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// 以設定檔中的座標代替裝置定位（桌面與 CLI 使用）
pub struct FixedLocationSource {
    coordinate: Coordinate,
    answer: PermissionStatus,
    status: Mutex<PermissionStatus>,
}

impl FixedLocationSource {
    pub fn new(coordinate: Coordinate, answer: PermissionStatus) -> Self {
        Self {
            coordinate,
            answer,
            status: Mutex::new(PermissionStatus::NotDetermined),
        }
    }
}

#[async_trait]
impl LocationSource for FixedLocationSource {
    fn authorization_status(&self) -> PermissionStatus {
        *self.status.lock().unwrap_or_else(|p| p.into_inner())
    }

    async fn request_authorization(&self) -> PermissionStatus {
        let mut status = self.status.lock().unwrap_or_else(|p| p.into_inner());
        *status = self.answer;
        *status
    }

    fn position_updates(&self) -> mpsc::Receiver<Coordinate> {
        let (tx, rx) = mpsc::channel(1);
        // 容量為 1，第一次送出不會失敗
        let _ = tx.try_send(self.coordinate);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::LocationProvider;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fixed_source_delivers_configured_fix() {
        let here = Coordinate::new(20.6597, -103.3496);
        let source = Arc::new(FixedLocationSource::new(
            here,
            PermissionStatus::AuthorizedWhenInUse,
        ));
        let mut provider = LocationProvider::new(source);
        let mut fixes = provider.subscribe();

        provider.request_authorization().await;
        fixes.wait_for(|fix| fix.is_some()).await.unwrap();
        assert_eq!(provider.last_known(), Some(here));
    }
}
