use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_CAROUSEL_INTERVAL: Duration = Duration::from_secs(4);

/// 自動輪播的引導頁面；使用者操作時停止計時
pub struct Carousel {
    page_count: usize,
    interval: Duration,
    current: Arc<AtomicUsize>,
    timer: Option<JoinHandle<()>>,
}

impl Carousel {
    pub fn new(page_count: usize, interval: Duration) -> Self {
        Self {
            page_count: page_count.max(1),
            // tokio 的 interval 不接受 0
            interval: interval.max(Duration::from_millis(1)),
            current: Arc::new(AtomicUsize::new(0)),
            timer: None,
        }
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn start(&mut self) {
        if self.timer.is_some() || self.page_count < 2 {
            return;
        }

        let current = Arc::clone(&self.current);
        let page_count = self.page_count;
        let period = self.interval;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // 第一次 tick 立即完成，略過
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let next = (current.load(Ordering::SeqCst) + 1) % page_count;
                current.store(next, Ordering::SeqCst);
                tracing::trace!("Carousel advanced to page {}", next);
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// 使用者手動切換頁面
    pub fn select(&mut self, index: usize) {
        self.stop();
        self.current.store(index % self.page_count, Ordering::SeqCst);
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.stop();
    }
}
