//! Тестовые двойники для транспорта.

use crate::error::{MonitorError, Result};
use crate::events::FocusSnapshot;
use crate::services::transport::Transport;
use crate::services::QueryService;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Транспорт, который запоминает публикации и отправленные сигналы
#[derive(Default)]
pub struct RecordingTransport {
    published: Mutex<Option<QueryService>>,
    emitted: Mutex<Vec<FocusSnapshot>>,
    emitted_notify: Notify,
    fail_emissions: AtomicBool,
    publishes: AtomicUsize,
    flushes: AtomicUsize,
    withdrawals: AtomicUsize,
}

impl RecordingTransport {
    pub fn is_published(&self) -> bool {
        self.published.lock().is_some()
    }

    pub fn emitted(&self) -> Vec<FocusSnapshot> {
        self.emitted.lock().clone()
    }

    pub fn fail_emissions(&self, fail: bool) {
        self.fail_emissions.store(fail, Ordering::SeqCst);
    }

    pub fn publish_count(&self) -> usize {
        self.publishes.load(Ordering::SeqCst)
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn withdraw_count(&self) -> usize {
        self.withdrawals.load(Ordering::SeqCst)
    }

    /// Ждёт, пока будет отправлено не меньше `count` сигналов
    pub async fn wait_for_emissions(&self, count: usize) {
        let wait = async {
            loop {
                let notified = self.emitted_notify.notified();
                if self.emitted.lock().len() >= count {
                    return;
                }
                notified.await;
            }
        };

        if tokio::time::timeout(Duration::from_secs(5), wait).await.is_err() {
            panic!(
                "ожидалось {} сигналов, получено {}",
                count,
                self.emitted.lock().len()
            );
        }
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn publish(&self, service: QueryService) -> Result<()> {
        self.publishes.fetch_add(1, Ordering::SeqCst);
        *self.published.lock() = Some(service);
        Ok(())
    }

    async fn emit_focus_changed(&self, focus: &FocusSnapshot) -> Result<()> {
        if self.fail_emissions.load(Ordering::SeqCst) {
            return Err(MonitorError::ServiceUnavailable("нет слушателей".to_string()));
        }
        self.emitted.lock().push(focus.clone());
        self.emitted_notify.notify_one();
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn withdraw(&self) -> Result<()> {
        self.withdrawals.fetch_add(1, Ordering::SeqCst);
        self.published.lock().take();
        Ok(())
    }
}
