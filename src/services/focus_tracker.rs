use crate::error::{MonitorError, Result};
use crate::events::FocusChanged;
use crate::services::focus_resolver::resolve_focus;
use crate::services::transport::Transport;
use crate::services::window_manager::{SubscriptionId, WindowManager};
use crate::services::{QueryService, SnapshotReader};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Состояние трекера. Подписка существует только в `Enabled`
enum TrackerState {
    Disabled,
    Enabled {
        subscription: SubscriptionId,
        worker: JoinHandle<()>,
    },
}

/// Следит за сменой фокуса и отправляет `WindowFocusChanged`.
///
/// Каждое уведомление оконного менеджера даёт ровно один цикл
/// снимок -> разрешение -> сигнал. Уведомления обрабатываются по одному,
/// в порядке доставки, без склейки.
pub struct FocusTracker {
    window_manager: Arc<dyn WindowManager>,
    transport: Arc<dyn Transport>,
    state: TrackerState,
}

impl FocusTracker {
    pub fn new(window_manager: Arc<dyn WindowManager>, transport: Arc<dyn Transport>) -> Self {
        Self {
            window_manager,
            transport,
            state: TrackerState::Disabled,
        }
    }

    #[allow(dead_code)]
    pub fn is_enabled(&self) -> bool {
        matches!(self.state, TrackerState::Enabled { .. })
    }

    #[allow(dead_code)]
    pub fn subscription(&self) -> Option<SubscriptionId> {
        match &self.state {
            TrackerState::Enabled { subscription, .. } => Some(*subscription),
            TrackerState::Disabled => None,
        }
    }

    /// Публикует интерфейс и подписывается на смену фокуса.
    ///
    /// Повторный вызов без `disable` отклоняется и ничего не меняет.
    pub async fn enable(&mut self) -> Result<()> {
        if let TrackerState::Enabled { subscription, .. } = &self.state {
            warn!("Трекер фокуса уже включён (подписка {})", subscription);
            return Err(MonitorError::AlreadyEnabled);
        }

        let reader = SnapshotReader::new(self.window_manager.clone());
        self.transport
            .publish(QueryService::new(reader.clone()))
            .await?;

        let subscription = match self.window_manager.connect_focus_changed() {
            Ok(subscription) => subscription,
            Err(e) => {
                if let Err(withdraw_err) = self.transport.withdraw().await {
                    warn!("Не удалось снять интерфейс после ошибки подписки: {}", withdraw_err);
                }
                return Err(e);
            }
        };

        let worker = tokio::spawn(forward_focus_changes(
            reader,
            self.transport.clone(),
            subscription.notifications,
        ));

        info!("Трекер фокуса включён (подписка {})", subscription.id);
        self.state = TrackerState::Enabled {
            subscription: subscription.id,
            worker,
        };
        Ok(())
    }

    /// Отписывается и снимает интерфейс. В состоянии `Disabled` ничего не делает
    pub async fn disable(&mut self) {
        let TrackerState::Enabled {
            subscription,
            worker,
        } = std::mem::replace(&mut self.state, TrackerState::Disabled)
        else {
            debug!("Трекер фокуса уже выключен");
            return;
        };

        // Отписка закрывает очередь: worker дорабатывает доставленное и завершается
        self.window_manager.disconnect(subscription);
        if let Err(e) = worker.await {
            warn!("Обработчик смены фокуса завершился аварийно: {}", e);
        }

        if let Err(e) = self.transport.flush().await {
            warn!("Не удалось дождаться отправки сигналов: {}", e);
        }
        if let Err(e) = self.transport.withdraw().await {
            warn!("Не удалось снять интерфейс: {}", e);
        }

        info!("Трекер фокуса выключен (подписка {} снята)", subscription);
    }
}

async fn forward_focus_changes(
    reader: SnapshotReader,
    transport: Arc<dyn Transport>,
    mut notifications: mpsc::UnboundedReceiver<FocusChanged>,
) {
    while notifications.recv().await.is_some() {
        let focus = resolve_focus(&reader.list_windows()).snapshot();
        if focus.is_desktop() {
            debug!("Смена фокуса: пустой рабочий стол");
        } else {
            debug!("Смена фокуса: {}", focus);
        }

        // Доставка без гарантий: ошибка не повторяется и не копится
        if let Err(e) = transport.emit_focus_changed(&focus).await {
            warn!("Сигнал WindowFocusChanged не доставлен: {}", e);
        }
    }

    debug!("Очередь уведомлений о фокусе закрыта");
}
