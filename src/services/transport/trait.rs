use crate::error::Result;
use crate::events::FocusSnapshot;
use crate::services::QueryService;

/// IPC-транспорт, через который сервис виден клиентам
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Опубликовать интерфейс запросов
    async fn publish(&self, service: QueryService) -> Result<()>;

    /// Отправить `WindowFocusChanged`. Без слушателей сигнал просто теряется
    async fn emit_focus_changed(&self, focus: &FocusSnapshot) -> Result<()>;

    /// Дождаться отправки уже начатых сигналов
    async fn flush(&self) -> Result<()>;

    /// Снять интерфейс с публикации
    async fn withdraw(&self) -> Result<()>;
}
