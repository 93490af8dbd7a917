use crate::config::DbusConfig;
use crate::error::Result;
use crate::events::FocusSnapshot;
use crate::services::QueryService;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use zbus::object_server::SignalEmitter;
use zbus::zvariant::ObjectPath;
use zbus::{interface, Connection};

use super::r#trait::Transport;

/// Объект на шине: методы запросов и сигнал смены фокуса
pub struct WindowMonitorInterface {
    service: QueryService,
}

impl WindowMonitorInterface {
    pub fn new(service: QueryService) -> Self {
        Self { service }
    }
}

#[interface(name = "org.gnome.Shell.Extensions.WindowMonitorPro")]
impl WindowMonitorInterface {
    #[zbus(name = "List")]
    fn list(&self) -> String {
        self.service.list()
    }

    #[zbus(name = "FocusTitle")]
    fn focus_title(&self) -> String {
        self.service.focus_title()
    }

    #[zbus(name = "FocusPID")]
    fn focus_pid(&self) -> String {
        self.service.focus_pid()
    }

    #[zbus(name = "FocusID")]
    fn focus_id(&self) -> String {
        self.service.focus_id()
    }

    #[zbus(name = "FocusClass")]
    fn focus_class(&self) -> String {
        self.service.focus_class()
    }

    #[zbus(signal, name = "WindowFocusChanged")]
    async fn window_focus_changed(
        emitter: &SignalEmitter<'_>,
        window_id: &str,
        window_title: &str,
        window_class: &str,
        window_pid: &str,
    ) -> zbus::Result<()>;
}

/// Транспорт поверх сессионной шины D-Bus
pub struct DbusTransport {
    connection: Connection,
    object_path: ObjectPath<'static>,
    // Сигналы уходят по одному; flush ждёт текущую отправку
    emit_lock: Mutex<()>,
}

impl DbusTransport {
    pub async fn connect(config: &DbusConfig) -> Result<Self> {
        info!("Подключение к сессионной шине D-Bus");

        let object_path = ObjectPath::try_from(config.object_path.clone()).map_err(zbus::Error::from)?;
        let connection = Connection::session().await?;
        connection.request_name(config.bus_name.as_str()).await?;

        info!("Имя {} получено на шине", config.bus_name);

        Ok(Self {
            connection,
            object_path,
            emit_lock: Mutex::new(()),
        })
    }
}

#[async_trait::async_trait]
impl Transport for DbusTransport {
    async fn publish(&self, service: QueryService) -> Result<()> {
        let added = self
            .connection
            .object_server()
            .at(self.object_path.clone(), WindowMonitorInterface::new(service))
            .await?;

        if added {
            info!("Интерфейс опубликован по пути {}", self.object_path);
        } else {
            warn!("Интерфейс по пути {} уже опубликован", self.object_path);
        }
        Ok(())
    }

    async fn emit_focus_changed(&self, focus: &FocusSnapshot) -> Result<()> {
        let _guard = self.emit_lock.lock().await;

        let iface = self
            .connection
            .object_server()
            .interface::<_, WindowMonitorInterface>(self.object_path.clone())
            .await?;

        WindowMonitorInterface::window_focus_changed(
            iface.signal_emitter(),
            &focus.id,
            &focus.title,
            &focus.class,
            &focus.pid,
        )
        .await?;

        debug!("WindowFocusChanged отправлен: {}", focus);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let _guard = self.emit_lock.lock().await;
        debug!("Очередь сигналов D-Bus пуста");
        Ok(())
    }

    async fn withdraw(&self) -> Result<()> {
        let removed = self
            .connection
            .object_server()
            .remove::<WindowMonitorInterface, _>(self.object_path.clone())
            .await?;

        if removed {
            info!("Интерфейс снят с пути {}", self.object_path);
        }
        Ok(())
    }
}
