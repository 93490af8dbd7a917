use crate::error::{MonitorError, Result};
use crate::monitor_error;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{AtomEnum, ChangeWindowAttributesAux, ConnectionExt, EventMask, Window},
        Event,
    },
    rust_connection::RustConnection,
};

use super::r#trait::{WindowHandle, WindowManager};
use super::signal::{FocusSignal, FocusSubscription, SubscriptionId};

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        _NET_CLIENT_LIST,
        _NET_ACTIVE_WINDOW,
        _NET_WM_NAME,
        _NET_WM_PID,
        _NET_WM_STATE,
        _NET_WM_STATE_MAXIMIZED_VERT,
        _NET_WM_STATE_MAXIMIZED_HORZ,
        UTF8_STRING,
    }
}

/// Оконный менеджер X11 с поддержкой EWMH
pub struct X11WindowManager {
    conn: Arc<RustConnection>,
    root: Window,
    atoms: Atoms,
    signal: Arc<FocusSignal>,
}

impl X11WindowManager {
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)?;
        let conn = Arc::new(conn);

        let root = match conn.setup().roots.get(screen_num) {
            Some(screen) => screen.root,
            None => return MonitorError::service_unavailable(format!("экран X11 {} не найден", screen_num)),
        };

        let atoms = Atoms::new(conn.as_ref())?.reply()?;

        // Изменения _NET_ACTIVE_WINDOW приходят как PropertyNotify на корневом окне
        conn.change_window_attributes(
            root,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::PROPERTY_CHANGE),
        )?
        .check()?;
        conn.flush()?;

        let signal = Arc::new(FocusSignal::new());
        let initial = read_active_window(&conn, root, &atoms)?;

        let watcher_conn = conn.clone();
        let watcher_signal = signal.clone();
        std::thread::Builder::new()
            .name("x11-focus-watch".to_string())
            .spawn(move || watch_active_window(&watcher_conn, root, atoms, &watcher_signal, initial))?;

        info!("Подключено к X11, корневое окно 0x{:x}", root);

        Ok(Self {
            conn,
            root,
            atoms,
            signal,
        })
    }
}

impl WindowManager for X11WindowManager {
    fn windows(&self) -> Result<Vec<Box<dyn WindowHandle>>> {
        let clients = read_u32s(
            &self.conn,
            self.root,
            self.atoms._NET_CLIENT_LIST,
            AtomEnum::WINDOW.into(),
        )?;

        Ok(clients
            .into_iter()
            .map(|window| {
                Box::new(X11Window {
                    conn: self.conn.clone(),
                    root: self.root,
                    atoms: self.atoms,
                    window,
                }) as Box<dyn WindowHandle>
            })
            .collect())
    }

    fn connect_focus_changed(&self) -> Result<FocusSubscription> {
        Ok(self.signal.connect())
    }

    fn disconnect(&self, id: SubscriptionId) {
        self.signal.disconnect(id);
    }
}

/// Поток чтения событий X11. Работает, пока соединение живо
fn watch_active_window(
    conn: &RustConnection,
    root: Window,
    atoms: Atoms,
    signal: &FocusSignal,
    initial: Option<Window>,
) {
    let mut last_active = initial;

    loop {
        let event = match conn.wait_for_event() {
            Ok(event) => event,
            Err(e) => {
                error!("Соединение с X11 потеряно: {}", e);
                return;
            }
        };

        let Event::PropertyNotify(notify) = event else {
            continue;
        };
        if notify.window != root || notify.atom != atoms._NET_ACTIVE_WINDOW {
            continue;
        }

        let active = match read_active_window(conn, root, &atoms) {
            Ok(active) => active,
            Err(e) => {
                warn!("Не удалось прочитать _NET_ACTIVE_WINDOW: {}", e);
                continue;
            }
        };

        // Свойство могут перезаписать тем же значением
        if active == last_active {
            continue;
        }
        last_active = active;

        let delivered = signal.emit();
        debug!(
            "X11: активное окно {:?}, уведомлено подписчиков: {}",
            active, delivered
        );
    }
}

struct X11Window {
    conn: Arc<RustConnection>,
    root: Window,
    atoms: Atoms,
    window: Window,
}

impl X11Window {
    fn read_or_default<T: Default>(&self, what: &str, value: Result<T>) -> T {
        value.unwrap_or_else(|e| {
            debug!("Окно 0x{:x}: не удалось прочитать {}: {}", self.window, what, e);
            T::default()
        })
    }
}

impl WindowHandle for X11Window {
    fn id(&self) -> u64 {
        u64::from(self.window)
    }

    fn title(&self) -> String {
        let title = read_string(&self.conn, self.window, self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING)
            .and_then(|title| match title {
                Some(title) => Ok(Some(title)),
                None => read_string(
                    &self.conn,
                    self.window,
                    AtomEnum::WM_NAME.into(),
                    AtomEnum::STRING.into(),
                ),
            });
        self.read_or_default("заголовок", title).unwrap_or_default()
    }

    fn wm_class(&self) -> String {
        let class = read_string(
            &self.conn,
            self.window,
            AtomEnum::WM_CLASS.into(),
            AtomEnum::STRING.into(),
        )
        .map(|raw| raw.map(|raw| class_from_wm_class(&raw)));
        self.read_or_default("WM_CLASS", class).unwrap_or_default()
    }

    fn pid(&self) -> Option<u32> {
        let pid = read_u32s(
            &self.conn,
            self.window,
            self.atoms._NET_WM_PID,
            AtomEnum::CARDINAL.into(),
        )
        .map(|values| values.first().copied());
        self.read_or_default("_NET_WM_PID", pid)
    }

    fn is_maximized(&self) -> bool {
        let state = read_u32s(
            &self.conn,
            self.window,
            self.atoms._NET_WM_STATE,
            AtomEnum::ATOM.into(),
        )
        .map(|states| {
            states.contains(&self.atoms._NET_WM_STATE_MAXIMIZED_VERT)
                && states.contains(&self.atoms._NET_WM_STATE_MAXIMIZED_HORZ)
        });
        self.read_or_default("_NET_WM_STATE", state)
    }

    fn has_focus(&self) -> bool {
        let active = read_active_window(&self.conn, self.root, &self.atoms);
        self.read_or_default("_NET_ACTIVE_WINDOW", active) == Some(self.window)
    }
}

/// WM_CLASS хранит "instance\0class\0"; клиентам нужен class
fn class_from_wm_class(raw: &str) -> String {
    let mut parts = raw.split('\0').filter(|part| !part.is_empty());
    let instance = parts.next();
    parts.next().or(instance).unwrap_or_default().to_string()
}

fn read_active_window(conn: &RustConnection, root: Window, atoms: &Atoms) -> Result<Option<Window>> {
    let values = read_u32s(conn, root, atoms._NET_ACTIVE_WINDOW, AtomEnum::WINDOW.into())?;
    // Окно 0 означает, что фокуса нет
    Ok(values.first().copied().filter(|&window| window != 0))
}

fn read_u32s(conn: &RustConnection, window: Window, property: u32, kind: u32) -> Result<Vec<u32>> {
    let reply = conn
        .get_property(false, window, property, kind, 0, u32::MAX)?
        .reply()?;

    let values = decode_u32s(reply.format, &reply.value).ok_or_else(|| {
        monitor_error!(
            internal,
            "свойство {} окна 0x{:x} имеет формат {}, ожидался 32",
            property,
            window,
            reply.format
        )
    })?;
    Ok(values)
}

/// Пустое свойство допустимо при любом формате
fn decode_u32s(format: u8, value: &[u8]) -> Option<Vec<u32>> {
    if value.is_empty() {
        return Some(Vec::new());
    }
    if format != 32 {
        return None;
    }
    Some(
        value
            .chunks_exact(4)
            .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}

fn read_string(conn: &RustConnection, window: Window, property: u32, kind: u32) -> Result<Option<String>> {
    let reply = conn
        .get_property(false, window, property, kind, 0, u32::MAX)?
        .reply()?;

    if reply.value.is_empty() {
        return Ok(None);
    }
    Ok(Some(decode_string(kind == u32::from(AtomEnum::STRING), &reply.value)))
}

/// Тип STRING по ICCCM хранится в ISO-8859-1, остальные строки в UTF-8
fn decode_string(latin1: bool, value: &[u8]) -> String {
    if latin1 {
        value.iter().map(|&b| char::from(b)).collect()
    } else {
        String::from_utf8_lossy(value).into_owned()
    }
}
