use crate::events::FocusChanged;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

/// Токен активной подписки на уведомления о смене фокуса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Живая подписка: токен для отписки и очередь уведомлений.
///
/// Очередь закрывается, когда подписку снимают через `disconnect`.
#[derive(Debug)]
pub struct FocusSubscription {
    pub id: SubscriptionId,
    pub notifications: mpsc::UnboundedReceiver<FocusChanged>,
}

/// Реестр подписчиков на "focus changed", общий для всех источников окон
pub struct FocusSignal {
    next_id: AtomicU64,
    subscribers: DashMap<SubscriptionId, mpsc::UnboundedSender<FocusChanged>>,
}

impl Default for FocusSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusSignal {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: DashMap::new(),
        }
    }

    pub fn connect(&self) -> FocusSubscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, tx);
        debug!("Подписка {} на смену фокуса создана", id);

        FocusSubscription {
            id,
            notifications: rx,
        }
    }

    /// Возвращает `false`, если такой подписки уже нет
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            debug!("Подписка {} на смену фокуса снята", id);
        }
        removed
    }

    /// Разослать уведомление всем подписчикам. Возвращает число получателей
    pub fn emit(&self) -> usize {
        let mut delivered = 0;
        // Подписчики с закрытой очередью удаляются сразу
        self.subscribers.retain(|_, tx| {
            let alive = tx.send(FocusChanged).is_ok();
            if alive {
                delivered += 1;
            }
            alive
        });
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
