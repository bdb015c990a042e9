use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Notifications for whoever draws the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    /// A new request became current
    Opened { id: Uuid },
    /// A request was replaced by a newer `open` before being closed
    Superseded { id: Uuid },
    /// The current request was closed and its receipt resolved
    Closed { id: Uuid },
}

/// The single outstanding presentation.
struct ModalRequest<C, D, R> {
    id: Uuid,
    component: C,
    data: Option<D>,
    resolver: oneshot::Sender<Option<R>>,
}

/// Deferred result of [`ModalService::open`].
///
/// Resolves with the value passed to `close`, or `None` when the modal was
/// closed without a result, superseded by another `open`, or the service was
/// dropped.
#[derive(Debug)]
pub struct ModalReceipt<R> {
    id: Uuid,
    receiver: oneshot::Receiver<Option<R>>,
}

impl<R> ModalReceipt<R> {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl<R> Future for ModalReceipt<R> {
    type Output = Option<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.ok().flatten())
    }
}

/// Asynchronous dialog broker holding at most one modal request.
///
/// `C` is the presentable unit, `D` its payload and `R` the result handed
/// back by `close`. Share it with `Arc`; the renderer reads
/// [`component`](Self::component) and [`data`](Self::data) and eventually
/// calls [`close`](Self::close).
pub struct ModalService<C, D, R> {
    current: RwLock<Option<ModalRequest<C, D, R>>>,
    event_sender: RwLock<Option<mpsc::UnboundedSender<ModalEvent>>>,
}

impl<C, D, R> Default for ModalService<C, D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D, R> ModalService<C, D, R> {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            event_sender: RwLock::new(None),
        }
    }

    /// Subscribe to modal events. Replaces any previous subscriber.
    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<ModalEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *self.event_sender.write().await = Some(sender);
        receiver
    }

    async fn emit(&self, event: ModalEvent) {
        if let Some(ref sender) = *self.event_sender.read().await {
            let _ = sender.send(event);
        }
    }

    /// Present `component` with `data` and hand back its pending result.
    ///
    /// A request that is still open gets replaced: its receipt settles with
    /// `None` and `close` will resolve this one instead.
    pub async fn open(&self, component: C, data: Option<D>) -> ModalReceipt<R> {
        let (resolver, receiver) = oneshot::channel();
        let id = Uuid::new_v4();

        let previous = self.current.write().await.replace(ModalRequest {
            id,
            component,
            data,
            resolver,
        });

        if let Some(previous) = previous {
            warn!("Modal {} superseded by {} before being closed", previous.id, id);
            drop(previous.resolver);
            self.emit(ModalEvent::Superseded { id: previous.id }).await;
        }

        info!("Opened modal {}", id);
        self.emit(ModalEvent::Opened { id }).await;

        ModalReceipt { id, receiver }
    }

    /// Resolve the current request with `result` and clear it.
    ///
    /// Closing when nothing is open does nothing.
    pub async fn close(&self, result: Option<R>) {
        let request = self.current.write().await.take();
        match request {
            Some(request) => self.resolve(request, result).await,
            None => debug!("Close requested with no open modal"),
        }
    }

    /// Like [`close`](Self::close), but only if `id` is still the current
    /// request. Returns whether anything was resolved.
    pub async fn close_request(&self, id: Uuid, result: Option<R>) -> bool {
        let request = {
            let mut current = self.current.write().await;
            match current.as_ref() {
                Some(request) if request.id == id => current.take(),
                _ => None,
            }
        };

        match request {
            Some(request) => {
                self.resolve(request, result).await;
                true
            }
            None => {
                debug!("Ignoring close for stale modal {}", id);
                false
            }
        }
    }

    async fn resolve(&self, request: ModalRequest<C, D, R>, result: Option<R>) {
        let ModalRequest { id, resolver, .. } = request;
        if resolver.send(result).is_err() {
            debug!("Receipt for modal {} was dropped before close", id);
        }
        info!("Closed modal {}", id);
        self.emit(ModalEvent::Closed { id }).await;
    }

    pub async fn current_request(&self) -> Option<Uuid> {
        self.current.read().await.as_ref().map(|request| request.id)
    }

    pub async fn is_open(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Drop request `id` without resolving it, for callers that can't await.
    ///
    /// Gives up and returns `false` when the request is no longer current or
    /// the broker is busy.
    pub fn discard(&self, id: Uuid) -> bool {
        let Ok(mut current) = self.current.try_write() else {
            warn!("Modal {} left open, broker is busy", id);
            return false;
        };
        if !matches!(current.as_ref(), Some(request) if request.id == id) {
            return false;
        }
        current.take();
        drop(current);

        info!("Discarded modal {}", id);
        if let Ok(sender) = self.event_sender.try_read()
            && let Some(ref sender) = *sender
        {
            let _ = sender.send(ModalEvent::Closed { id });
        }
        true
    }
}

impl<C: Clone, D, R> ModalService<C, D, R> {
    /// The unit currently presented, if any.
    pub async fn component(&self) -> Option<C> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|request| request.component.clone())
    }
}

impl<C, D: Clone, R> ModalService<C, D, R> {
    /// The payload of the current request, if any.
    pub async fn data(&self) -> Option<D> {
        self.current
            .read()
            .await
            .as_ref()
            .and_then(|request| request.data.clone())
    }
}
