//! Rooms domain: synchronous "player entered room" broadcast.

use crate::layout::{RoomId, RoomInstance};

/// Something that wants to hear about room changes.
///
/// Listeners are called synchronously, in subscription order, on the thread
/// that handles the overlap. `Send + Sync` is only required because the
/// broadcast lives inside a Bevy resource.
pub trait RoomChangeListener: Send + Sync {
    fn on_room_changed(&mut self, room_id: RoomId, room: &RoomInstance);
}

struct FnListener<F>(F);

impl<F> RoomChangeListener for FnListener<F>
where
    F: FnMut(RoomId, &RoomInstance) + Send + Sync,
{
    fn on_room_changed(&mut self, room_id: RoomId, room: &RoomInstance) {
        (self.0)(room_id, room);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Observer list owned by the session. Nothing is queued: a listener that
/// subscribes after a notification never sees it.
#[derive(Default)]
pub struct RoomChangeBroadcast {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<dyn RoomChangeListener>)>,
}

impl std::fmt::Debug for RoomChangeBroadcast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomChangeBroadcast")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl RoomChangeBroadcast {
    pub fn subscribe(&mut self, listener: impl RoomChangeListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn subscribe_fn<F>(&mut self, f: F) -> ListenerId
    where
        F: FnMut(RoomId, &RoomInstance) + Send + Sync + 'static,
    {
        self.subscribe(FnListener(f))
    }

    /// Remove a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver to every listener in subscription order. Returns the number
    /// of deliveries.
    pub fn notify(&mut self, room_id: RoomId, room: &RoomInstance) -> usize {
        for (_, listener) in &mut self.listeners {
            listener.on_room_changed(room_id, room);
        }
        self.listeners.len()
    }
}
