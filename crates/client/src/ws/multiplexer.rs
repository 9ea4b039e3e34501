//! Named-event publish/subscribe over a single channel.
//!
//! Inbound text messages are decoded as `[event, payload]` frames and handed
//! to every handler registered for `event`, in registration order. Outbound
//! frames go to the channel sink (`send`) or to addressed peers (`send_to`).

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use huddle_shared::{Frame, FrameError, WsError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::FrameSink;

/// Token returned by [`EventMux::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A shareable event handler. Two handlers are the same if they are clones
/// of one another.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Value)>);

impl Handler {
    pub fn new(f: impl Fn(&Value) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Handler that deserializes the payload first. Payloads that don't fit
    /// `T` are logged and skipped.
    pub fn typed<T: DeserializeOwned + 'static>(f: impl Fn(T) + 'static) -> Self {
        Self::new(move |payload| match T::deserialize(payload) {
            Ok(value) => f(value),
            Err(e) => crate::log_warn!("ignoring payload that does not match handler: {}", e),
        })
    }

    pub fn call(&self, payload: &Value) {
        (self.0)(payload)
    }

    pub fn same_as(&self, other: &Handler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&Rc::as_ptr(&self.0)).finish()
    }
}

#[derive(Debug)]
struct Entry {
    id: SubscriptionId,
    event: String,
    handler: Handler,
}

pub struct EventMux<S> {
    sink: S,
    entries: RefCell<Vec<Entry>>,
    peers: RefCell<BTreeMap<String, S>>,
    next_id: Cell<u64>,
}

impl<S: FrameSink> EventMux<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            entries: RefCell::new(Vec::new()),
            peers: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Register a closure for `event`.
    pub fn on(&self, event: &str, f: impl Fn(&Value) + 'static) -> SubscriptionId {
        self.on_handler(event, &Handler::new(f))
    }

    /// Register a closure taking a typed payload.
    pub fn on_typed<T: DeserializeOwned + 'static>(&self, event: &str, f: impl Fn(T) + 'static) -> SubscriptionId {
        self.on_handler(event, &Handler::typed(f))
    }

    /// Register a shared handler for `event`. If this exact handler is
    /// already registered for `event`, nothing is added and the existing id
    /// is returned.
    pub fn on_handler(&self, event: &str, handler: &Handler) -> SubscriptionId {
        let mut entries = self.entries.borrow_mut();
        if let Some(existing) = entries
            .iter()
            .find(|e| e.event == event && e.handler.same_as(handler))
        {
            return existing.id;
        }

        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        entries.push(Entry {
            id,
            event: event.to_string(),
            handler: handler.clone(),
        });
        id
    }

    /// Remove a subscription. Unknown ids are ignored.
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.off_many([id]) == 1
    }

    /// Remove every subscription in `ids`. Returns how many were removed.
    pub fn off_many(&self, ids: impl IntoIterator<Item = SubscriptionId>) -> usize {
        let ids: Vec<SubscriptionId> = ids.into_iter().collect();
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| !ids.contains(&e.id));
        before - entries.len()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Number of handlers registered for `event`.
    pub fn handlers_for(&self, event: &str) -> usize {
        self.entries.borrow().iter().filter(|e| e.event == event).count()
    }

    /// Write `[event, payload]` to the channel. Pass `&()` for no payload.
    pub fn send<T: Serialize + ?Sized>(&self, event: &str, payload: &T) -> Result<(), WsError> {
        self.send_frame(&Frame::with_payload(event, payload)?)
    }

    pub fn send_frame(&self, frame: &Frame) -> Result<(), WsError> {
        let text = frame.encode();
        crate::log_debug!("ws send: {}", text);
        self.sink.send_text(text)
    }

    /// Register a peer connection addressable by `send_to`. Returns the
    /// connection previously registered under `id`, if any.
    pub fn add_peer(&self, id: impl Into<String>, sink: S) -> Option<S> {
        self.peers.borrow_mut().insert(id.into(), sink)
    }

    pub fn remove_peer(&self, id: &str) -> Option<S> {
        self.peers.borrow_mut().remove(id)
    }

    pub fn peer_ids(&self) -> Vec<String> {
        self.peers.borrow().keys().cloned().collect()
    }

    /// Write `[event, payload]` to each registered peer named in `ids`.
    /// Unknown ids are skipped. Returns the number of peers written to.
    pub fn send_to<I, T>(&self, ids: I, event: &str, payload: &T) -> Result<usize, WsError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        T: Serialize + ?Sized,
    {
        let ids: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        let text = Frame::with_payload(event, payload)?.encode();

        let peers = self.peers.borrow();
        let mut sent = 0;
        for (id, peer) in peers.iter() {
            if ids.contains(id) {
                peer.send_text(text.clone())?;
                sent += 1;
            }
        }
        Ok(sent)
    }

    /// Decode one inbound message and dispatch it. Returns the number of
    /// handlers invoked.
    pub fn dispatch(&self, text: &str) -> Result<usize, FrameError> {
        let frame = Frame::decode(text)?;
        Ok(self.dispatch_frame(&frame))
    }

    /// Invoke every handler registered for the frame's event. Handlers may
    /// subscribe or unsubscribe; changes apply from the next frame on.
    pub fn dispatch_frame(&self, frame: &Frame) -> usize {
        let handlers: Vec<Handler> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.event == frame.event)
            .map(|e| e.handler.clone())
            .collect();

        for handler in &handlers {
            handler.call(&frame.payload);
        }
        handlers.len()
    }
}

impl<S> fmt::Debug for EventMux<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventMux")
            .field("entries", &self.entries.borrow().len())
            .field("peers", &self.peers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone, Default)]
    struct RecordingSink {
        sent: Rc<RefCell<Vec<String>>>,
        closed: bool,
    }

    impl FrameSink for RecordingSink {
        fn send_text(&self, text: String) -> Result<(), WsError> {
            if self.closed {
                return Err(WsError::Closed);
            }
            self.sent.borrow_mut().push(text);
            Ok(())
        }
    }

    fn mux() -> (Rc<RefCell<Vec<String>>>, EventMux<RecordingSink>) {
        let sink = RecordingSink::default();
        (sink.sent.clone(), EventMux::new(sink))
    }

    fn counter() -> (Rc<Cell<usize>>, Handler) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, Handler::new(move |_| c.set(c.get() + 1)))
    }

    #[test]
    fn dispatches_payload_to_matching_handlers_in_order() {
        let (_, mux) = mux();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        mux.on("call:message", move |p| s.borrow_mut().push(format!("first {p}")));
        let s = seen.clone();
        mux.on("call:leave", move |_| s.borrow_mut().push("other".to_string()));
        let s = seen.clone();
        mux.on("call:message", move |p| s.borrow_mut().push(format!("second {p}")));

        let invoked = mux.dispatch(r#"["call:message",{"text":"hi"}]"#).unwrap();
        assert_eq!(invoked, 2);
        assert_eq!(
            *seen.borrow(),
            [r#"first {"text":"hi"}"#, r#"second {"text":"hi"}"#]
        );
    }

    #[test]
    fn unmatched_event_invokes_nothing() {
        let (_, mux) = mux();
        let (count, handler) = counter();
        mux.on_handler("a", &handler);
        assert_eq!(mux.dispatch(r#"["b",1]"#), Ok(0));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn same_handler_registered_twice_dispatches_once() {
        let (_, mux) = mux();
        let (count, handler) = counter();

        let first = mux.on_handler("call:joined", &handler);
        let second = mux.on_handler("call:joined", &handler);
        assert_eq!(first, second);
        assert_eq!(mux.len(), 1);

        mux.dispatch(r#"["call:joined",null]"#).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn same_handler_on_different_events_registers_both() {
        let (_, mux) = mux();
        let (_, handler) = counter();
        let a = mux.on_handler("a", &handler);
        let b = mux.on_handler("b", &handler);
        assert_ne!(a, b);
        assert_eq!(mux.len(), 2);
    }

    #[test]
    fn distinct_closures_are_distinct_handlers() {
        let (_, mux) = mux();
        let (count, handler) = counter();
        let h = handler.clone();
        mux.on("a", move |p| h.call(p));
        let h = handler.clone();
        mux.on("a", move |p| h.call(p));

        mux.dispatch(r#"["a",null]"#).unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn off_unknown_id_is_a_noop() {
        let (_, mux) = mux();
        let (count, handler) = counter();
        let id = mux.on_handler("a", &handler);
        assert!(mux.off(id));

        let kept = mux.on_handler("a", &handler);
        assert!(!mux.off(id));
        assert_eq!(mux.off_many([id, id]), 0);
        assert_eq!(mux.len(), 1);

        mux.dispatch(r#"["a",null]"#).unwrap();
        assert_eq!(count.get(), 1);
        assert!(mux.off(kept));
        assert!(mux.is_empty());
    }

    #[test]
    fn off_many_removes_listed_ids() {
        let (_, mux) = mux();
        let a = mux.on("a", |_| {});
        let b = mux.on("b", |_| {});
        let c = mux.on("c", |_| {});

        assert_eq!(mux.off_many([a, c]), 2);
        assert_eq!(mux.handlers_for("b"), 1);
        assert_eq!(mux.len(), 1);
        assert!(mux.off(b));
    }

    #[test]
    fn malformed_frames_are_reported() {
        let (_, mux) = mux();
        let (count, handler) = counter();
        mux.on_handler("a", &handler);

        assert!(matches!(mux.dispatch("unauthorized"), Err(FrameError::Json(_))));
        assert_eq!(mux.dispatch(r#"["a"]"#), Err(FrameError::NotAPair));
        assert_eq!(mux.dispatch(r#"[1,"a"]"#), Err(FrameError::EventNotString));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn handler_added_during_dispatch_runs_from_next_frame() {
        let (_, mux) = mux();
        let mux = Rc::new(mux);
        let (count, handler) = counter();

        let m = mux.clone();
        mux.on("a", move |_| {
            m.on_handler("a", &handler);
        });

        assert_eq!(mux.dispatch(r#"["a",null]"#), Ok(1));
        assert_eq!(count.get(), 0);

        assert_eq!(mux.dispatch(r#"["a",null]"#), Ok(2));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn typed_handlers_receive_decoded_payloads() {
        #[derive(serde::Deserialize)]
        struct Msg {
            text: String,
        }

        let (_, mux) = mux();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        mux.on_typed("m", move |msg: Msg| s.borrow_mut().push(msg.text));

        mux.dispatch(r#"["m",{"text":"hello"}]"#).unwrap();
        mux.dispatch(r#"["m",{"wrong":1}]"#).unwrap();
        assert_eq!(*seen.borrow(), ["hello"]);
    }

    #[test]
    fn send_writes_event_payload_pair() {
        let (sent, mux) = mux();
        mux.send("call:join", &json!({"id": "c1"})).unwrap();
        mux.send("call:leave", &()).unwrap();

        assert_eq!(
            *sent.borrow(),
            [r#"["call:join",{"id":"c1"}]"#, r#"["call:leave",null]"#]
        );
    }

    #[test]
    fn send_on_closed_sink_fails() {
        let mux = EventMux::new(RecordingSink {
            closed: true,
            ..Default::default()
        });
        assert_eq!(mux.send("a", &()), Err(WsError::Closed));
    }

    #[test]
    fn send_to_without_peers_sends_nothing() {
        let (sent, mux) = mux();
        assert_eq!(mux.send_to(["u1", "u2"], "call:pc-offer", &json!({})), Ok(0));
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn send_to_addresses_registered_peers_once() {
        let (own, mux) = mux();
        let alice = RecordingSink::default();
        let bob = RecordingSink::default();
        mux.add_peer("alice", alice.clone());
        mux.add_peer("bob", bob.clone());

        let sent = mux.send_to(["alice", "carol", "alice"], "call:pc-answer", &json!({"sdp": "x"}));
        assert_eq!(sent, Ok(1));
        assert_eq!(*alice.sent.borrow(), [r#"["call:pc-answer",{"sdp":"x"}]"#]);
        assert!(bob.sent.borrow().is_empty());
        assert!(own.borrow().is_empty());

        assert!(mux.remove_peer("alice").is_some());
        assert_eq!(mux.peer_ids(), ["bob"]);
        assert_eq!(mux.send_to(vec!["alice".to_string()], "x", &()), Ok(0));
    }
}
