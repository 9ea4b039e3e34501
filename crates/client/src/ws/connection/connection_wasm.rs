//! WASM/Web-specific WebSocket implementation using web_sys::WebSocket.

use std::cell::RefCell;
use std::rc::Rc;

use futures_channel::mpsc::{unbounded, UnboundedReceiver};
use futures_channel::oneshot;
use huddle_shared::{ConnectError, WsError};
use url::Url;
use wasm_bindgen::prelude::*;
use web_sys::{js_sys, CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::ws::FrameSink;

/// Write side of a browser channel.
#[derive(Debug, Clone)]
pub struct WsHandle {
    ws: WebSocket,
}

impl WsHandle {
    pub(crate) fn new(ws: WebSocket) -> Self {
        Self { ws }
    }

    pub fn is_open(&self) -> bool {
        self.ws.ready_state() == WebSocket::OPEN
    }

    pub fn close(&self) {
        let _ = self.ws.close();
    }
}

impl FrameSink for WsHandle {
    fn send_text(&self, text: String) -> Result<(), WsError> {
        if !self.is_open() {
            return Err(WsError::Closed);
        }
        self.ws.send_with_str(&text).map_err(|e| {
            crate::log_error!("Send failed: {:?}", e);
            WsError::Closed
        })
    }
}

fn has_websocket() -> bool {
    web_sys::window()
        .map(|window| js_sys::Reflect::has(&window, &JsValue::from_str("WebSocket")).unwrap_or(false))
        .unwrap_or(false)
}

pub(super) async fn open(url: &Url) -> Result<(WsHandle, UnboundedReceiver<String>), ConnectError> {
    if !has_websocket() {
        return Err(ConnectError::Unsupported);
    }

    let ws = WebSocket::new(url.as_str()).map_err(|e| {
        crate::log_debug!("Failed to create WebSocket: {:?}", e);
        ConnectError::Closed
    })?;

    let (in_tx, in_rx) = unbounded::<String>();

    // Settles exactly once: true on open, false on the first error or close.
    let (ready_tx, ready_rx) = oneshot::channel::<bool>();
    let ready_tx = Rc::new(RefCell::new(Some(ready_tx)));
    let settle = move |ready: bool| {
        if let Some(tx) = ready_tx.borrow_mut().take() {
            let _ = tx.send(ready);
        }
    };

    let on_open = settle.clone();
    let onopen_callback = Closure::wrap(Box::new(move |_: web_sys::Event| {
        on_open(true);
    }) as Box<dyn FnMut(web_sys::Event)>);
    ws.set_onopen(Some(onopen_callback.as_ref().unchecked_ref()));
    onopen_callback.forget();

    let on_error = settle.clone();
    let onerror_callback = Closure::wrap(Box::new(move |_: ErrorEvent| {
        crate::log_error!("WebSocket onerror fired");
        on_error(false);
    }) as Box<dyn FnMut(ErrorEvent)>);
    ws.set_onerror(Some(onerror_callback.as_ref().unchecked_ref()));
    onerror_callback.forget();

    let on_close = settle;
    let in_tx_close = in_tx.clone();
    let onclose_callback = Closure::wrap(Box::new(move |e: CloseEvent| {
        crate::log_debug!("WebSocket onclose: code {}", e.code());
        on_close(false);
        in_tx_close.close_channel();
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(onclose_callback.as_ref().unchecked_ref()));
    onclose_callback.forget();

    let onmessage_callback = Closure::wrap(Box::new(move |e: MessageEvent| {
        if let Ok(text) = e.data().dyn_into::<js_sys::JsString>() {
            let _ = in_tx.unbounded_send(String::from(text));
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(onmessage_callback.as_ref().unchecked_ref()));
    onmessage_callback.forget();

    match ready_rx.await {
        Ok(true) => Ok((WsHandle::new(ws), in_rx)),
        _ => Err(ConnectError::Closed),
    }
}
