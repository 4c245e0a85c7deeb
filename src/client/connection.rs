//! Connection manager
//!
//! Owns the connection state, the live transport, the outbound queue and the
//! reconnect schedule. It performs no IO itself: opening sockets and arming
//! timers go through the [`Connector`] seam, and socket events are fed back in
//! through the `on_*` methods tagged with the generation of the attempt that
//! produced them.
//!
//! Every call to [`ConnectionManager::connect`] starts a new generation. Events
//! and reconnect timers belonging to an older generation are ignored, so a
//! timer that fires after the connection was already re-established cannot
//! open a second socket.

use std::collections::VecDeque;
use std::time::Duration;

use url::Url;

use super::endpoint::websocket_url;
use super::state::ConnectionState;
use crate::core::ClientError;
use crate::protocol::ClientMessage;

/// Fixed delay between a close and the next connection attempt
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Write half of an open connection
pub trait Transport {
    /// Hand one text frame to the connection for immediate delivery
    fn send_text(&mut self, frame: String) -> Result<(), ClientError>;
}

/// Opens connections and arms reconnect timers on behalf of the manager
pub trait Connector {
    /// Start a connection attempt for `generation`.
    ///
    /// The returned transport accepts frames once the attempt reports open.
    fn open(&mut self, url: &Url, generation: u64) -> Box<dyn Transport>;

    /// Deliver `ticket.token` back to the manager after `ticket.delay`
    fn schedule_reconnect(&mut self, ticket: ReconnectTicket);
}

/// A scheduled reconnect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectTicket {
    /// Generation of the connection whose close scheduled this reconnect
    pub token: u64,
    pub delay: Duration,
}

/// What happened to an accepted outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Handed to the transport
    Sent,
    /// Held in the outbound queue until the next open
    Queued,
}

/// Tunables for the connection manager
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub reconnect_delay: Duration,
    /// Queue outbound messages while disconnected instead of rejecting them
    pub queue_while_disconnected: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            queue_while_disconnected: false,
        }
    }
}

pub struct ConnectionManager {
    origin: String,
    options: ConnectionOptions,
    connector: Box<dyn Connector>,
    transport: Option<Box<dyn Transport>>,
    state: ConnectionState,
    generation: u64,
    pending_reconnect: Option<u64>,
    queue: VecDeque<ClientMessage>,
}

impl ConnectionManager {
    pub fn new(
        origin: impl Into<String>,
        options: ConnectionOptions,
        connector: Box<dyn Connector>,
    ) -> Self {
        Self {
            origin: origin.into(),
            options,
            connector,
            transport: None,
            state: ConnectionState::default(),
            generation: 0,
            pending_reconnect: None,
            queue: VecDeque::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Generation of the most recent connection attempt (0 before the first)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token of the reconnect currently scheduled, if any
    pub fn pending_reconnect(&self) -> Option<u64> {
        self.pending_reconnect
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Whether an event tagged with `generation` belongs to the live attempt
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Start a new connection attempt.
    ///
    /// Supersedes any previous attempt and forgets the pending reconnect.
    /// Returns the new generation, or the endpoint error (state `Failed`).
    pub fn connect(&mut self) -> Result<u64, ClientError> {
        self.pending_reconnect = None;
        self.transport = None;

        let url = match websocket_url(&self.origin) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to create WebSocket for {}: {}", self.origin, e);
                self.state = ConnectionState::Failed;
                return Err(e.into());
            }
        };

        self.generation += 1;
        self.state = ConnectionState::Connecting;
        tracing::info!(generation = self.generation, "Connecting to {}", url);
        self.transport = Some(self.connector.open(&url, self.generation));
        Ok(self.generation)
    }

    /// The attempt opened. Flushes the queue in FIFO order.
    ///
    /// Returns the number of flushed messages, or `None` for a stale event.
    pub fn on_open(&mut self, generation: u64) -> Option<usize> {
        if !self.is_current(generation) {
            tracing::debug!(generation, current = self.generation, "Ignoring stale open");
            return None;
        }
        tracing::info!(generation, "WebSocket connected");
        self.state = ConnectionState::Connected;
        Some(self.flush_queue())
    }

    /// The connection closed (for any reason). Schedules exactly one reconnect.
    ///
    /// Returns `false` for a stale event.
    pub fn on_close(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(generation, current = self.generation, "Ignoring stale close");
            return false;
        }
        tracing::info!(generation, "WebSocket disconnected");
        self.state = ConnectionState::Disconnected;
        self.transport = None;

        let ticket = ReconnectTicket {
            token: generation,
            delay: self.options.reconnect_delay,
        };
        self.pending_reconnect = Some(ticket.token);
        tracing::debug!(
            token = ticket.token,
            delay_ms = ticket.delay.as_millis() as u64,
            "Reconnect scheduled"
        );
        self.connector.schedule_reconnect(ticket);
        true
    }

    /// The transport reported an error. Reconnection waits for the close.
    ///
    /// Returns `false` for a stale event.
    pub fn on_error(&mut self, generation: u64, error: &str) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(generation, "Ignoring stale error: {}", error);
            return false;
        }
        tracing::warn!(generation, "WebSocket error: {}", error);
        self.state = ConnectionState::Error;
        true
    }

    /// A reconnect timer fired.
    ///
    /// Only the currently pending token starts a new attempt; anything else
    /// is a timer from a superseded connection and is dropped.
    pub fn on_reconnect_due(&mut self, token: u64) -> bool {
        if self.pending_reconnect != Some(token) {
            tracing::debug!(
                token,
                pending = ?self.pending_reconnect,
                "Dropping stale reconnect timer"
            );
            return false;
        }
        if matches!(
            self.state,
            ConnectionState::Connected | ConnectionState::Connecting
        ) {
            self.pending_reconnect = None;
            return false;
        }
        // A failed endpoint derivation leaves the manager in `Failed`; there is
        // nothing further to retry in that case.
        self.connect().is_ok()
    }

    /// Whether [`send`](Self::send) would accept a message right now
    pub fn can_send(&self) -> bool {
        self.is_connected() || self.options.queue_while_disconnected
    }

    /// Send an envelope.
    ///
    /// While disconnected the transport is never touched: the message is
    /// rejected with [`ClientError::NotConnected`], or queued when
    /// `queue_while_disconnected` is set.
    pub fn send(&mut self, message: ClientMessage) -> Result<SendOutcome, ClientError> {
        if !self.is_connected() {
            if self.options.queue_while_disconnected {
                tracing::debug!(
                    queued = self.queue.len() + 1,
                    "Queueing message until reconnect"
                );
                self.queue.push_back(message);
                return Ok(SendOutcome::Queued);
            }
            return Err(ClientError::NotConnected);
        }

        let frame = message.encode()?;
        let transport = self.transport.as_mut().ok_or(ClientError::NotConnected)?;
        transport.send_text(frame)?;
        Ok(SendOutcome::Sent)
    }

    fn flush_queue(&mut self) -> usize {
        let mut flushed = 0;
        while self.is_connected() {
            let Some(message) = self.queue.pop_front() else {
                break;
            };
            let frame = match message.encode() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("Dropping queued message that failed to encode: {}", e);
                    continue;
                }
            };
            let Some(transport) = self.transport.as_mut() else {
                self.queue.push_front(message);
                break;
            };
            if let Err(e) = transport.send_text(frame) {
                tracing::warn!("Failed to flush queued message: {}", e);
                self.queue.push_front(message);
                break;
            }
            flushed += 1;
        }
        if flushed > 0 {
            tracing::info!(flushed, "Flushed queued messages");
        }
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        opened: Vec<(String, u64)>,
        tickets: Vec<ReconnectTicket>,
        frames: Vec<String>,
    }

    struct FakeTransport(Rc<RefCell<Log>>);

    impl Transport for FakeTransport {
        fn send_text(&mut self, frame: String) -> Result<(), ClientError> {
            self.0.borrow_mut().frames.push(frame);
            Ok(())
        }
    }

    struct FakeConnector(Rc<RefCell<Log>>);

    impl Connector for FakeConnector {
        fn open(&mut self, url: &Url, generation: u64) -> Box<dyn Transport> {
            self.0.borrow_mut().opened.push((url.to_string(), generation));
            Box::new(FakeTransport(Rc::clone(&self.0)))
        }

        fn schedule_reconnect(&mut self, ticket: ReconnectTicket) {
            self.0.borrow_mut().tickets.push(ticket);
        }
    }

    fn manager(options: ConnectionOptions) -> (ConnectionManager, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let mgr = ConnectionManager::new(
            "http://localhost:8000",
            options,
            Box::new(FakeConnector(Rc::clone(&log))),
        );
        (mgr, log)
    }

    #[test]
    fn test_connect_opens_derived_endpoint() {
        let (mut mgr, log) = manager(ConnectionOptions::default());
        let generation = mgr.connect().unwrap();

        assert_eq!(generation, 1);
        assert_eq!(mgr.state(), ConnectionState::Connecting);
        assert_eq!(
            log.borrow().opened,
            vec![("ws://localhost:8000/ws".to_string(), 1)]
        );
    }

    #[test]
    fn test_open_then_close_schedules_one_reconnect() {
        let (mut mgr, log) = manager(ConnectionOptions::default());
        let generation = mgr.connect().unwrap();
        assert_eq!(mgr.on_open(generation), Some(0));
        assert!(mgr.is_connected());

        assert!(mgr.on_close(generation));
        assert_eq!(mgr.state(), ConnectionState::Disconnected);
        assert_eq!(mgr.pending_reconnect(), Some(generation));
        assert_eq!(
            log.borrow().tickets,
            vec![ReconnectTicket {
                token: generation,
                delay: Duration::from_secs(3),
            }]
        );
    }

    #[test]
    fn test_error_does_not_schedule_reconnect() {
        let (mut mgr, log) = manager(ConnectionOptions::default());
        let generation = mgr.connect().unwrap();
        assert!(mgr.on_error(generation, "boom"));

        assert_eq!(mgr.state(), ConnectionState::Error);
        assert!(log.borrow().tickets.is_empty());
        assert_eq!(mgr.pending_reconnect(), None);
    }

    #[test]
    fn test_reconnect_due_starts_new_generation() {
        let (mut mgr, log) = manager(ConnectionOptions::default());
        let first = mgr.connect().unwrap();
        mgr.on_close(first);

        assert!(mgr.on_reconnect_due(first));
        assert_eq!(mgr.generation(), first + 1);
        assert_eq!(mgr.state(), ConnectionState::Connecting);
        assert_eq!(mgr.pending_reconnect(), None);
        assert_eq!(log.borrow().opened.len(), 2);
    }

    #[test]
    fn test_stale_reconnect_timer_is_noop() {
        let (mut mgr, log) = manager(ConnectionOptions::default());
        let first = mgr.connect().unwrap();
        mgr.on_close(first);

        // Connection re-established by other means before the timer fires.
        let second = mgr.connect().unwrap();
        mgr.on_open(second);

        assert!(!mgr.on_reconnect_due(first));
        assert!(mgr.is_connected());
        assert_eq!(mgr.generation(), second);
        assert_eq!(log.borrow().opened.len(), 2);
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let (mut mgr, log) = manager(ConnectionOptions::default());
        let first = mgr.connect().unwrap();
        let second = mgr.connect().unwrap();

        assert_eq!(mgr.on_open(first), None);
        assert!(!mgr.on_close(first));
        assert!(!mgr.on_error(first, "late"));
        assert_eq!(mgr.state(), ConnectionState::Connecting);
        assert!(log.borrow().tickets.is_empty());

        assert_eq!(mgr.on_open(second), Some(0));
        assert!(mgr.is_connected());
    }

    #[test]
    fn test_send_while_disconnected_never_touches_transport() {
        let (mut mgr, log) = manager(ConnectionOptions::default());
        mgr.connect().unwrap();

        let result = mgr.send(ClientMessage::chat("hi"));
        assert!(matches!(result, Err(ClientError::NotConnected)));
        assert!(log.borrow().frames.is_empty());
        assert_eq!(mgr.queued(), 0);
    }

    #[test]
    fn test_send_while_connected_goes_to_transport() {
        let (mut mgr, log) = manager(ConnectionOptions::default());
        let generation = mgr.connect().unwrap();
        mgr.on_open(generation);

        assert_eq!(mgr.send(ClientMessage::chat("hi")).unwrap(), SendOutcome::Sent);
        assert_eq!(
            log.borrow().frames,
            vec![r#"{"type":"chat","message":"hi"}"#.to_string()]
        );
    }

    #[test]
    fn test_queue_while_disconnected_flushes_fifo_on_open() {
        let (mut mgr, log) = manager(ConnectionOptions {
            queue_while_disconnected: true,
            ..ConnectionOptions::default()
        });
        let generation = mgr.connect().unwrap();

        assert_eq!(mgr.send(ClientMessage::chat("one")).unwrap(), SendOutcome::Queued);
        assert_eq!(mgr.send(ClientMessage::Clear).unwrap(), SendOutcome::Queued);
        assert_eq!(mgr.send(ClientMessage::chat("two")).unwrap(), SendOutcome::Queued);
        assert!(log.borrow().frames.is_empty());

        assert_eq!(mgr.on_open(generation), Some(3));
        assert_eq!(mgr.queued(), 0);
        assert_eq!(
            log.borrow().frames,
            vec![
                r#"{"type":"chat","message":"one"}"#.to_string(),
                r#"{"type":"clear"}"#.to_string(),
                r#"{"type":"chat","message":"two"}"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_bad_origin_fails_without_attempt() {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut mgr = ConnectionManager::new(
            "ftp://example.com",
            ConnectionOptions::default(),
            Box::new(FakeConnector(Rc::clone(&log))),
        );

        assert!(matches!(mgr.connect(), Err(ClientError::Endpoint(_))));
        assert_eq!(mgr.state(), ConnectionState::Failed);
        assert!(log.borrow().opened.is_empty());
    }
}
