//! Shared fakes for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use mcp_chat::client::{ClientEvent, ConnectionOptions, Connector, ReconnectTicket, Transport};
use mcp_chat::session::{ChatSession, Cue, CueSink, SessionOptions};
use mcp_chat::ClientError;
use url::Url;

/// Everything the fakes observed
#[derive(Default)]
pub struct Log {
    pub opened: Vec<(Url, u64)>,
    pub frames: Vec<String>,
    pub tickets: Vec<ReconnectTicket>,
    pub cues: Vec<Cue>,
}

pub type SharedLog = Rc<RefCell<Log>>;

pub struct FakeTransport(pub SharedLog);

impl Transport for FakeTransport {
    fn send_text(&mut self, frame: String) -> Result<(), ClientError> {
        self.0.borrow_mut().frames.push(frame);
        Ok(())
    }
}

pub struct FakeConnector(pub SharedLog);

impl Connector for FakeConnector {
    fn open(&mut self, url: &Url, generation: u64) -> Box<dyn Transport> {
        self.0.borrow_mut().opened.push((url.clone(), generation));
        Box::new(FakeTransport(Rc::clone(&self.0)))
    }

    fn schedule_reconnect(&mut self, ticket: ReconnectTicket) {
        self.0.borrow_mut().tickets.push(ticket);
    }
}

pub struct RecordingCues(pub SharedLog);

impl CueSink for RecordingCues {
    fn play(&mut self, cue: Cue) {
        self.0.borrow_mut().cues.push(cue);
    }
}

pub fn session_with(options: ConnectionOptions) -> (ChatSession, SharedLog) {
    let log = Rc::new(RefCell::new(Log::default()));
    let session = ChatSession::new(
        SessionOptions {
            origin: "http://localhost:8000".into(),
            connection: options,
            sound_enabled: true,
        },
        Box::new(FakeConnector(Rc::clone(&log))),
        Box::new(RecordingCues(Rc::clone(&log))),
    );
    (session, log)
}

/// A started session whose first connection has opened
pub fn connected_session() -> (ChatSession, SharedLog) {
    let (mut session, log) = session_with(ConnectionOptions::default());
    session.start();
    let generation = session.connection().generation();
    session.handle_event(ClientEvent::Opened { generation });
    log.borrow_mut().cues.clear();
    (session, log)
}

/// A server frame tagged with the live generation
pub fn frame(session: &ChatSession, text: &str) -> ClientEvent {
    ClientEvent::Message {
        generation: session.connection().generation(),
        text: text.to_string(),
    }
}
