//! Shared test applications and gateway helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use gateway_bridge::app::{Application, Intake, RequestHandler, ResponseWriter, ServerRequest};
use gateway_bridge::bridge::SendHandle;
use gateway_bridge::gateway::{
    channel, EventSink, EventSource, GatewayError, InboundEvent, OutboundEvent, Scope,
};
use gateway_bridge::{BridgeError, ExchangeOutcome, GatewayAdapter};

/// Builds the response once the request body is complete.
pub type Respond = Arc<dyn Fn(&ServerRequest, &[u8], &mut ResponseWriter) + Send + Sync>;

/// One route served by a closure; everything else is a 404.
pub struct TestApp {
    path: String,
    respond: Respond,
}

impl TestApp {
    pub fn new<F>(path: &str, respond: F) -> Self
    where
        F: Fn(&ServerRequest, &[u8], &mut ResponseWriter) + Send + Sync + 'static,
    {
        Self {
            path: path.to_string(),
            respond: Arc::new(respond),
        }
    }
}

pub struct TestHandler {
    request: ServerRequest,
    body: BytesMut,
    writer: ResponseWriter,
    respond: Option<Respond>,
}

impl Application for TestApp {
    type Handler = TestHandler;

    fn find_handler(&self, request: ServerRequest) -> TestHandler {
        let respond = (request.path() == self.path).then(|| self.respond.clone());
        TestHandler {
            writer: ResponseWriter::new(request.connection().clone()),
            request,
            body: BytesMut::new(),
            respond,
        }
    }
}

impl RequestHandler for TestHandler {
    fn data_received(&mut self, chunk: Bytes) -> Intake {
        self.body.extend_from_slice(&chunk);
        Intake::Completed
    }

    fn finish(&mut self) {
        match &self.respond {
            Some(respond) => respond(&self.request, &self.body, &mut self.writer),
            None => {
                self.writer.set_status(404);
                self.writer.write("Not Found");
            }
        }
        let _ = self.writer.finish();
    }
}

/// Everything a [`RecordingApp`] handler observed.
#[derive(Default)]
pub struct Recorder {
    pub chunks: Mutex<Vec<Bytes>>,
    pub log: Mutex<Vec<String>>,
    pub headers_calls: AtomicUsize,
    pub finish_calls: AtomicUsize,
    pub close_calls: AtomicUsize,
    pub handles: Mutex<Vec<SendHandle>>,
}

impl Recorder {
    pub fn total_len(&self) -> usize {
        self.chunks.lock().unwrap().iter().map(|c| c.len()).sum()
    }

    pub fn body(&self) -> Vec<u8> {
        self.chunks.lock().unwrap().concat()
    }

    pub fn log(&self, entry: impl Into<String>) {
        self.log.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

/// How a [`RecordingApp`] handler behaves.
#[derive(Clone, Default)]
pub struct Behavior {
    /// Each data intake is pending for this long.
    pub chunk_delay: Option<Duration>,
    /// headers_received settles with an error.
    pub reject_headers: bool,
    /// Respond (and finish) on the first body chunk instead of at end of body.
    pub respond_early: bool,
}

/// Streaming handler that records its intake and answers `OK`.
pub struct RecordingApp {
    pub recorder: Arc<Recorder>,
    behavior: Behavior,
}

impl RecordingApp {
    pub fn new(behavior: Behavior) -> (Self, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (
            Self {
                recorder: recorder.clone(),
                behavior,
            },
            recorder,
        )
    }
}

pub struct RecordingHandler {
    recorder: Arc<Recorder>,
    behavior: Behavior,
    writer: ResponseWriter,
    responded: bool,
}

impl RecordingHandler {
    fn respond(&mut self) {
        if self.responded {
            return;
        }
        self.responded = true;
        self.writer.write("OK");
        match self.writer.finish() {
            Ok(handle) => self.recorder.handles.lock().unwrap().push(handle),
            Err(e) => self.recorder.log(format!("finish error: {}", e)),
        }
    }
}

impl Application for RecordingApp {
    type Handler = RecordingHandler;

    fn find_handler(&self, request: ServerRequest) -> RecordingHandler {
        let recorder = self.recorder.clone();
        request.connection().set_close_callback(move || {
            recorder.close_calls.fetch_add(1, Ordering::SeqCst);
        });
        RecordingHandler {
            recorder: self.recorder.clone(),
            behavior: self.behavior.clone(),
            writer: ResponseWriter::new(request.connection().clone()),
            responded: false,
        }
    }
}

impl RequestHandler for RecordingHandler {
    fn headers_received(
        &mut self,
        _start_line: &gateway_bridge::http::RequestStartLine,
        _headers: &http::HeaderMap,
    ) -> Intake {
        self.recorder.headers_calls.fetch_add(1, Ordering::SeqCst);
        if self.behavior.reject_headers {
            return Intake::pending(async { Err(anyhow::anyhow!("unauthorized")) });
        }
        Intake::Completed
    }

    fn data_received(&mut self, chunk: Bytes) -> Intake {
        let label = String::from_utf8_lossy(&chunk).into_owned();
        self.recorder.log(format!("data {}", label));
        self.recorder.chunks.lock().unwrap().push(chunk);
        if self.behavior.respond_early {
            self.respond();
        }
        match self.behavior.chunk_delay {
            Some(delay) => {
                let recorder = self.recorder.clone();
                Intake::pending(async move {
                    tokio::time::sleep(delay).await;
                    recorder.log(format!("settled {}", label));
                    Ok(())
                })
            }
            None => Intake::Completed,
        }
    }

    fn finish(&mut self) {
        self.recorder.finish_calls.fetch_add(1, Ordering::SeqCst);
        self.respond();
    }
}

/// Event source that replays a script and logs every `receive`.
pub struct ScriptedSource {
    events: VecDeque<InboundEvent>,
    recorder: Arc<Recorder>,
}

impl ScriptedSource {
    pub fn new(events: Vec<InboundEvent>, recorder: Arc<Recorder>) -> Self {
        Self {
            events: events.into(),
            recorder,
        }
    }
}

impl EventSource for ScriptedSource {
    async fn receive(&mut self) -> Result<InboundEvent, GatewayError> {
        self.recorder.log("receive");
        self.events.pop_front().ok_or(GatewayError::Closed)
    }
}

/// Sink that records events and fails every send after the first `ok`.
pub struct FailingSink {
    ok: usize,
    pub sent: Arc<Mutex<Vec<OutboundEvent>>>,
}

impl FailingSink {
    pub fn new(ok: usize) -> Self {
        Self {
            ok,
            sent: Arc::default(),
        }
    }
}

impl EventSink for FailingSink {
    async fn send(&self, event: OutboundEvent) -> Result<(), GatewayError> {
        let mut sent = self.sent.lock().unwrap();
        if sent.len() < self.ok {
            sent.push(event);
            Ok(())
        } else {
            Err(GatewayError::Send("connection reset by peer".into()))
        }
    }
}

/// Run one exchange over the in-memory gateway and collect every outbound event.
pub async fn run_exchange<A: Application>(
    adapter: &GatewayAdapter<A>,
    scope: Scope,
    events: Vec<InboundEvent>,
) -> (Result<ExchangeOutcome, BridgeError>, Vec<OutboundEvent>) {
    let (source, sink, mut transport) = channel::pair();
    for event in events {
        transport.push(event).unwrap();
    }
    transport.end_input();

    let result = tokio::time::timeout(Duration::from_secs(5), adapter.call(scope, source, sink))
        .await
        .expect("exchange timed out");

    let mut outbound = Vec::new();
    while let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_secs(1), transport.next_outbound()).await
    {
        outbound.push(event);
    }
    (result, outbound)
}

/// Status, headers and body reassembled from outbound events.
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Check response framing and reassemble the reply.
pub fn assemble(events: &[OutboundEvent]) -> Reply {
    let (first, rest) = events.split_first().expect("no outbound events");
    let OutboundEvent::ResponseStart { status, headers } = first else {
        panic!("first event must be http.response.start, got {:?}", first);
    };

    let mut body = Vec::new();
    for (i, event) in rest.iter().enumerate() {
        match event {
            OutboundEvent::ResponseStart { .. } => panic!("second http.response.start"),
            OutboundEvent::ResponseBody { body: chunk, more_body } => {
                body.extend_from_slice(chunk);
                assert_eq!(
                    !*more_body,
                    i == rest.len() - 1,
                    "only the last body event may have more_body = false"
                );
            }
        }
    }
    assert!(
        events.last().is_some_and(|e| e.is_terminal()),
        "response was not terminated"
    );

    Reply {
        status: *status,
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    String::from_utf8_lossy(k).into_owned(),
                    String::from_utf8_lossy(v).into_owned(),
                )
            })
            .collect(),
        body,
    }
}

/// Inbound events carrying `body` split into `chunk_size` pieces.
pub fn body_events(body: &[u8], chunk_size: usize) -> Vec<InboundEvent> {
    let chunks: Vec<_> = body.chunks(chunk_size).collect();
    if chunks.is_empty() {
        return vec![InboundEvent::request(Bytes::new(), false)];
    }
    let last = chunks.len() - 1;
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| InboundEvent::request(Bytes::copy_from_slice(chunk), i != last))
        .collect()
}
