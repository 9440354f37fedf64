//! Small built-in application used by the replay tool.
//!
//! - `/`      → `Hello, world`
//! - `/echo`  → the request body, echoed back once it is complete
//! - anything else → 404

use bytes::{Bytes, BytesMut};

use crate::app::{Application, Intake, RequestHandler, ResponseWriter, ServerRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Hello,
    Echo,
    NotFound,
}

/// The sample application.
#[derive(Debug, Default, Clone)]
pub struct SampleApp;

impl Application for SampleApp {
    type Handler = SampleHandler;

    fn find_handler(&self, request: ServerRequest) -> SampleHandler {
        let route = match request.path() {
            "/" => Route::Hello,
            "/echo" => Route::Echo,
            _ => Route::NotFound,
        };
        SampleHandler {
            route,
            body: BytesMut::new(),
            writer: ResponseWriter::new(request.connection().clone()),
        }
    }
}

#[derive(Debug)]
pub struct SampleHandler {
    route: Route,
    body: BytesMut,
    writer: ResponseWriter,
}

impl RequestHandler for SampleHandler {
    fn data_received(&mut self, chunk: Bytes) -> Intake {
        if self.route == Route::Echo {
            self.body.extend_from_slice(&chunk);
        }
        Intake::Completed
    }

    fn finish(&mut self) {
        match self.route {
            Route::Hello => self.writer.write("Hello, world"),
            Route::Echo => {
                if let Err(e) = self.writer.set_header("content-type", "application/octet-stream") {
                    tracing::warn!(error = %e, "Failed to set content type");
                }
                self.writer.write(&self.body);
            }
            Route::NotFound => {
                self.writer.set_status(404);
                self.writer.write("Not Found");
            }
        }
        if let Err(e) = self.writer.finish() {
            tracing::warn!(error = %e, "Failed to finish response");
        }
    }
}
