use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use log::{error, info, warn};
use rocket::{
    fairing::{Fairing, Info, Kind},
    http::StatusClass,
    request::{FromRequest, Outcome},
    Data, Orbit, Request, Response, Rocket,
};

/// Identifies one request in the logs, and records when it arrived.
#[derive(Debug, Copy, Clone)]
pub struct RequestTrace {
    pub id: usize,
    started: Instant,
}

impl RequestTrace {
    /// Start tracing a new request. IDs wrap back to zero on overflow.
    pub fn next() -> RequestTrace {
        static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        RequestTrace {
            id: REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            started: Instant::now(),
        }
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

impl Display for RequestTrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Allow handlers to tag their own log lines with the request ID.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for &'r RequestTrace {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(req.local_cache(RequestTrace::next))
    }
}

/// Logs server start and stop, and every request with its outcome and
/// handling time.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let protocol = if rocket.config().tls_enabled() {
            "https"
        } else {
            "http"
        };
        let ip = &rocket.config().address;
        let port = &rocket.config().port;
        info!("Baobab backend listening on {protocol}://{ip}:{port}");
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        let trace = req.local_cache(RequestTrace::next);
        info!("->req{trace} {} {}", req.method(), req.uri());
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let trace = req.local_cache(RequestTrace::next);
        let code = res.status();
        let route = match req.route() {
            Some(r) => match &r.name {
                Some(name) => format!("{name} ({})", r.uri),
                None => r.uri.to_string(),
            },
            None => "UNKNOWN ROUTE".to_string(),
        };

        let log_msg = format!("<-rsp{trace} {code} {route} in {}ms", trace.elapsed_millis());
        match code.class() {
            StatusClass::ServerError => error!("{log_msg}"),
            StatusClass::ClientError => warn!("{log_msg}"),
            _ => info!("{log_msg}"),
        }
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutdown requested, stopping gracefully...");
    }
}
