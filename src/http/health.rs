//! Liveness and readiness probes for the orchestrator.
//!
//! Both services answer `200 ok` as soon as the router is serving. The
//! frontend never depends on the backend being up, so readiness does not
//! probe it.

pub async fn liveness() -> &'static str {
    "ok"
}

pub async fn readiness() -> &'static str {
    "ok"
}
