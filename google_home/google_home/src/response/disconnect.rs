use serde::Serialize;

/// DISCONNECT is acknowledged with an empty payload.
#[derive(Debug, Default, Serialize)]
pub struct Payload {}
