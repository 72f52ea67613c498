pub mod execute;
pub mod query;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "intent", content = "payload")]
pub enum Intent {
    #[serde(rename = "action.devices.SYNC")]
    Sync,
    #[serde(rename = "action.devices.QUERY")]
    Query(query::Payload),
    #[serde(rename = "action.devices.EXECUTE")]
    Execute(execute::Payload),
    #[serde(rename = "action.devices.DISCONNECT")]
    Disconnect,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Sync => "SYNC",
            Intent::Query(_) => "QUERY",
            Intent::Execute(_) => "EXECUTE",
            Intent::Disconnect => "DISCONNECT",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub request_id: String,
    pub inputs: Vec<Intent>,
}
