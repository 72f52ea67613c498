mod fulfillment;

pub mod device;
pub mod errors;
pub mod home_graph;
pub mod request;
pub mod response;
pub mod state;
pub mod traits;
pub mod types;

pub use device::Device;
pub use fulfillment::{FulfillmentError, GoogleHome};
pub use request::Request;
pub use response::Response;
pub use state::{DeviceState, DeviceStates, StateError};
