use std::fmt::Debug;

use serde::Serialize;

use crate::response;
use crate::traits::Trait;
use crate::types::Type;

/// Static description of a device exposed to Google Home.
///
/// State is not part of this trait, it lives in [`crate::DeviceStates`] so
/// that the description can stay immutable.
pub trait Device: Debug + Send + Sync {
    fn get_id(&self) -> String;
    fn get_device_type(&self) -> Type;
    fn get_device_name(&self) -> Name;
    fn get_traits(&self) -> Vec<Trait>;

    // Default values that can optionally be overridden
    fn will_report_state(&self) -> bool {
        false
    }

    fn supports(&self, device_trait: Trait) -> bool {
        self.get_traits().contains(&device_trait)
    }

    fn sync(&self) -> response::sync::Device {
        let name = self.get_device_name();
        let mut device =
            response::sync::Device::new(&self.get_id(), &name.name, self.get_device_type());

        device.traits = self.get_traits();
        device.will_report_state = self.will_report_state();

        device
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Name {
    name: String,
}

impl Name {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }
}
