use google_home::device::Name;
use google_home::traits::Trait;
use google_home::types::Type;

/// Id of the one camera this bridge manages.
pub const CAMERA_ID: &str = "1";

/// Registry entry for the motion camera.
#[derive(Debug, Clone)]
pub struct MotionCamera {
    will_report_state: bool,
}

impl MotionCamera {
    /// `will_report_state` has to be true exactly when state changes are reported upstream.
    pub fn new(will_report_state: bool) -> Self {
        Self { will_report_state }
    }
}

impl google_home::Device for MotionCamera {
    fn get_id(&self) -> String {
        CAMERA_ID.into()
    }

    fn get_device_type(&self) -> Type {
        Type::Camera
    }

    fn get_device_name(&self) -> Name {
        Name::new("Motion Camera")
    }

    fn get_traits(&self) -> Vec<Trait> {
        vec![Trait::OnOff]
    }

    fn will_report_state(&self) -> bool {
        self.will_report_state
    }
}
