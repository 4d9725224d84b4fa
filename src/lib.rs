//! GigE camera identification reporter.
//!
//! This library enumerates industrial cameras through a vendor camera
//! runtime and formats their identification and configuration attributes
//! into a plain-text report. The runtime boundary is trait-based, enabling
//! production use against the pylon transport layers and testing with a
//! mock runtime.

pub mod report;
pub mod traits;

#[cfg(feature = "backend_pylon")]
pub mod device;


#[cfg(feature = "backend_pylon")]
pub use device::PylonRuntime;
pub use report::{DeviceFamily, GigeFamily, Reporter, EXIT_NO_CAMERA, EXIT_OK, GIGE_DEVICE_CLASS};
pub use traits::{
    AxisRange, BinningRange, CameraError, CameraRuntime, DeviceDescriptor, OpenDevice,
};
