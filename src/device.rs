//! Camera runtime implementation over the Basler pylon suite, using the
//! pylon-cxx crate.
//!
//! Building this module requires the proprietary pylon SDK on the host, so
//! it is gated behind the `backend_pylon` feature.

use log::debug;
use pylon_cxx::{HasProperties, NodeMap};

use crate::traits::{
    AxisRange, BinningRange, CameraError, CameraRuntime, DeviceDescriptor, OpenDevice, Result,
};

// Node writes equivalent to the stock software-trigger configuration.
const SOFTWARE_TRIGGER_NODES: [(&str, &str); 3] = [
    ("TriggerSelector", "FrameStart"),
    ("TriggerMode", "On"),
    ("TriggerSource", "Software"),
];

/// Camera runtime backed by the pylon transport layers.
///
/// Construction initializes the pylon runtime; dropping the value releases
/// all pylon resources.
pub struct PylonRuntime {
    pylon: pylon_cxx::Pylon,
    devices: Vec<pylon_cxx::DeviceInfo>,
}

impl PylonRuntime {
    /// Initialize the pylon runtime.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pylon: pylon_cxx::Pylon::new(),
            devices: Vec::new(),
        }
    }
}

impl Default for PylonRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn property_or_empty(info: &pylon_cxx::DeviceInfo, key: &str) -> String {
    info.property_value(key).unwrap_or_default()
}

fn descriptor_from(info: &pylon_cxx::DeviceInfo) -> DeviceDescriptor {
    DeviceDescriptor {
        user_defined_name: property_or_empty(info, "UserDefinedName"),
        full_name: property_or_empty(info, "FullName"),
        device_class: info.property_value("DeviceClass").ok(),
        friendly_name: property_or_empty(info, "FriendlyName"),
        device_factory: property_or_empty(info, "DeviceFactory"),
        device_version: property_or_empty(info, "DeviceVersion"),
        model_name: property_or_empty(info, "ModelName"),
        serial_number: property_or_empty(info, "SerialNumber"),
        vendor_name: property_or_empty(info, "VendorName"),
    }
}

impl CameraRuntime for PylonRuntime {
    type Device<'a> = PylonDevice<'a>
    where
        Self: 'a;

    fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>> {
        self.devices = pylon_cxx::TlFactory::instance(&self.pylon)
            .enumerate_devices()
            .map_err(|err| CameraError::Enumeration(err.to_string()))?;
        debug!("transport layers reported {} device(s)", self.devices.len());
        Ok(self.devices.iter().map(descriptor_from).collect())
    }

    fn open_device(&mut self, index: usize) -> Result<PylonDevice<'_>> {
        let info = self.devices.get(index).ok_or_else(|| {
            CameraError::DeviceOpenFailed(format!("no enumerated device at index {index}"))
        })?;
        let camera = pylon_cxx::TlFactory::instance(&self.pylon)
            .create_device(info)
            .map_err(|err| CameraError::DeviceOpenFailed(err.to_string()))?;
        camera
            .open()
            .map_err(|err| CameraError::DeviceOpenFailed(err.to_string()))?;
        for (name, value) in SOFTWARE_TRIGGER_NODES {
            let trigger_result = camera
                .enum_node(name)
                .and_then(|mut node| node.set_value(value));
            if let Err(err) = trigger_result {
                return Err(CameraError::DeviceOpenFailed(format!(
                    "installing software-trigger configuration ({name}={value}): {err}"
                )));
            }
        }
        Ok(PylonDevice { camera })
    }
}

/// An opened pylon camera. Dropping the value releases the underlying
/// device object.
pub struct PylonDevice<'a> {
    camera: pylon_cxx::InstantCamera<'a>,
}

fn feature_error(feature: &str, err: &pylon_cxx::PylonError) -> CameraError {
    CameraError::FeatureRead {
        feature: feature.to_owned(),
        message: err.to_string(),
    }
}

// GigE registers carry IPv4 addresses as 32-bit big-endian integers.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ipv4_string(raw: i64) -> String {
    std::net::Ipv4Addr::from(raw as u32).to_string()
}

/// Numeric bit depth of a `PixelSize` enumeration symbol such as `Bpp12`.
fn pixel_size_bits(symbol: &str) -> Option<i64> {
    let digits = symbol.trim_start_matches(|c: char| !c.is_ascii_digit());
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

impl PylonDevice<'_> {
    fn string_feature(&self, name: &str) -> Result<String> {
        self.camera
            .string_node(name)
            .and_then(|node| node.value())
            .map_err(|err| feature_error(name, &err))
    }

    fn integer_feature(&self, name: &str) -> Result<i64> {
        self.camera
            .integer_node(name)
            .and_then(|node| node.value())
            .map_err(|err| feature_error(name, &err))
    }

    fn boolean_feature(&self, name: &str) -> Result<bool> {
        self.camera
            .boolean_node(name)
            .and_then(|node| node.value())
            .map_err(|err| feature_error(name, &err))
    }

    fn enum_feature(&self, name: &str) -> Result<String> {
        self.camera
            .enum_node(name)
            .and_then(|node| node.value())
            .map_err(|err| feature_error(name, &err))
    }

    fn axis_range(&self, name: &str) -> Result<AxisRange> {
        let node = self
            .camera
            .integer_node(name)
            .map_err(|err| feature_error(name, &err))?;
        Ok(AxisRange {
            min: node.min().map_err(|err| feature_error(name, &err))?,
            max: node.max().map_err(|err| feature_error(name, &err))?,
        })
    }
}

impl OpenDevice for PylonDevice<'_> {
    fn device_user_id(&mut self) -> Result<String> {
        self.string_feature("DeviceUserID")
    }

    fn device_id(&mut self) -> Result<String> {
        self.string_feature("DeviceID")
    }

    fn model_name(&mut self) -> Result<String> {
        self.string_feature("DeviceModelName")
    }

    fn persistent_ip(&mut self) -> Result<String> {
        self.integer_feature("GevPersistentIPAddress").map(ipv4_string)
    }

    fn persistent_subnet_mask(&mut self) -> Result<String> {
        self.integer_feature("GevPersistentSubnetMask").map(ipv4_string)
    }

    fn persistent_gateway(&mut self) -> Result<String> {
        self.integer_feature("GevPersistentDefaultGateway").map(ipv4_string)
    }

    fn packet_size(&mut self) -> Result<i64> {
        self.integer_feature("GevSCPSPacketSize")
    }

    fn frame_rate(&mut self) -> Result<Option<f64>> {
        // The node is absent while the feature is unavailable; only a
        // failed read on a present node is an error.
        match self.camera.float_node("ResultingFrameRateAbs") {
            Ok(node) => node
                .value()
                .map(Some)
                .map_err(|err| feature_error("ResultingFrameRateAbs", &err)),
            Err(_) => Ok(None),
        }
    }

    fn vendor_name(&mut self) -> Result<String> {
        self.string_feature("DeviceVendorName")
    }

    fn device_version(&mut self) -> Result<String> {
        self.string_feature("DeviceVersion")
    }

    fn firmware_version(&mut self) -> Result<String> {
        self.string_feature("DeviceFirmwareVersion")
    }

    fn manufacturer_info(&mut self) -> Result<String> {
        self.string_feature("DeviceManufacturerInfo")
    }

    fn width(&mut self) -> Result<i64> {
        self.integer_feature("Width")
    }

    fn height(&mut self) -> Result<i64> {
        self.integer_feature("Height")
    }

    fn pixel_depth_bits(&mut self) -> Result<i64> {
        let symbol = self.enum_feature("PixelSize")?;
        pixel_size_bits(&symbol).ok_or_else(|| CameraError::FeatureRead {
            feature: "PixelSize".to_owned(),
            message: format!("unrecognized pixel size symbol `{symbol}`"),
        })
    }

    fn reverse_x(&mut self) -> Result<bool> {
        self.boolean_feature("ReverseX")
    }

    fn reverse_y(&mut self) -> Result<bool> {
        self.boolean_feature("ReverseY")
    }

    fn binning_range(&mut self) -> Result<Option<BinningRange>> {
        // Binning is reported only when both axes expose the node.
        let nodes = (
            self.camera.integer_node("BinningHorizontal"),
            self.camera.integer_node("BinningVertical"),
        );
        if nodes.0.is_err() || nodes.1.is_err() {
            return Ok(None);
        }
        Ok(Some(BinningRange {
            horizontal: self.axis_range("BinningHorizontal")?,
            vertical: self.axis_range("BinningVertical")?,
        }))
    }

    fn pixel_format(&mut self) -> Result<String> {
        self.enum_feature("PixelFormat")
    }

    fn close(&mut self) -> Result<()> {
        self.camera
            .close()
            .map_err(|err| CameraError::DeviceClose(err.to_string()))
    }
}
