//! Core traits and types for the camera-runtime abstraction.

/// Identification record for one discoverable camera, as reported by the
/// transport layer during enumeration. All fields are free-form strings
/// owned by the runtime; none of them require the device to be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Name assigned to the device by the user, if any.
    pub user_defined_name: String,
    /// Full transport-layer name uniquely identifying the device.
    pub full_name: String,
    /// Transport/family tag (e.g. `BaslerGigE`). `None` when the transport
    /// layer does not populate the field.
    pub device_class: Option<String>,
    /// Human-readable display name.
    pub friendly_name: String,
    /// Name of the device factory that produced the descriptor.
    pub device_factory: String,
    /// Device version string.
    pub device_version: String,
    /// Model name.
    pub model_name: String,
    /// Serial number.
    pub serial_number: String,
    /// Vendor name.
    pub vendor_name: String,
}

/// Minimum and maximum of one binning axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    /// Smallest supported factor.
    pub min: i64,
    /// Largest supported factor.
    pub max: i64,
}

/// Supported binning factors for both sensor axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinningRange {
    /// Horizontal axis range.
    pub horizontal: AxisRange,
    /// Vertical axis range.
    pub vertical: AxisRange,
}

/// Error type for camera-runtime operations.
///
/// The vendor runtime signals failures through a generic exception carrying
/// a description string; implementations translate that into these variants
/// at the boundary so callers handle errors as plain values.
#[derive(Debug)]
pub enum CameraError {
    /// Device enumeration failed.
    Enumeration(String),
    /// Failed to open device.
    DeviceOpenFailed(String),
    /// A feature read on an open device failed.
    FeatureRead {
        /// Name of the feature node that failed.
        feature: String,
        /// Description reported by the runtime.
        message: String,
    },
    /// Closing an open device failed.
    DeviceClose(String),
    /// I/O error while writing the report.
    Io(std::io::Error),
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enumeration(msg) => write!(f, "Device enumeration failed: {msg}"),
            Self::DeviceOpenFailed(msg) => write!(f, "Failed to open device: {msg}"),
            Self::FeatureRead { feature, message } => {
                write!(f, "Failed to read feature {feature}: {message}")
            }
            Self::DeviceClose(msg) => write!(f, "Failed to close device: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result type for camera-runtime operations.
pub type Result<T> = std::result::Result<T, CameraError>;

/// Abstraction over the vendor camera runtime.
///
/// Constructing an implementation initializes the underlying runtime;
/// dropping it tears the runtime down. Both happen exactly once per value,
/// on every exit path.
pub trait CameraRuntime {
    /// The open-device handle type returned by `open_device`.
    type Device<'a>: OpenDevice
    where
        Self: 'a;

    /// Enumerate the currently reachable devices. The returned order is
    /// whatever the runtime reports and carries no cross-run guarantee.
    fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>>;

    /// Open the device at `index` (position in the last `enumerate` result)
    /// and install the stock software-trigger configuration on it. The
    /// configuration is owned by the handle and released with it.
    ///
    /// The handle borrows the runtime, so at most one device can be open
    /// at a time.
    fn open_device(&mut self, index: usize) -> Result<Self::Device<'_>>;
}

/// A live, opened connection to one camera.
///
/// Getters read the device's current configuration. Features that a device
/// may not expose at all return `Ok(None)` when unavailable; `Err` always
/// means a failed read on a feature the device was expected to have.
///
/// Dropping the handle releases the underlying device object even if
/// `close` was never called or a read failed.
pub trait OpenDevice {
    /// User-assigned device id.
    fn device_user_id(&mut self) -> Result<String>;
    /// Transport-assigned device id.
    fn device_id(&mut self) -> Result<String>;
    /// Model name as reported by the device itself.
    fn model_name(&mut self) -> Result<String>;
    /// Persistent IP address, rendered as a string.
    fn persistent_ip(&mut self) -> Result<String>;
    /// Persistent subnet mask, rendered as a string.
    fn persistent_subnet_mask(&mut self) -> Result<String>;
    /// Persistent default gateway, rendered as a string.
    fn persistent_gateway(&mut self) -> Result<String>;
    /// Negotiated streaming packet size in bytes.
    fn packet_size(&mut self) -> Result<i64>;
    /// Resulting frame rate in frames per second, or `None` when the
    /// feature is not currently available.
    fn frame_rate(&mut self) -> Result<Option<f64>>;
    /// Vendor name as reported by the device itself.
    fn vendor_name(&mut self) -> Result<String>;
    /// Device version as reported by the device itself.
    fn device_version(&mut self) -> Result<String>;
    /// Firmware version.
    fn firmware_version(&mut self) -> Result<String>;
    /// Manufacturer info string.
    fn manufacturer_info(&mut self) -> Result<String>;
    /// Current image width in pixels.
    fn width(&mut self) -> Result<i64>;
    /// Current image height in pixels.
    fn height(&mut self) -> Result<i64>;
    /// Pixel depth in bits.
    fn pixel_depth_bits(&mut self) -> Result<i64>;
    /// Whether the image is mirrored along the X axis.
    fn reverse_x(&mut self) -> Result<bool>;
    /// Whether the image is mirrored along the Y axis.
    fn reverse_y(&mut self) -> Result<bool>;
    /// Supported binning factors, or `None` when either axis does not
    /// expose binning.
    fn binning_range(&mut self) -> Result<Option<BinningRange>>;
    /// Symbolic name of the current pixel format encoding.
    fn pixel_format(&mut self) -> Result<String>;

    /// Close the connection. The handle must not be used afterwards except
    /// for being dropped.
    fn close(&mut self) -> Result<()>;
}
