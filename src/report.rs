//! Camera report generation.
//!
//! Builds one text block per enumerated device: a header with the static
//! identification fields, plus the live configuration for device families
//! the reporter knows how to open. Live reading is keyed by the descriptor's
//! device-class tag so further families can be registered without touching
//! the run loop.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io;

use log::debug;

use crate::traits::{CameraRuntime, DeviceDescriptor, OpenDevice, Result};

/// Device-class tag of the GigE Vision family handled by default.
pub const GIGE_DEVICE_CLASS: &str = "BaslerGigE";

/// Process status for a run that completed, per-device errors included.
pub const EXIT_OK: i32 = 0;

/// Process status when enumeration finds no devices at all.
pub const EXIT_NO_CAMERA: i32 = -1;

fn line(block: &mut String, args: std::fmt::Arguments<'_>) {
    // Writing into a String cannot fail.
    let _ = block.write_fmt(args);
    block.push('\n');
}

/// Live-configuration strategy for one device family.
///
/// Implementations own the whole open / read / close cycle for their family.
/// The handle must be closed and released on every path out of
/// `append_live_config`, including the error path.
pub trait DeviceFamily<R: CameraRuntime> {
    /// Open the device at `index`, append its live configuration lines to
    /// `block`, and close it. Lines appended before a failure stay in the
    /// block.
    fn append_live_config(&self, runtime: &mut R, index: usize, block: &mut String)
        -> Result<()>;
}

/// Live-configuration reader for GigE Vision devices.
#[derive(Debug, Default, Clone, Copy)]
pub struct GigeFamily;

impl<R: CameraRuntime> DeviceFamily<R> for GigeFamily {
    fn append_live_config(
        &self,
        runtime: &mut R,
        index: usize,
        block: &mut String,
    ) -> Result<()> {
        let mut device = runtime.open_device(index)?;
        let read_result = append_live_fields(&mut device, block);
        let close_result = device.close();
        // A read failure takes precedence over a close failure.
        read_result.and(close_result)
    }
}

fn append_live_fields<D: OpenDevice>(device: &mut D, block: &mut String) -> Result<()> {
    line(block, format_args!("device user id: {}", device.device_user_id()?));
    line(block, format_args!("device id: {}", device.device_id()?));
    line(block, format_args!("device model name: {}", device.model_name()?));
    line(block, format_args!("ip: {}", device.persistent_ip()?));
    line(block, format_args!("network mask: {}", device.persistent_subnet_mask()?));
    line(block, format_args!("gateway: {}", device.persistent_gateway()?));
    line(block, format_args!("mtu size: {} bytes", device.packet_size()?));
    if let Some(rate) = device.frame_rate()? {
        line(block, format_args!("frame rate: {rate}"));
    }
    line(block, format_args!("device vendor name: {}", device.vendor_name()?));
    // The missing space after the colon matches the historical output of
    // this utility; downstream consumers grep for it as-is.
    line(block, format_args!("device version:{}", device.device_version()?));
    line(block, format_args!("device firmware version: {}", device.firmware_version()?));
    line(block, format_args!("device manufacturer info: {}", device.manufacturer_info()?));
    line(block, format_args!("width: {}", device.width()?));
    line(block, format_args!("height: {}", device.height()?));
    line(block, format_args!("pixel depth: {} bits", device.pixel_depth_bits()?));
    line(block, format_args!("reverse X: {}", device.reverse_x()?));
    line(block, format_args!("reverse Y: {}", device.reverse_y()?));
    match device.binning_range()? {
        Some(range) => line(
            block,
            format_args!(
                "Cam has binning range: x(hz) = [{} - {}], y(vt) = [{} - {}].",
                range.horizontal.min, range.horizontal.max, range.vertical.min, range.vertical.max
            ),
        ),
        None => line(block, format_args!("Cam does not support binning.")),
    }
    line(block, format_args!("pixel format: {}", device.pixel_format()?));
    Ok(())
}

fn static_block(index: usize, descriptor: &DeviceDescriptor) -> String {
    let mut block = String::new();
    line(&mut block, format_args!("===================="));
    line(&mut block, format_args!("camera {index}"));
    line(&mut block, format_args!("--------------------"));
    line(
        &mut block,
        format_args!(">>>--->>user defined name: {}", descriptor.user_defined_name),
    );
    line(&mut block, format_args!(">>>--->>full name: {}", descriptor.full_name));
    line(
        &mut block,
        format_args!("device class: {}", descriptor.device_class.as_deref().unwrap_or("")),
    );
    line(&mut block, format_args!("friendly name: {}", descriptor.friendly_name));
    line(&mut block, format_args!("device factory: {}", descriptor.device_factory));
    line(&mut block, format_args!("device version: {}", descriptor.device_version));
    line(&mut block, format_args!("model name: {}", descriptor.model_name));
    line(&mut block, format_args!("serial number: {}", descriptor.serial_number));
    line(&mut block, format_args!("vendor name: {}", descriptor.vendor_name));
    block
}

/// Enumerates devices through a camera runtime and writes one report block
/// per device.
pub struct Reporter<R: CameraRuntime> {
    runtime: R,
    families: BTreeMap<String, Box<dyn DeviceFamily<R>>>,
}

impl<R: CameraRuntime> Reporter<R> {
    /// Create a reporter over `runtime` with the GigE family registered.
    #[must_use]
    pub fn new(runtime: R) -> Self {
        let mut families: BTreeMap<String, Box<dyn DeviceFamily<R>>> = BTreeMap::new();
        families.insert(GIGE_DEVICE_CLASS.to_owned(), Box::new(GigeFamily));
        Self { runtime, families }
    }

    /// Register (or replace) the live-configuration strategy for a
    /// device-class tag.
    #[must_use]
    pub fn with_family(mut self, device_class: &str, family: Box<dyn DeviceFamily<R>>) -> Self {
        self.families.insert(device_class.to_owned(), family);
        self
    }

    /// Run one enumeration pass and write the report to `out`.
    ///
    /// Returns the process status: [`EXIT_NO_CAMERA`] when no device was
    /// found, [`EXIT_OK`] otherwise. Per-device failures are written to
    /// `err`, one line each, and never abort the pass; only an enumeration
    /// failure or a sink write failure is returned as `Err`.
    pub fn run(&mut self, out: &mut dyn io::Write, err: &mut dyn io::Write) -> Result<i32> {
        let descriptors = self.runtime.enumerate()?;
        if descriptors.is_empty() {
            writeln!(out, "No camera present")?;
            return Ok(EXIT_NO_CAMERA);
        }
        debug!("enumerated {} device(s)", descriptors.len());

        for (index, descriptor) in descriptors.iter().enumerate() {
            let mut block = static_block(index, descriptor);
            if let Some(family) = descriptor
                .device_class
                .as_ref()
                .and_then(|class| self.families.get(class))
            {
                debug!("reading live configuration of device {index}");
                if let Err(read_err) =
                    family.append_live_config(&mut self.runtime, index, &mut block)
                {
                    writeln!(err, "{read_err}")?;
                }
            }
            writeln!(out, "{block}")?;
        }
        Ok(EXIT_OK)
    }
}
