// src/detector/mod.rs

//! Distance detection session.
//!
//! A [`DistanceDetector`] owns one [`SyncHost`] for its whole life and drives
//! the module through
//! `Idle → Configuring → Started → Measuring → Stopped`:
//! - [`configure`](DistanceDetector::configure): stop, clear, identify, set
//!   mode / rate / streaming, create and activate,
//! - [`await_started`](DistanceDetector::await_started): wait for the module
//!   and read the distance window,
//! - [`measure_cycle`](DistanceDetector::measure_cycle): trigger, wait for
//!   data, read every peak,
//! - [`close`](DistanceDetector::close): stop the module.
//!
//! [`start`](DistanceDetector::start) runs the whole timed measurement loop.
//! Any error aborts the operation in progress and is returned as is; the
//! session is never restarted behind the caller's back.

use crate::common::{
    config::DetectorConfig,
    error::ModuleError,
    hal_traits::{duration_to_ms, ModuleSerial, ModuleTimer},
    register::{self, Register, MAX_PEAKS},
};
use crate::host::SyncHost;
use log::{debug, info};

mod result;

pub use result::{DetectionResult, DistanceWindow, ModuleInfo, Peak};

/// Lifecycle of a [`DistanceDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Interface owned, nothing written yet.
    Idle,
    /// Setup sequence written, module not yet confirmed running.
    Configuring,
    /// Module reported created and activated.
    Started,
    /// At least one measurement cycle issued.
    Measuring,
    /// Module told to stop.
    Stopped,
}

type DetectorResult<T, IF> = Result<T, ModuleError<<IF as ModuleSerial>::Error>>;

#[derive(Debug)]
pub struct DistanceDetector<IF>
where
    IF: ModuleSerial + ModuleTimer,
{
    host: SyncHost<IF>,
    config: DetectorConfig,
    state: SessionState,
    info: Option<ModuleInfo>,
    window: Option<DistanceWindow>,
    last_mean: Option<f64>,
}

impl<IF> DistanceDetector<IF>
where
    IF: ModuleSerial + ModuleTimer,
{
    /// Takes ownership of the interface without talking to the module.
    pub fn new(interface: IF, config: DetectorConfig) -> Self {
        DistanceDetector {
            host: SyncHost::with_config(interface, config.transaction),
            config,
            state: SessionState::Idle,
            info: None,
            window: None,
            last_mean: None,
        }
    }

    /// Takes ownership of the interface and runs the setup sequence.
    pub fn connect(interface: IF, config: DetectorConfig) -> DetectorResult<Self, IF> {
        let mut detector = Self::new(interface, config);
        detector.configure()?;
        Ok(detector)
    }

    /// Setup sequence. Allowed from `Idle` or, to reconnect, `Stopped`.
    pub fn configure(&mut self) -> DetectorResult<(), IF> {
        self.require(&[SessionState::Idle, SessionState::Stopped])?;
        self.state = SessionState::Configuring;

        // Make sure that the module is stopped
        self.host
            .write_register(Register::MAIN_CONTROL, register::MAIN_CONTROL_STOP)?;
        self.delay(self.config.stop_settle);
        self.host
            .write_register(Register::MAIN_CONTROL, register::MAIN_CONTROL_CLEAR_STATUS)?;

        let product_id = self.host.read_register(Register::PRODUCT_ID)?;
        let firmware_version = self.host.read_buffer_region(0)?;
        let info = ModuleInfo {
            product_id,
            firmware_version,
        };
        info!(
            "product id {:#010x}, firmware {}",
            info.product_id,
            info.version_str().unwrap_or("<binary>")
        );
        self.info = Some(info);

        self.host
            .write_register(Register::MODE_SELECTION, self.config.mode)?;
        self.host
            .write_register(Register::UPDATE_RATE, self.config.update_rate_mhz)?;
        self.host
            .write_register(Register::STREAMING_CONTROL, register::STREAMING_DISABLED)?;

        self.host.write_register(
            Register::MAIN_CONTROL,
            register::MAIN_CONTROL_CREATE_AND_ACTIVATE,
        )?;
        Ok(())
    }

    /// Waits for the module to run and reads its distance window.
    pub fn await_started(&mut self) -> DetectorResult<DistanceWindow, IF> {
        self.require(&[SessionState::Configuring])?;

        self.host.wait_start_within(self.config.start_timeout)?;
        info!("sensor activated");

        let window = DistanceWindow {
            start_mm: self.host.read_register(Register::RANGE_START)?,
            length_mm: self.host.read_register(Register::RANGE_LENGTH)?,
        };
        info!(
            "distance window: start {} mm, length {} mm",
            window.start_mm, window.length_mm
        );
        self.window = Some(window);
        self.state = SessionState::Started;
        Ok(window)
    }

    /// Runs one measurement cycle and updates the last mean distance.
    pub fn measure_cycle(&mut self) -> DetectorResult<DetectionResult, IF> {
        self.require(&[SessionState::Started, SessionState::Measuring])?;
        self.state = SessionState::Measuring;

        self.host
            .write_register(Register::MAIN_CONTROL, register::MAIN_CONTROL_CLEAR_STATUS)?;
        self.host.wait_for_data(self.config.data_timeout)?;

        let count = self.host.read_register(Register::PEAK_COUNT)?;
        if count as usize > MAX_PEAKS {
            return Err(ModuleError::PeakCountOutOfRange { count });
        }

        let mut result = DetectionResult::new();
        for index in 0..count {
            let distance_reg = Register::peak_distance(index)
                .ok_or(ModuleError::PeakCountOutOfRange { count })?;
            let amplitude_reg = Register::peak_amplitude(index)
                .ok_or(ModuleError::PeakCountOutOfRange { count })?;

            let peak = Peak {
                distance_mm: self.host.read_register(distance_reg)?,
                amplitude: self.host.read_register(amplitude_reg)?,
            };
            debug!(
                "peak {}: distance {} mm, amplitude {}",
                index, peak.distance_mm, peak.amplitude
            );
            result
                .push(peak)
                .map_err(|_| ModuleError::PeakCountOutOfRange { count })?;
        }

        if let Some(mean) = result.mean_distance() {
            self.last_mean = Some(mean);
        }
        info!(
            "detected {} peaks, mean distance {:?} mm",
            result.len(),
            result.mean_distance()
        );
        Ok(result)
    }

    /// Waits for the module, measures for `session_duration`, then stops it.
    pub fn start(&mut self) -> DetectorResult<(), IF> {
        self.start_with(|_| {})
    }

    /// Same as [`start`](Self::start), handing every cycle to `on_cycle`.
    pub fn start_with<F>(&mut self, mut on_cycle: F) -> DetectorResult<(), IF>
    where
        F: FnMut(&DetectionResult),
    {
        self.await_started()?;

        let begin = self.host.interface().now();
        while self.host.interface().now() - begin < self.config.session_duration {
            let result = self.measure_cycle()?;
            on_cycle(&result);
            self.delay(self.config.cycle_pause);
        }

        self.close()
    }

    /// Stops the module.
    pub fn close(&mut self) -> DetectorResult<(), IF> {
        self.host
            .write_register(Register::MAIN_CONTROL, register::MAIN_CONTROL_STOP)?;
        self.state = SessionState::Stopped;
        info!("sensor stopped");
        Ok(())
    }

    /// Mean distance of the latest cycle that saw a peak, 0 before any.
    pub fn last_distance(&self) -> f64 {
        self.last_mean.unwrap_or(0.0)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn info(&self) -> Option<&ModuleInfo> {
        self.info.as_ref()
    }

    pub fn distance_window(&self) -> Option<DistanceWindow> {
        self.window
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Direct register access on the session's own connection.
    pub fn host_mut(&mut self) -> &mut SyncHost<IF> {
        &mut self.host
    }

    /// Releases the interface. The module is not stopped.
    pub fn into_interface(self) -> IF {
        self.host.into_interface()
    }

    fn require(&self, allowed: &[SessionState]) -> DetectorResult<(), IF> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ModuleError::InvalidState { state: self.state })
        }
    }

    fn delay(&mut self, duration: core::time::Duration) {
        self.host.interface_mut().delay_ms(duration_to_ms(duration));
    }
}

#[cfg(feature = "std")]
impl DistanceDetector<crate::host::SerialInterface> {
    /// Opens the serial port and runs the setup sequence.
    pub fn open(
        serial: &crate::host::SerialConfig,
        config: DetectorConfig,
    ) -> Result<Self, ModuleError<std::io::Error>> {
        let interface = crate::host::SerialInterface::open(serial)
            .map_err(|e| ModuleError::Io(std::io::Error::from(e)))?;
        Self::connect(interface, config)
    }
}
