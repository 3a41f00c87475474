//! Perception module for the survey robot
pub mod filters;
pub mod localization;
pub mod sensors;

use self::sensors::{EncoderSample, SensorGateway};
use crate::common::types::{Voltage, Wheel};
use crate::error::{FaultLog, Result, SensorKind, SurveyError};

/// Sensor values for one tick.
///
/// Values are the latest valid ones; the `fresh_*` flags say whether they
/// were read this tick or held over from an earlier one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFrame {
    pub range_cm: Option<i32>,
    pub encoder: Option<EncoderSample>,
    pub battery: Option<Voltage>,
    pub fresh_range: bool,
    pub fresh_encoder: bool,
    pub fresh_battery: bool,
}

impl SensorFrame {
    /// Both tally inputs were read this tick
    pub fn is_fresh(&self) -> bool {
        self.fresh_range && self.fresh_encoder
    }
}

/// Reads the sensors once per tick, holding the last valid value of each
#[derive(Debug, Clone)]
pub struct SensorSampler {
    encoder_wheel: Wheel,
    range_cm: Option<i32>,
    encoder: Option<EncoderSample>,
    battery: Option<Voltage>,
}

impl SensorSampler {
    pub fn new(encoder_wheel: Wheel) -> Self {
        SensorSampler {
            encoder_wheel,
            range_cm: None,
            encoder: None,
            battery: None,
        }
    }

    /// Read range, encoder and battery without retrying failed reads
    pub fn sample<S: SensorGateway + ?Sized>(
        &mut self,
        sensors: &mut S,
        faults: &mut FaultLog,
    ) -> Result<SensorFrame> {
        let fresh_range = self.sample_range(sensors, faults)?.is_some();

        let encoder = faults.absorb(sensors.read_encoder(self.encoder_wheel))?;
        let fresh_encoder = encoder.is_some();
        if encoder.is_some() {
            self.encoder = encoder;
        }

        let battery = faults.absorb(sensors.read_battery())?;
        let fresh_battery = battery.is_some();
        if battery.is_some() {
            self.battery = battery;
        }

        Ok(SensorFrame {
            range_cm: self.range_cm,
            encoder: self.encoder,
            battery: self.battery,
            fresh_range,
            fresh_encoder,
            fresh_battery,
        })
    }

    /// Read only the rangefinder; `None` when the read failed or was invalid
    pub fn sample_range<S: SensorGateway + ?Sized>(
        &mut self,
        sensors: &mut S,
        faults: &mut FaultLog,
    ) -> Result<Option<i32>> {
        let reading = sensors.read_range().and_then(|sample| {
            if sample.valid {
                Ok(sample.cm)
            } else {
                Err(SurveyError::sensor(
                    SensorKind::Range,
                    format!("invalid sample ({} cm)", sample.cm),
                ))
            }
        });

        let range = faults.absorb(reading)?;
        if range.is_some() {
            self.range_cm = range;
        }
        Ok(range)
    }

    pub fn range_cm(&self) -> Option<i32> {
        self.range_cm
    }

    pub fn encoder(&self) -> Option<EncoderSample> {
        self.encoder
    }

    pub fn battery(&self) -> Option<Voltage> {
        self.battery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultPolicy;
    use crate::perception::sensors::RangeSample;

    struct Flaky {
        range: Result<RangeSample>,
        encoder: Result<EncoderSample>,
    }

    impl SensorGateway for Flaky {
        fn read_range(&mut self) -> Result<RangeSample> {
            self.range.clone()
        }

        fn read_encoder(&mut self, _wheel: Wheel) -> Result<EncoderSample> {
            self.encoder.clone()
        }

        fn read_battery(&mut self) -> Result<Voltage> {
            Ok(Voltage(11.1))
        }
    }

    #[test]
    fn holds_last_valid_values_on_failure() {
        let mut sampler = SensorSampler::new(Wheel::Left);
        let mut faults = FaultLog::new(FaultPolicy::SoftFail);
        let mut hw = Flaky {
            range: Ok(RangeSample::valid(42)),
            encoder: Ok(EncoderSample::new(10)),
        };

        let frame = sampler.sample(&mut hw, &mut faults).unwrap();
        assert!(frame.is_fresh());

        hw.range = Err(SurveyError::sensor(SensorKind::Range, "timeout"));
        hw.encoder = Err(SurveyError::sensor(SensorKind::Encoder(Wheel::Left), "nak"));
        let frame = sampler.sample(&mut hw, &mut faults).unwrap();
        assert!(!frame.is_fresh());
        assert_eq!(frame.range_cm, Some(42));
        assert_eq!(frame.encoder, Some(EncoderSample::new(10)));
        assert_eq!(faults.faults().len(), 2);
    }

    #[test]
    fn invalid_range_counts_as_failure() {
        let mut sampler = SensorSampler::new(Wheel::Left);
        let mut faults = FaultLog::new(FaultPolicy::FailFast);
        let mut hw = Flaky {
            range: Ok(RangeSample::invalid(-1)),
            encoder: Ok(EncoderSample::new(0)),
        };
        assert!(sampler.sample(&mut hw, &mut faults).is_err());
        assert_eq!(sampler.range_cm(), None);
    }
}
