//! Control module for the survey robot
pub mod controllers;
pub mod cornering;

use crate::common::types::{Rgb, Wheel};
use crate::error::{FaultLog, Result};

/// Command surface of the robot hardware.
///
/// Commands are fire-and-forget and idempotent: repeating a speed is harmless.
pub trait ActuatorGateway {
    /// Set a wheel's angular rate in degrees per second
    fn set_wheel_speed(&mut self, wheel: Wheel, deg_per_sec: i32) -> Result<()>;

    fn set_indicator(&mut self, color: Rgb) -> Result<()>;
}

/// Motion classification for the current range reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    Stop,
    /// Both wheels at this rate (deg/s)
    Forward(i32),
    /// The wall is gone. A signal for the state machine, never a motion by itself
    CornerDetected,
}

/// Set both wheels to the same rate, recording failures per the fault policy
pub fn drive<A: ActuatorGateway + ?Sized>(
    actuators: &mut A,
    deg_per_sec: i32,
    faults: &mut FaultLog,
) -> Result<()> {
    for wheel in Wheel::BOTH {
        faults.absorb(actuators.set_wheel_speed(wheel, deg_per_sec))?;
    }
    Ok(())
}

pub fn stop<A: ActuatorGateway + ?Sized>(actuators: &mut A, faults: &mut FaultLog) -> Result<()> {
    drive(actuators, 0, faults)
}

/// Pivot on the held wheel by driving only `wheel`
pub fn pivot<A: ActuatorGateway + ?Sized>(
    actuators: &mut A,
    wheel: Wheel,
    deg_per_sec: i32,
    faults: &mut FaultLog,
) -> Result<()> {
    faults.absorb(actuators.set_wheel_speed(wheel.opposite(), 0))?;
    faults.absorb(actuators.set_wheel_speed(wheel, deg_per_sec))?;
    Ok(())
}

pub fn indicate<A: ActuatorGateway + ?Sized>(
    actuators: &mut A,
    color: Rgb,
    faults: &mut FaultLog,
) -> Result<()> {
    faults.absorb(actuators.set_indicator(color))?;
    Ok(())
}

/// Translate a motion command into wheel speeds.
///
/// `CornerDetected` only stops the wheels; turning is the caller's call.
pub fn apply<A: ActuatorGateway + ?Sized>(
    actuators: &mut A,
    command: MotionCommand,
    faults: &mut FaultLog,
) -> Result<()> {
    match command {
        MotionCommand::Forward(speed) => drive(actuators, speed, faults),
        MotionCommand::Stop | MotionCommand::CornerDetected => stop(actuators, faults),
    }
}
