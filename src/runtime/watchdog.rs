//! Per-call deadlines for robot hardware
//!
//! A stalled bus read would otherwise block the tick loop forever. The
//! watchdog moves the robot onto its own thread and waits at most the
//! configured deadline for each call. An overrun comes back as an ordinary
//! sensor or actuator failure, so the fault policy decides what happens next.
//! At most one request waits behind a stalled call; further calls time out
//! without being queued.

use crate::common::types::{Rgb, Voltage, Wheel};
use crate::control::ActuatorGateway;
use crate::error::{ActuatorKind, Result, SensorKind, SurveyError};
use crate::lifecycle::LifecycleNode;
use crate::perception::sensors::{EncoderSample, RangeSample, SensorGateway};
use crate::Robot;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use std::time::{Duration, Instant};

enum Request {
    ReadRange,
    ReadEncoder(Wheel),
    ReadBattery,
    SetWheelSpeed(Wheel, i32),
    SetIndicator(Rgb),
    Configure,
    Activate,
    Deactivate,
    Cleanup,
}

enum Reply {
    Range(Result<RangeSample>),
    Encoder(Result<EncoderSample>),
    Battery(Result<Voltage>),
    Done(Result<()>),
}

const DEADLINE_EXCEEDED: &str = "deadline exceeded";
const WORKER_GONE: &str = "robot worker stopped";

/// Robot proxy that bounds every hardware call
pub struct Watchdog {
    requests: Sender<(u64, Request)>,
    replies: Receiver<(u64, Reply)>,
    deadline: Duration,
    next_id: u64,
}

impl Watchdog {
    /// Move `robot` onto a worker thread
    pub fn spawn<R: Robot + 'static>(robot: R, deadline: Duration) -> Result<Self> {
        let (requests, request_rx) = bounded::<(u64, Request)>(1);
        let (reply_tx, replies) = unbounded::<(u64, Reply)>();

        std::thread::Builder::new()
            .name("robot-io".to_string())
            .spawn(move || serve(robot, request_rx, reply_tx))
            .map_err(|e| SurveyError::Lifecycle(format!("failed to start robot worker: {}", e)))?;

        Ok(Watchdog {
            requests,
            replies,
            deadline,
            next_id: 0,
        })
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    fn call(&mut self, request: Request) -> std::result::Result<Reply, &'static str> {
        let id = self.next_id;
        self.next_id += 1;

        let until = Instant::now() + self.deadline;
        match self.requests.send_deadline((id, request), until) {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(_)) => return Err(DEADLINE_EXCEEDED),
            Err(SendTimeoutError::Disconnected(_)) => return Err(WORKER_GONE),
        }

        loop {
            match self.replies.recv_deadline(until) {
                Ok((reply_id, reply)) if reply_id == id => return Ok(reply),
                // answer to a call that already timed out
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => return Err(DEADLINE_EXCEEDED),
                Err(RecvTimeoutError::Disconnected) => return Err(WORKER_GONE),
            }
        }
    }

    fn command(&mut self, request: Request, actuator: ActuatorKind) -> Result<()> {
        match self.call(request) {
            Ok(Reply::Done(result)) => result,
            Ok(_) => Err(SurveyError::actuator(actuator, "unexpected reply")),
            Err(reason) => Err(SurveyError::actuator(actuator, reason)),
        }
    }

    fn lifecycle(&mut self, request: Request) -> Result<()> {
        match self.call(request) {
            Ok(Reply::Done(result)) => result,
            Ok(_) => Err(SurveyError::Lifecycle("unexpected reply".to_string())),
            Err(reason) => Err(SurveyError::Lifecycle(reason.to_string())),
        }
    }
}

fn serve<R: Robot>(
    mut robot: R,
    requests: Receiver<(u64, Request)>,
    replies: Sender<(u64, Reply)>,
) {
    for (id, request) in requests.iter() {
        let reply = match request {
            Request::ReadRange => Reply::Range(robot.read_range()),
            Request::ReadEncoder(wheel) => Reply::Encoder(robot.read_encoder(wheel)),
            Request::ReadBattery => Reply::Battery(robot.read_battery()),
            Request::SetWheelSpeed(wheel, speed) => {
                Reply::Done(robot.set_wheel_speed(wheel, speed))
            }
            Request::SetIndicator(color) => Reply::Done(robot.set_indicator(color)),
            Request::Configure => Reply::Done(robot.on_configure()),
            Request::Activate => Reply::Done(robot.on_activate()),
            Request::Deactivate => Reply::Done(robot.on_deactivate()),
            Request::Cleanup => Reply::Done(robot.on_cleanup()),
        };
        if replies.send((id, reply)).is_err() {
            break;
        }
    }
    tracing::debug!("Robot worker exiting");
}

impl SensorGateway for Watchdog {
    fn read_range(&mut self) -> Result<RangeSample> {
        match self.call(Request::ReadRange) {
            Ok(Reply::Range(result)) => result,
            Ok(_) => Err(SurveyError::sensor(SensorKind::Range, "unexpected reply")),
            Err(reason) => Err(SurveyError::sensor(SensorKind::Range, reason)),
        }
    }

    fn read_encoder(&mut self, wheel: Wheel) -> Result<EncoderSample> {
        match self.call(Request::ReadEncoder(wheel)) {
            Ok(Reply::Encoder(result)) => result,
            Ok(_) => Err(SurveyError::sensor(
                SensorKind::Encoder(wheel),
                "unexpected reply",
            )),
            Err(reason) => Err(SurveyError::sensor(SensorKind::Encoder(wheel), reason)),
        }
    }

    fn read_battery(&mut self) -> Result<Voltage> {
        match self.call(Request::ReadBattery) {
            Ok(Reply::Battery(result)) => result,
            Ok(_) => Err(SurveyError::sensor(SensorKind::Battery, "unexpected reply")),
            Err(reason) => Err(SurveyError::sensor(SensorKind::Battery, reason)),
        }
    }
}

impl ActuatorGateway for Watchdog {
    fn set_wheel_speed(&mut self, wheel: Wheel, deg_per_sec: i32) -> Result<()> {
        self.command(
            Request::SetWheelSpeed(wheel, deg_per_sec),
            ActuatorKind::Wheel(wheel),
        )
    }

    fn set_indicator(&mut self, color: Rgb) -> Result<()> {
        self.command(Request::SetIndicator(color), ActuatorKind::Indicator)
    }
}

impl LifecycleNode for Watchdog {
    fn on_configure(&mut self) -> Result<()> {
        self.lifecycle(Request::Configure)
    }

    fn on_activate(&mut self) -> Result<()> {
        self.lifecycle(Request::Activate)
    }

    fn on_deactivate(&mut self) -> Result<()> {
        self.lifecycle(Request::Deactivate)
    }

    fn on_cleanup(&mut self) -> Result<()> {
        self.lifecycle(Request::Cleanup)
    }
}
