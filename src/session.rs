use log::debug;

use crate::types::MeasurementMode;

/// Operating mode the sensor was last commanded into.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    MeasuringWithParticleMass,
    MeasuringGasOnly,
}

/// What recent reads say about the sensor, independent of what it was told.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Observed {
    /// Nothing read since the last command.
    #[default]
    Unknown,
    /// The last gated read produced a value.
    Producing,
    /// The last gated read came back invalid.
    NotProducing,
}

/// Channels a getter needs the session to be producing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Channels {
    /// Humidity, temperature, VOC and NOx.
    Gas,
    /// Particle mass and number concentrations.
    Particles,
}

/// Measurement session state.
///
/// Transitions happen when a command is issued, without reading back a
/// confirmation; the `observed` side is fed by the reads that follow.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    commanded: Mode,
    observed: Observed,
}

impl Session {
    pub fn commanded(&self) -> Mode {
        self.commanded
    }

    pub fn observed(&self) -> Observed {
        self.observed
    }

    pub fn is_measuring(&self) -> bool {
        self.commanded != Mode::Idle
    }

    pub(crate) fn start(&mut self, mode: MeasurementMode) {
        self.transition(match mode {
            MeasurementMode::WithParticleMass => Mode::MeasuringWithParticleMass,
            MeasurementMode::WithoutParticleMass => Mode::MeasuringGasOnly,
        });
    }

    pub(crate) fn stop(&mut self) {
        self.transition(Mode::Idle);
    }

    pub(crate) fn reset(&mut self) {
        self.transition(Mode::Idle);
    }

    pub(crate) fn permits(&self, channels: Channels) -> bool {
        match channels {
            Channels::Gas => self.is_measuring(),
            Channels::Particles => self.commanded == Mode::MeasuringWithParticleMass,
        }
    }

    pub(crate) fn observe(&mut self, valid: bool) {
        self.observed = if valid {
            Observed::Producing
        } else {
            Observed::NotProducing
        };
    }

    fn transition(&mut self, to: Mode) {
        debug!("session {:?} -> {:?}", self.commanded, to);
        self.commanded = to;
        self.observed = Observed::Unknown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let session = Session::default();
        assert_eq!(session.commanded(), Mode::Idle);
        assert!(!session.permits(Channels::Gas));
        assert!(!session.permits(Channels::Particles));
    }

    #[test]
    fn gas_only_gates_particles() {
        let mut session = Session::default();
        session.start(MeasurementMode::WithoutParticleMass);
        assert_eq!(session.commanded(), Mode::MeasuringGasOnly);
        assert!(session.permits(Channels::Gas));
        assert!(!session.permits(Channels::Particles));
    }

    #[test]
    fn start_from_any_state() {
        let mut session = Session::default();
        session.start(MeasurementMode::WithoutParticleMass);
        session.start(MeasurementMode::WithParticleMass);
        assert_eq!(session.commanded(), Mode::MeasuringWithParticleMass);
        assert!(session.permits(Channels::Particles));
    }

    #[test]
    fn stop_and_reset_return_to_idle() {
        let mut session = Session::default();
        session.start(MeasurementMode::WithParticleMass);
        session.stop();
        assert_eq!(session.commanded(), Mode::Idle);

        session.start(MeasurementMode::WithoutParticleMass);
        session.reset();
        assert_eq!(session.commanded(), Mode::Idle);
    }

    #[test]
    fn observation_clears_on_command() {
        let mut session = Session::default();
        session.start(MeasurementMode::WithParticleMass);
        session.observe(true);
        assert_eq!(session.observed(), Observed::Producing);
        session.observe(false);
        assert_eq!(session.observed(), Observed::NotProducing);
        session.stop();
        assert_eq!(session.observed(), Observed::Unknown);
    }
}
