//! Several computers wired together.
//!
//! Each computer in a network takes the output of the previous one as its
//! input, and the last one optionally feeds back into the first.

use itertools::Itertools;

use crate::computer::{Computer, State};
use crate::error::{Error, Result};

/// A chain of computers running the same program.
#[derive(Debug, Clone)]
pub struct Network {
    machines: Vec<Computer>,
    /// Phase settings that have not been fed to their machine yet.
    phases: Vec<Option<i64>>,
}

impl Network {
    /// Construct a network with one computer per phase setting.
    ///
    /// Each phase setting is queued as the first input of its computer.
    pub fn new(program: &[i64], phases: &[i64]) -> Self {
        Self {
            machines: phases.iter().map(|_| Computer::new(program)).collect(),
            phases: phases.iter().copied().map(Some).collect(),
        }
    }

    pub fn machines(&self) -> &[Computer] {
        &self.machines
    }

    /// Whether every computer in the chain has halted.
    pub fn is_halted(&self) -> bool {
        self.machines.iter().all(|c| c.state() == State::Halted)
    }

    /// Run every computer that has not halted once, in order, piping the
    /// output of each into the next. Returns the output of the last computer
    /// that ran.
    pub fn pass(&mut self, input: Vec<i64>) -> Result<Vec<i64>> {
        let mut values = input;
        let machines = self.machines.iter_mut().zip(&mut self.phases);
        for (index, (machine, phase)) in machines.enumerate() {
            if machine.state() == State::Halted {
                log::trace!("machine {} has halted, passing {:?} on", index, values);
                continue;
            }
            let input = phase.take().into_iter().chain(values);
            values = machine.run(input)?;
            log::trace!("machine {} produced {:?}", index, values);
            if values.is_empty() {
                return Err(Error::NoSignal { index });
            }
        }
        Ok(values)
    }

    /// Send a signal through the chain once and return the final signal.
    pub fn pipeline(&mut self, signal: i64) -> Result<i64> {
        let values = self.pass(vec![signal])?;
        Ok(values.last().copied().unwrap_or(signal))
    }

    /// Keep sending signals around the loop until every computer halts, then
    /// return the last signal that came out of the end of the chain.
    pub fn feedback(&mut self, signal: i64) -> Result<i64> {
        let mut signal = signal;
        loop {
            signal = self.pipeline(signal)?;
            if self.is_halted() {
                break Ok(signal);
            }
        }
    }
}

/// Find the phase settings that produce the highest signal.
///
/// Every permutation of `phases` is tried, each in a fresh network starting
/// from a signal of zero.
pub fn max_signal(program: &[i64], phases: &[i64], feedback: bool) -> Result<(i64, Vec<i64>)> {
    let mut best: Option<(i64, Vec<i64>)> = None;
    for order in phases.iter().copied().permutations(phases.len()) {
        let mut network = Network::new(program, &order);
        let signal = if feedback {
            network.feedback(0)?
        } else {
            network.pipeline(0)?
        };
        log::debug!("phases {:?} produced {}", order, signal);
        if best.as_ref().map_or(true, |(max, _)| signal > *max) {
            best = Some((signal, order));
        }
    }
    Ok(best.unwrap_or_else(|| (0, Vec::new())))
}
