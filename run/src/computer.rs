use std::collections::VecDeque;

use crate::decode::{self, Mode, Modes, Opcode};
use crate::error::{Error, Result};
use crate::fmt::Region;
use crate::mem::Memory;

/// The state of the computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed but never run.
    Ready,
    /// Executing instructions.
    Running,
    /// Stopped at an input instruction with nothing left in the input queue.
    ///
    /// Calling [`Computer::run`] with more input resumes at that instruction.
    AwaitingInput,
    /// Program execution has finished, or it failed.
    Halted,
}

/// An Intcode computer.
///
/// Each computer exclusively owns its memory and queues, so any number of
/// them can be driven side by side by the caller.
#[derive(Debug, Clone)]
pub struct Computer {
    mem: Memory,
    ptr: usize,
    relative_base: i64,
    state: State,
    input: VecDeque<i64>,
    output: VecDeque<i64>,
}

/// The parameters of the instruction currently being executed.
///
/// Each call to [`Computer::read`] or [`Computer::dest`] consumes the next
/// parameter cell and its mode.
#[derive(Debug)]
struct Params {
    /// Address of the instruction word.
    at: usize,
    word: i64,
    modes: Modes,
    /// Address of the next parameter cell, ends up as the address of the
    /// following instruction.
    next: usize,
}

impl Params {
    fn new(at: usize, word: i64) -> Self {
        Self {
            at,
            word,
            modes: decode::modes(word),
            next: at + 1,
        }
    }

    fn next(&mut self) -> Result<(Mode, usize)> {
        // `Modes` never ends.
        let mode = self.modes.next().unwrap_or(0);
        let mode = Mode::from_value(mode).ok_or(Error::UnknownMode {
            mode,
            word: self.word,
            ptr: self.at,
        })?;
        let cell = self.next;
        self.next += 1;
        Ok((mode, cell))
    }
}

impl Computer {
    /// Construct a new computer from a copy of the given program.
    pub fn new(program: &[i64]) -> Self {
        Self {
            mem: Memory::new(program),
            ptr: 0,
            relative_base: 0,
            state: State::Ready,
            input: VecDeque::new(),
            output: VecDeque::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The address of the next instruction to execute.
    pub fn ptr(&self) -> usize {
        self.ptr
    }

    pub fn relative_base(&self) -> i64 {
        self.relative_base
    }

    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    /// Direct access to memory, for patching a program before (or between)
    /// runs.
    pub fn mem_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    /// Queue the given input and execute until the program halts or needs
    /// more input than it has.
    ///
    /// Returns everything output since the previous call. Any input that the
    /// program did not consume stays queued for the next call.
    pub fn run(&mut self, input: impl IntoIterator<Item = i64>) -> Result<Vec<i64>> {
        if self.state == State::Halted {
            return Err(Error::Halted);
        }
        self.input.extend(input);
        self.state = State::Running;
        log::debug!("running from address {}", self.ptr);
        while self.state == State::Running {
            if let Err(err) = self.step() {
                self.state = State::Halted;
                return Err(err);
            }
        }
        match self.state {
            State::AwaitingInput => log::debug!("awaiting input at address {}", self.ptr),
            State::Halted => log::debug!("halted at address {}", self.ptr),
            _ => {}
        }
        Ok(self.output.drain(..).collect())
    }

    fn cast(&self, addr: i64) -> Result<usize> {
        usize::try_from(addr).map_err(|_| Error::NegativeAddress {
            addr,
            ptr: self.ptr,
        })
    }

    fn relative(&self, word: i64, raw: i64) -> Result<usize> {
        let addr = self
            .relative_base
            .checked_add(raw)
            .ok_or_else(|| self.overflow(word))?;
        self.cast(addr)
    }

    /// Resolve the next parameter as a value.
    fn read(&self, params: &mut Params) -> Result<i64> {
        let (mode, cell) = params.next()?;
        let raw = self.mem.get(cell);
        match mode {
            Mode::Positional => Ok(self.mem.get(self.cast(raw)?)),
            Mode::Immediate => Ok(raw),
            Mode::Relative => Ok(self.mem.get(self.relative(params.word, raw)?)),
        }
    }

    /// Resolve the next parameter as a destination address.
    fn dest(&self, params: &mut Params) -> Result<usize> {
        let (mode, cell) = params.next()?;
        let raw = self.mem.get(cell);
        match mode {
            Mode::Positional => self.cast(raw),
            Mode::Immediate => Err(Error::ImmediateWrite {
                word: params.word,
                ptr: params.at,
            }),
            Mode::Relative => self.relative(params.word, raw),
        }
    }

    fn overflow(&self, word: i64) -> Error {
        Error::Overflow {
            word,
            ptr: self.ptr,
        }
    }

    /// Execute a single instruction.
    fn step(&mut self) -> Result<()> {
        let word = self.mem.get(self.ptr);
        let opcode = decode::opcode(word);
        let opcode = Opcode::from_value(opcode).ok_or_else(|| Error::UnknownOpcode {
            opcode,
            word,
            ptr: self.ptr,
            region: Region::around(&self.mem, self.ptr),
        })?;
        log::trace!("{:>6}: {:?} ({})", self.ptr, opcode, word);

        let mut params = Params::new(self.ptr, word);
        let mut jump = None;
        match opcode {
            Opcode::Add => {
                let a = self.read(&mut params)?;
                let b = self.read(&mut params)?;
                let dest = self.dest(&mut params)?;
                let value = a.checked_add(b).ok_or_else(|| self.overflow(word))?;
                self.mem.set(dest, value);
            }
            Opcode::Multiply => {
                let a = self.read(&mut params)?;
                let b = self.read(&mut params)?;
                let dest = self.dest(&mut params)?;
                let value = a.checked_mul(b).ok_or_else(|| self.overflow(word))?;
                self.mem.set(dest, value);
            }
            Opcode::Input => {
                let value = match self.input.pop_front() {
                    Some(value) => value,
                    None => {
                        // Leave the pointer here so the instruction is retried
                        // in full on the next run.
                        self.state = State::AwaitingInput;
                        return Ok(());
                    }
                };
                let dest = self.dest(&mut params)?;
                self.mem.set(dest, value);
            }
            Opcode::Output => {
                let value = self.read(&mut params)?;
                self.output.push_back(value);
            }
            Opcode::JumpNonZero => {
                let cond = self.read(&mut params)?;
                let target = self.read(&mut params)?;
                if cond != 0 {
                    jump = Some(self.cast(target)?);
                }
            }
            Opcode::JumpZero => {
                let cond = self.read(&mut params)?;
                let target = self.read(&mut params)?;
                if cond == 0 {
                    jump = Some(self.cast(target)?);
                }
            }
            Opcode::LessThan => {
                let a = self.read(&mut params)?;
                let b = self.read(&mut params)?;
                let dest = self.dest(&mut params)?;
                self.mem.set(dest, (a < b) as i64);
            }
            Opcode::Equal => {
                let a = self.read(&mut params)?;
                let b = self.read(&mut params)?;
                let dest = self.dest(&mut params)?;
                self.mem.set(dest, (a == b) as i64);
            }
            Opcode::AdjustRelativeBase => {
                let delta = self.read(&mut params)?;
                self.relative_base = self
                    .relative_base
                    .checked_add(delta)
                    .ok_or_else(|| self.overflow(word))?;
            }
            Opcode::Halt => {
                self.state = State::Halted;
                return Ok(());
            }
        }
        self.ptr = jump.unwrap_or(params.next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[track_caller]
    fn run_to_halt(program: &[i64], input: &[i64]) -> (Computer, Vec<i64>) {
        let mut c = Computer::new(program);
        let output = c.run(input.iter().copied()).unwrap();
        assert_eq!(c.state(), State::Halted);
        (c, output)
    }

    #[test]
    fn starts_ready() {
        let c = Computer::new(&[99]);
        assert_eq!(c.state(), State::Ready);
        assert_eq!(c.ptr(), 0);
        assert_eq!(c.relative_base(), 0);
    }

    #[test]
    fn add_and_multiply() {
        let (c, _) = run_to_halt(&[1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50], &[]);
        assert_eq!(c.mem().as_slice(), &[3500, 9, 10, 70, 2, 3, 11, 0, 99, 30, 40, 50]);
    }

    #[test]
    fn out_parameters_are_never_dereferenced() {
        // Address 3 holds 5, the destination is 5 itself and not mem[5].
        let (c, _) = run_to_halt(&[1101, 2, 3, 5, 99, 0], &[]);
        assert_eq!(c.mem().get(5), 5);
    }

    #[test]
    fn missing_mode_digits_default_to_positional() {
        let (immediate, _) = run_to_halt(&[1101, 20, 22, 7, 99, 20, 22, 0], &[]);
        let (positional, _) = run_to_halt(&[1, 5, 6, 7, 99, 20, 22, 0], &[]);
        assert_eq!(immediate.mem().get(7), 42);
        assert_eq!(positional.mem().get(7), 42);
    }

    #[test]
    fn relative_mode_at_offset_zero_is_the_relative_base() {
        // ARB #10, then write input to rb+0 and output rb+0.
        let (c, output) = run_to_halt(&[109, 10, 203, 0, 204, 0, 99], &[17]);
        assert_eq!(c.relative_base(), 10);
        assert_eq!(c.mem().get(10), 17);
        assert_eq!(output, [17]);
    }

    #[test]
    fn negative_relative_base() {
        let (_, output) = run_to_halt(&[109, -1, 204, 5, 99], &[]);
        assert_eq!(output, [99]);
    }

    #[test]
    fn jumps_override_the_pointer() {
        // JNZ #1, #7 skips the output of 7.
        let (_, output) = run_to_halt(&[1105, 1, 7, 104, 7, 99, 0, 104, 8, 99], &[]);
        assert_eq!(output, [8]);
        // JZ #1, #7 falls through.
        let (_, output) = run_to_halt(&[1106, 1, 7, 104, 7, 99, 0, 104, 8, 99], &[]);
        assert_eq!(output, [7]);
    }

    #[test]
    fn suspends_without_consuming_the_input_instruction() {
        let mut c = Computer::new(&[3, 0, 4, 0, 99]);
        assert_eq!(c.run([]).unwrap(), Vec::<i64>::new());
        assert_eq!(c.state(), State::AwaitingInput);
        assert_eq!(c.ptr(), 0);
        assert_eq!(c.mem().get(0), 3);
        assert_eq!(c.run([7]).unwrap(), [7]);
        assert_eq!(c.state(), State::Halted);
    }

    #[test]
    fn unconsumed_input_is_kept() {
        let mut c = Computer::new(&[3, 20, 4, 20, 3, 20, 4, 20, 3, 20, 4, 20, 99]);
        assert_eq!(c.run([1, 2]).unwrap(), [1, 2]);
        assert_eq!(c.state(), State::AwaitingInput);
        assert_eq!(c.run([3, 4]).unwrap(), [3]);
        assert_eq!(c.state(), State::Halted);
    }

    #[test]
    fn output_is_drained_per_run() {
        let mut c = Computer::new(&[104, 1, 3, 20, 104, 2, 99]);
        assert_eq!(c.run([]).unwrap(), [1]);
        assert_eq!(c.run([0]).unwrap(), [2]);
    }

    #[test]
    fn run_after_halt_is_an_error() {
        let mut c = Computer::new(&[99]);
        c.run([]).unwrap();
        assert!(matches!(c.run([]), Err(Error::Halted)));
    }

    #[test]
    fn unknown_opcode() {
        let mut c = Computer::new(&[1101, 1, 1, 0, 42]);
        match c.run([]) {
            Err(Error::UnknownOpcode {
                opcode, word, ptr, ..
            }) => {
                assert_eq!((opcode, word, ptr), (42, 42, 4));
            }
            r => panic!("unexpected result `{:?}`", r),
        }
        assert_eq!(c.state(), State::Halted);
        assert!(matches!(c.run([]), Err(Error::Halted)));
    }

    #[test]
    fn negative_word_is_an_unknown_opcode() {
        let mut c = Computer::new(&[-99]);
        assert!(matches!(c.run([]), Err(Error::UnknownOpcode { word: -99, .. })));
    }

    #[test]
    fn unknown_mode() {
        let mut c = Computer::new(&[304, 0, 99]);
        assert!(matches!(
            c.run([]),
            Err(Error::UnknownMode { mode: 3, word: 304, ptr: 0 })
        ));
    }

    #[test]
    fn immediate_write_is_rejected() {
        let mut c = Computer::new(&[11101, 1, 1, 0, 99]);
        assert!(matches!(
            c.run([]),
            Err(Error::ImmediateWrite { word: 11101, ptr: 0 })
        ));
    }

    #[test]
    fn negative_addresses() {
        let mut c = Computer::new(&[4, -1, 99]);
        assert!(matches!(
            c.run([]),
            Err(Error::NegativeAddress { addr: -1, ptr: 0 })
        ));
        let mut c = Computer::new(&[1105, 1, -3, 99]);
        assert!(matches!(
            c.run([]),
            Err(Error::NegativeAddress { addr: -3, ptr: 0 })
        ));
        let mut c = Computer::new(&[109, -5, 203, 0, 99]);
        assert!(matches!(
            c.run([1]),
            Err(Error::NegativeAddress { addr: -5, ptr: 2 })
        ));
    }

    #[test]
    fn relative_out_parameters_are_never_dereferenced() {
        // ARB #50; ADD #2, #3, rb+1; OUT 51
        let (c, output) = run_to_halt(&[109, 50, 21101, 2, 3, 1, 4, 51, 99], &[]);
        assert_eq!(output, [5]);
        assert_eq!(c.mem().get(1), 50);
        // ARB #50; LT #2, #3, rb+1; EQ #2, #3, rb+2; OUT 51; OUT 52
        let (_, output) = run_to_halt(
            &[109, 50, 21107, 2, 3, 1, 21108, 2, 3, 2, 4, 51, 4, 52, 99],
            &[],
        );
        assert_eq!(output, [1, 0]);
        // ARB #50; MUL #6, #7, rb+0; OUT 50
        let (_, output) = run_to_halt(&[109, 50, 21102, 6, 7, 0, 4, 50, 99], &[]);
        assert_eq!(output, [42]);
    }

    #[test]
    fn overflow_is_an_error() {
        let mut c = Computer::new(&[1102, i64::MAX, 2, 0, 99]);
        assert!(matches!(c.run([]), Err(Error::Overflow { ptr: 0, .. })));
        let mut c = Computer::new(&[1101, i64::MAX, 1, 0, 99]);
        assert!(matches!(c.run([]), Err(Error::Overflow { ptr: 0, .. })));
        let mut c = Computer::new(&[109, i64::MAX, 109, 1, 99]);
        assert!(matches!(c.run([]), Err(Error::Overflow { ptr: 2, .. })));
        assert_eq!(c.state(), State::Halted);
    }

    #[test]
    fn input_is_written_once_available() {
        let mut c = Computer::new(&[3, 5, 4, 5, 99, 0]);
        assert_eq!(c.run([]).unwrap(), Vec::<i64>::new());
        assert_eq!(c.mem().get(5), 0);
        assert_eq!(c.run([-8]).unwrap(), [-8]);
        assert_eq!(c.mem().get(5), -8);
    }

    #[test]
    fn memory_can_be_patched_before_running() {
        let program = [1, 0, 0, 0, 99];
        let mut c = Computer::new(&program);
        c.mem_mut().set(1, 4);
        c.mem_mut().set(2, 4);
        c.run([]).unwrap();
        assert_eq!(c.mem().get(0), 198);
        assert_eq!(program[0], 1);
    }

    #[test]
    fn writes_beyond_the_program() {
        let (c, output) = run_to_halt(&[1101, 2, 3, 1000, 4, 1000, 99], &[]);
        assert_eq!(c.mem().get(1000), 5);
        assert_eq!(output, [5]);
    }

    #[test]
    fn display_dumps_memory() {
        let c = Computer::new(&[1, 2, 3]);
        let dump = c.to_string();
        assert!(dump.starts_with("ptr: 0\nrelative base: 0\nstate: Ready\n"));
        assert!(dump.contains("      0:>       1        2        3"));
    }
}
