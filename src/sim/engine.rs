//! Breadth-first pulse engine.

use std::collections::VecDeque;
use std::fmt;
use std::io::Write;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::circuit::{CellId, Circuit, Level, ModuleId, ModuleKind};

/// Number of pulses seen at each level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PulseCount {
    /// High pulses
    pub high: u64,
    /// Low pulses
    pub low: u64,
}

impl PulseCount {
    /// Create a pulse count.
    pub fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Count one pulse.
    pub fn record(&mut self, level: Level) {
        match level {
            Level::High => self.high += 1,
            Level::Low => self.low += 1,
        }
    }

    /// Total number of pulses.
    pub fn total(&self) -> u64 {
        self.high + self.low
    }

    /// Product of high and low counts, `None` on overflow.
    pub fn product(&self) -> Option<u64> {
        self.high.checked_mul(self.low)
    }

    /// Sum of two counts, `None` on overflow.
    pub fn checked_add(self, rhs: PulseCount) -> Option<PulseCount> {
        Some(PulseCount {
            high: self.high.checked_add(rhs.high)?,
            low: self.low.checked_add(rhs.low)?,
        })
    }

    /// Count repeated `times` times, `None` on overflow.
    pub fn checked_mul(self, times: u64) -> Option<PulseCount> {
        Some(PulseCount {
            high: self.high.checked_mul(times)?,
            low: self.low.checked_mul(times)?,
        })
    }
}

impl Add for PulseCount {
    type Output = PulseCount;

    fn add(self, rhs: PulseCount) -> PulseCount {
        PulseCount {
            high: self.high + rhs.high,
            low: self.low + rhs.low,
        }
    }
}

impl AddAssign for PulseCount {
    fn add_assign(&mut self, rhs: PulseCount) {
        self.high += rhs.high;
        self.low += rhs.low;
    }
}

impl Sum for PulseCount {
    fn sum<I: Iterator<Item = PulseCount>>(iter: I) -> PulseCount {
        iter.fold(PulseCount::default(), Add::add)
    }
}

impl From<PulseCount> for (u64, u64) {
    fn from(count: PulseCount) -> (u64, u64) {
        (count.high, count.low)
    }
}

impl fmt::Display for PulseCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.high, self.low)
    }
}

/// A fan-out entry: where an output pulse goes and which cell it lands in.
#[derive(Debug, Clone, Copy)]
struct Edge {
    target: ModuleId,
    /// `None` for sinks
    cell: Option<CellId>,
}

#[derive(Debug, Clone, Copy)]
struct Pulse {
    target: ModuleId,
    cell: Option<CellId>,
    level: Level,
}

/// Behavioural state of one module. Levels live in the engine's cell array.
#[derive(Debug, Clone)]
enum ModuleState {
    Broadcast,
    FlipFlop {
        cell: CellId,
    },
    Conjunction {
        /// One cell per incoming edge, in edge declaration order
        inputs: Vec<CellId>,
        /// Number of `inputs` currently high
        high: usize,
    },
}

/// The pulse engine.
///
/// Owns the state cells of every module. State carries over from one
/// [`run`](Engine::run) to the next.
pub struct Engine {
    /// The network being simulated
    circuit: Circuit,
    /// One bit per state cell; cell 0 is the broadcast placeholder
    cells: Vec<Level>,
    /// Per declared module
    states: Vec<ModuleState>,
    /// Per declared module, in declared output order
    fan_out: Vec<Vec<Edge>>,
    /// Entry point of every press
    broadcaster: Option<ModuleId>,
    /// Number of completed runs
    presses: u64,
}

impl Engine {
    /// Create an engine with every module in its initial state.
    ///
    /// The circuit is expected to have passed
    /// [`validate_circuit`](crate::circuit::validate_circuit). Without a
    /// broadcast module each press only counts its seed pulse.
    pub fn new(circuit: Circuit) -> Self {
        let mut cells = vec![Level::Low];

        let mut states = Vec::with_capacity(circuit.len());
        for module in &circuit.modules {
            let state = match module.kind {
                ModuleKind::Broadcast => ModuleState::Broadcast,
                ModuleKind::FlipFlop => {
                    cells.push(Level::Low);
                    ModuleState::FlipFlop {
                        cell: CellId(cells.len() - 1),
                    }
                }
                ModuleKind::Conjunction => ModuleState::Conjunction {
                    inputs: Vec::new(),
                    high: 0,
                },
            };
            states.push(state);
        }

        // Every edge into a conjunction gets its own cell
        let mut fan_out = Vec::with_capacity(circuit.len());
        for module in &circuit.modules {
            let mut edges = Vec::with_capacity(module.outputs.len());
            for &target in &module.outputs {
                let cell = match states.get_mut(target.0) {
                    None => None,
                    Some(ModuleState::Broadcast) => Some(CellId::BROADCAST),
                    Some(ModuleState::FlipFlop { cell }) => Some(*cell),
                    Some(ModuleState::Conjunction { inputs, .. }) => {
                        let cell = CellId(cells.len());
                        cells.push(Level::Low);
                        inputs.push(cell);
                        Some(cell)
                    }
                };
                edges.push(Edge { target, cell });
            }
            fan_out.push(edges);
        }

        let broadcaster = circuit.broadcaster();
        log::debug!(
            "engine ready: {} modules, {} sinks, {} state cells",
            circuit.len(),
            circuit.total_names().saturating_sub(circuit.len()),
            cells.len()
        );

        Self {
            circuit,
            cells,
            states,
            fan_out,
            broadcaster,
            presses: 0,
        }
    }

    /// Press the button once and propagate until the queue drains.
    pub fn run(&mut self) -> PulseCount {
        self.propagate(None)
    }

    /// Like [`run`](Engine::run), writing one `source -level-> target` line
    /// to `sink` for every enqueued pulse.
    ///
    /// Write failures disable the trace for the rest of the press and never
    /// change the result.
    pub fn run_traced(&mut self, sink: &mut dyn Write) -> PulseCount {
        self.propagate(Some(sink))
    }

    fn propagate(&mut self, mut tap: Option<&mut dyn Write>) -> PulseCount {
        let mut count = PulseCount::default();
        let mut queue = VecDeque::new();

        match self.broadcaster {
            Some(target) => queue.push_back(Pulse {
                target,
                cell: Some(CellId::BROADCAST),
                level: Level::Low,
            }),
            None => count.record(Level::Low),
        }

        while let Some(pulse) = queue.pop_front() {
            count.record(pulse.level);

            // Sinks absorb
            let Some(input) = pulse.cell else {
                continue;
            };

            let output = match &mut self.states[pulse.target.0] {
                ModuleState::Broadcast => Some(pulse.level),
                ModuleState::FlipFlop { cell } => match pulse.level {
                    Level::High => None,
                    Level::Low => {
                        let state = self.cells[cell.0].toggled();
                        self.cells[cell.0] = state;
                        Some(state)
                    }
                },
                ModuleState::Conjunction { inputs, high } => {
                    let previous = self.cells[input.0];
                    match (previous, pulse.level) {
                        (Level::Low, Level::High) => *high += 1,
                        (Level::High, Level::Low) => *high -= 1,
                        _ => {}
                    }
                    self.cells[input.0] = pulse.level;
                    debug_assert_eq!(
                        *high,
                        inputs.iter().filter(|c| self.cells[c.0] == Level::High).count()
                    );

                    if *high == inputs.len() {
                        Some(Level::Low)
                    } else {
                        Some(Level::High)
                    }
                }
            };

            let Some(level) = output else {
                continue;
            };

            for edge in &self.fan_out[pulse.target.0] {
                if tap.is_some() {
                    trace_pulse(&mut tap, &self.circuit, pulse.target, edge.target, level);
                }
                queue.push_back(Pulse {
                    target: edge.target,
                    cell: edge.cell,
                    level,
                });
            }
        }

        self.presses += 1;
        log::trace!("press {}: {} high, {} low", self.presses, count.high, count.low);
        count
    }

    /// The simulated network.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Current value of every state cell.
    pub fn cells(&self) -> &[Level] {
        &self.cells
    }

    /// Number of completed presses.
    pub fn presses(&self) -> u64 {
        self.presses
    }

    /// State of a flip-flop, `None` for any other module.
    pub fn flip_flop_level(&self, id: ModuleId) -> Option<Level> {
        match self.states.get(id.0)? {
            ModuleState::FlipFlop { cell } => Some(self.cells[cell.0]),
            _ => None,
        }
    }

    /// Memory of a conjunction as `(inputs remembered high, input count)`.
    pub fn conjunction_memory(&self, id: ModuleId) -> Option<(usize, usize)> {
        match self.states.get(id.0)? {
            ModuleState::Conjunction { inputs, high } => Some((*high, inputs.len())),
            _ => None,
        }
    }
}

/// Module name for the trace, falling back to the ID when the name table
/// does not cover it.
struct Label<'a>(&'a Circuit, ModuleId);

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.module_name(self.1) {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.1),
        }
    }
}

fn trace_pulse(
    tap: &mut Option<&mut dyn Write>,
    circuit: &Circuit,
    source: ModuleId,
    target: ModuleId,
    level: Level,
) {
    let result = match tap {
        Some(sink) => writeln!(
            sink,
            "{} -{}-> {}",
            Label(circuit, source),
            level,
            Label(circuit, target)
        ),
        None => return,
    };
    if let Err(e) = result {
        log::warn!("pulse trace disabled: {}", e);
        *tap = None;
    }
}
