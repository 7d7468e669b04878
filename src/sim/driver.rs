//! Repeated button presses.
//!
//! The engine only knows about a single press. This module sums counts
//! over many presses and, because the reachable state space is finite,
//! can shortcut long press sequences by finding the point where the
//! engine's state cells repeat.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use super::engine::{Engine, PulseCount};
use crate::circuit::Level;
use crate::error::{PulseError, Result};
use crate::DEFAULT_PRESSES;

/// Default number of presses searched for a repeating state.
pub const DEFAULT_CYCLE_LIMIT: usize = 100_000;

/// Configuration for a sequence of presses.
#[derive(Debug, Clone)]
pub struct PressConfig {
    /// Number of button presses.
    pub presses: u64,
    /// Extrapolate from a repeating state instead of pressing every time.
    pub detect_cycles: bool,
    /// Presses to search for a repeating state before falling back to
    /// pressing every time.
    pub cycle_limit: usize,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            presses: DEFAULT_PRESSES,
            detect_cycles: true,
            cycle_limit: DEFAULT_CYCLE_LIMIT,
        }
    }
}

impl PressConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of presses.
    pub fn with_presses(mut self, presses: u64) -> Self {
        self.presses = presses;
        self
    }

    /// Enable or disable cycle extrapolation.
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Set the cycle search limit.
    ///
    /// Every searched press keeps a copy of the state cells, so memory
    /// grows linearly with the limit.
    pub fn with_cycle_limit(mut self, limit: usize) -> Self {
        self.cycle_limit = limit;
        self
    }
}

/// A repeating sequence of presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Presses before the repeating part starts
    pub offset: usize,
    /// Length of the repeating part
    pub period: usize,
    /// Counts of the first `offset + period` presses
    pub history: Vec<PulseCount>,
}

impl Cycle {
    /// Counts of presses `offset..offset + period`.
    pub fn repeating(&self) -> &[PulseCount] {
        &self.history[self.offset..]
    }

    /// Total counts over the first `presses` presses, `None` if they
    /// exceed `u64`.
    pub fn total(&self, presses: u64) -> Option<PulseCount> {
        if presses <= self.history.len() as u64 {
            return Some(self.history[..presses as usize].iter().copied().sum());
        }

        let prefix: PulseCount = self.history[..self.offset].iter().copied().sum();
        let remaining = presses - self.offset as u64;
        let period = self.period as u64;
        let repeating = self.repeating();

        let full: PulseCount = repeating.iter().copied().sum();
        let partial: PulseCount = repeating[..(remaining % period) as usize].iter().copied().sum();

        full.checked_mul(remaining / period)?
            .checked_add(prefix)?
            .checked_add(partial)
    }
}

/// Press the button `presses` times and sum the counts.
pub fn press_many(engine: &mut Engine, presses: u64) -> PulseCount {
    (0..presses).map(|_| engine.run()).sum()
}

/// Press until the engine returns to a state it was in before a previous
/// press, searching at most `limit` presses.
///
/// The engine is left in the state where the repeat was found.
pub fn detect_cycle(engine: &mut Engine, limit: usize) -> Option<Cycle> {
    let (history, found) = search(engine, limit);
    found.map(|(offset, period)| Cycle {
        offset,
        period,
        history,
    })
}

/// Returns the counts of every press made, and `(offset, period)` if a
/// state repeated.
fn search(engine: &mut Engine, limit: usize) -> (Vec<PulseCount>, Option<(usize, usize)>) {
    let mut seen: HashMap<Vec<Level>, usize> = HashMap::new();
    let mut history = Vec::new();

    loop {
        if let Some(&offset) = seen.get(engine.cells()) {
            let period = history.len() - offset;
            log::info!("state repeats after {} presses (offset {}, period {})", history.len(), offset, period);
            return (history, Some((offset, period)));
        }
        if history.len() >= limit {
            return (history, None);
        }
        seen.insert(engine.cells().to_vec(), history.len());
        history.push(engine.run());
    }
}

/// Trace sink that remembers whether any write to it failed.
struct FusedSink<'a> {
    inner: &'a mut dyn Write,
    failed: bool,
}

impl Write for FusedSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write(buf);
        self.failed |= result.is_err();
        result
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let result = self.inner.write_fmt(args);
        self.failed |= result.is_err();
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Press the button as configured and return the summed counts.
///
/// With a trace sink every press is simulated and traced. Once a write to
/// the sink fails, the remaining presses run untraced.
pub fn run_presses(engine: &mut Engine, config: &PressConfig, trace: Option<&mut dyn Write>) -> Result<PulseCount> {
    let overflow = || PulseError::CountOverflow {
        presses: config.presses,
    };

    if let Some(inner) = trace {
        let mut sink = FusedSink { inner, failed: false };
        let mut total = PulseCount::default();
        for _ in 0..config.presses {
            let count = if sink.failed {
                engine.run()
            } else {
                engine.run_traced(&mut sink)
            };
            total = total.checked_add(count).ok_or_else(overflow)?;
        }
        return Ok(total);
    }

    if !config.detect_cycles {
        return Ok(press_many(engine, config.presses));
    }

    let limit = usize::try_from(config.presses).map_or(config.cycle_limit, |p| p.min(config.cycle_limit));
    match search(engine, limit) {
        (history, Some((offset, period))) => Cycle {
            offset,
            period,
            history,
        }
        .total(config.presses)
        .ok_or_else(overflow),
        (history, None) => {
            let done = history.len() as u64;
            if done < config.presses {
                log::info!("no repeating state within {} presses", done);
            }
            history
                .into_iter()
                .sum::<PulseCount>()
                .checked_add(press_many(engine, config.presses - done))
                .ok_or_else(overflow)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;
    use crate::dsl;

    const INVERTER: &str = "broadcaster -> a, b\n%a -> inv\n%b -> inv\n&inv -> output";

    const LATCH: &str = "broadcaster -> a\n%a -> inv, con\n&inv -> b\n%b -> con\n&con -> output";

    const COUNTER3: &str = "broadcaster -> a\n%a -> b\n%b -> c\n%c -> out";

    fn engine(input: &str) -> Engine {
        Engine::new(Circuit::from_ast(dsl::parse(input).unwrap()).unwrap())
    }

    #[test]
    fn test_press_many() {
        let mut e = engine(INVERTER);
        assert_eq!(press_many(&mut e, 2), PulseCount::new(5, 9));
        assert_eq!(press_many(&mut e, 0), PulseCount::default());
    }

    #[test]
    fn test_detect_cycle_inverter() {
        let mut e = engine(INVERTER);
        let cycle = detect_cycle(&mut e, 100).unwrap();
        assert_eq!(cycle.offset, 0);
        assert_eq!(cycle.period, 2);
        assert_eq!(cycle.history, vec![PulseCount::new(3, 4), PulseCount::new(2, 5)]);
        assert_eq!(cycle.total(1000), Some(PulseCount::new(2500, 4500)));
        assert_eq!(cycle.total(3), Some(PulseCount::new(8, 13)));
        assert_eq!(cycle.total(1), Some(PulseCount::new(3, 4)));
        assert_eq!(cycle.total(u64::MAX), None);
    }

    #[test]
    fn test_counter_state_space() {
        let mut e = engine(COUNTER3);
        let cycle = detect_cycle(&mut e, 100).unwrap();
        assert_eq!((cycle.offset, cycle.period), (0, 8));
    }

    #[test]
    fn test_sequence_repeats_after_state_space() {
        let mut e = engine(COUNTER3);
        let counts: Vec<PulseCount> = (0..24).map(|_| e.run()).collect();
        for i in 0..16 {
            assert_eq!(counts[i], counts[i + 8]);
        }
    }

    #[test]
    fn test_cycle_limit_too_small() {
        let mut e = engine(COUNTER3);
        assert_eq!(detect_cycle(&mut e, 4), None);
        assert_eq!(e.presses(), 4);
    }

    #[test]
    fn test_extrapolation_matches_brute_force() {
        for input in [INVERTER, LATCH, COUNTER3] {
            for presses in [0, 1, 7, 1000] {
                let brute = press_many(&mut engine(input), presses);
                let config = PressConfig::new().with_presses(presses);
                assert_eq!(run_presses(&mut engine(input), &config, None).unwrap(), brute);
            }
        }
    }

    #[test]
    fn test_latch_thousand_presses() {
        let config = PressConfig::default();
        let total = run_presses(&mut engine(LATCH), &config, None).unwrap();
        assert_eq!(total, PulseCount::new(2750, 4250));
    }

    #[test]
    fn test_fallback_when_no_cycle_found() {
        let config = PressConfig::new().with_presses(20).with_cycle_limit(3);
        let total = run_presses(&mut engine(COUNTER3), &config, None).unwrap();
        assert_eq!(total, press_many(&mut engine(COUNTER3), 20));
    }

    #[test]
    fn test_traced_presses() {
        let config = PressConfig::new().with_presses(2);
        let mut out = Vec::new();
        let total = run_presses(&mut engine(INVERTER), &config, Some(&mut out as &mut dyn Write)).unwrap();
        assert_eq!(total, PulseCount::new(5, 9));
        // 14 pulses, two of them seeds
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 12);
    }

    #[test]
    fn test_cycle_detection_disabled() {
        let config = PressConfig::new().with_presses(10).with_cycle_detection(false);
        let mut e = engine(INVERTER);
        run_presses(&mut e, &config, None).unwrap();
        assert_eq!(e.presses(), 10);
    }

    #[test]
    fn test_extrapolation_to_large_press_counts() {
        let config = PressConfig::new().with_presses(1_000_000_000_000);
        let total = run_presses(&mut engine(INVERTER), &config, None).unwrap();
        assert_eq!(total, PulseCount::new(2_500_000_000_000, 4_500_000_000_000));
        // high * low no longer fits
        assert_eq!(total.product(), None);
    }

    #[test]
    fn test_press_count_overflow() {
        let presses = u64::MAX / 2;
        let config = PressConfig::new().with_presses(presses);
        let err = run_presses(&mut engine(INVERTER), &config, None).unwrap_err();
        assert!(matches!(err, PulseError::CountOverflow { presses: p } if p == presses));
    }

    struct ClosedSink {
        attempts: usize,
    }

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_trace_stays_off() {
        let config = PressConfig::new().with_presses(1000);
        let mut sink = ClosedSink { attempts: 0 };
        let total = run_presses(&mut engine(LATCH), &config, Some(&mut sink as &mut dyn Write)).unwrap();
        assert_eq!(total, PulseCount::new(2750, 4250));
        assert_eq!(sink.attempts, 1);
    }
}
