use anyhow::bail;

use cellgraph::namespace::EffectTracker;

/// One namespace access performed by a [`ScriptedUnit`].
#[derive(Debug, Clone)]
pub enum Op<V> {
    Read(String),
    /// Read that fails the unit when the symbol is missing.
    Require(String),
    Write(String, V),
    Delete(String),
    Fail(String),
}

/// A fake unit body that:
/// - replays a fixed list of reads/writes against the tracker
/// - records the values it read, in order
pub struct ScriptedUnit<V> {
    ops: Vec<Op<V>>,
}

impl<V: Clone> ScriptedUnit<V> {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn read(mut self, symbol: &str) -> Self {
        self.ops.push(Op::Read(symbol.to_string()));
        self
    }

    pub fn require(mut self, symbol: &str) -> Self {
        self.ops.push(Op::Require(symbol.to_string()));
        self
    }

    pub fn write(mut self, symbol: &str, value: V) -> Self {
        self.ops.push(Op::Write(symbol.to_string(), value));
        self
    }

    pub fn delete(mut self, symbol: &str) -> Self {
        self.ops.push(Op::Delete(symbol.to_string()));
        self
    }

    pub fn fail(mut self, message: &str) -> Self {
        self.ops.push(Op::Fail(message.to_string()));
        self
    }

    /// Replay the script; returns the values seen by `Read`/`Require`.
    pub fn run(&self, tracker: &mut EffectTracker<V>) -> anyhow::Result<Vec<Option<V>>> {
        let mut seen = Vec::new();
        for op in &self.ops {
            match op {
                Op::Read(symbol) => seen.push(tracker.get(symbol).cloned()),
                Op::Require(symbol) => match tracker.get(symbol).cloned() {
                    Some(value) => seen.push(Some(value)),
                    None => bail!("name '{symbol}' is not defined"),
                },
                Op::Write(symbol, value) => {
                    tracker.set(symbol.clone(), value.clone());
                }
                Op::Delete(symbol) => {
                    tracker.remove(symbol);
                }
                Op::Fail(message) => bail!("{message}"),
            }
        }
        Ok(seen)
    }

    /// Executor callback for `Session::run_unit`.
    pub fn executor(&self) -> impl FnOnce(&mut EffectTracker<V>) -> anyhow::Result<()> + '_ {
        move |tracker| self.run(tracker).map(|_| ())
    }
}

impl<V: Clone> Default for ScriptedUnit<V> {
    fn default() -> Self {
        Self::new()
    }
}
