use super::{Argument, PredicateResult};

/// Accumulates `column <op> $n` conditions with positionally aligned arguments.
///
/// Placeholders are numbered from `$1` in the order conditions are added.
/// Absent or empty inputs add nothing, so no placeholder is ever left unbound.
#[derive(Debug)]
pub struct PredicateBuilder {
    conditions: Vec<String>,
    arguments: Vec<Argument>,
    next: usize,
}

impl Default for PredicateBuilder {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            arguments: Vec::new(),
            next: 1,
        }
    }
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = ANY($n)` with the whole sequence bound as one array argument.
    pub fn any(&mut self, column: &str, values: &[String]) -> &mut Self {
        if values.is_empty() {
            return self;
        }
        let n = self.next_placeholder();
        self.push(format!("{column} = ANY(${n})"), Argument::from(values))
    }

    /// `column = $n`, skipped when `value` is `None`.
    pub fn eq<T: Into<Argument>>(&mut self, column: &str, value: Option<T>) -> &mut Self {
        let Some(value) = value else {
            return self;
        };
        let n = self.next_placeholder();
        self.push(format!("{column} = ${n}"), value.into())
    }

    fn next_placeholder(&mut self) -> usize {
        let n = self.next;
        self.next += 1;
        n
    }

    fn push(&mut self, condition: String, argument: Argument) -> &mut Self {
        self.conditions.push(condition);
        self.arguments.push(argument);
        self
    }

    pub fn finish(self) -> PredicateResult {
        PredicateResult {
            conditions: self.conditions,
            arguments: self.arguments,
        }
    }
}
