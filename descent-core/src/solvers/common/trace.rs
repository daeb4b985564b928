use std::fmt::Write;

use log::Level;

/// One diagnostic row; unset columns are omitted from the formatted line.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TraceRow {
    iter: usize,
    f: Option<f64>,
    grad_norm: Option<f64>,
    dx_norm: Option<f64>,
    alpha: Option<f64>,
    dphi0: Option<f64>,
    evals: Option<usize>,
    shift: Option<f64>,
    note: Option<&'static str>,
}

impl TraceRow {
    pub(crate) fn iter(iter: usize) -> Self {
        Self {
            iter,
            f: None,
            grad_norm: None,
            dx_norm: None,
            alpha: None,
            dphi0: None,
            evals: None,
            shift: None,
            note: None,
        }
    }

    pub(crate) fn f(mut self, f: f64) -> Self {
        self.f = Some(f);
        self
    }

    pub(crate) fn grad_norm(mut self, grad_norm: f64) -> Self {
        self.grad_norm = Some(grad_norm);
        self
    }

    pub(crate) fn dx_norm(mut self, dx_norm: f64) -> Self {
        self.dx_norm = Some(dx_norm);
        self
    }

    pub(crate) fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub(crate) fn dphi0(mut self, dphi0: f64) -> Self {
        self.dphi0 = Some(dphi0);
        self
    }

    pub(crate) fn evals(mut self, evals: usize) -> Self {
        self.evals = Some(evals);
        self
    }

    pub(crate) fn shift(mut self, shift: f64) -> Self {
        self.shift = Some(shift);
        self
    }

    pub(crate) fn note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }

    fn format_line(&self, solver: &str) -> String {
        let mut line = format!("[{}] iter {:>6}", solver, self.iter);
        if let Some(v) = self.f {
            let _ = write!(line, " | f {:>13.6e}", v);
        }
        if let Some(v) = self.grad_norm {
            let _ = write!(line, " | grad {:>13.6e}", v);
        }
        if let Some(v) = self.dx_norm {
            let _ = write!(line, " | dx {:>13.6e}", v);
        }
        if let Some(v) = self.alpha {
            let _ = write!(line, " | alpha {:>10.3e}", v);
        }
        if let Some(v) = self.dphi0 {
            let _ = write!(line, " | dphi0 {:>13.6e}", v);
        }
        if let Some(v) = self.evals {
            let _ = write!(line, " | evals {:>4}", v);
        }
        if let Some(v) = self.shift {
            let _ = write!(line, " | shift {:>10.3e}", v);
        }
        if let Some(note) = self.note {
            let _ = write!(line, " | note {note}");
        }
        line
    }
}

/// Routes per-iteration rows to the `log` facade.
///
/// Rows go out at `debug`, or `info` when the solver runs verbose.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SolverTracer {
    solver: &'static str,
    level: Level,
}

impl SolverTracer {
    pub(crate) fn new(solver: &'static str, verbose: bool) -> Self {
        Self {
            solver,
            level: if verbose { Level::Info } else { Level::Debug },
        }
    }

    pub(crate) fn solver(&self) -> &'static str {
        self.solver
    }

    pub(crate) fn emit(&self, row: TraceRow) {
        if log::log_enabled!(target: "descent::trace", self.level) {
            log::log!(target: "descent::trace", self.level, "{}", row.format_line(self.solver));
        }
    }

    pub(crate) fn warn(&self, row: TraceRow) {
        log::warn!(target: "descent::trace", "{}", row.format_line(self.solver));
    }
}
