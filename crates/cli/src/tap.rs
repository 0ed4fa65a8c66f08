/// TAP (Test Anything Protocol) v14 output.
/// Writes to stdout.
pub struct Tap {
    tests: Vec<TapTest>,
}

enum Outcome {
    Ok,
    NotOk(String),
    Skip(String),
}

struct TapTest {
    desc: String,
    outcome: Outcome,
}

impl Tap {
    pub fn new() -> Self {
        Tap { tests: Vec::new() }
    }

    pub fn ok(&mut self, desc: impl Into<String>) {
        self.push(desc, Outcome::Ok);
    }

    pub fn not_ok(&mut self, desc: impl Into<String>, diagnostics: impl Into<String>) {
        self.push(desc, Outcome::NotOk(diagnostics.into()));
    }

    /// A point that was not run, reported as passing with a `# SKIP` directive.
    pub fn skip(&mut self, desc: impl Into<String>, reason: impl Into<String>) {
        self.push(desc, Outcome::Skip(reason.into()));
    }

    fn push(&mut self, desc: impl Into<String>, outcome: Outcome) {
        self.tests.push(TapTest {
            desc: desc.into(),
            outcome,
        });
    }

    pub fn finish(self, quiet: bool) {
        print!("{}", self.render(quiet));
    }

    /// The TAP report. `quiet` keeps only failing points and the summary.
    fn render(&self, quiet: bool) -> String {
        let mut out = String::new();
        if !quiet {
            out.push_str("TAP version 14\n");
            out.push_str(&format!("1..{}\n", self.tests.len()));
        }
        let mut pass = 0usize;
        let mut skip = 0usize;
        for (i, t) in self.tests.iter().enumerate() {
            let n = i + 1;
            match &t.outcome {
                Outcome::Ok => {
                    if !quiet {
                        out.push_str(&format!("ok {} - {}\n", n, t.desc));
                    }
                    pass += 1;
                }
                Outcome::Skip(reason) => {
                    if !quiet {
                        out.push_str(&format!("ok {} - {} # SKIP {}\n", n, t.desc, reason));
                    }
                    skip += 1;
                }
                Outcome::NotOk(diag) => {
                    out.push_str(&format!("not ok {} - {}\n", n, t.desc));
                    for line in diag.lines() {
                        out.push_str(&format!("  # {}\n", line));
                    }
                }
            }
        }
        out.push_str(&format!("# tests {}\n", self.tests.len()));
        out.push_str(&format!("# pass  {}\n", pass));
        out.push_str(&format!("# skip  {}\n", skip));
        out.push_str(&format!("# fail  {}\n", self.failure_count()));
        out
    }

    pub fn failure_count(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| matches!(t.outcome, Outcome::NotOk(_)))
            .count()
    }
}
