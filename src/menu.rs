//! The interactive console menu.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::{network::Network, render::View, topology};

/// The number of failed iterations in a row after which the menu gives up.
pub const MAX_CONSECUTIVE_ERRORS: usize = 3;

/// What to do after a menu iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The options offered at the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Choice {
    ShortestPath,
    CriticalNode,
    SimulateFailures,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(Self::ShortestPath),
            "2" => Some(Self::CriticalNode),
            "3" => Some(Self::SimulateFailures),
            "4" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// A read-eval-print loop of network queries over any line-based input and output.
pub struct Menu<R, W> {
    network: Network,
    input: R,
    output: W,
    display: bool,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(network: Network, input: R, output: W) -> Self {
        Self {
            network,
            input,
            output,
            display: true,
        }
    }

    /// Toggles rendering the network before each menu.
    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    /// Returns the output, consuming the menu.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the menu until the user exits or the input ends.
    ///
    /// An I/O error is reported and the loop carries on, unless it happens
    /// [`MAX_CONSECUTIVE_ERRORS`] times in a row, in which case it is returned.
    pub fn run(&mut self) -> io::Result<()> {
        let mut failures = 0;

        loop {
            match self.step() {
                Ok(Flow::Exit) => return Ok(()),
                Ok(Flow::Continue) => failures = 0,
                Err(e) => {
                    failures += 1;
                    warn!(error = %e, failures, "menu iteration failed");

                    // The output may be what is failing, so reporting is best effort.
                    let _ = writeln!(self.output, "An unexpected error occurred: {e}");

                    if failures >= MAX_CONSECUTIVE_ERRORS {
                        return Err(e);
                    }
                }
            }
        }
    }

    //
    // Private
    //

    fn step(&mut self) -> io::Result<Flow> {
        if self.display {
            writeln!(self.output, "\nDisplaying {}...", topology::SCHOOL_TITLE)?;
            let view = View::new(topology::SCHOOL_TITLE, self.network.graph_mut());
            writeln!(self.output, "{view}")?;
        }

        writeln!(self.output, "\nChoose an option:")?;
        writeln!(self.output, "1. Find Shortest Path")?;
        writeln!(self.output, "2. Find Critical Node")?;
        writeln!(self.output, "3. Simulate Node Failures")?;
        writeln!(self.output, "4. Exit")?;

        let Some(input) = self.prompt("Enter your choice: ")? else {
            return self.end_of_input();
        };

        debug!(input = %input, "menu choice");

        match Choice::parse(&input) {
            Some(Choice::ShortestPath) => self.shortest_path(),
            Some(Choice::CriticalNode) => self.critical_node(),
            Some(Choice::SimulateFailures) => self.simulate_failures(),
            Some(Choice::Exit) => self.exit(),
            None => {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn shortest_path(&mut self) -> io::Result<Flow> {
        let Some(source) = self.prompt("Enter source node: ")? else {
            return self.end_of_input();
        };
        let Some(target) = self.prompt("Enter target node: ")? else {
            return self.end_of_input();
        };

        match self.network.shortest_path(&source, &target) {
            Ok(route) => writeln!(self.output, "{route}")?,
            Err(e) => writeln!(self.output, "{e}")?,
        }

        Ok(Flow::Continue)
    }

    fn critical_node(&mut self) -> io::Result<Flow> {
        match self.network.critical_node() {
            Some(critical) => writeln!(self.output, "{critical}")?,
            None => writeln!(self.output, "The network has no nodes.")?,
        }

        Ok(Flow::Continue)
    }

    fn simulate_failures(&mut self) -> io::Result<Flow> {
        let Some(line) = self.prompt("Enter nodes to fail (comma-separated): ")? else {
            return self.end_of_input();
        };

        let nodes: Vec<&str> = line
            .split(',')
            .map(str::trim)
            .filter(|node| !node.is_empty())
            .collect();

        let report = self.network.simulate_failures(&nodes);
        writeln!(self.output, "{report}")?;

        if self.display {
            let title = report.title();
            let mut graph = report.into_graph();
            writeln!(self.output, "\n{}", View::new(title, &mut graph))?;
        }

        Ok(Flow::Continue)
    }

    fn exit(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "Exiting the program. Goodbye!")?;
        Ok(Flow::Exit)
    }

    /// Exits as if the user had asked to, after ending the unanswered prompt's line.
    fn end_of_input(&mut self) -> io::Result<Flow> {
        debug!("input exhausted");
        writeln!(self.output)?;
        self.exit()
    }

    /// Shows `message` and reads one trimmed line, `None` once the input is exhausted.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }
}
