/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::CliError;

use ::log::{Level, LevelFilter};
use ::std::fmt;

const KERNEL_CRATES: &[&str] = &["portmat", "portmat_linalg", "portmat_stats", "portmat_random", "portmat_config"];

/// Builder-style setup for logging
#[derive(Debug, Clone, Default)]
pub struct GlobalLogger {
    verbosity: Verbosity,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity { Default, Loud }

impl Default for Verbosity {
    fn default() -> Self { Verbosity::Default }
}

impl GlobalLogger {
    /// Any count is accepted; anything above zero makes the kernel crates
    /// log at `trace`.
    pub fn verbosity(&mut self, level: u64) -> &mut Self {
        self.verbosity = match level > 0 {
            true => Verbosity::Loud,
            false => Verbosity::Default,
        };
        self
    }

    /// Installs the global logger. Output goes to stderr, leaving stdout to results.
    pub fn apply(&mut self) -> Result<(), CliError> {
        use ::std::time::Instant;

        let start = Instant::now();
        let kernel_level = match self.verbosity {
            Verbosity::Default => LevelFilter::Debug,
            Verbosity::Loud => LevelFilter::Trace,
        };

        let mut fern = ::fern::Dispatch::new()
            .format(move |out, message, record| {
                let t = start.elapsed();
                out.finish(format_args!("[{:>4}.{:03}s][{}][{}] {}",
                    t.as_secs(),
                    t.subsec_millis(),
                    record.target(),
                    ColorizedLevel(record.level()),
                    message))
            })
            .level(LevelFilter::Info);
        for &name in KERNEL_CRATES {
            fern = fern.level_for(name, kernel_level);
        }
        fern.chain(::std::io::stderr()).apply()?;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ColorizedLevel(pub Level);

impl fmt::Display for ColorizedLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let style = match self.0 {
            Level::Error => ::ansi_term::Colour::Red.bold(),
            Level::Warn  => ::ansi_term::Colour::Red.normal(),
            Level::Info  => ::ansi_term::Colour::Cyan.bold(),
            Level::Debug => ::ansi_term::Colour::Yellow.dimmed(),
            Level::Trace => ::ansi_term::Colour::Cyan.normal(),
        };
        write!(f, "{}", style.paint(self.0.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_text_survives_coloring() {
        let shown = ColorizedLevel(Level::Warn).to_string();
        assert!(shown.contains("WARN"));
    }

    #[test]
    fn verbosity_saturates() {
        assert_eq!(GlobalLogger::default().verbosity(0).verbosity, Verbosity::Default);
        assert_eq!(GlobalLogger::default().verbosity(3).verbosity, Verbosity::Loud);
    }
}
