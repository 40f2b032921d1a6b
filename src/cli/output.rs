//! Colored terminal output for the bundler.

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
            quiet,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = write!(&mut buffer, "✓");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print an error message to stderr (always shown)
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        if buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).is_err()
            || write!(&mut buffer, "Error:").is_err()
            || buffer.reset().is_err()
            || writeln!(&mut buffer, " {}", message).is_err()
            || bufwtr.print(&buffer).is_err()
        {
            eprintln!("Error: {}", message);
        }
    }

    /// Print a verbose message (only in verbose mode)
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Blue)));
        let _ = write!(&mut buffer, "→");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)));
        let _ = write!(&mut buffer, "⋯");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = writeln!(&mut buffer, "═══ {} ═══", title);
        let _ = buffer.reset();
        self.bufwtr.print(&buffer)
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "    {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a plain line, shown even in quiet mode
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "{}", message);
        self.bufwtr.print(&buffer)
    }
}
