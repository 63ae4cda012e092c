use std::io::{self, Write};

/// Write a line to stdout and, when a capture sink is attached, to it too.
pub fn println(message: &str, writer: &mut Option<&mut dyn Write>) -> io::Result<()> {
    writeln!(io::stdout(), "{message}")?;

    if let Some(w) = writer {
        writeln!(w, "{message}")?;
    }

    Ok(())
}
