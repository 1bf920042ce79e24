use std::io::{BufRead, Write};
use std::str::Utf8Error;

use tracing::{debug, error, trace};

use crate::command::{InputType, MetaCommand};
use crate::error::{Error, PrepareError, Result};
use crate::executor::{Outcome, execute};
use crate::table::Table;

pub const PROMPT: &str = "db > ";

/// Holds the raw bytes of the most recently read line, without its line terminator.
#[derive(Debug, Default)]
pub struct InputBuffer {
    buffer: Vec<u8>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// The line as text. Lines that are not UTF-8 are rejected per line.
    pub fn as_str(&self) -> std::result::Result<&str, Utf8Error> {
        std::str::from_utf8(&self.buffer)
    }

    /// Reads the next line. Running out of input is an error.
    pub fn read_input<R: BufRead>(&mut self, reader: &mut R) -> Result<()> {
        self.buffer.clear();
        let read = reader
            .read_until(b'\n', &mut self.buffer)
            .map_err(Error::ReadInput)?;
        if read == 0 {
            return Err(Error::InputClosed);
        }

        while matches!(self.buffer.last(), Some(b'\n' | b'\r')) {
            self.buffer.pop();
        }
        Ok(())
    }
}

/// Whether the loop should read another line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// One interpreter session over a single table.
#[derive(Debug, Default)]
pub struct Session {
    table: Table,
}

impl Session {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Runs the prompt loop until `.exit`.
    ///
    /// Returns an error if the input ends or fails first.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        let mut input_buffer = InputBuffer::new();

        loop {
            print_prompt(&mut output)?;
            if let Err(err) = input_buffer.read_input(&mut input) {
                error!(%err, "failed to read input");
                return Err(err);
            }

            let control = match input_buffer.as_str() {
                Ok(line) => self.handle_line(line, &mut output)?,
                Err(err) => {
                    debug!(%err, "rejecting line that is not valid UTF-8");
                    writeln!(output, "{}", PrepareError::SyntaxError)?;
                    Control::Continue
                }
            };

            if control == Control::Exit {
                output.flush()?;
                return Ok(());
            }
        }
    }

    /// Classifies, compiles and executes one line, writing its response to `output`.
    pub fn handle_line<W: Write>(&mut self, line: &str, output: &mut W) -> Result<Control> {
        trace!(line, "dispatching");

        match InputType::parse(line) {
            InputType::Meta(Ok(MetaCommand::Exit)) => return Ok(Control::Exit),
            InputType::Meta(Err(err)) => writeln!(output, "{err}")?,
            InputType::Statement(Err(err)) => writeln!(output, "{err}")?,
            InputType::Statement(Ok(statement)) => match execute(statement, &mut self.table) {
                Ok(Outcome::Inserted) => writeln!(output, "Executed.")?,
                Ok(Outcome::Selected(rows)) => {
                    for row in rows {
                        writeln!(output, "{row}")?;
                    }
                    writeln!(output, "Executed.")?;
                }
                Err(err) => writeln!(output, "{err}")?,
            },
        }

        Ok(Control::Continue)
    }
}

fn print_prompt<W: Write>(output: &mut W) -> Result<()> {
    write!(output, "{PROMPT}")?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run_script(lines: &[&str]) -> (Result<()>, String, Session) {
        let mut session = Session::default();
        let mut output = Vec::new();
        let result = session.run(Cursor::new(lines.join("\n")), &mut output);
        (result, String::from_utf8(output).unwrap(), session)
    }

    #[test]
    fn input_buffer_strips_line_endings() {
        let mut reader = Cursor::new("select\r\ninsert 1 a b\n.exit");
        let mut buffer = InputBuffer::new();

        buffer.read_input(&mut reader).unwrap();
        assert_eq!(buffer.as_str(), Ok("select"));
        buffer.read_input(&mut reader).unwrap();
        assert_eq!(buffer.as_str(), Ok("insert 1 a b"));
        buffer.read_input(&mut reader).unwrap();
        assert_eq!(buffer.as_bytes(), b".exit");
        assert!(matches!(
            buffer.read_input(&mut reader),
            Err(Error::InputClosed)
        ));
    }

    #[test]
    fn end_to_end_insert_and_select() {
        let (result, output, session) = run_script(&[
            "insert 1 alice alice@x.com",
            "insert 2 bob bob@x.com",
            "select",
            ".exit",
        ]);

        assert!(result.is_ok());
        assert_eq!(
            output,
            "db > Executed.\n\
             db > Executed.\n\
             db > (1, alice, alice@x.com)\n\
             (2, bob, bob@x.com)\n\
             Executed.\n\
             db > "
        );
        assert_eq!(session.table().row_count(), 2);
    }

    #[test]
    fn unrecognized_meta_command_keeps_the_loop_running() {
        let (result, output, _) = run_script(&[".help", "select", ".exit"]);

        assert!(result.is_ok());
        assert_eq!(
            output,
            "db > Unrecognized command '.help'.\ndb > Executed.\ndb > "
        );
    }

    #[test]
    fn errors_are_reported_once_each() {
        let (result, output, session) =
            run_script(&["delete 1", "insert 1 foo", "insert -1 a b", ".exit"]);

        assert!(result.is_ok());
        assert_eq!(
            output,
            "db > Unrecognized keyword at start of 'delete 1'. \n\
             db > Syntax error. Could not parse statement. \n\
             db > ID must be positive.\n\
             db > "
        );
        assert_eq!(session.table().row_count(), 0);
    }

    #[test]
    fn non_utf8_line_is_rejected_and_the_loop_continues() {
        let mut session = Session::default();
        let mut output = Vec::new();
        let input = b"insert 1 caf\xe9 a@x\ninsert 2 bob b@x\nselect\n.exit\n";

        assert!(session.run(Cursor::new(input.to_vec()), &mut output).is_ok());
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "db > Syntax error. Could not parse statement. \n\
             db > Executed.\n\
             db > (2, bob, b@x)\n\
             Executed.\n\
             db > "
        );
        assert_eq!(session.table().row_count(), 1);
    }

    #[test]
    fn nul_inside_a_field_is_not_stored() {
        let (result, output, session) = run_script(&["insert 1 a\0b a@x", "select", ".exit"]);

        assert!(result.is_ok());
        assert_eq!(
            output,
            "db > Syntax error. Could not parse statement. \ndb > Executed.\ndb > "
        );
        assert_eq!(session.table().row_count(), 0);
    }

    struct FailingReader;

    impl std::io::Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::Other.into())
        }
    }

    impl BufRead for FailingReader {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            Err(std::io::ErrorKind::Other.into())
        }

        fn consume(&mut self, _: usize) {}
    }

    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn read_failures_and_write_failures_are_told_apart() {
        let mut session = Session::default();

        let read = session.run(FailingReader, Vec::new()).unwrap_err();
        assert!(matches!(read, Error::ReadInput(_)));
        assert!(read.is_input_failure());

        let write = session.run(Cursor::new("select\n"), ClosedWriter).unwrap_err();
        assert!(matches!(write, Error::Io(_)));
        assert!(!write.is_input_failure());
    }

    #[test]
    fn running_out_of_input_is_fatal() {
        let (result, output, _) = run_script(&["insert 1 a b"]);

        assert!(matches!(result, Err(Error::InputClosed)));
        assert_eq!(output, "db > Executed.\ndb > ");
    }

    #[test]
    fn handle_line_reports_exit() {
        let mut session = Session::default();
        let mut output = Vec::new();

        assert_eq!(session.handle_line(".exit", &mut output).unwrap(), Control::Exit);
        assert_eq!(session.handle_line("select", &mut output).unwrap(), Control::Continue);
        assert_eq!(output, b"Executed.\n");
    }
}
