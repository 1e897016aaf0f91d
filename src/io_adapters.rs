use crate::error::{Result, ShellError};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::io::{BufRead, BufReader, IsTerminal, Result as IoResult, Write};
use std::rc::Rc;

/// Prompt shown before each read on an interactive terminal.
pub const PROMPT: &str = "$ ";

/// Where the session loop gets its lines from.
pub trait LineSource {
    /// Read the next line. `Ok(None)` means the input is exhausted.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Whether a person is typing at a terminal.
    fn is_interactive(&self) -> bool {
        false
    }
}

/// Lines from any buffered byte stream, e.g. piped stdin or a file. No prompt.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub struct StreamLines<R> {
    reader: R,
}

impl<R: BufRead> StreamLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for StreamLines<R> {
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Interactive terminal input through `rustyline`, prompting with [`PROMPT`].
///
/// Nothing is added to the editor's history. Ctrl-C discards the current line and
/// prompts again.
pub struct Editor {
    editor: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Editor {
    fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => return Ok(Some(line)),
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(ShellError::Readline(err)),
            }
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// The line source for this process: the editor when stdin is a terminal, a plain
/// buffered reader otherwise.
pub fn stdin_source() -> Result<Box<dyn LineSource>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        tracing::debug!("reading from terminal");
        Ok(Box::new(Editor::new()?))
    } else {
        tracing::debug!("reading from stream");
        Ok(Box::new(StreamLines::new(BufReader::new(stdin))))
    }
}

/// Memory-backed writer for capturing interpreter output.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self {
            buf: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
