use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

/// Where recovered errors are reported so gameplay is never interrupted.
const DIAGNOSTIC_LOG: &str = "debug.log";

/// One graded attempt, ready to be appended to a variant's log file.
#[derive(Debug)]
pub struct AttemptRecord<'a> {
    pub question: &'a str,
    pub raw_input: &'a str,
    pub correct_answer: &'a str,
    pub is_correct: bool,
    /// Mode-specific suffix (streak, level, battle HP); empty for none.
    pub extra: &'a str,
}

/// Create the log file with its banner if it does not exist yet.
pub fn ensure_log(path: &Path, banner: &str) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    let mut file = OpenOptions::new().create(true).write(true).open(path)?;
    writeln!(file, "{}", banner)?;
    writeln!(file)?;
    Ok(())
}

/// Append one attempt line. The file is opened and closed per write, so the
/// handle never outlives the call.
pub fn append_attempt(path: &Path, record: &AttemptRecord) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let result = if record.is_correct {
        "CORRECT"
    } else {
        "INCORRECT"
    };

    let mut line = format!(
        "[{}] Q: {} | User: {} | Correct: {} | {}",
        timestamp, record.question, record.raw_input, record.correct_answer, result
    );
    if !record.extra.is_empty() {
        line.push_str(" | ");
        line.push_str(record.extra);
    }
    writeln!(file, "{}", line)?;
    Ok(())
}

/// Record a recovered I/O error to the diagnostic log, using the same
/// open-append-close discipline as the attempt log. Best-effort: if even this
/// write fails there is nowhere left to report, so the error is dropped.
pub fn report_error(context: &str, error: &io::Error) {
    let _ = append_diagnostic(Path::new(DIAGNOSTIC_LOG), context, error);
}

fn append_diagnostic(path: &Path, context: &str, error: &io::Error) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "[{}] {}: {}", timestamp, context, error)?;
    Ok(())
}
