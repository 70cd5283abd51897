use std::io::{self, Write};

use indicatif::{ProgressBar, ProgressStyle};

use crate::scanner::{FileRecord, ScanObserver, SkippedEntry};
use crate::utils::format_count;

const BAR_TEMPLATE: &str = "|{bar:50}| {percent}% scanned {human_pos}/{human_len} files";

/// Console side channel for a scan.
///
/// In verbose mode every directory, file and skipped entry is traced to
/// `out`. Otherwise a progress bar is drawn on stderr (hidden when stderr is
/// not a terminal) and `out` receives nothing until the scan ends.
pub struct ConsoleObserver<'a, W: Write> {
    out: &'a mut W,
    bar: Option<ProgressBar>,
}

impl<'a, W: Write> ConsoleObserver<'a, W> {
    pub fn verbose(out: &'a mut W) -> Self {
        Self { out, bar: None }
    }

    /// Condensed mode; `total` comes from a counting pass and sizes the bar.
    pub fn with_bar(out: &'a mut W, total: u64) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░");
        bar.set_style(style);
        Self {
            out,
            bar: Some(bar),
        }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl<W: Write> ScanObserver for ConsoleObserver<'_, W> {
    fn on_dir(&mut self, rel: &str) -> io::Result<()> {
        if self.bar.is_none() {
            writeln!(self.out, "  Processing directory: {rel}/")?;
        }
        Ok(())
    }

    fn on_file(&mut self, record: &FileRecord) -> io::Result<()> {
        match &self.bar {
            Some(bar) => bar.inc(1),
            None => writeln!(
                self.out,
                "  Found file: {} ({} bytes)",
                record.relative_path,
                format_count(record.size)
            )?,
        }
        Ok(())
    }

    fn on_skipped(&mut self, entry: &SkippedEntry) -> io::Result<()> {
        match &self.bar {
            Some(bar) => bar.inc(1),
            None => writeln!(
                self.out,
                "  WARNING: Could not access {}: {}",
                entry.path.display(),
                entry.reason
            )?,
        }
        Ok(())
    }
}
