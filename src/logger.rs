use chrono::{DateTime, Local, NaiveDate, Timelike};
use log::{LevelFilter, Log, Metadata, ParseLevelError, Record, SetLoggerError};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(PartialEq, Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    File,
    Console,
    Both,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub mode: LogMode,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> LogConfig {
        LogConfig {
            dir: PathBuf::from("logs"),
            mode: LogMode::Both,
            level: "info".to_owned(),
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ParseLevelError> {
        self.level.parse()
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum InitError {
        Level(err: ParseLevelError) {
            display("invalid log level: {}", err)
            from()
        }
        SetLogger(err: SetLoggerError) {
            display("couldn't install logger: {}", err)
            from()
        }
    }
}

/// Where file logs currently go.
///
/// A day's file is kept until after 6 AM of the next day, or until the log
/// has been quiet for four hours, so that late-night logs stay together.
struct LogFiles {
    base_dir: PathBuf,
    cur_date: NaiveDate,
    last_log: DateTime<Local>,
    day_passed: bool,
}

impl LogFiles {
    fn gen_path(&self, source: &str, date: &NaiveDate) -> io::Result<PathBuf> {
        let base_dir = self.base_dir.as_path();
        let year_str = format!("{}", date.format("%Y"));
        let month_str = format!("{}", date.format("%m"));
        let day_str = format!("{}", date.format("%d"));

        let path = base_dir.join(source).join(year_str).join(month_str);
        fs::create_dir_all(&path)?;
        Ok(path.join(format!("{}.txt", day_str)))
    }

    fn write(&mut self, source: &str, now: DateTime<Local>, line: &str) -> io::Result<()> {
        let time_diff = now.signed_duration_since(self.last_log);
        if now.date_naive() > self.last_log.date_naive() {
            self.day_passed = true;
        }

        if self.day_passed && (time_diff.num_seconds() > 14400 || now.hour() >= 6) {
            self.cur_date = now.date_naive();
            self.day_passed = false;
        }

        let path = self.gen_path(source, &self.cur_date)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        self.last_log = now;
        Ok(())
    }
}

/// Backend of the `log` macros: prints to the console and/or appends to
/// `<dir>/<source>/<year>/<month>/<day>.txt`, where the source is the last
/// segment of the record's target.
pub struct Logger {
    mode: LogMode,
    level: LevelFilter,
    files: Mutex<LogFiles>,
}

impl Logger {
    pub fn new<P: AsRef<Path>>(path: P, mode: LogMode, level: LevelFilter) -> Logger {
        let now = Local::now();
        Logger {
            mode,
            level,
            files: Mutex::new(LogFiles {
                base_dir: path.as_ref().to_path_buf(),
                cur_date: now.date_naive(),
                last_log: now,
                day_passed: false,
            }),
        }
    }

    /// Installs a logger built from `config` as the global one
    pub fn init(config: &LogConfig) -> Result<(), InitError> {
        let level = config.level_filter()?;
        log::set_boxed_logger(Box::new(Logger::new(&config.dir, config.mode, level)))?;
        log::set_max_level(level);
        Ok(())
    }

    pub fn log_with_mode<P: AsRef<str>>(
        &self,
        source: &str,
        what: P,
        mode: LogMode,
    ) -> io::Result<()> {
        let now = Local::now();
        let now_str = now.format("%Y-%m-%d %H:%M:%S");

        if mode == LogMode::Console || mode == LogMode::Both {
            // stdout carries the console source's replies
            eprintln!("[{}] {}: {}", now_str, source, what.as_ref());
        }

        if mode == LogMode::File || mode == LogMode::Both {
            let line = format!("[{}] {}\n", now_str, what.as_ref());
            let mut files = match self.files.lock() {
                Ok(files) => files,
                Err(poisoned) => poisoned.into_inner(),
            };
            files.write(source, now, &line)?;
        }

        Ok(())
    }

    #[cfg(test)]
    fn current_path(&self, source: &str) -> io::Result<PathBuf> {
        let files = self.files.lock().unwrap();
        files.gen_path(source, &files.cur_date)
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let source = record.target().rsplit("::").next().unwrap_or("bot");
        let what = format!("{} {}", record.level(), record.args());
        if let Err(err) = self.log_with_mode(source, what, self.mode) {
            eprintln!("couldn't write log for {}: {}", source, err);
        }
    }

    fn flush(&self) {}
}
