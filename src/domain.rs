use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use std::io::Error;

#[derive(Debug)]
pub enum SvError {
    IoError(Error),
    PolarsError(PolarsError),
    XlsxReadError(calamine::XlsxError),
    XlsxWriteError(rust_xlsxwriter::XlsxError),
    CsvWriteError(csv::Error),
    InvalidSpec(String),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
}

impl From<Error> for SvError {
    fn from(err: Error) -> Self {
        SvError::IoError(err)
    }
}

impl From<PolarsError> for SvError {
    fn from(err: PolarsError) -> Self {
        SvError::PolarsError(err)
    }
}

impl From<calamine::XlsxError> for SvError {
    fn from(err: calamine::XlsxError) -> Self {
        SvError::XlsxReadError(err)
    }
}

impl From<rust_xlsxwriter::XlsxError> for SvError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        SvError::XlsxWriteError(err)
    }
}

impl From<csv::Error> for SvError {
    fn from(err: csv::Error) -> Self {
        SvError::CsvWriteError(err)
    }
}

#[derive(Debug, Clone)]
pub struct SvConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
}

#[derive(Debug)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    Click(u16, u16),
    CopyCell,
    OpenFilter,
    ResetFilter,
    OpenDownload,
    Help,
    Exit,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
sv - spreadsheet viewer

  q            quit
  arrows       move cell cursor
  PgUp / PgDn  move one page
  Home / End   first / last row
  click        toggle row/column highlight
  f            filter rows by null checks
  r            reset the active filter
  d            download the current view as xlsx/csv
  c            copy current cell to the clipboard
  ?            this help
  Esc          close popup / reset filter

Filter form: Tab switches fields, Enter applies, Esc cancels.
Columns to operate on are given as a comma separated list.";
