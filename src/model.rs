use arboard::Clipboard;
use calamine::{Data, Reader, Xlsx, open_workbook};
use polars::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info, trace, warn};

use crate::domain::{HELP_TEXT, Message, SvConfig, SvError};
use crate::export::{self, ExportFormat};
use crate::filter::{Combine, FilterSpec, NullMode, filter};
use crate::inputter::{Form, FormView};
use crate::selection::Selection;
use crate::sheet::{Cell, Sheet};
use crate::ui::{CMDLINE_HEIGHT, COLUMN_WIDTH_MARGIN, TABLE_HEADER_HEIGHT, TITLE_HEIGHT};

const ALERT_MISSING_COLUMNS: &str =
    "Please enter the primary column and columns to operate on.";

#[derive(Debug, Clone, Copy)]
enum FileType {
    CSV,
    XLSX,
}

#[derive(Debug, PartialEq)]
pub enum Status {
    EMPTY,
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    FILTER,
    DOWNLOAD,
    POPUP,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

/// One renderable column window sent to the UI.
#[derive(Clone)]
pub struct ColumnView {
    pub name: String,
    pub width: usize,
    pub data: Vec<String>,
}

pub struct UiData {
    pub name: String,
    pub table: Vec<ColumnView>,
    pub nrows: usize,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub abs_cursor_row: usize,
    pub highlighted_rows: Vec<bool>,
    pub highlighted_cols: Vec<bool>,
    pub show_popup: bool,
    pub popup_message: String,
    pub form: Option<FormView>,
    pub filter_active: bool,
    pub status_message: String,
}

impl UiData {
    pub fn empty() -> Self {
        UiData {
            name: String::new(),
            table: Vec::new(),
            nrows: 0,
            cursor_row: 0,
            cursor_col: 0,
            abs_cursor_row: 0,
            highlighted_rows: Vec::new(),
            highlighted_cols: Vec::new(),
            show_popup: false,
            popup_message: String::new(),
            form: None,
            filter_active: false,
            status_message: String::new(),
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct UiLayout {
    pub width: usize,
    pub height: usize,
    pub table_width: usize,
    pub table_height: usize,
}

impl UiLayout {
    pub fn from_values(ui_width: usize, ui_height: usize) -> Self {
        let layout = UiLayout {
            width: ui_width,
            height: ui_height,
            // one leading spacer column on the left
            table_width: ui_width.saturating_sub(1),
            table_height: ui_height
                .saturating_sub(TITLE_HEIGHT + TABLE_HEADER_HEIGHT + CMDLINE_HEIGHT),
        };
        trace!("Build UiLayout: {:?}", layout);
        layout
    }
}

pub struct Model {
    config: SvConfig,
    pub status: Status,
    modus: Modus,
    file_info: Option<FileInfo>,
    sheet: Option<Sheet>,
    filtered: Option<Sheet>,
    selection: Selection,
    cursor_row: usize,
    cursor_col: usize,
    offset_row: usize,
    offset_col: usize,
    uilayout: UiLayout,
    uidata: UiData,
    form: Option<Form>,
    clipboard: Option<Clipboard>,
    status_message: String,
}

impl Model {
    pub fn init(config: &SvConfig, ui_width: usize, ui_height: usize) -> Self {
        let clipboard = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                warn!("Clipboard unavailable: {:?}", e);
                None
            }
        };
        let mut model = Self {
            config: config.clone(),
            status: Status::EMPTY,
            modus: Modus::TABLE,
            file_info: None,
            sheet: None,
            filtered: None,
            selection: Selection::default(),
            cursor_row: 0,
            cursor_col: 0,
            offset_row: 0,
            offset_col: 0,
            uilayout: UiLayout::from_values(ui_width, ui_height),
            uidata: UiData::empty(),
            form: None,
            clipboard,
            status_message: "Started sv!".to_string(),
        };
        model.update_table_data();
        model
    }

    pub fn load_data_file(&mut self, path: PathBuf) -> Result<(), SvError> {
        let file_info = Self::get_file_info(path)?;
        info!(
            "Loading {:?} ({:?}, {} bytes)",
            file_info.path, file_info.file_type, file_info.file_size
        );
        let sheet = match file_info.file_type {
            FileType::CSV => Self::load_csv_sheet(&file_info.path)?,
            FileType::XLSX => Self::load_xlsx_sheet(&file_info.path)?,
        };
        info!(
            "Loaded \"{}\": {} rows, {} columns",
            sheet.name,
            sheet.nrows(),
            sheet.ncols()
        );

        self.set_status_message(format!("Loaded {}", file_info.path.display()));
        self.sheet = Some(sheet);
        self.filtered = None;
        self.selection = Selection::default();
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.offset_row = 0;
        self.offset_col = 0;
        self.file_info = Some(file_info);
        self.status = Status::READY;
        self.update_table_data();
        Ok(())
    }

    pub fn get_uidata(&self) -> &UiData {
        &self.uidata
    }

    pub fn raw_keyevents(&self) -> bool {
        self.form.is_some()
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Message) -> Result<(), SvError> {
        trace!("Update: Modus {:?}, Message {:?}", self.modus, message);
        match self.modus {
            Modus::TABLE => match message {
                Message::Quit => self.quit(),
                Message::MoveUp => self.move_selection_up(1),
                Message::MoveDown => self.move_selection_down(1),
                Message::MoveLeft => self.move_selection_left(),
                Message::MoveRight => self.move_selection_right(),
                Message::MovePageUp => self.move_selection_up(self.uilayout.table_height + 1),
                Message::MovePageDown => self.move_selection_down(self.uilayout.table_height + 1),
                Message::MoveBeginning => self.move_selection_beginning(),
                Message::MoveEnd => self.move_selection_end(),
                Message::Click(x, y) => self.click(x, y),
                Message::CopyCell => self.copy_cell(),
                Message::OpenFilter => self.open_filter(),
                Message::ResetFilter => self.reset_filter(),
                Message::OpenDownload => self.open_download(),
                Message::Help => self.show_help(),
                Message::Exit => self.reset_filter(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::RawKey(_) => (),
            },
            Modus::FILTER | Modus::DOWNLOAD => match message {
                Message::Quit => self.quit(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::RawKey(key) => self.form_input(key),
                _ => (),
            },
            Modus::POPUP => match message {
                Message::Quit => self.quit(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Exit | Message::Help => self.close_popup(),
                _ => (),
            },
        }
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn show_help(&mut self) {
        self.modus = Modus::POPUP;
        self.update_table_data();
    }

    fn close_popup(&mut self) {
        self.modus = Modus::TABLE;
        self.update_table_data();
    }

    fn open_filter(&mut self) {
        if self.sheet.is_none() {
            self.alert("No data loaded.");
            return;
        }
        self.form = Some(Form::filter_form());
        self.modus = Modus::FILTER;
        self.update_table_data();
    }

    fn open_download(&mut self) {
        if self.sheet.is_none() {
            self.alert("No data loaded.");
            return;
        }
        self.form = Some(Form::download_form());
        self.modus = Modus::DOWNLOAD;
        self.update_table_data();
    }

    fn form_input(&mut self, key: ratatui::crossterm::event::KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let result = form.read(key);
        if !result.finished {
            self.update_table_data();
            return;
        }
        let values = form.values();
        let modus = self.modus;
        self.form = None;
        self.modus = Modus::TABLE;
        if !result.canceled {
            match modus {
                Modus::FILTER => self.apply_filter(&values),
                Modus::DOWNLOAD => self.confirm_download(&values),
                _ => (),
            }
        }
        self.update_table_data();
    }

    fn apply_filter(&mut self, values: &[String]) {
        let nrows = self.sheet.as_ref().map(|s| s.nrows()).unwrap_or(0);
        let spec = match parse_filter_form(values, nrows) {
            Ok(spec) => spec,
            Err(alert) => {
                self.alert(alert);
                return;
            }
        };
        // The filter always runs against the loaded data, not a previous
        // filter result.
        let Some(sheet) = self.sheet.as_ref() else {
            self.alert("No data loaded.");
            return;
        };
        match filter(sheet, &spec) {
            Ok(result) => {
                let matched = result.nrows();
                self.filtered = Some(result);
                self.cursor_row = 0;
                self.cursor_col = 0;
                self.offset_row = 0;
                self.offset_col = 0;
                self.set_status_message(format!("Filter kept {matched} of {nrows} rows"));
            }
            Err(e) => {
                error!("Filter failed: {:?}", e);
                self.alert("Filter failed, see log.");
            }
        }
    }

    fn reset_filter(&mut self) {
        if self.filtered.take().is_some() {
            self.cursor_row = 0;
            self.cursor_col = 0;
            self.offset_row = 0;
            self.offset_col = 0;
            self.set_status_message("Filter reset");
        }
        self.update_table_data();
    }

    fn confirm_download(&mut self, values: &[String]) {
        let Some(format) = ExportFormat::parse(&values[1]) else {
            self.alert(format!(
                "Unknown format \"{}\" (use xlsx or csv)",
                values[1].trim()
            ));
            return;
        };
        let result = {
            let Some(sheet) = self.view_sheet() else {
                self.alert("No data loaded.");
                return;
            };
            export::export(sheet, &values[0], format, Path::new("."))
        };
        match result {
            Ok(path) => self.set_status_message(format!("Saved {}", path.display())),
            Err(e) => {
                error!("Export failed: {:?}", e);
                self.alert("Export failed, see log.");
            }
        }
    }

    fn click(&mut self, x: u16, y: u16) {
        let top = (TITLE_HEIGHT + TABLE_HEADER_HEIGHT) as u16;
        let target = {
            let Some(sheet) = self.view_sheet() else {
                return;
            };
            if y < top {
                None
            } else {
                let view_row = (y - top) as usize;
                let row = self.offset_row + view_row;
                if view_row >= self.uilayout.table_height || row >= sheet.nrows() {
                    None
                } else {
                    let visible = Self::visible_columns(
                        sheet,
                        self.offset_col,
                        self.uilayout.table_width,
                        self.config.max_column_width,
                    );
                    let mut acc = 1usize; // leading spacer
                    let mut hit = None;
                    for (idx, width) in visible {
                        let xpos = x as usize;
                        if xpos >= acc && xpos < acc + width {
                            hit = Some(idx);
                            break;
                        }
                        acc += width + 1;
                    }
                    hit.map(|col| (row, col))
                }
            }
        };
        if let Some((row, col)) = target {
            trace!("Click toggles selection at {}:{}", row, col);
            self.selection = self.selection.toggle(row, col);
            self.update_table_data();
        }
    }

    fn copy_cell(&mut self) {
        let content = {
            let Some(sheet) = self.view_sheet() else {
                return;
            };
            let visible = Self::visible_columns(
                sheet,
                self.offset_col,
                self.uilayout.table_width,
                self.config.max_column_width,
            );
            let Some(&(col, _)) = visible.get(self.cursor_col) else {
                return;
            };
            sheet
                .cell(self.offset_row + self.cursor_row, col)
                .map(|c| c.display_string())
        };
        let Some(content) = content else {
            return;
        };
        trace!("Cell content: {}", content);
        match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.set_text(content) {
                Ok(_) => self.set_status_message("Copied cell to clipboard"),
                Err(e) => {
                    warn!("Error copying to clipboard: {:?}", e);
                    self.set_status_message("Clipboard unavailable");
                }
            },
            None => self.set_status_message("Clipboard unavailable"),
        }
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.uilayout.width, width, self.uilayout.height, height
        );
        self.uilayout = UiLayout::from_values(width, height);
        self.update_table_data();
    }

    fn move_selection_up(&mut self, size: usize) {
        let current = self.offset_row + self.cursor_row;
        let target = current.saturating_sub(size);
        if target >= self.offset_row {
            self.cursor_row = target - self.offset_row;
        } else {
            self.offset_row = target;
            self.cursor_row = 0;
        }
        self.update_table_data();
    }

    fn move_selection_down(&mut self, size: usize) {
        let nrows = self.view_nrows();
        if nrows == 0 {
            return;
        }
        let height = self.uilayout.table_height.max(1);
        let target = (self.offset_row + self.cursor_row + size).min(nrows - 1);
        if target < self.offset_row + height {
            self.cursor_row = target - self.offset_row;
        } else {
            self.offset_row = target + 1 - height;
            self.cursor_row = height - 1;
        }
        self.update_table_data();
    }

    fn move_selection_beginning(&mut self) {
        self.offset_row = 0;
        self.cursor_row = 0;
        self.update_table_data();
    }

    fn move_selection_end(&mut self) {
        let nrows = self.view_nrows();
        if nrows == 0 {
            return;
        }
        let height = self.uilayout.table_height.max(1);
        self.offset_row = nrows.saturating_sub(height);
        self.cursor_row = nrows - 1 - self.offset_row;
        self.update_table_data();
    }

    fn move_selection_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.offset_col > 0 {
            self.offset_col -= 1;
        }
        self.update_table_data();
    }

    fn move_selection_right(&mut self) {
        let ncols = self.view_ncols();
        if ncols == 0 {
            return;
        }
        let visible = self.uidata.table.len();
        if self.cursor_col + 1 < visible {
            self.cursor_col += 1;
        } else if self.offset_col + visible < ncols {
            self.offset_col += 1;
        }
        self.update_table_data();
    }

    // ----------------------- View data construction ----------------------- //

    fn view_sheet(&self) -> Option<&Sheet> {
        self.filtered.as_ref().or(self.sheet.as_ref())
    }

    fn view_nrows(&self) -> usize {
        self.view_sheet().map(|s| s.nrows()).unwrap_or(0)
    }

    fn view_ncols(&self) -> usize {
        self.view_sheet().map(|s| s.ncols()).unwrap_or(0)
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.uidata.status_message = self.status_message.clone();
    }

    fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("Alert: {}", message);
        self.set_status_message(message);
    }

    // Columns that fit in the given width budget, starting at offset_col.
    // Returned as (column index, render width) pairs.
    fn visible_columns(
        sheet: &Sheet,
        offset_col: usize,
        table_width: usize,
        max_column_width: usize,
    ) -> Vec<(usize, usize)> {
        let mut visible = Vec::new();
        let mut used = 0usize;
        for (idx, column) in sheet.columns.iter().enumerate().skip(offset_col) {
            let width = (column.display_width() + COLUMN_WIDTH_MARGIN)
                .min(max_column_width)
                .max(3);
            if used + width + 1 > table_width {
                // Always render at least one (clipped) column.
                if visible.is_empty() {
                    visible.push((idx, table_width.saturating_sub(2).max(1)));
                }
                break;
            }
            visible.push((idx, width));
            used += width + 1;
        }
        visible
    }

    fn update_table_data(&mut self) {
        let nrows = self.view_nrows();
        if nrows > 0 {
            if self.offset_row >= nrows {
                self.offset_row = nrows - 1;
            }
            let visible_rows = (nrows - self.offset_row).min(self.uilayout.table_height.max(1));
            if self.cursor_row >= visible_rows {
                self.cursor_row = visible_rows.saturating_sub(1);
            }
        } else {
            self.offset_row = 0;
            self.cursor_row = 0;
        }

        let uidata = match self.view_sheet() {
            None => UiData::empty(),
            Some(sheet) => {
                let rbegin = self.offset_row.min(nrows);
                let rend = (rbegin + self.uilayout.table_height).min(nrows);
                let visible = Self::visible_columns(
                    sheet,
                    self.offset_col,
                    self.uilayout.table_width,
                    self.config.max_column_width,
                );
                let cursor_col = self.cursor_col.min(visible.len().saturating_sub(1));
                let table = visible
                    .iter()
                    .map(|&(idx, width)| {
                        let column = &sheet.columns[idx];
                        ColumnView {
                            name: column.name.clone(),
                            width,
                            data: column.data[rbegin..rend]
                                .iter()
                                .map(|c| c.display_string())
                                .collect(),
                        }
                    })
                    .collect();
                UiData {
                    name: sheet.name.clone(),
                    table,
                    nrows,
                    cursor_row: self.cursor_row,
                    cursor_col,
                    abs_cursor_row: self.offset_row + self.cursor_row,
                    highlighted_rows: (rbegin..rend)
                        .map(|r| self.selection.row_highlighted(r))
                        .collect(),
                    highlighted_cols: visible
                        .iter()
                        .map(|&(idx, _)| self.selection.col_highlighted(idx))
                        .collect(),
                    show_popup: false,
                    popup_message: String::new(),
                    form: None,
                    filter_active: self.filtered.is_some(),
                    status_message: String::new(),
                }
            }
        };
        self.uidata = uidata;
        self.cursor_col = self.uidata.cursor_col;
        self.uidata.show_popup = self.modus == Modus::POPUP;
        if self.uidata.show_popup {
            self.uidata.popup_message = HELP_TEXT.to_string();
        }
        self.uidata.form = self.form.as_ref().map(|f| f.view());
        self.uidata.status_message = self.status_message.clone();
    }

    // ------------------------------ Loading ------------------------------- //

    fn detect_file_type(path: &Path) -> Result<FileType, SvError> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_uppercase())
            .as_deref()
        {
            Some("CSV") => Ok(FileType::CSV),
            Some("XLSX") => Ok(FileType::XLSX),
            _ => Err(SvError::UnknownFileType),
        }
    }

    fn get_file_info(path: PathBuf) -> Result<FileInfo, SvError> {
        let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SvError::FileNotFound,
            ErrorKind::PermissionDenied => SvError::PermissionDenied,
            _ => SvError::IoError(e),
        })?;
        if !metadata.is_file() {
            return Err(SvError::LoadingFailed("Not a file!".into()));
        }

        let file_size = metadata.len();
        let file_type = Self::detect_file_type(&path)?;

        Ok(FileInfo {
            path,
            file_size,
            file_type,
        })
    }

    fn load_csv_frame(path: &PathBuf) -> Result<LazyFrame, PolarsError> {
        LazyCsvReader::new(PlPath::Local(path.as_path().into()))
            .with_has_header(true)
            .finish()
    }

    fn load_csv_sheet(path: &PathBuf) -> Result<Sheet, SvError> {
        let df = Self::load_csv_frame(path)?.collect()?;
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        // Each column is ingested in its own thread.
        let columns: Result<Vec<crate::sheet::Column>, PolarsError> = names
            .par_iter()
            .map(|name| Self::ingest_column(&df, name))
            .collect();
        Ok(Sheet::new(Self::sheet_name(path), columns?))
    }

    fn is_numeric_type(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64
        )
    }

    fn ingest_column(df: &DataFrame, name: &str) -> Result<crate::sheet::Column, PolarsError> {
        let numeric = Self::is_numeric_type(df.column(name)?.dtype());
        let col = df.column(name)?.cast(&DataType::String)?;
        let series = col.str()?;
        let mut data = Vec::with_capacity(series.len());
        for value in series.into_iter() {
            let cell = match value {
                None => Cell::Empty,
                Some(s) if s.is_empty() => Cell::Empty,
                Some(s) if numeric => match s.parse::<f64>() {
                    Ok(n) => Cell::Number(n),
                    Err(_) => Cell::Text(s.to_string()),
                },
                Some(s) => Cell::Text(s.to_string()),
            };
            data.push(cell);
        }
        Ok(crate::sheet::Column::new(name, data))
    }

    fn load_xlsx_sheet(path: &Path) -> Result<Sheet, SvError> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SvError::LoadingFailed("workbook contains no sheets".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range.rows();
        // The first row supplies the column names.
        let header = rows
            .next()
            .ok_or_else(|| SvError::LoadingFailed("first worksheet is empty".to_string()))?;
        let names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, value)| Self::header_name(idx, value))
            .collect();
        let mut columns: Vec<crate::sheet::Column> = names
            .into_iter()
            .map(|name| crate::sheet::Column::new(name, Vec::new()))
            .collect();
        for row in rows {
            // Short rows pad out with nulls so every column has the same length.
            for (idx, column) in columns.iter_mut().enumerate() {
                column
                    .data
                    .push(row.get(idx).map(Self::convert_cell).unwrap_or(Cell::Empty));
            }
        }
        Ok(Sheet::new(sheet_name, columns))
    }

    fn header_name(idx: usize, value: &Data) -> String {
        match Self::convert_cell(value) {
            Cell::Empty => format!("Column{}", idx + 1),
            cell => cell.display_string(),
        }
    }

    fn convert_cell(value: &Data) -> Cell {
        match value {
            Data::Empty => Cell::Empty,
            Data::String(s) if s.is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) => Cell::Empty,
        }
    }

    fn sheet_name(path: &Path) -> String {
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string()
    }
}

/// Turn the filter form fields into a FilterSpec, or a user-visible alert.
/// Blank or unparsable range bounds never exclude a row.
fn parse_filter_form(values: &[String], nrows: usize) -> Result<FilterSpec, String> {
    let primary = values[0].trim();
    let operation_columns: Vec<String> = values[1]
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if primary.is_empty() || operation_columns.is_empty() {
        return Err(ALERT_MISSING_COLUMNS.to_string());
    }
    let combine = match values[2].trim().to_ascii_lowercase().as_str() {
        "" | "and" => Combine::And,
        "or" => Combine::Or,
        other => return Err(format!("Unknown operation type \"{other}\" (use and/or)")),
    };
    let null_mode = match values[3].trim().to_ascii_lowercase().as_str() {
        "" | "null" => NullMode::IsNull,
        "not-null" | "not null" | "notnull" => NullMode::IsNotNull,
        other => return Err(format!("Unknown check \"{other}\" (use null/not-null)")),
    };
    let range_from = values[4].trim().parse::<usize>().unwrap_or(1);
    let range_to = values[5].trim().parse::<usize>().unwrap_or(nrows);
    Ok(FilterSpec {
        primary_column: primary.to_string(),
        operation_columns,
        combine,
        null_mode,
        range_from,
        range_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_values(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn sample_sheet() -> Sheet {
        Sheet::new(
            "t",
            vec![
                crate::sheet::Column::new("A", vec!["1".into(), "2".into(), "3".into()]),
                crate::sheet::Column::new("B", vec![Cell::Empty, "x".into(), "y".into()]),
            ],
        )
    }

    fn test_model() -> Model {
        let config = SvConfig {
            event_poll_time: 100,
            max_column_width: 20,
        };
        let mut model = Model::init(&config, 40, 10);
        model.sheet = Some(sample_sheet());
        model.status = Status::READY;
        model.update_table_data();
        model
    }

    #[test]
    fn parse_form_defaults() {
        let spec = parse_filter_form(&form_values(&["A", "B, C", "", "", "", ""]), 10).unwrap();
        assert_eq!(spec.primary_column, "A");
        assert_eq!(spec.operation_columns, vec!["B", "C"]);
        assert_eq!(spec.combine, Combine::And);
        assert_eq!(spec.null_mode, NullMode::IsNull);
        assert_eq!(spec.range_from, 1);
        assert_eq!(spec.range_to, 10);
    }

    #[test]
    fn parse_form_rejects_missing_columns() {
        let err = parse_filter_form(&form_values(&["", "B", "and", "null", "", ""]), 10)
            .unwrap_err();
        assert_eq!(err, ALERT_MISSING_COLUMNS);
        let err = parse_filter_form(&form_values(&["A", " , ", "and", "null", "", ""]), 10)
            .unwrap_err();
        assert_eq!(err, ALERT_MISSING_COLUMNS);
    }

    #[test]
    fn parse_form_variants() {
        let spec = parse_filter_form(
            &form_values(&["A", "B", "OR", "Not-Null", "2", "5"]),
            10,
        )
        .unwrap();
        assert_eq!(spec.combine, Combine::Or);
        assert_eq!(spec.null_mode, NullMode::IsNotNull);
        assert_eq!(spec.range_from, 2);
        assert_eq!(spec.range_to, 5);
        assert!(parse_filter_form(&form_values(&["A", "B", "nand", "null", "", ""]), 10).is_err());
    }

    #[test]
    fn parse_form_garbage_range_selects_everything() {
        let spec = parse_filter_form(&form_values(&["A", "B", "and", "null", "x", "y"]), 7)
            .unwrap();
        assert_eq!(spec.range_from, 1);
        assert_eq!(spec.range_to, 7);
    }

    #[test]
    fn apply_and_reset_filter() {
        let mut model = test_model();
        model.apply_filter(&form_values(&["A", "B", "and", "not-null", "", ""]));
        model.update_table_data();
        assert_eq!(model.view_nrows(), 2);
        assert!(model.get_uidata().filter_active);
        model.reset_filter();
        assert_eq!(model.view_nrows(), 3);
        assert!(model.filtered.is_none());
    }

    #[test]
    fn invalid_filter_leaves_state_unchanged() {
        let mut model = test_model();
        model.apply_filter(&form_values(&["", "", "and", "null", "", ""]));
        assert!(model.filtered.is_none());
        assert_eq!(model.status_message, ALERT_MISSING_COLUMNS);
    }

    #[test]
    fn click_toggles_selection_on_data_cells() {
        let mut model = test_model();
        // First data row sits below the title and header lines; the first
        // column starts after the leading spacer.
        let top = (TITLE_HEIGHT + TABLE_HEADER_HEIGHT) as u16;
        model.click(1, top);
        assert!(model.selection.row_highlighted(0));
        assert!(model.selection.col_highlighted(0));
        model.click(1, top);
        assert!(model.selection.is_empty());
        // Clicks above the table area do nothing.
        model.click(1, 0);
        assert!(model.selection.is_empty());
    }

    #[test]
    fn cursor_movement_clamps_to_data() {
        let mut model = test_model();
        model.move_selection_down(10);
        assert_eq!(model.uidata.abs_cursor_row, 2);
        model.move_selection_up(10);
        assert_eq!(model.uidata.abs_cursor_row, 0);
        model.move_selection_end();
        assert_eq!(model.uidata.abs_cursor_row, 2);
        model.move_selection_beginning();
        assert_eq!(model.uidata.abs_cursor_row, 0);
    }

    #[test]
    fn visible_columns_respect_width_budget() {
        let sheet = sample_sheet();
        // Column A renders at width 3 ("A" + margin), B likewise; with a
        // budget of 5 only the first column fits.
        let visible = Model::visible_columns(&sheet, 0, 5, 20);
        assert_eq!(visible.len(), 1);
        let visible = Model::visible_columns(&sheet, 0, 40, 20);
        assert_eq!(visible.len(), 2);
        // Offset skips leading columns.
        let visible = Model::visible_columns(&sheet, 1, 40, 20);
        assert_eq!(visible[0].0, 1);
    }

    #[test]
    fn filtered_view_is_exported_and_reset_restores_raw() {
        let mut model = test_model();
        model.apply_filter(&form_values(&["A", "B", "and", "null", "", ""]));
        let dir = tempfile::tempdir().unwrap();
        let sheet = model.view_sheet().unwrap();
        let path = export::export(sheet, "view", ExportFormat::Csv, dir.path()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["A,B", "1,NULL"]);
    }
}
