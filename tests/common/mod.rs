//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;
use termbase::error::{BackendError, LoadError, PersistError};
use termbase::store::TermStore;
use termbase::TermRecord;

pub const HEADER: [&str; 3] = ["Source Term", "Target Term", "Notes"];

/// Builder for termbase spreadsheet files in a temp directory
pub struct TermbaseFileBuilder {
    temp_dir: TempDir,
    rows: Vec<Vec<String>>,
}

impl TermbaseFileBuilder {
    /// New builder whose first row is the standard header
    pub fn new() -> Self {
        Self::without_header().raw_row(&HEADER)
    }

    pub fn without_header() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, rows: Vec::new() }
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a source/target/notes row
    pub fn entry(self, source: &str, target: &str, notes: &str) -> Self {
        self.raw_row(&[source, target, notes])
    }

    /// Add a row with any number of cells
    pub fn raw_row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Write the rows as CSV; returns the temp dir (keep it alive) and the file path
    pub fn write_csv(self, name: &str) -> (TempDir, PathBuf) {
        let path = self.temp_dir.path().join(name);
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .expect("Failed to create csv");
        for row in &self.rows {
            writer.write_record(row).expect("Failed to write csv row");
        }
        writer.flush().expect("Failed to flush csv");
        (self.temp_dir, path)
    }

    /// Write the rows as an .xlsx workbook with one sheet. Empty cells are left blank.
    pub fn write_xlsx(self, name: &str) -> (TempDir, PathBuf) {
        self.write_xlsx_with_extra_sheet(name, None)
    }

    /// Like `write_xlsx`, plus a second sheet holding `extra` in A1.
    pub fn write_xlsx_with_extra_sheet(self, name: &str, extra: Option<&str>) -> (TempDir, PathBuf) {
        let path = self.temp_dir.path().join(name);
        let mut workbook = Workbook::new();

        let worksheet = workbook.add_worksheet();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    worksheet.write_string(r as u32, c as u16, cell).expect("Failed to write cell");
                }
            }
        }

        if let Some(text) = extra {
            let other = workbook.add_worksheet();
            other.set_name("Other").expect("Failed to name sheet");
            other.write_string(0, 0, text).expect("Failed to write cell");
        }

        workbook.save(&path).expect("Failed to save workbook");
        (self.temp_dir, path)
    }
}

impl Default for TermbaseFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Small realistic glossary used across tests
pub fn sample_glossary() -> TermbaseFileBuilder {
    TermbaseFileBuilder::new()
        .entry("run", "correr", "verb")
        .entry("Run", "carrera", "noun, as in a race")
        .entry("walk", "caminar", "")
        .entry("bank", "banco", "financial")
        .entry("bank", "orilla", "of a river")
        .entry("bank", "banca", "")
}

/// Write a config file pointing at `path` and return the config path
pub fn write_file_config(dir: &Path, path: &Path) -> PathBuf {
    let config_path = dir.join("config.toml");
    let content = format!("[source]\nkind = \"file\"\npath = {:?}\n", path.to_string_lossy());
    fs::write(&config_path, content).expect("Failed to write config");
    config_path
}

/// In-memory store that records every append and can be told to fail
#[derive(Default)]
pub struct RecordingStore {
    pub rows: Rc<RefCell<Vec<TermRecord>>>,
    pub appended: Rc<RefCell<Vec<TermRecord>>>,
    pub fail_load: Rc<RefCell<bool>>,
    pub fail_append: Rc<RefCell<bool>>,
}

impl RecordingStore {
    pub fn with_rows(rows: &[(&str, &str, &str)]) -> Self {
        let store = Self::default();
        *store.rows.borrow_mut() = rows.iter().map(|(s, t, n)| TermRecord::new(s, t, n)).collect();
        store
    }

    /// Second handle onto the same shared state
    pub fn handle(&self) -> Self {
        Self {
            rows: Rc::clone(&self.rows),
            appended: Rc::clone(&self.appended),
            fail_load: Rc::clone(&self.fail_load),
            fail_append: Rc::clone(&self.fail_append),
        }
    }
}

impl TermStore for RecordingStore {
    fn load(&self) -> Result<Vec<TermRecord>, LoadError> {
        if *self.fail_load.borrow() {
            return Err(LoadError::new("recording", BackendError::Auth("denied".into())));
        }
        Ok(self.rows.borrow().clone())
    }

    fn append(&mut self, record: &TermRecord) -> Result<(), PersistError> {
        if *self.fail_append.borrow() {
            return Err(PersistError::new(
                "recording",
                record.clone(),
                BackendError::Api { status: 503, message: "unavailable".into() },
            ));
        }
        self.rows.borrow_mut().push(record.clone());
        self.appended.borrow_mut().push(record.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

/// One request received by [`FakeSheetsServer`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Canned response for [`FakeSheetsServer`]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn ok(body: serde_json::Value) -> Self {
        Self { status: 200, body: body.to_string() }
    }

    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": { "code": status, "message": message } });
        Self { status, body: body.to_string() }
    }
}

/// Minimal HTTP/1.1 server answering one request per connection with the given
/// responses in order, then exiting.
pub struct FakeSheetsServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl FakeSheetsServer {
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            for response in responses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let mut reader = BufReader::new(stream);
                let request = read_request(&mut reader);
                recorded.lock().expect("poisoned").push(request);

                let reply = format!(
                    "HTTP/1.1 {} Fake\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    response.body.len(),
                    response.body
                );
                let mut stream = reader.into_inner();
                let _ = stream.write_all(reply.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            base_url: format!("http://{}/v4/spreadsheets", addr),
            requests,
            handle: Some(handle),
        }
    }

    /// Wait for the server thread and return everything it received
    pub fn finish(mut self) -> Vec<RecordedRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("server thread panicked");
        }
        self.requests.lock().expect("poisoned").clone()
    }
}

fn read_request(reader: &mut BufReader<std::net::TcpStream>) -> RecordedRequest {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("Failed to read request line");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut authorization = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("Failed to read header");
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).expect("Failed to read body");

    RecordedRequest { method, target, authorization, body: String::from_utf8_lossy(&body).into_owned() }
}
