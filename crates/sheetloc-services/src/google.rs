//! Google Sheets v4 values API as a [`SheetTable`].

use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use sheetloc_core::{Result, SheetLocError};
use sheetloc_table_api::{RangeWrite, SheetTable};

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

pub struct GoogleSheetsTable {
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
    client: reqwest::blocking::Client,
}

impl GoogleSheetsTable {
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("sheetloc/", env!("CARGO_PKG_VERSION")))
            .build()
            .wrap_err("build HTTP client")?;
        Ok(Self {
            base_url: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
            client,
        })
    }

    /// Point the client at another API root, e.g. a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn values_url(&self, tail: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id),
            tail
        )
    }

    fn send(&self, req: reqwest::blocking::RequestBuilder) -> Result<reqwest::blocking::Response> {
        let resp = req.bearer_auth(&self.access_token).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(SheetLocError::Remote {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(resp)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest<'a> {
    value_input_option: &'a str,
    data: Vec<UpdateRange<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRange<'a> {
    range: &'a str,
    major_dimension: &'a str,
    values: &'a [Vec<String>],
}

#[derive(Serialize)]
struct AppendRequest<'a> {
    values: &'a [Vec<String>],
}

/// Formatted values arrive as strings; anything else is rendered as JSON.
fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SheetTable for GoogleSheetsTable {
    fn name(&self) -> &str {
        &self.spreadsheet_id
    }

    fn read(&mut self, range: &str) -> Result<Vec<Vec<String>>> {
        tracing::debug!(event = "sheets_batch_get", spreadsheet = %self.spreadsheet_id, range = %range);
        let req = self
            .client
            .get(self.values_url(":batchGet"))
            .query(&[("ranges", range)]);
        let resp: BatchGetResponse = self
            .send(req)
            .wrap_err_with(|| format!("batchGet {range}"))?
            .json()
            .wrap_err("decode batchGet response")?;
        let rows = resp
            .value_ranges
            .into_iter()
            .next()
            .map(|vr| vr.values)
            .unwrap_or_default();
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    fn batch_update(&mut self, data: &[RangeWrite]) -> Result<()> {
        tracing::debug!(event = "sheets_batch_update", spreadsheet = %self.spreadsheet_id, ranges = data.len());
        let body = BatchUpdateRequest {
            value_input_option: VALUE_INPUT_OPTION,
            data: data
                .iter()
                .map(|w| UpdateRange {
                    range: &w.range,
                    major_dimension: "ROWS",
                    values: &w.rows,
                })
                .collect(),
        };
        let req = self.client.post(self.values_url(":batchUpdate")).json(&body);
        self.send(req)
            .wrap_err_with(|| format!("batchUpdate of {} ranges", data.len()))?;
        Ok(())
    }

    fn append(&mut self, range: &str, rows: &[Vec<String>]) -> Result<()> {
        tracing::debug!(event = "sheets_append", spreadsheet = %self.spreadsheet_id, range = %range, rows = rows.len());
        let tail = format!("/{}:append", urlencoding::encode(range));
        let req = self
            .client
            .post(self.values_url(&tail))
            .query(&[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&AppendRequest { values: rows });
        self.send(req)
            .wrap_err_with(|| format!("append {} rows to {range}", rows.len()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one request with a canned response and hand back what was received.
    fn one_shot(status: &str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let status = status.to_string();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                head.push_str(&line);
            }
            let mut req_body = vec![0u8; content_length];
            reader.read_exact(&mut req_body).unwrap();
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            format!("{head}\n{}", String::from_utf8(req_body).unwrap())
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn read_converts_cells_to_strings() {
        let (base, server) = one_shot(
            "200 OK",
            r#"{"spreadsheetId":"abc","valueRanges":[{"range":"'Sheet1'!A1:C3","values":[["namespace","key","en"],["common","n",3]]}]}"#,
        );
        let mut table = GoogleSheetsTable::new("abc", "token").unwrap().with_base_url(base);
        let rows = table.read("'Sheet1'").unwrap();
        assert_eq!(rows[0], vec!["namespace", "key", "en"]);
        assert_eq!(rows[1], vec!["common", "n", "3"]);

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /spreadsheets/abc/values:batchGet?ranges="), "{request}");
        assert!(request.to_ascii_lowercase().contains("authorization: bearer token"), "{request}");
    }

    #[test]
    fn append_posts_rows_with_insert_option() {
        let (base, server) = one_shot("200 OK", "{}");
        let mut table = GoogleSheetsTable::new("abc", "token").unwrap().with_base_url(base);
        table
            .append("'Sheet1'", &[vec!["common".into(), "hello".into()]])
            .unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /spreadsheets/abc/values/%27Sheet1%27:append?"), "{request}");
        assert!(request.contains("insertDataOption=INSERT_ROWS"), "{request}");
        assert!(request.contains("valueInputOption=USER_ENTERED"), "{request}");
        assert!(request.ends_with(r#"{"values":[["common","hello"]]}"#), "{request}");
    }

    #[test]
    fn batch_update_sends_row_major_ranges() {
        let (base, server) = one_shot("200 OK", "{}");
        let mut table = GoogleSheetsTable::new("abc", "token").unwrap().with_base_url(base);
        table
            .batch_update(&[RangeWrite {
                range: "'Sheet1'!A2:B2".into(),
                rows: vec![vec!["x".into(), "y".into()]],
            }])
            .unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /spreadsheets/abc/values:batchUpdate"), "{request}");
        assert!(request.ends_with(
            r#"{"valueInputOption":"USER_ENTERED","data":[{"range":"'Sheet1'!A2:B2","majorDimension":"ROWS","values":[["x","y"]]}]}"#
        ), "{request}");
    }

    #[test]
    fn error_status_becomes_remote_error() {
        let (base, server) = one_shot("403 Forbidden", r#"{"error":{"code":403}}"#);
        let mut table = GoogleSheetsTable::new("abc", "bad").unwrap().with_base_url(base);
        let err = table.read("Sheet1").unwrap_err();
        server.join().unwrap();
        match err.downcast_ref::<SheetLocError>() {
            Some(SheetLocError::Remote { status, body }) => {
                assert_eq!(*status, 403);
                assert!(body.contains("403"));
            }
            other => panic!("unexpected error: {other:?} / {err:#}"),
        }
    }
}
