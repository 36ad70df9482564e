use log::debug;
use std::io::{self, Read};

pub const BOUNDARY: &str = "---------------------------24838421832148";
pub const RESPONSE_FORMAT: &str = "verbose_json";

const NEW_LINE: &str = "\r\n";

pub fn content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

// Header text is forced to ASCII; file payloads are appended as opaque bytes.
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        let name = header_param(name);
        self.push_str(&format!("--{BOUNDARY}{NEW_LINE}"));
        self.push_str(&format!(
            "Content-Disposition: form-data; name=\"{name}\"{NEW_LINE}{NEW_LINE}"
        ));
        self.push_str(&ascii(value));
        self.push_str(NEW_LINE);
        self
    }

    pub fn file<R: Read>(
        mut self,
        name: &str,
        filename: &str,
        content_type: &str,
        mut source: R,
    ) -> io::Result<Self> {
        let name = header_param(name);
        let filename = header_param(filename);
        let content_type = header_param(content_type);
        self.push_str(&format!("--{BOUNDARY}{NEW_LINE}"));
        self.push_str(&format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"{NEW_LINE}"
        ));
        self.push_str(&format!("Content-Type: {content_type}{NEW_LINE}{NEW_LINE}"));

        let read = source.read_to_end(&mut self.buf)?;
        debug!("Appended {read} bytes of file content for part '{name}'");

        self.push_str(NEW_LINE);
        Ok(self)
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.push_str(&format!("--{BOUNDARY}--{NEW_LINE}"));
        self.buf
    }

    fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }
}

// Non-ASCII characters become '?', as an ASCII text encoder would write them.
fn ascii(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

// Quoted header parameters must not close the quote or break the line.
fn header_param(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '"' | '\r' | '\n' => '?',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_transcription_body<R: Read>(
    audio: R,
    filename: &str,
    model: &str,
    language: &str,
) -> io::Result<Vec<u8>> {
    let body = MultipartBody::new()
        .field("model", model)
        .field("language", language)
        .field("response_format", RESPONSE_FORMAT)
        .field("diarize", "true")
        .file("file", filename, "audio/wav", audio)?
        .finish();

    debug!("Built multipart body: {} bytes for '{filename}'", body.len());
    Ok(body)
}
