//! In-process stand-in for the control plane and object storage.
//!
//! Serves the five control-plane routes plus the presigned `GET /objects/..`
//! and `PUT /parts/..` targets they hand out, over plain HTTP/1.1 on a
//! loopback port. Every request is recorded for assertions.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use msalign_protocol::{
    BeginUploadRequest, CompleteUploadRequest, ObjectRequest, RemoteLocator, Route,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One request as the mock received it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

struct PendingUpload {
    key: String,
    nrof_parts: u64,
    parts: BTreeMap<u32, Vec<u8>>,
}

#[derive(Default)]
struct State {
    objects: BTreeMap<String, Vec<u8>>,
    uploads: HashMap<String, PendingUpload>,
    requests: Vec<RecordedRequest>,
    failing: HashSet<Route>,
    canned: HashMap<Route, (u16, String)>,
    fail_part: Option<u32>,
    omit_etag: bool,
    next_upload: u64,
}

struct Reply {
    status: u16,
    headers: Vec<(&'static str, String)>,
    body: Vec<u8>,
}

impl Reply {
    fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "application/json".into())],
            body: value.to_string().into_bytes(),
        }
    }

    fn raw(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

pub(crate) struct MockRemote {
    url: String,
    state: Arc<Mutex<State>>,
    task: JoinHandle<()>,
}

impl MockRemote {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(Mutex::new(State::default()));

        let task = tokio::spawn({
            let state = Arc::clone(&state);
            let base = url.clone();
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let state = Arc::clone(&state);
                    let base = base.clone();
                    tokio::spawn(async move {
                        let _ = serve(stream, &state, &base).await;
                    });
                }
            }
        });

        Self { url, state, task }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn put_object(&self, key: &str, data: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.objects.insert(key.to_string(), data.to_vec());
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().objects.get(key).cloned()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Every part PUT, in arrival order.
    pub fn part_puts(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "PUT" && r.path.starts_with("/parts/"))
            .collect()
    }

    /// Makes `route` answer 500.
    pub fn fail_route(&self, route: Route) {
        self.state.lock().unwrap().failing.insert(route);
    }

    /// Makes the PUT of part `index` answer 500.
    pub fn fail_part(&self, index: u32) {
        self.state.lock().unwrap().fail_part = Some(index);
    }

    /// Drops the ETag header from part PUT responses.
    pub fn omit_etag(&self) {
        self.state.lock().unwrap().omit_etag = true;
    }

    /// Answers `route` with a fixed status and body.
    pub fn respond(&self, route: Route, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .canned
            .insert(route, (status, body.to_string()));
    }
}

impl Drop for MockRemote {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(mut stream: TcpStream, state: &Mutex<State>, base: &str) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 8192];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut tmp).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&tmp[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut tmp).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&tmp[..n]);
    }
    let body = buf[header_end..].to_vec();

    let reply = {
        let mut state = state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            body: body.clone(),
        });
        route(&mut state, &method, &path, &body, base)
    };

    let mut out = format!("HTTP/1.1 {} Mock\r\n", reply.status);
    for (name, value) in &reply.headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        reply.body.len()
    ));
    stream.write_all(out.as_bytes()).await?;
    stream.write_all(&reply.body).await?;
    stream.shutdown().await
}

fn key_of(locator: &RemoteLocator) -> String {
    locator.path()[1..].to_string()
}

fn route(state: &mut State, method: &str, path: &str, body: &[u8], base: &str) -> Reply {
    if method == "GET" {
        if let Some(key) = path.strip_prefix("/objects/") {
            return match state.objects.get(key) {
                Some(data) => Reply::raw(200, data.clone()),
                None => Reply::raw(404, "NoSuchKey"),
            };
        }
        return Reply::raw(404, "not found");
    }

    if method == "PUT" {
        if let Some(rest) = path.strip_prefix("/parts/") {
            return put_part(state, rest, body);
        }
        return Reply::raw(404, "not found");
    }

    let Some(route) = Route::ALL.into_iter().find(|r| r.path() == path) else {
        return Reply::raw(404, "not found");
    };
    if state.failing.contains(&route) {
        return Reply::json(500, serde_json::json!({"error": "injected failure"}));
    }
    if let Some((status, body)) = state.canned.get(&route) {
        return Reply::raw(*status, body.clone());
    }

    match route {
        Route::ObjectExists => {
            let req: ObjectRequest = serde_json::from_slice(body).unwrap();
            let exists = state.objects.contains_key(&key_of(&req.object_url));
            Reply::json(200, serde_json::json!({ "exists": exists }))
        }
        Route::PresignObject => {
            let req: ObjectRequest = serde_json::from_slice(body).unwrap();
            let url = format!("{base}/objects/{}", key_of(&req.object_url));
            Reply::json(200, serde_json::json!({ "url": url }))
        }
        Route::PresignDirectory => {
            let req: ObjectRequest = serde_json::from_slice(body).unwrap();
            let prefix = req.object_url.directory_key();
            let map: BTreeMap<&String, String> = state
                .objects
                .keys()
                .filter(|k| k.starts_with(&prefix))
                .map(|k| (k, format!("{base}/objects/{k}")))
                .collect();
            Reply::json(200, serde_json::json!({ "key_to_url_map": map }))
        }
        Route::BeginUpload => {
            let req: BeginUploadRequest = serde_json::from_slice(body).unwrap();
            state.next_upload += 1;
            let upload_id = format!("up{}", state.next_upload);
            let urls: HashMap<String, String> = (0..req.nrof_parts)
                .map(|i| (i.to_string(), format!("{base}/parts/{upload_id}/{i}")))
                .collect();
            state.uploads.insert(
                upload_id.clone(),
                PendingUpload {
                    key: key_of(&req.object_url),
                    nrof_parts: req.nrof_parts,
                    parts: BTreeMap::new(),
                },
            );
            Reply::json(200, serde_json::json!({ "upload_id": upload_id, "urls": urls }))
        }
        Route::CompleteUpload => {
            let req: CompleteUploadRequest = serde_json::from_slice(body).unwrap();
            complete_upload(state, req)
        }
    }
}

fn etag_for(upload_id: &str, index: u32) -> String {
    format!("\"etag-{upload_id}-{index}\"")
}

fn put_part(state: &mut State, rest: &str, body: &[u8]) -> Reply {
    let Some((upload_id, index)) = rest.split_once('/') else {
        return Reply::raw(404, "not found");
    };
    let Ok(index) = index.parse::<u32>() else {
        return Reply::raw(400, "bad part index");
    };
    if state.fail_part == Some(index) {
        return Reply::raw(500, "injected failure");
    }
    let omit_etag = state.omit_etag;
    let Some(upload) = state.uploads.get_mut(upload_id) else {
        return Reply::raw(404, "NoSuchUpload");
    };
    upload.parts.insert(index, body.to_vec());

    let mut reply = Reply::raw(200, Vec::new());
    if !omit_etag {
        reply.headers.push(("ETag", etag_for(upload_id, index)));
    }
    reply
}

fn complete_upload(state: &mut State, req: CompleteUploadRequest) -> Reply {
    let Some(upload) = state.uploads.remove(&req.upload_id) else {
        return Reply::raw(404, "NoSuchUpload");
    };
    if req.parts.len() as u64 != upload.nrof_parts {
        return Reply::raw(400, "InvalidPart");
    }

    let mut data = Vec::new();
    for (i, part) in req.parts.iter().enumerate() {
        let index = i as u32;
        if part.part_number != index + 1 || part.etag != etag_for(&req.upload_id, index) {
            return Reply::raw(400, "InvalidPartOrder");
        }
        match upload.parts.get(&index) {
            Some(bytes) => data.extend_from_slice(bytes),
            None => return Reply::raw(400, "InvalidPart"),
        }
    }
    if key_of(&req.object_url) != upload.key {
        return Reply::raw(400, "KeyMismatch");
    }

    state.objects.insert(upload.key, data);
    Reply::json(200, serde_json::json!({}))
}
