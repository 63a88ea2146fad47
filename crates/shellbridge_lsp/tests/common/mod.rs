#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::sync::mpsc::UnboundedReceiver;
use tower_lsp::{LspService, Server};

use shellbridge_lsp::Backend;

pub async fn send_msg<W: AsyncWriteExt + Unpin>(writer: &mut W, msg: &str) {
    let content = format!("Content-Length: {}\r\n\r\n{}", msg.len(), msg);
    writer.write_all(content.as_bytes()).await.unwrap();
    writer.flush().await.unwrap();
}

pub async fn recv_msg<R: AsyncReadExt + Unpin>(reader: &mut R) -> Option<String> {
    let mut header = Vec::new();
    while !header.ends_with(b"\r\n\r\n") {
        header.push(reader.read_u8().await.ok()?);
    }

    let content_length: usize = String::from_utf8_lossy(&header)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().expect("invalid Content-Length"))
        })
        .unwrap_or(0);
    if content_length == 0 {
        return None;
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.ok()?;
    Some(String::from_utf8(body).unwrap())
}

/// A client talking to an in-process server over in-memory pipes.
pub struct TestClient {
    writer: DuplexStream,
    messages: UnboundedReceiver<Value>,
    next_id: i64,
}

impl TestClient {
    pub fn start() -> Self {
        let (client_read, server_write) = tokio::io::duplex(64 * 1024);
        let (server_read, client_write) = tokio::io::duplex(64 * 1024);

        let (service, socket) = LspService::new(Backend::new);
        tokio::spawn(async move {
            Server::new(server_read, server_write, socket)
                .serve(service)
                .await;
        });

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut reader = BufReader::new(client_read);
            while let Some(msg) = recv_msg(&mut reader).await {
                let value: Value = serde_json::from_str(&msg).unwrap();
                if tx.send(value).is_err() {
                    break;
                }
            }
        });

        Self {
            writer: client_write,
            messages: rx,
            next_id: 1,
        }
    }

    /// Sends a request and waits for its response.
    pub async fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        let msg = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});
        send_msg(&mut self.writer, &msg.to_string()).await;

        self.wait_for(|msg| msg["id"] == id && msg.get("method").is_none())
            .await
            .unwrap_or_else(|| panic!("no response to {method}"))
    }

    pub async fn notify(&mut self, method: &str, params: Value) {
        let msg = json!({"jsonrpc": "2.0", "method": method, "params": params});
        send_msg(&mut self.writer, &msg.to_string()).await;
    }

    /// Waits up to five seconds for a message matching `predicate`.
    pub async fn wait_for(&mut self, predicate: impl Fn(&Value) -> bool) -> Option<Value> {
        let deadline = tokio::time::sleep(Duration::from_secs(5));
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                msg = self.messages.recv() => match msg {
                    Some(msg) if predicate(&msg) => return Some(msg),
                    Some(_) => continue,
                    None => return None,
                },
                _ = &mut deadline => return None,
            }
        }
    }

    pub async fn wait_for_notification(&mut self, method: &str) -> Option<Value> {
        self.wait_for(|msg| msg["method"] == method).await
    }

    pub async fn initialize(&mut self, root: &Path) -> Value {
        let root_uri = tower_lsp::lsp_types::Url::from_file_path(root).unwrap();
        let response = self
            .request(
                "initialize",
                json!({"rootUri": root_uri, "capabilities": {}}),
            )
            .await;
        self.notify("initialized", json!({})).await;
        response
    }
}

/// Writes a stand-in ShellCheck that reports SC2086 for `$f` on line 2.
#[cfg(unix)]
pub fn fake_shellcheck(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --version) echo 'version: 0.9.0'; exit 0 ;;
  esac
done
cat >/dev/null
echo '{"comments":[{"file":"-","line":2,"endLine":2,"column":4,"endColumn":6,"level":"info","code":2086,"message":"Double quote to prevent globbing and word splitting.","fix":{"replacements":[{"precedence":7,"line":2,"endLine":2,"column":4,"endColumn":4,"insertionPoint":"afterEnd","replacement":"\""},{"precedence":7,"line":2,"endLine":2,"column":6,"endColumn":6,"insertionPoint":"beforeStart","replacement":"\""}]}}]}'
exit 1
"#;
    let path = dir.join("fake-shellcheck");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Creates a workspace whose configuration points at `executable`.
pub fn workspace_with_tool(executable: &Path, extra: Value) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut config = json!({ "executablePath": executable });
    if let (Some(config), Some(extra)) = (config.as_object_mut(), extra.as_object()) {
        config.extend(extra.clone());
    }
    std::fs::write(dir.path().join(".shellbridge.json"), config.to_string()).unwrap();
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recv_msg_success() {
        let payload = r#"{"jsonrpc":"2.0","method":"abc","params":{}}"#;
        let data = format!("Content-Length: {}\r\n\r\n{}", payload.len(), payload);
        let mut cursor = std::io::Cursor::new(data.into_bytes());

        let result = recv_msg(&mut cursor).await;
        assert_eq!(result.unwrap(), payload);
    }

    #[tokio::test]
    #[should_panic(expected = "invalid Content-Length")]
    async fn test_recv_msg_parse_error() {
        let data = "Content-Length: invalid\r\n\r\n{}";
        let mut cursor = std::io::Cursor::new(data.as_bytes().to_vec());
        let _ = recv_msg(&mut cursor).await;
    }
}
