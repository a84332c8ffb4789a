//! Async client for the database worker process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};

use super::error::{WorkerError, WorkerResult};
use super::protocol::{self, methods, ErrorInfo, RequestEnvelope, ResponseEnvelope};
use crate::config::Settings;

/// Default timeout for requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Binary name searched for when no path is configured.
const WORKER_BINARY: &str = "schemadoc-worker";

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>;

/// Async client for the database worker.
///
/// The client spawns the worker as a child process and communicates via
/// NDJSON over stdin/stdout. Each request has a unique ID for correlation
/// with responses, so requests may be issued concurrently.
///
/// # Example
///
/// ```ignore
/// use schemadoc::worker::WorkerClient;
///
/// let client = WorkerClient::spawn("./schemadoc-worker").await?;
/// let session = client.open("mssql", &connection_string).await?;
/// let tables = client.list_tables(&session.session_id, &["TABLE", "VIEW"]).await?;
/// client.close(&session.session_id).await?;
/// ```
pub struct WorkerClient {
    stdin: Arc<Mutex<BufWriter<ChildStdin>>>,
    pending: PendingMap,
    _child: Child,
    reader_task: tokio::task::JoinHandle<()>,
    timeout: Duration,
}

impl WorkerClient {
    /// Spawn a new worker process with the default timeout.
    pub async fn spawn<P: AsRef<Path>>(worker_path: P) -> WorkerResult<Self> {
        Self::spawn_with_timeout(worker_path, Duration::from_secs(DEFAULT_TIMEOUT_SECS)).await
    }

    /// Spawn a worker using the `[worker]` settings.
    pub async fn spawn_with_settings(settings: &Settings) -> WorkerResult<Self> {
        let worker_path = Self::resolve_worker_path(settings)?;
        let timeout = Duration::from_secs(settings.worker.timeout_seconds);
        Self::spawn_with_timeout(&worker_path, timeout).await
    }

    /// Resolve the worker binary: configured path, then the working
    /// directory, then `PATH`.
    fn resolve_worker_path(settings: &Settings) -> WorkerResult<PathBuf> {
        match settings.worker_path() {
            Ok(Some(path)) => return Ok(path),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "ignoring worker path from settings");
            }
        }

        let local = PathBuf::from(".").join(WORKER_BINARY);
        if local.exists() {
            return Ok(local);
        }

        if let Some(paths) = std::env::var_os("PATH") {
            for dir in std::env::split_paths(&paths) {
                let candidate = dir.join(WORKER_BINARY);
                if candidate.exists() {
                    return Ok(candidate);
                }
            }
        }

        Err(WorkerError::NotFound)
    }

    /// Spawn a new worker process with a custom timeout.
    pub async fn spawn_with_timeout<P: AsRef<Path>>(
        worker_path: P,
        timeout: Duration,
    ) -> WorkerResult<Self> {
        let worker_path = worker_path.as_ref();
        tracing::debug!(path = %worker_path.display(), "spawning worker");

        let mut child = Command::new(worker_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(WorkerError::SpawnFailed)?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(WorkerError::SpawnFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "worker stdio was not captured",
            )));
        };

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let reader_task = Self::spawn_reader_task(stdout, pending.clone());

        Ok(Self {
            stdin: Arc::new(Mutex::new(BufWriter::new(stdin))),
            pending,
            _child: child,
            reader_task,
            timeout,
        })
    }

    /// Spawn the background task that reads responses from the worker.
    fn spawn_reader_task(stdout: ChildStdout, pending: PendingMap) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) => match serde_json::from_str::<ResponseEnvelope>(&line) {
                        Ok(resp) => {
                            if let Some(tx) = pending.lock().await.remove(&resp.id) {
                                let _ = tx.send(resp);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "worker: failed to parse response");
                        }
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "worker: read error");
                        break;
                    }
                }
            }

            // Fail every request still waiting on the exited worker.
            let mut pending = pending.lock().await;
            for (id, tx) in pending.drain() {
                let _ = tx.send(ResponseEnvelope {
                    id,
                    success: false,
                    result: None,
                    error: Some(ErrorInfo {
                        code: "WORKER_EXITED".to_string(),
                        message: "Worker process exited unexpectedly".to_string(),
                    }),
                });
            }
        })
    }

    /// Send a request to the worker and wait for a response.
    pub async fn request<P, R>(&self, method: &str, params: P) -> WorkerResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = uuid::Uuid::new_v4().to_string();

        let request = RequestEnvelope {
            id: id.clone(),
            method: method.to_string(),
            params: serde_json::to_value(params).map_err(WorkerError::SerializeFailed)?,
        };

        let line = serde_json::to_string(&request).map_err(WorkerError::SerializeFailed)? + "\n";

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id.clone(), tx);

        if let Err(e) = self.send_line(&line).await {
            self.pending.lock().await.remove(&id);
            return Err(e);
        }

        let response = match tokio::time::timeout(self.timeout, rx).await {
            Ok(received) => received?,
            Err(_) => {
                self.pending.lock().await.remove(&id);
                return Err(WorkerError::Timeout(self.timeout.as_secs()));
            }
        };

        if response.success {
            let result = response.result.unwrap_or(serde_json::Value::Null);
            serde_json::from_value(result).map_err(WorkerError::DeserializeFailed)
        } else {
            let error = response.error.unwrap_or_else(|| ErrorInfo {
                code: "UNKNOWN".to_string(),
                message: "Unknown error".to_string(),
            });
            Err(WorkerError::from_code(&error.code, &error.message))
        }
    }

    async fn send_line(&self, line: &str) -> WorkerResult<()> {
        let mut stdin = self.stdin.lock().await;
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(WorkerError::WriteFailed)?;
        stdin.flush().await.map_err(WorkerError::WriteFailed)
    }
}

impl Drop for WorkerClient {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

// Catalog session calls
impl WorkerClient {
    /// Open a database session.
    pub async fn open(
        &self,
        driver: &str,
        connection_string: &str,
    ) -> WorkerResult<protocol::OpenResponse> {
        self.request(
            methods::OPEN,
            protocol::OpenParams {
                driver: driver.to_string(),
                connection_string: connection_string.to_string(),
            },
        )
        .await
    }

    /// List tables of the given types.
    pub async fn list_tables(
        &self,
        session_id: &str,
        table_types: &[&str],
    ) -> WorkerResult<protocol::ListTablesResponse> {
        self.request(
            methods::LIST_TABLES,
            protocol::ListTablesParams {
                session_id: session_id.to_string(),
                table_types: table_types.iter().map(|t| t.to_string()).collect(),
            },
        )
        .await
    }

    /// List the columns of one table.
    pub async fn list_columns(
        &self,
        session_id: &str,
        schema: &str,
        table: &str,
    ) -> WorkerResult<protocol::ListColumnsResponse> {
        self.request(
            methods::LIST_COLUMNS,
            protocol::ListColumnsParams {
                session_id: session_id.to_string(),
                schema: schema.to_string(),
                table: table.to_string(),
            },
        )
        .await
    }

    /// Execute a SQL query on an open session.
    pub async fn execute_query(
        &self,
        session_id: &str,
        sql: &str,
    ) -> WorkerResult<protocol::ExecuteQueryResponse> {
        self.request(
            methods::EXECUTE_QUERY,
            protocol::ExecuteQueryParams {
                session_id: session_id.to_string(),
                sql: sql.to_string(),
            },
        )
        .await
    }

    /// Close a session.
    pub async fn close(&self, session_id: &str) -> WorkerResult<()> {
        let _: serde::de::IgnoredAny = self
            .request(
                methods::CLOSE,
                protocol::CloseParams {
                    session_id: session_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }
}
