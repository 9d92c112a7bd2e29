use std::sync::{Arc, Mutex};

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    task::JoinHandle,
};

const CHUNK: usize = 8 * 1024;

/// In-memory capture of one child pipe.
///
/// Bytes land in a shared buffer as they are read, so whatever arrived before a
/// kill is kept even if the pipe never reaches EOF.
pub(crate) struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    /// `None` once the reader has seen EOF.
    task: Option<JoinHandle<()>>,
}

impl Capture {
    pub(crate) fn spawn<R>(mut reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let task = tokio::spawn(async move {
            let mut chunk = vec![0u8; CHUNK];
            loop {
                match reader.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        let mut out = sink.lock().unwrap_or_else(|e| e.into_inner());
                        out.extend_from_slice(&chunk[..n]);
                    }
                }
            }
        });
        Self {
            buf,
            task: Some(task),
        }
    }

    /// Resolve once the pipe hit EOF. Safe to drop midway and call again.
    pub(crate) async fn closed(&mut self) {
        if let Some(task) = self.task.as_mut() {
            let _ = task.await;
            self.task = None;
        }
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.task.is_none()
    }

    /// Stop reading and return everything captured so far as text.
    pub(crate) fn into_text(self) -> String {
        if let Some(task) = self.task {
            task.abort();
        }
        let bytes = std::mem::take(&mut *self.buf.lock().unwrap_or_else(|e| e.into_inner()));
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Both pipes of one child.
pub(crate) struct Output {
    stdout: Option<Capture>,
    stderr: Option<Capture>,
}

impl Output {
    pub(crate) fn new(stdout: Option<Capture>, stderr: Option<Capture>) -> Self {
        Self { stdout, stderr }
    }

    /// Wait for EOF on both pipes at once.
    pub(crate) async fn closed(&mut self) {
        tokio::join!(closed(&mut self.stdout), closed(&mut self.stderr));
    }

    /// Whether every pipe reached EOF, i.e. nothing was cut off.
    pub(crate) fn is_complete(&self) -> bool {
        [&self.stdout, &self.stderr]
            .into_iter()
            .all(|c| c.as_ref().is_none_or(Capture::is_closed))
    }

    pub(crate) fn into_text(self) -> (String, String) {
        (text(self.stdout), text(self.stderr))
    }
}

async fn closed(capture: &mut Option<Capture>) {
    if let Some(capture) = capture {
        capture.closed().await;
    }
}

fn text(capture: Option<Capture>) -> String {
    capture.map(Capture::into_text).unwrap_or_default()
}
