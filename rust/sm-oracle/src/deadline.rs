//! Request-level timeouts around a blocking oracle.
//!
//! Calls are forwarded to a dedicated worker thread that owns the inner oracle;
//! the caller waits at most `timeout` for the reply. A timed-out call is reported
//! as [`OracleError::Timeout`] and never retried here.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::{LexicalOracle, OracleError, SenseCluster};

enum Request {
    Senses {
        word: String,
        reply: mpsc::Sender<Result<Vec<SenseCluster>, OracleError>>,
    },
    Similarity {
        a: String,
        b: String,
        reply: mpsc::Sender<Result<Option<f64>, OracleError>>,
    },
}

pub struct DeadlineOracle {
    tx: mpsc::Sender<Request>,
    timeout: Duration,
}

impl DeadlineOracle {
    /// Spawn the worker. Fails with `Unavailable` if the thread cannot be started.
    pub fn spawn<O>(inner: Arc<O>, timeout: Duration) -> Result<Self, OracleError>
    where
        O: LexicalOracle + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel::<Request>();
        thread::Builder::new()
            .name("sm-oracle-worker".to_string())
            .spawn(move || {
                // Exits once every sender is dropped.
                while let Ok(req) = rx.recv() {
                    match req {
                        Request::Senses { word, reply } => {
                            let _ = reply.send(inner.senses(&word));
                        }
                        Request::Similarity { a, b, reply } => {
                            let _ = reply.send(inner.similarity(&a, &b));
                        }
                    }
                }
            })
            .map_err(|e| OracleError::Unavailable(format!("failed to spawn oracle worker: {e}")))?;
        Ok(Self { tx, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn call<T>(
        &self,
        make: impl FnOnce(mpsc::Sender<Result<T, OracleError>>) -> Request,
    ) -> Result<T, OracleError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(make(reply_tx))
            .map_err(|_| OracleError::Unavailable("oracle worker disconnected".to_string()))?;
        match reply_rx.recv_timeout(self.timeout) {
            Ok(res) => res,
            Err(RecvTimeoutError::Timeout) => Err(OracleError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(OracleError::Unavailable(
                "oracle worker dropped the request".to_string(),
            )),
        }
    }
}

impl LexicalOracle for DeadlineOracle {
    fn senses(&self, word: &str) -> Result<Vec<SenseCluster>, OracleError> {
        let word = word.to_string();
        self.call(|reply| Request::Senses { word, reply })
    }

    fn similarity(&self, a: &str, b: &str) -> Result<Option<f64>, OracleError> {
        let (a, b) = (a.to_string(), b.to_string());
        self.call(|reply| Request::Similarity { a, b, reply })
    }
}
